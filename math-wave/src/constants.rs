//! Physical constants and per-frequency wave parameters

use crate::error::{Result, WaveError};
use std::f64::consts::PI;

/// Vacuum permittivity ε₀ (F/m)
pub const EPSILON_0: f64 = 8.854_187_812_8e-12;

/// Vacuum permeability μ₀ (H/m)
pub const MU_0: f64 = 1.256_637_062_12e-6;

/// Speed of light in vacuum (m/s)
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Free-space wavenumber k = ω√(ε₀μ₀) for a frequency in Hz
pub fn wavenumber(frequency: f64) -> f64 {
    2.0 * PI * frequency * (EPSILON_0 * MU_0).sqrt()
}

/// Quantities derived once per frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveParameters {
    /// Frequency (Hz)
    pub frequency: f64,
    /// Angular frequency ω = 2πf (rad/s)
    pub omega: f64,
    /// Wavenumber k = ω√(ε₀μ₀) (rad/m)
    pub k: f64,
}

impl WaveParameters {
    /// Derive ω and k from a frequency in Hz.
    pub fn from_frequency(frequency: f64) -> Result<Self> {
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(WaveError::InvalidFrequency { frequency });
        }
        Ok(Self {
            frequency,
            omega: 2.0 * PI * frequency,
            k: wavenumber(frequency),
        })
    }

    /// Free-space wavelength λ = 2π/k (m)
    pub fn wavelength(&self) -> f64 {
        2.0 * PI / self.k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_speed_of_light_consistent() {
        assert_relative_eq!(
            1.0 / (EPSILON_0 * MU_0).sqrt(),
            SPEED_OF_LIGHT,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_wave_parameters() {
        let wave = WaveParameters::from_frequency(3.0e9).unwrap();
        assert_relative_eq!(wave.omega, 2.0 * PI * 3.0e9);
        // λ ≈ 10 cm at 3 GHz
        assert_relative_eq!(wave.wavelength(), 0.0999308, max_relative = 1e-5);
    }

    #[test]
    fn test_invalid_frequency() {
        assert!(WaveParameters::from_frequency(0.0).is_err());
        assert!(WaveParameters::from_frequency(f64::NAN).is_err());
        assert!(WaveParameters::from_frequency(-5.0).is_err());
    }
}
