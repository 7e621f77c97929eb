//! Antenna current distributions
//!
//! The estimator only sees an [`AntennaCurrent`]: source positions `x` along
//! the wire and the complex current `Is = ireal + j·iimag` at each of them.
//! Where the current comes from is behind [`AntennaSource`]: an analytic
//! sinusoidal dipole, or a table of measured/simulated currents per
//! frequency.

use crate::error::{IpdError, Result};
use math_em_numerics::{Grid, HoloborodkoDifferentiator};
use math_em_wave::WaveParameters;
use ndarray::{Array1, ArrayView1};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Relative tolerance when matching a requested frequency to a table entry
const FREQUENCY_RTOL: f64 = 1e-9;

/// Complex current sampled along a wire on the x axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AntennaCurrent {
    x: Grid,
    current: Array1<Complex64>,
}

impl AntennaCurrent {
    /// Pair a source grid with current samples of the same length.
    pub fn new(x: Grid, current: Array1<Complex64>) -> Result<Self> {
        x.check_field(current.len(), "antenna current")?;
        Ok(Self { x, current })
    }

    /// Build from the three tabulated columns `x`, `ireal`, `iimag`.
    pub fn from_columns(x: Vec<f64>, ireal: &[f64], iimag: &[f64]) -> Result<Self> {
        let grid = Grid::new(x)?;
        grid.check_field(ireal.len(), "antenna current (real part)")?;
        grid.check_field(iimag.len(), "antenna current (imaginary part)")?;

        let current = ireal
            .iter()
            .zip(iimag)
            .map(|(&re, &im)| Complex64::new(re, im))
            .collect();
        Self::new(grid, current)
    }

    /// Source positions
    pub fn grid(&self) -> &Grid {
        &self.x
    }

    /// Current samples `Is`
    pub fn current(&self) -> ArrayView1<'_, Complex64> {
        self.current.view()
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    /// `dIs/dx` at every source sample.
    ///
    /// The current is tabulated data, so it is differentiated with the
    /// smooth noise-robust stencil rather than a plain central difference.
    /// Requires a uniform source grid of at least 3 samples.
    pub fn derivative(&self, differentiator: &HoloborodkoDifferentiator) -> Result<Array1<Complex64>> {
        Ok(differentiator.differentiate_on_grid(self.current.view(), &self.x)?)
    }
}

/// Supplier of the antenna current at a given frequency.
pub trait AntennaSource: Send + Sync {
    /// Current distribution when the antenna is driven at `frequency` (Hz)
    fn current_at(&self, frequency: f64) -> Result<AntennaCurrent>;

    /// Short human-readable description
    fn describe(&self) -> String;
}

/// Centre-fed thin-wire dipole on the x axis with the standard sinusoidal
/// current `I(x) = I0 sin(k (L/2 - |x|))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SinusoidalDipole {
    /// Total length L (m), centred on the origin
    pub length: f64,
    /// Number of source samples along the wire
    pub samples: usize,
    /// Feed current amplitude I0 (A)
    pub amplitude: f64,
}

impl SinusoidalDipole {
    pub fn new(length: f64, samples: usize, amplitude: f64) -> Result<Self> {
        if !(length.is_finite() && length > 0.0) {
            return Err(IpdError::Config(format!(
                "dipole length must be finite and > 0, got {length}"
            )));
        }
        if samples < 3 {
            return Err(IpdError::Config(format!(
                "dipole needs at least 3 source samples, got {samples}"
            )));
        }
        if !amplitude.is_finite() {
            return Err(IpdError::Config(format!(
                "dipole amplitude must be finite, got {amplitude}"
            )));
        }
        Ok(Self {
            length,
            samples,
            amplitude,
        })
    }

    /// Half-wave dipole (L = λ/2) at `frequency`.
    pub fn half_wave(frequency: f64, samples: usize, amplitude: f64) -> Result<Self> {
        let wave = WaveParameters::from_frequency(frequency)?;
        Self::new(0.5 * wave.wavelength(), samples, amplitude)
    }
}

impl AntennaSource for SinusoidalDipole {
    fn current_at(&self, frequency: f64) -> Result<AntennaCurrent> {
        let wave = WaveParameters::from_frequency(frequency)?;
        let half = 0.5 * self.length;
        let grid = Grid::linspace(-half, half, self.samples)?;
        let current = grid
            .coords()
            .mapv(|x| Complex64::new(self.amplitude * (wave.k * (half - x.abs())).sin(), 0.0));
        AntennaCurrent::new(grid, current)
    }

    fn describe(&self) -> String {
        format!(
            "sinusoidal dipole L = {} m, {} samples, I0 = {} A",
            self.length, self.samples, self.amplitude
        )
    }
}

/// One tabulated current distribution, as produced by an external solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AntennaTable {
    /// Frequency (Hz) the currents were computed at
    pub frequency: f64,
    /// Source positions (m)
    pub x: Vec<f64>,
    /// Real part of the current (A)
    pub ireal: Vec<f64>,
    /// Imaginary part of the current (A)
    pub iimag: Vec<f64>,
}

/// Antenna currents known only at a fixed set of frequencies.
#[derive(Debug, Clone)]
pub struct TabulatedAntenna {
    entries: Vec<(f64, AntennaCurrent)>,
}

impl TabulatedAntenna {
    /// Validate every table up front.
    pub fn new(tables: Vec<AntennaTable>) -> Result<Self> {
        if tables.is_empty() {
            return Err(IpdError::Config("antenna table is empty".to_string()));
        }
        let entries = tables
            .into_iter()
            .map(|t| -> Result<(f64, AntennaCurrent)> {
                WaveParameters::from_frequency(t.frequency)?;
                let current = AntennaCurrent::from_columns(t.x, &t.ireal, &t.iimag)?;
                Ok((t.frequency, current))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { entries })
    }

    /// Load a JSON array of [`AntennaTable`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let tables: Vec<AntennaTable> = serde_json::from_str(&content)?;
        log::info!("loaded {} antenna tables from {}", tables.len(), path.display());
        Self::new(tables)
    }

    /// Frequencies available in the table
    pub fn frequencies(&self) -> Vec<f64> {
        self.entries.iter().map(|(f, _)| *f).collect()
    }
}

impl AntennaSource for TabulatedAntenna {
    fn current_at(&self, frequency: f64) -> Result<AntennaCurrent> {
        self.entries
            .iter()
            .find(|(f, _)| (f - frequency).abs() <= FREQUENCY_RTOL * f.abs())
            .map(|(_, current)| current.clone())
            .ok_or_else(|| {
                IpdError::Config(format!(
                    "no tabulated antenna current at {frequency} Hz (available: {:?})",
                    self.frequencies()
                ))
            })
    }

    fn describe(&self) -> String {
        format!("tabulated antenna, {} frequencies", self.entries.len())
    }
}
