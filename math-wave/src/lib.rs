//! Free-space electromagnetic wave kernels
//!
//! This crate provides the pieces of radiation physics shared by the field
//! estimators:
//!
//! - **Constants**: vacuum permittivity and permeability, wave parameters
//!   derived from a frequency
//! - **Points** in 3D space
//! - **Green's function** `exp(-jkR)/R` of the scalar Helmholtz equation,
//!   evaluable on complex values or dual numbers, with a closed-form
//!   gradient for reference
//!
//! # Example
//!
//! ```rust
//! use math_em_wave::{Point, WaveParameters, green::green_function_at};
//!
//! let wave = WaveParameters::from_frequency(1.0e9).unwrap();
//! let g = green_function_at(&Point::new(0.0, 0.0, 0.5), &Point::origin(), wave.k).unwrap();
//! // |G| = 1/R for any k
//! assert!((g.norm() - 2.0).abs() < 1e-12);
//! ```

pub mod constants;
pub mod error;
pub mod green;
mod point;

pub use constants::WaveParameters;
pub use error::{Result, WaveError};
pub use point::Point;

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
