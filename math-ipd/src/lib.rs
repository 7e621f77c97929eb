//! Incident power density of a thin-wire dipole
//!
//! Estimates the power density a dipole on the x axis radiates onto target
//! planes parallel to it, with the spatial derivatives of the Green's
//! function obtained either by central finite differences or exactly
//! through dual numbers. The two are interchangeable behind
//! [`GreenGradient`], which is what the sweeps compare.
//!
//! # Pipeline
//!
//! 1. [`AntennaSource`] gives the current `Is` along the wire at a
//!    frequency; its derivative comes from the smooth noise-robust
//!    differentiator.
//! 2. [`IpdEstimator::fields_at`] integrates current-weighted kernels along
//!    the wire for `Ex` and `Hy`; `S = Ex · conj(Hy)`.
//! 3. [`IpdEstimator::fill`] evaluates every target cell independently into
//!    a [`PowerDensityField`].
//! 4. [`IpdEstimator::absorbed_power`] reduces each plane with the double
//!    quadrature rule to `S_ab = 1/(2A) ∫∫ Re(S) dx dy`.
//!
//! # Example
//!
//! ```rust
//! use math_em_ipd::{
//!     AntennaSource, AutomaticGradient, EstimatorOptions, IpdEstimator, SinusoidalDipole, TargetGrid,
//! };
//!
//! let f = 1.0e9;
//! let current = SinusoidalDipole::half_wave(f, 41, 1.0).unwrap().current_at(f).unwrap();
//! let estimator = IpdEstimator::new(current, f, &AutomaticGradient, EstimatorOptions::default()).unwrap();
//!
//! let grid = TargetGrid::centered(0.2, 0.2, 9, 9, &[0.1]).unwrap();
//! let s_ab = estimator.estimate(&grid).unwrap();
//! assert!(s_ab[0].is_finite());
//! ```

pub mod antenna;
pub mod config;
pub mod derivative;
pub mod error;
pub mod estimator;
pub mod metrics;
pub mod output;
pub mod study;
pub mod sweep;
pub mod target;

pub use antenna::{AntennaCurrent, AntennaSource, AntennaTable, SinusoidalDipole, TabulatedAntenna};
pub use config::{IpdConfig, Precision};
pub use derivative::{AutomaticGradient, FiniteDifferenceGradient, GradientStrategy, GreenGradient};
pub use error::{IpdError, Result};
pub use estimator::{EstimatorOptions, FieldSample, IpdEstimator};
pub use output::SweepOutput;
pub use study::{StepSizeStudy, run_step_size_study};
pub use sweep::{SweepPlan, SweepRecord, run_sweep};
pub use target::{FieldPoint, PowerDensityField, TargetGrid};

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
