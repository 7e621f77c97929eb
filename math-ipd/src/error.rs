//! Error types for the incident power density estimator.

use math_em_numerics::NumericsError;
use math_em_wave::{Point, WaveError};
use thiserror::Error;

/// Errors that can occur while estimating incident power density.
#[derive(Debug, Error)]
pub enum IpdError {
    /// A target point coincides with an antenna source sample.
    #[error(
        "singular geometry: target ({}, {}, {}) coincides with source sample {source_index} (R = {distance:e})",
        .target.x, .target.y, .target.z
    )]
    SingularGeometry {
        /// Target point being evaluated
        target: Point,
        /// Index of the offending source sample
        source_index: usize,
        /// Distance between them
        distance: f64,
    },

    /// Frequency is invalid (must be finite and > 0).
    #[error("invalid frequency: {frequency} Hz (must be finite and > 0)")]
    InvalidFrequency {
        /// The invalid frequency value
        frequency: f64,
    },

    /// Target area is invalid (must be finite and non-zero).
    #[error("invalid target area: {area} m² (must be finite and non-zero)")]
    InvalidArea {
        /// The invalid area
        area: f64,
    },

    /// Configuration or input data is inconsistent.
    #[error("configuration error: {0}")]
    Config(String),

    /// Wave kernel evaluation failed.
    #[error(transparent)]
    Wave(WaveError),

    /// Differentiation or quadrature precondition failed.
    #[error(transparent)]
    Numerics(#[from] NumericsError),

    /// Reading or writing a file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for IPD operations.
pub type Result<T> = std::result::Result<T, IpdError>;

impl From<WaveError> for IpdError {
    fn from(err: WaveError) -> Self {
        match err {
            WaveError::InvalidFrequency { frequency } => IpdError::InvalidFrequency { frequency },
            other => IpdError::Wave(other),
        }
    }
}

impl IpdError {
    /// Attach the target and source index to a kernel error.
    pub(crate) fn at_source(err: WaveError, target: &Point, source_index: usize) -> Self {
        match err {
            WaveError::SingularGeometry { distance } => IpdError::SingularGeometry {
                target: *target,
                source_index,
                distance,
            },
            other => other.into(),
        }
    }

    /// Returns `true` if a target coincides with a source.
    pub fn is_singular(&self) -> bool {
        match self {
            IpdError::SingularGeometry { .. } => true,
            IpdError::Wave(err) => err.is_singular(),
            _ => false,
        }
    }

    /// Returns `true` for configuration and input data errors.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            IpdError::Config(_)
                | IpdError::InvalidFrequency { .. }
                | IpdError::InvalidArea { .. }
        )
    }

    /// Returns `true` for shape and parameter errors from the numerics layer.
    pub fn is_numerics_error(&self) -> bool {
        matches!(self, IpdError::Numerics(_))
    }
}
