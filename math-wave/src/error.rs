//! Error types for wave kernels

use thiserror::Error;

/// Errors raised when evaluating wave kernels.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum WaveError {
    /// Target and source coincide; the kernel has a 1/R singularity there.
    #[error("singular geometry: target and source coincide (R = {distance:e})")]
    SingularGeometry {
        /// Distance between target and source
        distance: f64,
    },

    /// Frequency that is not finite and strictly positive.
    #[error("invalid frequency: {frequency} Hz (must be finite and > 0)")]
    InvalidFrequency {
        /// The rejected frequency
        frequency: f64,
    },
}

/// A specialized `Result` type for wave kernels.
pub type Result<T> = std::result::Result<T, WaveError>;

impl WaveError {
    /// Returns `true` for a coincident target and source.
    pub fn is_singular(&self) -> bool {
        matches!(self, WaveError::SingularGeometry { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = WaveError::InvalidFrequency { frequency: -1.0 };
        assert_eq!(
            err.to_string(),
            "invalid frequency: -1 Hz (must be finite and > 0)"
        );
        assert!(!err.is_singular());
        assert!(WaveError::SingularGeometry { distance: 0.0 }.is_singular());
    }
}
