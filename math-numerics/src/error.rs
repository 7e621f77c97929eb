//! Error types for numerical differentiation and quadrature.
//!
//! Structural preconditions (orders, step sizes, shapes, grid layout) are
//! checked at the boundary of each operation and reported here. Accuracy
//! loss from a badly chosen finite-difference step is not an error.

use thiserror::Error;

/// Errors raised by the numerics toolkit.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericsError {
    /// Derivative order outside {1, 2}.
    #[error("invalid differentiation order: {order} (must be 1 or 2)")]
    InvalidOrder {
        /// The rejected order
        order: usize,
    },

    /// Step size or sample spacing that is zero, non-finite, or negative
    /// where only a positive value makes sense.
    #[error("invalid step size: {delta}")]
    InvalidStep {
        /// The rejected step
        delta: f64,
    },

    /// Perturbed axis does not exist for the evaluation point.
    #[error("invalid axis {axis} for a function of {arity} arguments")]
    InvalidAxis {
        /// Requested axis
        axis: usize,
        /// Number of positional arguments at the evaluation point
        arity: usize,
    },

    /// Field and grid dimensions disagree.
    #[error("shape mismatch in {context}: expected {expected}, got {got}")]
    ShapeMismatch {
        /// Operation that detected the mismatch
        context: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        got: usize,
    },

    /// Not enough samples for the requested operation.
    #[error("grid too short: {len} samples (need at least {min})")]
    GridTooShort {
        /// Number of samples supplied
        len: usize,
        /// Minimum required
        min: usize,
    },

    /// Grid coordinates are not strictly increasing or strictly decreasing.
    #[error("grid is not strictly monotonic at index {index}")]
    NonMonotonicGrid {
        /// First offending index
        index: usize,
    },

    /// Grid spacing deviates from the first interval.
    #[error("non-uniform grid spacing at index {index}: {spacing} (expected {expected})")]
    NonUniformGrid {
        /// First offending interval
        index: usize,
        /// Observed spacing
        spacing: f64,
        /// Spacing of the first interval
        expected: f64,
    },

    /// Quadrature window size below 2.
    #[error("invalid subdivision count: {n} (must be >= 2)")]
    InvalidSubdivision {
        /// The rejected window size
        n: usize,
    },

    /// Holoborodko stencil length outside {5, 7, 9, 11}.
    #[error("invalid stencil length: {length} (must be 5, 7, 9 or 11)")]
    InvalidStencil {
        /// The rejected length
        length: usize,
    },
}

/// A specialized `Result` type for numerics operations.
pub type Result<T> = std::result::Result<T, NumericsError>;

impl NumericsError {
    /// Returns `true` for shape and grid-layout errors.
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            NumericsError::ShapeMismatch { .. }
                | NumericsError::GridTooShort { .. }
                | NumericsError::NonMonotonicGrid { .. }
                | NumericsError::NonUniformGrid { .. }
        )
    }

    /// Returns `true` for rejected operator parameters.
    ///
    /// This includes orders, steps, axes, window sizes and stencil lengths.
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            NumericsError::InvalidOrder { .. }
                | NumericsError::InvalidStep { .. }
                | NumericsError::InvalidAxis { .. }
                | NumericsError::InvalidSubdivision { .. }
                | NumericsError::InvalidStencil { .. }
        )
    }

    pub(crate) fn step<T: num_traits::ToPrimitive>(delta: T) -> Self {
        NumericsError::InvalidStep {
            delta: delta.to_f64().unwrap_or(f64::NAN),
        }
    }
}
