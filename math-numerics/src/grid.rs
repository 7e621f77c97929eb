//! One-dimensional sample grids
//!
//! A [`Grid`] is an ordered, strictly monotonic sequence of real coordinates
//! along one axis (antenna source positions, target x/y/z positions).
//! Sampled fields are co-indexed with a grid and must have the same length.

use crate::error::{NumericsError, Result};
use ndarray::{Array1, ArrayView1};
use std::ops::Index;

/// Relative tolerance used when checking that a grid is uniformly spaced.
///
/// Tabulated coordinates are usually printed with a limited number of digits,
/// so exact equality of all intervals is too strict.
pub const UNIFORM_SPACING_RTOL: f64 = 1e-6;

/// Strictly monotonic coordinates along one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    coords: Array1<f64>,
}

impl Grid {
    /// Build a grid from coordinates, checking it is non-empty and strictly
    /// increasing or strictly decreasing.
    pub fn new(coords: impl Into<Array1<f64>>) -> Result<Self> {
        let coords = coords.into();
        if coords.is_empty() {
            return Err(NumericsError::GridTooShort { len: 0, min: 1 });
        }

        if coords.len() > 1 {
            let increasing = coords[1] > coords[0];
            for i in 1..coords.len() {
                let step = coords[i] - coords[i - 1];
                let ok = if increasing { step > 0.0 } else { step < 0.0 };
                if !ok {
                    return Err(NumericsError::NonMonotonicGrid { index: i });
                }
            }
        }

        Ok(Self { coords })
    }

    /// `n` evenly spaced coordinates from `start` to `end` inclusive.
    pub fn linspace(start: f64, end: f64, n: usize) -> Result<Self> {
        if n == 1 {
            return Self::new(Array1::from_elem(1, start));
        }
        Self::new(Array1::linspace(start, end, n))
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Always `false`: an empty grid cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinates as an array view
    pub fn coords(&self) -> ArrayView1<'_, f64> {
        self.coords.view()
    }

    /// First coordinate
    pub fn first(&self) -> f64 {
        self.coords[0]
    }

    /// Last coordinate
    pub fn last(&self) -> f64 {
        self.coords[self.coords.len() - 1]
    }

    /// Absolute extent `|last - first|`
    pub fn width(&self) -> f64 {
        (self.last() - self.first()).abs()
    }

    /// Iterate over coordinates
    pub fn iter(&self) -> impl Iterator<Item = &f64> {
        self.coords.iter()
    }

    /// Signed sample spacing of a uniform grid.
    ///
    /// Negative for decreasing grids. Fails if the grid has fewer than two
    /// samples or if any interval deviates from the first one by more than
    /// [`UNIFORM_SPACING_RTOL`].
    pub fn uniform_spacing(&self) -> Result<f64> {
        let n = self.len();
        if n < 2 {
            return Err(NumericsError::GridTooShort { len: n, min: 2 });
        }

        let expected = self.coords[1] - self.coords[0];
        for i in 2..n {
            let spacing = self.coords[i] - self.coords[i - 1];
            if (spacing - expected).abs() > UNIFORM_SPACING_RTOL * expected.abs() {
                return Err(NumericsError::NonUniformGrid {
                    index: i,
                    spacing,
                    expected,
                });
            }
        }

        Ok((self.last() - self.first()) / (n - 1) as f64)
    }

    /// Check that a field sampled on this grid has the right length.
    pub fn check_field(&self, len: usize, context: &'static str) -> Result<()> {
        if len != self.len() {
            return Err(NumericsError::ShapeMismatch {
                context,
                expected: self.len(),
                got: len,
            });
        }
        Ok(())
    }
}

impl Index<usize> for Grid {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.coords[index]
    }
}

impl TryFrom<Vec<f64>> for Grid {
    type Error = NumericsError;

    fn try_from(coords: Vec<f64>) -> Result<Self> {
        Grid::new(coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linspace_grid() {
        let grid = Grid::linspace(-1.0, 1.0, 5).unwrap();
        assert_eq!(grid.len(), 5);
        assert_relative_eq!(grid.width(), 2.0, epsilon = 1e-15);
        assert_relative_eq!(grid.uniform_spacing().unwrap(), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_decreasing_grid_has_negative_spacing() {
        let grid = Grid::new(vec![2.0, 1.5, 1.0, 0.5]).unwrap();
        assert_relative_eq!(grid.uniform_spacing().unwrap(), -0.5, epsilon = 1e-15);
        assert_relative_eq!(grid.width(), 1.5, epsilon = 1e-15);
    }

    #[test]
    fn test_empty_grid_rejected() {
        let err = Grid::new(Vec::<f64>::new()).unwrap_err();
        assert_eq!(err, NumericsError::GridTooShort { len: 0, min: 1 });
    }

    #[test]
    fn test_non_monotonic_rejected() {
        let err = Grid::new(vec![0.0, 1.0, 1.0, 2.0]).unwrap_err();
        assert_eq!(err, NumericsError::NonMonotonicGrid { index: 2 });

        let err = Grid::new(vec![0.0, 1.0, 0.5]).unwrap_err();
        assert_eq!(err, NumericsError::NonMonotonicGrid { index: 2 });
    }

    #[test]
    fn test_nan_rejected() {
        assert!(Grid::new(vec![0.0, f64::NAN, 1.0]).is_err());
    }

    #[test]
    fn test_non_uniform_detected() {
        let grid = Grid::new(vec![0.0, 1.0, 2.0, 4.0]).unwrap();
        assert!(matches!(
            grid.uniform_spacing(),
            Err(NumericsError::NonUniformGrid { index: 3, .. })
        ));
    }

    #[test]
    fn test_single_sample() {
        let grid = Grid::linspace(3.0, 3.0, 1).unwrap();
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.width(), 0.0);
        assert!(grid.uniform_spacing().is_err());
    }

    #[test]
    fn test_check_field() {
        let grid = Grid::linspace(0.0, 1.0, 4).unwrap();
        assert!(grid.check_field(4, "test").is_ok());
        assert_eq!(
            grid.check_field(3, "test").unwrap_err(),
            NumericsError::ShapeMismatch {
                context: "test",
                expected: 4,
                got: 3
            }
        );
    }
}
