//! Target region and the power density sampled on it

use crate::error::{IpdError, Result};
use math_em_numerics::Grid;
use math_em_wave::Point;
use ndarray::{Array3, ArrayView2, ArrayView3, Axis};
use serde::{Deserialize, Serialize};

/// Rectangular target region: planes parallel to the antenna at one or
/// more standoff distances `z`.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetGrid {
    x: Grid,
    y: Grid,
    z: Grid,
}

impl TargetGrid {
    pub fn new(x: Grid, y: Grid, z: Grid) -> Self {
        Self { x, y, z }
    }

    /// `nx × ny` plane centred over the antenna, `width × height` in size,
    /// repeated at each standoff distance.
    pub fn centered(width: f64, height: f64, nx: usize, ny: usize, standoffs: &[f64]) -> Result<Self> {
        let x = Grid::linspace(-0.5 * width, 0.5 * width, nx)?;
        let y = Grid::linspace(-0.5 * height, 0.5 * height, ny)?;
        let z = Grid::new(standoffs.to_vec())?;
        Ok(Self::new(x, y, z))
    }

    pub fn x(&self) -> &Grid {
        &self.x
    }

    pub fn y(&self) -> &Grid {
        &self.y
    }

    pub fn z(&self) -> &Grid {
        &self.z
    }

    /// `(nx, ny, nz)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.x.len(), self.y.len(), self.z.len())
    }

    /// Total number of target points
    pub fn len(&self) -> usize {
        self.x.len() * self.y.len() * self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Target point at grid indices `(i, j, k)`
    pub fn point(&self, i: usize, j: usize, k: usize) -> Point {
        Point::new(self.x[i], self.y[j], self.z[k])
    }

    /// Target point at a flat, row-major index.
    pub fn point_at(&self, index: usize) -> Point {
        let (_, ny, nz) = self.shape();
        let k = index % nz;
        let j = (index / nz) % ny;
        let i = index / (nz * ny);
        self.point(i, j, k)
    }

    /// Signed area `(x_last - x_first)(y_last - y_first)` of one plane.
    ///
    /// Carries the same orientation sign as the plane integral, so their
    /// ratio does not depend on the grid direction.
    pub fn signed_area(&self) -> Result<f64> {
        let area = (self.x.last() - self.x.first()) * (self.y.last() - self.y.first());
        if !(area.is_finite() && area != 0.0) {
            return Err(IpdError::InvalidArea { area });
        }
        Ok(area)
    }

    /// Area `A` of one plane (m²)
    pub fn area(&self) -> Result<f64> {
        Ok(self.signed_area()?.abs())
    }
}

/// A target point evaluated at one frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    /// Target position (m)
    pub position: Point,
    /// Frequency (Hz)
    pub frequency: f64,
}

impl FieldPoint {
    pub fn new(position: Point, frequency: f64) -> Self {
        Self {
            position,
            frequency,
        }
    }
}

/// Real power density samples on a [`TargetGrid`], indexed `(x, y, z)`.
///
/// Filled once by the estimator and read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PowerDensityField {
    values: Array3<f64>,
}

impl PowerDensityField {
    pub(crate) fn from_samples(shape: (usize, usize, usize), samples: Vec<f64>) -> Self {
        let mut values = Array3::zeros(shape);
        for (slot, v) in values.iter_mut().zip(samples) {
            *slot = v;
        }
        Self { values }
    }

    pub fn view(&self) -> ArrayView3<'_, f64> {
        self.values.view()
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.values.dim()
    }

    /// The `(x, y)` plane at standoff index `k`
    pub fn plane(&self, k: usize) -> ArrayView2<'_, f64> {
        self.values.index_axis(Axis(2), k)
    }

    /// Largest sample
    pub fn peak(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}
