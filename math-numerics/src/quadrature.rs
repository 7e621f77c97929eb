//! Element-wise composite quadrature over sampled fields
//!
//! A grid of `L` samples is split into windows of `n` consecutive samples
//! that share their end points. On each window the samples are fitted by
//! the interpolating polynomial of degree `n - 1` and that polynomial is
//! integrated exactly (closed Newton–Cotes; `n = 2` is the trapezoidal rule,
//! `n = 3` Simpson's rule). When `L - 1` is not a multiple of `n - 1` the
//! trailing samples are integrated with the polynomial through the last `n`
//! samples, restricted to the leftover interval, so every polynomial of
//! degree below `n` is integrated exactly over the whole grid.
//!
//! The rule only depends on the grid, so its weights are computed once
//! ([`CompositeRule`]) and applied as a weighted sum. Integrating along one
//! axis of a larger array applies the same weights independently to every
//! lane of that axis.
//!
//! Integrals follow the grid orientation: a decreasing grid yields the
//! negated integral.
//!
//! ```
//! use math_em_numerics::{Grid, quadrature::elementwise_quad};
//! use ndarray::Array1;
//!
//! let grid = Grid::linspace(0.0, 2.0, 11).unwrap();
//! let field = Array1::from_elem(11, 3.0);
//! let integral = elementwise_quad(field.view(), &grid, 3).unwrap();
//! assert!((integral - 6.0).abs() < 1e-12);
//! ```

use crate::error::{NumericsError, Result};
use crate::grid::Grid;
use ndarray::{Array, Array1, ArrayView, ArrayView1, ArrayView2, Axis, Dimension, RemoveAxis};
use num_traits::Zero;
use std::ops::{Add, Mul};

/// Values that can be integrated: closed under addition and real scaling.
pub trait QuadValue: Copy + Zero + Add<Output = Self> + Mul<f64, Output = Self> {}

impl<V> QuadValue for V where V: Copy + Zero + Add<Output = V> + Mul<f64, Output = V> {}

/// Precomputed composite Newton–Cotes weights for one grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRule {
    weights: Array1<f64>,
    window: usize,
}

impl CompositeRule {
    /// Build the rule for `grid` with windows of `n >= 2` samples.
    ///
    /// If the grid has fewer than `n` samples the window shrinks to the grid.
    pub fn new(grid: &Grid, n: usize) -> Result<Self> {
        if n < 2 {
            return Err(NumericsError::InvalidSubdivision { n });
        }
        let len = grid.len();
        if len < 2 {
            return Err(NumericsError::GridTooShort { len, min: 2 });
        }

        let x = grid.coords();
        let window = n.min(len);
        let per_window = window - 1;
        let full_windows = (len - 1) / per_window;
        let remainder = (len - 1) % per_window;

        let mut weights = Array1::<f64>::zeros(len);

        for w in 0..full_windows {
            let start = w * per_window;
            let nodes: Vec<f64> = (start..start + window).map(|i| x[i]).collect();
            let local = lagrange_weights(&nodes, nodes[0], nodes[per_window]);
            for (j, lw) in local.iter().enumerate() {
                weights[start + j] += lw;
            }
        }

        if remainder > 0 {
            let start = len - window;
            let nodes: Vec<f64> = (start..len).map(|i| x[i]).collect();
            let from = x[len - 1 - remainder];
            let local = lagrange_weights(&nodes, from, x[len - 1]);
            for (j, lw) in local.iter().enumerate() {
                weights[start + j] += lw;
            }
        }

        log::debug!(
            "composite rule: {len} samples, window {window}, {full_windows} full windows, remainder {remainder}"
        );

        Ok(Self { weights, window })
    }

    /// Quadrature weights, co-indexed with the grid
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Effective window size (`min(n, grid length)`)
    pub fn window(&self) -> usize {
        self.window
    }

    /// Number of grid samples the rule applies to
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Always `false`: rules need at least two samples.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Integrate one sampled field.
    pub fn integrate<V: QuadValue>(&self, values: ArrayView1<'_, V>) -> Result<V> {
        if values.len() != self.len() {
            return Err(NumericsError::ShapeMismatch {
                context: "quadrature",
                expected: self.len(),
                got: values.len(),
            });
        }
        Ok(self.dot(values))
    }

    /// Integrate every lane of `field` along `axis`.
    ///
    /// The result has the integrated axis removed; each entry depends only
    /// on its own lane.
    pub fn integrate_along<V, D>(&self, field: ArrayView<'_, V, D>, axis: Axis) -> Result<Array<V, D::Smaller>>
    where
        V: QuadValue,
        D: Dimension + RemoveAxis,
    {
        if axis.index() >= field.ndim() {
            return Err(NumericsError::InvalidAxis {
                axis: axis.index(),
                arity: field.ndim(),
            });
        }
        let got = field.len_of(axis);
        if got != self.len() {
            return Err(NumericsError::ShapeMismatch {
                context: "quadrature axis",
                expected: self.len(),
                got,
            });
        }
        Ok(field.map_axis(axis, |lane| self.dot(lane)))
    }

    fn dot<V: QuadValue>(&self, values: ArrayView1<'_, V>) -> V {
        values
            .iter()
            .zip(self.weights.iter())
            .fold(V::zero(), |acc, (&v, &w)| acc + v * w)
    }
}

/// Tensor-product rule over an `x × y` grid.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeRule2d {
    x: CompositeRule,
    y: CompositeRule,
}

impl CompositeRule2d {
    pub fn new(x_grid: &Grid, y_grid: &Grid, n: usize) -> Result<Self> {
        Ok(Self {
            x: CompositeRule::new(x_grid, n)?,
            y: CompositeRule::new(y_grid, n)?,
        })
    }

    pub fn x_rule(&self) -> &CompositeRule {
        &self.x
    }

    pub fn y_rule(&self) -> &CompositeRule {
        &self.y
    }

    /// Integrate a field of shape `(nx, ny)`: along y first, then x.
    pub fn integrate<V: QuadValue>(&self, values: ArrayView2<'_, V>) -> Result<V> {
        let (nx, ny) = values.dim();
        if nx != self.x.len() {
            return Err(NumericsError::ShapeMismatch {
                context: "double quadrature x",
                expected: self.x.len(),
                got: nx,
            });
        }
        if ny != self.y.len() {
            return Err(NumericsError::ShapeMismatch {
                context: "double quadrature y",
                expected: self.y.len(),
                got: ny,
            });
        }
        let inner = self.y.integrate_along(values, Axis(1))?;
        self.x.integrate(inner.view())
    }

    /// Integrate over the `(x_axis, y_axis)` plane of a higher-rank field,
    /// independently for every index of the remaining axes.
    pub fn integrate_planes<V, D>(
        &self,
        field: ArrayView<'_, V, D>,
        x_axis: Axis,
        y_axis: Axis,
    ) -> Result<Array<V, <D::Smaller as Dimension>::Smaller>>
    where
        V: QuadValue,
        D: Dimension + RemoveAxis,
        D::Smaller: RemoveAxis,
    {
        if x_axis == y_axis {
            return Err(NumericsError::InvalidAxis {
                axis: y_axis.index(),
                arity: field.ndim(),
            });
        }
        let inner = self.y.integrate_along(field, y_axis)?;
        let x_axis = if x_axis.index() > y_axis.index() {
            Axis(x_axis.index() - 1)
        } else {
            x_axis
        };
        self.x.integrate_along(inner.view(), x_axis)
    }
}

/// Integrate a field sampled on `x_grid` with `n`-point windows.
pub fn elementwise_quad<V: QuadValue>(values: ArrayView1<'_, V>, x_grid: &Grid, n: usize) -> Result<V> {
    x_grid.check_field(values.len(), "quadrature")?;
    CompositeRule::new(x_grid, n)?.integrate(values)
}

/// Integrate a field sampled on `x_grid × y_grid` (shape `(nx, ny)`).
pub fn elementwise_dblquad<V: QuadValue>(
    values: ArrayView2<'_, V>,
    x_grid: &Grid,
    y_grid: &Grid,
    n: usize,
) -> Result<V> {
    CompositeRule2d::new(x_grid, y_grid, n)?.integrate(values)
}

/// Weights integrating the interpolant through `nodes` over `[a, b]`.
fn lagrange_weights(nodes: &[f64], a: f64, b: f64) -> Vec<f64> {
    let origin = nodes[0];
    let scale = nodes[nodes.len() - 1] - origin;
    let t: Vec<f64> = nodes.iter().map(|&x| (x - origin) / scale).collect();
    let ta = (a - origin) / scale;
    let tb = (b - origin) / scale;

    (0..t.len())
        .map(|j| {
            // Coefficients of l_j(t), lowest degree first
            let mut poly = vec![1.0];
            let mut denom = 1.0;
            for (m, &tm) in t.iter().enumerate() {
                if m == j {
                    continue;
                }
                let mut next = vec![0.0; poly.len() + 1];
                for (p, &c) in poly.iter().enumerate() {
                    next[p + 1] += c;
                    next[p] -= c * tm;
                }
                poly = next;
                denom *= t[j] - tm;
            }

            let integral: f64 = poly
                .iter()
                .enumerate()
                .map(|(p, &c)| {
                    let e = p as i32 + 1;
                    c * (tb.powi(e) - ta.powi(e)) / e as f64
                })
                .sum();

            scale * integral / denom
        })
        .collect()
}
