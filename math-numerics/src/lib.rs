//! Numerical differentiation and quadrature toolkit
//!
//! Building blocks shared by the finite-difference and automatic
//! differentiation paths of the incident power density estimator.
//!
//! # Features
//!
//! - **Central differences**: first/second order, any positional axis, bound
//!   auxiliary arguments, batch evaluation ([`finite_difference`])
//! - **Smooth noise-robust differentiation** of sampled data
//!   ([`holoborodko`])
//! - **Composite Newton–Cotes quadrature**, single and double, applied
//!   lane-wise over arrays ([`quadrature`])
//! - **Forward-mode AD** on complex dual numbers ([`dual`])
//! - **Batch helpers** over rayon ([`parallel`])
//!
//! # Example
//!
//! ```rust
//! use math_em_numerics::{CentralDifference, Grid, holoborodko, elementwise_quad};
//! use ndarray::Array1;
//!
//! let d = CentralDifference::new(1, 1e-5).unwrap();
//! assert!((d.eval_scalar(f64::sin, 0.0).unwrap() - 1.0).abs() < 1e-9);
//!
//! let grid = Grid::linspace(0.0, 1.0, 21).unwrap();
//! let ramp: Array1<f64> = grid.coords().mapv(|x| 3.0 * x);
//! let slope = holoborodko(ramp.view(), grid.uniform_spacing().unwrap()).unwrap();
//! assert!((slope[10] - 3.0).abs() < 1e-12);
//!
//! let area = elementwise_quad(ramp.view(), &grid, 3).unwrap();
//! assert!((area - 1.5).abs() < 1e-12);
//! ```

pub mod dual;
pub mod error;
pub mod finite_difference;
pub mod grid;
pub mod holoborodko;
pub mod parallel;
pub mod quadrature;

pub use dual::{Dual, Holomorphic};
pub use error::{NumericsError, Result};
pub use finite_difference::{CentralDifference, Derivative, DiffOrder, central_difference};
pub use grid::Grid;
pub use holoborodko::{HoloborodkoDifferentiator, holoborodko};
pub use quadrature::{CompositeRule, CompositeRule2d, elementwise_dblquad, elementwise_quad};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
