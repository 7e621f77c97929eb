//! Spatial gradient of the Green's function
//!
//! Two interchangeable strategies behind [`GreenGradient`]:
//!
//! - [`FiniteDifferenceGradient`]: one first-order central difference per
//!   target axis, each with its own step `δ`. Accuracy depends on `δ`.
//! - [`AutomaticGradient`]: a single evaluation of the Green's function on
//!   dual numbers seeded at the target coordinates. Exact to floating-point
//!   precision, no step parameter.
//!
//! Both return `[∂G/∂x, ∂G/∂y, ∂G/∂z]` with respect to the target point.

use crate::error::Result;
use math_em_numerics::{CentralDifference, Dual};
use math_em_wave::green::{green_function, green_function_at};
use math_em_wave::{Point, WaveError};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Gradient of `G(target, source)` with respect to the target coordinates.
pub trait GreenGradient: Send + Sync {
    /// Label used in logs and reports
    fn name(&self) -> String;

    /// `[∂G/∂x, ∂G/∂y, ∂G/∂z]` at `target`.
    fn gradient(&self, target: &Point, source: &Point, k: f64) -> Result<[Complex64; 3]>;
}

/// Fixed arguments of the Green's function while the target is perturbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreenArgs {
    /// Source point
    pub source: Point,
    /// Wavenumber
    pub k: f64,
}

/// `G` as a function of the target coordinates and bound [`GreenArgs`].
///
/// A singular evaluation yields NaN so it can be detected after the
/// stencil is combined.
fn green_kernel(target: &[f64], args: &GreenArgs) -> Complex64 {
    let t = Point::new(target[0], target[1], target[2]);
    green_function_at(&t, &args.source, args.k).unwrap_or(Complex64::new(f64::NAN, f64::NAN))
}

/// Central-difference gradient, one stencil per axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiniteDifferenceGradient {
    stencils: [CentralDifference; 3],
}

impl FiniteDifferenceGradient {
    /// Steps `[δx, δy, δz]`, each strictly positive.
    pub fn new(delta: [f64; 3]) -> Result<Self> {
        Ok(Self {
            stencils: [
                CentralDifference::first(delta[0])?.along(0),
                CentralDifference::first(delta[1])?.along(1),
                CentralDifference::first(delta[2])?.along(2),
            ],
        })
    }

    /// Same step on every axis.
    pub fn uniform(delta: f64) -> Result<Self> {
        Self::new([delta; 3])
    }

    pub fn deltas(&self) -> [f64; 3] {
        self.stencils.map(|s| s.delta())
    }
}

impl GreenGradient for FiniteDifferenceGradient {
    fn name(&self) -> String {
        let [dx, dy, dz] = self.deltas();
        if dx == dy && dy == dz {
            format!("fd(δ={dx:e})")
        } else {
            format!("fd(δ=[{dx:e}, {dy:e}, {dz:e}])")
        }
    }

    fn gradient(&self, target: &Point, source: &Point, k: f64) -> Result<[Complex64; 3]> {
        let point = target.to_array();
        let args = GreenArgs {
            source: *source,
            k,
        };

        let mut grad = [Complex64::new(0.0, 0.0); 3];
        for (slot, stencil) in grad.iter_mut().zip(&self.stencils) {
            let d: Complex64 = stencil.eval_with(green_kernel, &point, &args)?;
            if !d.is_finite() {
                return Err(WaveError::SingularGeometry {
                    distance: target.distance_to(source),
                }
                .into());
            }
            *slot = d;
        }
        Ok(grad)
    }
}

/// Exact gradient through forward-mode dual numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutomaticGradient;

impl GreenGradient for AutomaticGradient {
    fn name(&self) -> String {
        "ad".to_string()
    }

    fn gradient(&self, target: &Point, source: &Point, k: f64) -> Result<[Complex64; 3]> {
        let t = Dual::<3>::seed(target.to_array());
        let s = source.to_array().map(|c| Dual::<3>::constant(c));
        let g = green_function(t, s, k)?;
        Ok(g.partials)
    }
}

/// Serializable choice of strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GradientStrategy {
    /// Dual-number gradient
    Automatic,
    /// Central differences with the same step on every axis
    FiniteDifference { delta: f64 },
}

impl GradientStrategy {
    /// Instantiate the strategy.
    pub fn build(&self) -> Result<Box<dyn GreenGradient>> {
        Ok(match *self {
            GradientStrategy::Automatic => Box::new(AutomaticGradient),
            GradientStrategy::FiniteDifference { delta } => {
                Box::new(FiniteDifferenceGradient::uniform(delta)?)
            }
        })
    }

    pub fn is_automatic(&self) -> bool {
        matches!(self, GradientStrategy::Automatic)
    }

    /// Step size for finite differences, `None` for the exact strategy
    pub fn delta(&self) -> Option<f64> {
        match *self {
            GradientStrategy::Automatic => None,
            GradientStrategy::FiniteDifference { delta } => Some(delta),
        }
    }
}
