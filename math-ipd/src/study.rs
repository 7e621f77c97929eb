//! Finite-difference step-size study
//!
//! Reproduces the accuracy trade-off of central differences on
//! `f(x) = sin(sin(2x))` over `[-1, 1]`: sweeping `δ` downwards the RMSE
//! against the analytic derivative first falls (truncation error, O(δ²))
//! and then rises again (round-off, O(ε/δ)). The dual-number derivative of
//! the same function is exact and has no step at all.
//!
//! The finite-difference side is generic over the float type so that the
//! configured [`Precision`] decides where the minimum lands.

use crate::config::Precision;
use crate::error::Result;
use crate::metrics::rmse;
use math_em_numerics::dual::{Holomorphic, derivative_batch};
use math_em_numerics::CentralDifference;
use num_traits::Float;
use serde::{Deserialize, Serialize};

/// Mantissas of the swept steps
const MANTISSAS: [f64; 4] = [0.25, 0.5, 0.75, 1.0];

/// Decade exponents of the swept steps
const EXPONENTS: std::ops::RangeInclusive<i32> = -15..=-2;

/// `sin(sin(2x))` on any float type
pub fn test_function<T: Float>(x: T) -> T {
    (x + x).sin().sin()
}

/// `sin(sin(2x))` on complex values and dual numbers
pub fn test_function_holomorphic<T: Holomorphic>(x: T) -> T {
    (x * 2.0).sin().sin()
}

/// `2 cos(2x) cos(sin(2x))`
pub fn test_derivative(x: f64) -> f64 {
    2.0 * (2.0 * x).cos() * (2.0 * x).sin().cos()
}

/// `{d · 10^m : d ∈ {0.25, 0.5, 0.75, 1}, m ∈ [-15, -2]}`, ascending.
pub fn delta_sweep() -> Vec<f64> {
    EXPONENTS
        .flat_map(|m| MANTISSAS.iter().map(move |d| d * 10f64.powi(m)))
        .collect()
}

/// `n` evenly spaced sample points over `[-1, 1]`
pub fn sample_points(n: usize) -> Vec<f64> {
    crate::config::lin_space(-1.0, 1.0, n)
}

/// RMSE of the finite-difference derivative at one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StudyPoint {
    /// Step size
    pub delta: f64,
    /// RMSE against the analytic derivative over the sample points
    pub rmse: f64,
}

/// FD RMSE for each step, computed in `T` arithmetic.
///
/// The reference derivative is evaluated at the sample points as rounded
/// to `T`, so only the differencing error is measured.
pub fn fd_rmse_curve<T>(deltas: &[f64], xs: &[f64]) -> Result<Vec<StudyPoint>>
where
    T: Float + Send + Sync,
{
    let xs_t: Vec<T> = xs.iter().filter_map(|&x| T::from(x)).collect();
    let exact: Vec<f64> = xs_t
        .iter()
        .map(|x| test_derivative(x.to_f64().unwrap_or(f64::NAN)))
        .collect();

    deltas
        .iter()
        .map(|&delta| -> Result<StudyPoint> {
            let step = T::from(delta).unwrap_or_else(T::nan);
            let stencil = CentralDifference::<T>::first(step)?;
            let approx: Vec<f64> = stencil
                .eval_scalar_batch(test_function::<T>, &xs_t)?
                .into_iter()
                .map(|d| d.to_f64().unwrap_or(f64::NAN))
                .collect();
            Ok(StudyPoint {
                delta,
                rmse: rmse(&approx, &exact)?,
            })
        })
        .collect()
}

/// RMSE of the dual-number derivative over the sample points.
pub fn ad_rmse(xs: &[f64]) -> Result<f64> {
    let approx: Vec<f64> = derivative_batch(test_function_holomorphic, xs)
        .into_iter()
        .map(|d| d.re)
        .collect();
    let exact: Vec<f64> = xs.iter().map(|&x| test_derivative(x)).collect();
    rmse(&approx, &exact)
}

/// Step with the smallest RMSE, ignoring non-finite entries.
pub fn optimal_delta(curve: &[StudyPoint]) -> Option<StudyPoint> {
    curve
        .iter()
        .filter(|p| p.rmse.is_finite())
        .min_by(|a, b| a.rmse.total_cmp(&b.rmse))
        .copied()
}

/// Outcome of a step-size study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepSizeStudy {
    /// Precision the finite differences ran in
    pub precision: Precision,
    /// Number of sample points over [-1, 1]
    pub samples: usize,
    /// RMSE per step, ascending in δ
    pub fd_curve: Vec<StudyPoint>,
    /// RMSE of the dual-number derivative
    pub ad_rmse: f64,
    /// Step with the lowest FD RMSE
    pub optimal: Option<StudyPoint>,
}

/// Run the full study at the configured precision.
pub fn run_step_size_study(precision: Precision, samples: usize) -> Result<StepSizeStudy> {
    let xs = sample_points(samples);
    let deltas = delta_sweep();
    log::debug!(
        "step-size study ({precision:?}): ε = {:e}, balanced step ε^(1/3) = {:e}",
        precision.epsilon(),
        precision.balanced_step()
    );

    let fd_curve = match precision {
        Precision::Double => fd_rmse_curve::<f64>(&deltas, &xs)?,
        Precision::Single => fd_rmse_curve::<f32>(&deltas, &xs)?,
    };
    let ad = ad_rmse(&xs)?;
    let optimal = optimal_delta(&fd_curve);

    if let Some(best) = optimal {
        log::info!(
            "step-size study ({precision:?}): optimal δ = {:e} (RMSE {:.3e}), AD RMSE {:.3e}",
            best.delta,
            best.rmse,
            ad
        );
    }

    Ok(StepSizeStudy {
        precision,
        samples,
        fd_curve,
        ad_rmse: ad,
        optimal,
    })
}
