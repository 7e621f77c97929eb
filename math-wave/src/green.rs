//! Free-space Green's function of the Helmholtz equation
//!
//! With the engineering time convention `exp(jωt)` the outgoing kernel is:
//! ```text
//! G(r, r') = exp(-jkR) / R,    R = |r - r'|
//! ```
//! The 1/(4π) factor is left to the field prefactors.
//!
//! [`green_function`] is written against [`Holomorphic`] so the same formula
//! runs on plain complex coordinates and on dual numbers, which is how the
//! exact gradient is obtained. [`green_gradient`] is the closed form, used to
//! check both derivative strategies.
//!
//! `R = 0` is a removable-by-construction singularity: callers must keep a
//! standoff between target and source. It is reported, never regularized.

use crate::error::{Result, WaveError};
use crate::point::Point;
use math_em_numerics::Holomorphic;
use num_complex::Complex64;

/// Distances at or below this are treated as coincident points.
pub const SINGULAR_DISTANCE: f64 = 1e-15;

/// G = exp(-jkR)/R between a target and a source given by coordinates.
///
/// The kernel is parameterized by the wavenumber rather than the angular
/// frequency: `k = ω√(ε₀μ₀)`, as precomputed in
/// [`WaveParameters::k`](crate::WaveParameters).
///
/// # Arguments
/// * `target` - Target coordinates (x, y, z)
/// * `source` - Source coordinates (x, y, z)
/// * `k` - Wave number (rad/m), from [`WaveParameters::from_frequency`](crate::WaveParameters::from_frequency)
///
/// # Example
/// ```
/// use math_em_wave::green::green_function;
/// use num_complex::Complex64;
///
/// let t = [Complex64::new(0.0, 0.0), Complex64::new(0.0, 0.0), Complex64::new(2.0, 0.0)];
/// let s = [Complex64::new(0.0, 0.0); 3];
/// let g = green_function(t, s, 1.5).unwrap();
/// assert!((g.norm() - 0.5).abs() < 1e-12);
/// ```
#[inline]
pub fn green_function<T: Holomorphic>(target: [T; 3], source: [T; 3], k: f64) -> Result<T> {
    let dx = target[0] - source[0];
    let dy = target[1] - source[1];
    let dz = target[2] - source[2];
    let r = (dx * dx + dy * dy + dz * dz).sqrt();

    let distance = r.value().norm();
    if !(distance > SINGULAR_DISTANCE) {
        return Err(WaveError::SingularGeometry { distance });
    }

    let minus_jk = Complex64::new(0.0, -k);
    Ok((r * minus_jk).exp() / r)
}

/// G = exp(-jkR)/R between two real points.
#[inline]
pub fn green_function_at(target: &Point, source: &Point, k: f64) -> Result<Complex64> {
    green_function(lift(target), lift(source), k)
}

/// Gradient of G with respect to the target coordinates.
///
/// ```text
/// ∇_r G = -(jk + 1/R) G (r - r')/R
/// ```
///
/// # Returns
/// Complex 3-vector [∂G/∂x, ∂G/∂y, ∂G/∂z]
pub fn green_gradient(target: &Point, source: &Point, k: f64) -> Result<[Complex64; 3]> {
    let rx = target.x - source.x;
    let ry = target.y - source.y;
    let rz = target.z - source.z;
    let r = (rx * rx + ry * ry + rz * rz).sqrt();

    if !(r > SINGULAR_DISTANCE) {
        return Err(WaveError::SingularGeometry { distance: r });
    }

    let g = Complex64::new(0.0, -k * r).exp() / r;
    let factor = -Complex64::new(1.0 / r, k) * g;

    Ok([factor * rx / r, factor * ry / r, factor * rz / r])
}

fn lift(p: &Point) -> [Complex64; 3] {
    p.to_array().map(Complex64::from)
}
