//! Smooth noise-robust differentiation of sampled data
//!
//! Pavel Holoborodko's differentiators are antisymmetric
//! stencils whose frequency response matches `iω` at low frequencies and
//! falls to zero at the Nyquist frequency, so high-frequency measurement
//! noise is suppressed instead of amplified. For a stencil of odd length
//! `N` (here 5, 7, 9 or 11):
//!
//! ```text
//! f'(x_i) ≈ (1/h) Σ_{k=1..M} c_k (f_{i+k} - f_{i-k}),   M = (N-1)/2
//! c_k = [C(2m, m-k+1) - C(2m, m-k-1)] / 2^(2m+1),       m = (N-3)/2
//! ```
//!
//! Boundary policy, fixed for every input:
//! - where the full stencil does not fit, the widest shorter Holoborodko
//!   stencil (down to N = 5) that fits on both sides is used;
//! - one sample in from each end, the 3-point central difference;
//! - at the two end samples, the second-order one-sided difference
//!   `(-3f_0 + 4f_1 - f_2) / 2h` (mirrored at the right end).
//!
//! Every stencil is exact for linear data, so a sampled ramp yields its
//! slope at every sample including the boundary.

use crate::error::{NumericsError, Result};
use crate::grid::Grid;
use ndarray::{Array1, ArrayView1};
use num_traits::Zero;
use std::ops::{Add, Mul, Sub};

/// Supported stencil lengths
pub const STENCIL_LENGTHS: [usize; 4] = [5, 7, 9, 11];

/// Smooth noise-robust first-derivative estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoloborodkoDifferentiator {
    length: usize,
}

impl Default for HoloborodkoDifferentiator {
    fn default() -> Self {
        Self {
            length: Self::DEFAULT_LENGTH,
        }
    }
}

impl HoloborodkoDifferentiator {
    /// Stencil length used by [`holoborodko`]
    pub const DEFAULT_LENGTH: usize = 7;

    /// Create a differentiator with stencil length 5, 7, 9 or 11.
    pub fn new(length: usize) -> Result<Self> {
        if !STENCIL_LENGTHS.contains(&length) {
            return Err(NumericsError::InvalidStencil { length });
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Coefficients `c_1..c_M` of the full-length stencil.
    pub fn coefficients(&self) -> Vec<f64> {
        coefficients(self.length)
    }

    /// Differentiate uniformly spaced samples.
    ///
    /// `spacing` is the signed distance between consecutive samples and must
    /// be finite and non-zero. The output has the same length as the input.
    pub fn differentiate<V>(&self, values: ArrayView1<'_, V>, spacing: f64) -> Result<Array1<V>>
    where
        V: Copy + Zero + Add<Output = V> + Sub<Output = V> + Mul<f64, Output = V>,
    {
        if !(spacing.is_finite() && spacing != 0.0) {
            return Err(NumericsError::InvalidStep { delta: spacing });
        }

        let n = values.len();
        if n < 3 {
            return Err(NumericsError::GridTooShort { len: n, min: 3 });
        }

        let max_half = (self.length - 1) / 2;
        let stencils: Vec<Vec<f64>> = (2..=max_half)
            .map(|half| coefficients(2 * half + 1))
            .collect();

        let inv_h = 1.0 / spacing;
        let inv_2h = 0.5 / spacing;
        let f = |i: usize| values[i];

        let derivative = (0..n)
            .map(|i| {
                let reach = i.min(n - 1 - i);
                match reach {
                    0 if i == 0 => (f(1) * 4.0 - f(0) * 3.0 - f(2)) * inv_2h,
                    0 => (f(n - 1) * 3.0 - f(n - 2) * 4.0 + f(n - 3)) * inv_2h,
                    1 => (f(i + 1) - f(i - 1)) * inv_2h,
                    _ => {
                        let half = reach.min(max_half);
                        let c = &stencils[half - 2];
                        let sum = c
                            .iter()
                            .enumerate()
                            .fold(V::zero(), |acc, (j, &ck)| {
                                let k = j + 1;
                                acc + (f(i + k) - f(i - k)) * ck
                            });
                        sum * inv_h
                    }
                }
            })
            .collect();

        Ok(derivative)
    }

    /// Differentiate samples co-indexed with a uniform grid.
    pub fn differentiate_on_grid<V>(&self, values: ArrayView1<'_, V>, grid: &Grid) -> Result<Array1<V>>
    where
        V: Copy + Zero + Add<Output = V> + Sub<Output = V> + Mul<f64, Output = V>,
    {
        grid.check_field(values.len(), "holoborodko")?;
        let spacing = grid.uniform_spacing()?;
        self.differentiate(values, spacing)
    }
}

/// Differentiate uniformly spaced samples with the default 7-point stencil.
pub fn holoborodko<V>(values: ArrayView1<'_, V>, spacing: f64) -> Result<Array1<V>>
where
    V: Copy + Zero + Add<Output = V> + Sub<Output = V> + Mul<f64, Output = V>,
{
    HoloborodkoDifferentiator::default().differentiate(values, spacing)
}

fn coefficients(length: usize) -> Vec<f64> {
    let m = (length as i64 - 3) / 2;
    let half = (length - 1) / 2;
    let scale = 2f64.powi(2 * m as i32 + 1);
    (1..=half as i64)
        .map(|k| (binomial(2 * m, m - k + 1) - binomial(2 * m, m - k - 1)) / scale)
        .collect()
}

fn binomial(n: i64, k: i64) -> f64 {
    if k < 0 || k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, j| acc * (n - j) as f64 / (j + 1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::Array1;
    use num_complex::Complex64;

    #[test]
    fn test_known_coefficients() {
        assert_eq!(coefficients(5), vec![2.0 / 8.0, 1.0 / 8.0]);
        assert_eq!(coefficients(7), vec![5.0 / 32.0, 4.0 / 32.0, 1.0 / 32.0]);
        assert_eq!(
            coefficients(11),
            vec![42.0 / 512.0, 48.0 / 512.0, 27.0 / 512.0, 8.0 / 512.0, 1.0 / 512.0]
        );
    }

    #[test]
    fn test_coefficients_are_consistent() {
        // Exactness on linear data requires 2 Σ k c_k = 1
        for &n in &STENCIL_LENGTHS {
            let s: f64 = coefficients(n)
                .iter()
                .enumerate()
                .map(|(j, c)| 2.0 * (j + 1) as f64 * c)
                .sum();
            assert_relative_eq!(s, 1.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(
            HoloborodkoDifferentiator::new(6).unwrap_err(),
            NumericsError::InvalidStencil { length: 6 }
        );
        assert!(HoloborodkoDifferentiator::new(3).is_err());
        assert!(HoloborodkoDifferentiator::new(9).is_ok());
    }

    #[test]
    fn test_linear_ramp_recovered_everywhere() {
        let h = 0.05;
        let (m, b) = (2.5, -1.0);
        for &len in &STENCIL_LENGTHS {
            let diff = HoloborodkoDifferentiator::new(len).unwrap();
            let y = Array1::from_shape_fn(40, |i| m * (i as f64 * h) + b);
            let dy = diff.differentiate(y.view(), h).unwrap();
            assert_eq!(dy.len(), y.len());
            for v in dy.iter() {
                assert_relative_eq!(*v, m, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_quadratic_interior_exact() {
        let h = 0.1;
        let y = Array1::from_shape_fn(30, |i| (i as f64 * h).powi(2));
        let dy = holoborodko(y.view(), h).unwrap();
        for i in 1..29 {
            assert_relative_eq!(dy[i], 2.0 * i as f64 * h, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_suppresses_high_frequency_noise() {
        // Period-4 noise: the central difference passes it at gain 1/h, the
        // 7-point smooth stencil at a quarter of that.
        let h = 0.01;
        let eps = 1e-3;
        let n = 200;
        let noisy = Array1::from_shape_fn(n, |i| {
            let x = i as f64 * h;
            x * x + eps * (std::f64::consts::FRAC_PI_2 * i as f64).cos()
        });

        let smooth = holoborodko(noisy.view(), h).unwrap();
        let naive: Vec<f64> = (1..n - 1)
            .map(|i| (noisy[i + 1] - noisy[i - 1]) / (2.0 * h))
            .collect();

        let rms = |errs: Vec<f64>| (errs.iter().map(|e| e * e).sum::<f64>() / errs.len() as f64).sqrt();
        let smooth_err = rms((5..n - 5).map(|i| smooth[i] - 2.0 * i as f64 * h).collect());
        let naive_err = rms((5..n - 5).map(|i| naive[i - 1] - 2.0 * i as f64 * h).collect());

        assert!(smooth_err < 0.5 * naive_err, "{smooth_err} vs {naive_err}");
    }

    #[test]
    fn test_complex_samples() {
        let h = 0.02;
        let slope = Complex64::new(1.0, -3.0);
        let y = Array1::from_shape_fn(25, |i| slope * (i as f64 * h));
        let dy = holoborodko(y.view(), h).unwrap();
        for v in dy.iter() {
            assert!((*v - slope).norm() < 1e-9);
        }
    }

    #[test]
    fn test_short_input_rejected() {
        let y = Array1::from_vec(vec![1.0, 2.0]);
        assert_eq!(
            holoborodko(y.view(), 0.1).unwrap_err(),
            NumericsError::GridTooShort { len: 2, min: 3 }
        );
    }

    #[test]
    fn test_zero_spacing_rejected() {
        let y = Array1::from_vec(vec![1.0, 2.0, 3.0]);
        assert!(holoborodko(y.view(), 0.0).is_err());
    }

    #[test]
    fn test_decreasing_grid() {
        let grid = Grid::linspace(1.0, 0.0, 21).unwrap();
        let y = grid.coords().mapv(|x| 4.0 * x);
        let dy = HoloborodkoDifferentiator::default()
            .differentiate_on_grid(y.view(), &grid)
            .unwrap();
        for v in dy.iter() {
            assert_relative_eq!(*v, 4.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_grid_length_mismatch() {
        let grid = Grid::linspace(0.0, 1.0, 10).unwrap();
        let y = Array1::<f64>::zeros(9);
        let err = HoloborodkoDifferentiator::default()
            .differentiate_on_grid(y.view(), &grid)
            .unwrap_err();
        assert!(err.is_shape_error());
    }
}
