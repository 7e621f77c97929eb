//! Error metrics used to compare derivative strategies

use crate::error::Result;
use math_em_numerics::NumericsError;
use num_complex::Complex64;

fn check_lengths(approx: usize, exact: usize) -> Result<()> {
    if approx != exact {
        return Err(NumericsError::ShapeMismatch {
            context: "error metric",
            expected: exact,
            got: approx,
        }
        .into());
    }
    Ok(())
}

/// Root-mean-square error between two real sequences.
pub fn rmse(approx: &[f64], exact: &[f64]) -> Result<f64> {
    check_lengths(approx.len(), exact.len())?;
    if exact.is_empty() {
        return Ok(0.0);
    }
    let sum_sq: f64 = approx
        .iter()
        .zip(exact)
        .map(|(a, b)| (a - b) * (a - b))
        .sum();
    Ok((sum_sq / exact.len() as f64).sqrt())
}

/// L2 norm of the difference between two complex sequences.
pub fn l2_error(approx: &[Complex64], exact: &[Complex64]) -> Result<f64> {
    check_lengths(approx.len(), exact.len())?;
    let sum_sq: f64 = approx
        .iter()
        .zip(exact)
        .map(|(a, b)| (a - b).norm_sqr())
        .sum();
    Ok(sum_sq.sqrt())
}

/// L2 error relative to the norm of `exact`; absolute when `exact` vanishes.
pub fn relative_l2_error(approx: &[Complex64], exact: &[Complex64]) -> Result<f64> {
    let l2_err = l2_error(approx, exact)?;
    let norm: f64 = exact.iter().map(|p| p.norm_sqr()).sum::<f64>().sqrt();
    Ok(if norm < 1e-15 { l2_err } else { l2_err / norm })
}

/// Max (L∞) error
pub fn linf_error(approx: &[Complex64], exact: &[Complex64]) -> Result<f64> {
    check_lengths(approx.len(), exact.len())?;
    Ok(approx
        .iter()
        .zip(exact)
        .map(|(a, b)| (a - b).norm())
        .fold(0.0, f64::max))
}

/// `|approx - exact| / |exact|`, absolute when `exact` is zero.
pub fn relative_error(approx: f64, exact: f64) -> f64 {
    let err = (approx - exact).abs();
    if exact == 0.0 { err } else { err / exact.abs() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rmse() {
        assert_relative_eq!(rmse(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap(), 0.0);
        // errors 3 and 4 → sqrt((9 + 16) / 2)
        assert_relative_eq!(rmse(&[3.0, 0.0], &[0.0, 4.0]).unwrap(), (12.5f64).sqrt());
        assert_eq!(rmse(&[], &[]).unwrap(), 0.0);
        assert!(rmse(&[1.0], &[1.0, 2.0]).unwrap_err().is_numerics_error());
    }

    #[test]
    fn test_complex_norms() {
        let exact = [Complex64::new(3.0, 0.0), Complex64::new(0.0, 4.0)];
        let approx = [Complex64::new(3.0, 1.0), Complex64::new(0.0, 4.0)];
        assert_relative_eq!(l2_error(&approx, &exact).unwrap(), 1.0);
        assert_relative_eq!(relative_l2_error(&approx, &exact).unwrap(), 0.2);
        assert_relative_eq!(linf_error(&approx, &exact).unwrap(), 1.0);

        let zero = [Complex64::new(0.0, 0.0); 2];
        assert_relative_eq!(relative_l2_error(&approx, &zero).unwrap(), 26.0f64.sqrt());
    }

    #[test]
    fn test_relative_error() {
        assert_relative_eq!(relative_error(1.01, 1.0), 0.01, epsilon = 1e-12);
        assert_relative_eq!(relative_error(-0.5, 0.0), 0.5);
    }
}
