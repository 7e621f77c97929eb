//! Forward-mode automatic differentiation over complex values
//!
//! A [`Dual<N>`] carries a complex value together with its partial
//! derivatives with respect to `N` real inputs. Every arithmetic operation
//! and elementary function applies the chain rule to the partials, so one
//! evaluation of a formula yields its value and exact gradient with no step
//! size and no truncation error.
//!
//! Formulas are written once against the [`Holomorphic`] trait and then
//! evaluated either on plain [`Complex64`] values or on duals.
//!
//! ```
//! use math_em_numerics::dual::{Holomorphic, derivative};
//!
//! fn f<T: Holomorphic>(x: T) -> T {
//!     (x * 2.0).sin().sin()
//! }
//!
//! let x = 0.3_f64;
//! let exact = 2.0 * (2.0 * x).cos() * (2.0 * x).sin().cos();
//! assert!((derivative(f, x).re - exact).abs() < 1e-14);
//! ```

use crate::parallel::parallel_map;
use num_complex::Complex64;
use num_traits::{One, Zero};
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Scalar types a holomorphic formula can be evaluated on.
pub trait Holomorphic:
    Copy
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Mul<f64, Output = Self>
    + Mul<Complex64, Output = Self>
{
    /// Lift a real constant
    fn from_real(x: f64) -> Self;

    /// Complex value, dropping any derivative information
    fn value(&self) -> Complex64;

    fn exp(self) -> Self;
    fn sqrt(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
}

impl Holomorphic for Complex64 {
    fn from_real(x: f64) -> Self {
        Complex64::new(x, 0.0)
    }

    fn value(&self) -> Complex64 {
        *self
    }

    fn exp(self) -> Self {
        Complex64::exp(self)
    }

    fn sqrt(self) -> Self {
        Complex64::sqrt(self)
    }

    fn sin(self) -> Self {
        Complex64::sin(self)
    }

    fn cos(self) -> Self {
        Complex64::cos(self)
    }
}

/// Complex value with `N` partial derivatives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dual<const N: usize> {
    /// Function value
    pub value: Complex64,
    /// ∂value/∂x_i for each seeded input
    pub partials: [Complex64; N],
}

impl<const N: usize> Dual<N> {
    /// A constant: all partials zero.
    pub fn constant(value: impl Into<Complex64>) -> Self {
        Self {
            value: value.into(),
            partials: [Complex64::zero(); N],
        }
    }

    /// Seed `N` independent real inputs, input `i` having unit partial `i`.
    pub fn seed(point: [f64; N]) -> [Self; N] {
        std::array::from_fn(|i| {
            let mut partials = [Complex64::zero(); N];
            partials[i] = Complex64::one();
            Self {
                value: Complex64::new(point[i], 0.0),
                partials,
            }
        })
    }

    /// Apply `f` with derivative `df` evaluated at the current value.
    #[inline]
    fn chain(self, value: Complex64, df: Complex64) -> Self {
        Self {
            value,
            partials: self.partials.map(|p| p * df),
        }
    }

    pub fn exp(self) -> Self {
        let e = self.value.exp();
        self.chain(e, e)
    }

    pub fn sqrt(self) -> Self {
        let s = self.value.sqrt();
        self.chain(s, (s * 2.0).inv())
    }

    pub fn sin(self) -> Self {
        self.chain(self.value.sin(), self.value.cos())
    }

    pub fn cos(self) -> Self {
        self.chain(self.value.cos(), -self.value.sin())
    }

    pub fn recip(self) -> Self {
        let inv = self.value.inv();
        self.chain(inv, -inv * inv)
    }

    pub fn powi(self, n: i32) -> Self {
        if n == 0 {
            return Self::constant(Complex64::one());
        }
        self.chain(self.value.powi(n), self.value.powi(n - 1) * n as f64)
    }
}

impl<const N: usize> Holomorphic for Dual<N> {
    fn from_real(x: f64) -> Self {
        Self::constant(x)
    }

    fn value(&self) -> Complex64 {
        self.value
    }

    fn exp(self) -> Self {
        Dual::exp(self)
    }

    fn sqrt(self) -> Self {
        Dual::sqrt(self)
    }

    fn sin(self) -> Self {
        Dual::sin(self)
    }

    fn cos(self) -> Self {
        Dual::cos(self)
    }
}

impl<const N: usize> Add for Dual<N> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
            partials: std::array::from_fn(|i| self.partials[i] + rhs.partials[i]),
        }
    }
}

impl<const N: usize> Sub for Dual<N> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
            partials: std::array::from_fn(|i| self.partials[i] - rhs.partials[i]),
        }
    }
}

impl<const N: usize> Mul for Dual<N> {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self {
            value: self.value * rhs.value,
            partials: std::array::from_fn(|i| {
                self.partials[i] * rhs.value + self.value * rhs.partials[i]
            }),
        }
    }
}

impl<const N: usize> Div for Dual<N> {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        let inv = rhs.value.inv();
        let value = self.value * inv;
        Self {
            value,
            partials: std::array::from_fn(|i| (self.partials[i] - value * rhs.partials[i]) * inv),
        }
    }
}

impl<const N: usize> Neg for Dual<N> {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            value: -self.value,
            partials: self.partials.map(|p| -p),
        }
    }
}

impl<const N: usize> Mul<Complex64> for Dual<N> {
    type Output = Self;
    fn mul(self, rhs: Complex64) -> Self {
        Self {
            value: self.value * rhs,
            partials: self.partials.map(|p| p * rhs),
        }
    }
}

impl<const N: usize> Mul<f64> for Dual<N> {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self {
        Self {
            value: self.value * rhs,
            partials: self.partials.map(|p| p * rhs),
        }
    }
}

impl<const N: usize> Add<f64> for Dual<N> {
    type Output = Self;
    fn add(self, rhs: f64) -> Self {
        Self {
            value: self.value + rhs,
            partials: self.partials,
        }
    }
}

impl<const N: usize> Sub<f64> for Dual<N> {
    type Output = Self;
    fn sub(self, rhs: f64) -> Self {
        Self {
            value: self.value - rhs,
            partials: self.partials,
        }
    }
}

impl<const N: usize> Zero for Dual<N> {
    fn zero() -> Self {
        Self::constant(Complex64::zero())
    }

    fn is_zero(&self) -> bool {
        self.value.is_zero() && self.partials.iter().all(Zero::is_zero)
    }
}

impl<const N: usize> One for Dual<N> {
    fn one() -> Self {
        Self::constant(Complex64::one())
    }
}

/// Value and exact gradient of `f` at a real point.
pub fn gradient<const N: usize, F>(f: F, point: [f64; N]) -> (Complex64, [Complex64; N])
where
    F: Fn([Dual<N>; N]) -> Dual<N>,
{
    let out = f(Dual::seed(point));
    (out.value, out.partials)
}

/// Exact derivative of a function of one real argument.
pub fn derivative<F>(f: F, x: f64) -> Complex64
where
    F: Fn(Dual<1>) -> Dual<1>,
{
    let [seeded] = Dual::seed([x]);
    f(seeded).partials[0]
}

/// Exact derivative at every point of `xs`, evaluated independently.
pub fn derivative_batch<F>(f: F, xs: &[f64]) -> Vec<Complex64>
where
    F: Fn(Dual<1>) -> Dual<1> + Sync + Send,
{
    parallel_map(xs, |&x| derivative(&f, x))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sin_sin_2x<T: Holomorphic>(x: T) -> T {
        (x * 2.0).sin().sin()
    }

    #[test]
    fn test_chain_rule_matches_analytic() {
        for i in 0..=40 {
            let x = -1.0 + i as f64 * 0.05;
            let exact = 2.0 * (2.0 * x).cos() * (2.0 * x).sin().cos();
            let got = derivative(sin_sin_2x, x);
            assert!((got.re - exact).abs() < 1e-14);
            assert_eq!(got.im, 0.0);
        }
    }

    #[test]
    fn test_value_matches_plain_complex_evaluation() {
        let x = 0.77;
        let [d] = Dual::seed([x]);
        let dual_value = sin_sin_2x(d).value;
        let plain = sin_sin_2x(Complex64::new(x, 0.0));
        assert_eq!(dual_value, plain);
    }

    #[test]
    fn test_gradient_of_product() {
        // f = x y² z
        let (value, grad) = gradient(|[x, y, z]| x * y * y * z, [2.0, 3.0, 5.0]);
        assert_relative_eq!(value.re, 90.0);
        assert_relative_eq!(grad[0].re, 45.0);
        assert_relative_eq!(grad[1].re, 60.0);
        assert_relative_eq!(grad[2].re, 18.0);
    }

    #[test]
    fn test_quotient_and_sqrt() {
        // f = 1 / sqrt(x² + y²), ∂f/∂x = -x / r³
        let (x0, y0) = (0.6, 0.8);
        let (value, grad) = gradient(|[x, y]| Dual::one() / (x * x + y * y).sqrt(), [x0, y0]);
        assert_relative_eq!(value.re, 1.0, epsilon = 1e-15);
        assert_relative_eq!(grad[0].re, -x0, epsilon = 1e-15);
        assert_relative_eq!(grad[1].re, -y0, epsilon = 1e-15);
    }

    #[test]
    fn test_complex_exponential() {
        // d/dx exp(-j k x) = -j k exp(-j k x)
        let k = 4.0;
        let x = 0.25;
        let jk = Complex64::new(0.0, -k);
        let got = derivative(|d| (d * jk).exp(), x);
        let expected = jk * (jk * x).exp();
        assert!((got - expected).norm() < 1e-14);
    }

    #[test]
    fn test_recip_and_powi() {
        let x = 1.5;
        assert_relative_eq!(derivative(|d| d.recip(), x).re, -1.0 / (x * x), epsilon = 1e-15);
        assert_relative_eq!(derivative(|d| d.powi(3), x).re, 3.0 * x * x, epsilon = 1e-14);
        assert_relative_eq!(derivative(|d| d.powi(0), x).re, 0.0);
    }

    #[test]
    fn test_scalar_ops() {
        let x = 2.0;
        assert_relative_eq!(derivative(|d| (d + 3.0) * (d - 1.0), x).re, 2.0 * x + 2.0);
        assert_relative_eq!(derivative(|d| -d.cos(), x).re, x.sin(), epsilon = 1e-15);
    }

    #[test]
    fn test_zero_one() {
        assert!(Dual::<3>::zero().is_zero());
        assert!(!Dual::<3>::one().is_zero());
        assert_eq!(Dual::<2>::one().partials, [Complex64::zero(); 2]);
    }

    #[test]
    fn test_batch_is_pointwise() {
        let xs: Vec<f64> = (0..100).map(|i| -1.0 + 0.02 * i as f64).collect();
        let batch = derivative_batch(sin_sin_2x, &xs);
        for (x, d) in xs.iter().zip(&batch) {
            assert_eq!(*d, derivative(sin_sin_2x, *x));
        }
    }
}
