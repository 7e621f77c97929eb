//! Central finite differences
//!
//! First and second derivatives of an arbitrary function along one of its
//! positional arguments:
//!
//! ```text
//! f'(x)  ≈ (f(x+δ) - f(x-δ)) / 2δ
//! f''(x) ≈ (f(x+δ) - 2f(x) + f(x-δ)) / δ²
//! ```
//!
//! Both stencils have O(δ²) truncation error. Round-off grows like ε/δ for
//! the first derivative and ε/δ² for the second, so the total error is
//! U-shaped in δ. No step selection is done here: δ is the caller's choice.
//!
//! Fixed auxiliary arguments are passed as an explicit parameter value
//! (`args`) next to the perturbed point, so a bound [`Derivative`] can be
//! inspected and re-evaluated without hidden state.
//!
//! ```
//! use math_em_numerics::finite_difference::CentralDifference;
//!
//! let d = CentralDifference::new(1, 1e-5).unwrap();
//! let slope = d.eval_scalar(|x: f64| x * x, 3.0).unwrap();
//! assert!((slope - 6.0).abs() < 1e-8);
//! ```

use crate::error::{NumericsError, Result};
use crate::parallel::try_parallel_map;
use num_traits::Float;
use std::ops::{Add, Mul, Sub};

/// Values a stencil can combine: anything closed under addition,
/// subtraction and scaling by the argument type.
///
/// Covers real and complex scalars as well as owned `ndarray` arrays, so
/// vector-valued functions are differentiated element-wise.
pub trait StencilValue<T>: Sized + Add<Output = Self> + Sub<Output = Self> + Mul<T, Output = Self> {}

impl<T, V> StencilValue<T> for V where V: Add<Output = V> + Sub<Output = V> + Mul<T, Output = V> {}

/// Derivative order supported by the central stencils.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiffOrder {
    /// f'
    First,
    /// f''
    Second,
}

impl DiffOrder {
    /// Numeric order (1 or 2)
    pub fn as_usize(self) -> usize {
        match self {
            DiffOrder::First => 1,
            DiffOrder::Second => 2,
        }
    }
}

impl TryFrom<usize> for DiffOrder {
    type Error = NumericsError;

    fn try_from(order: usize) -> Result<Self> {
        match order {
            1 => Ok(DiffOrder::First),
            2 => Ok(DiffOrder::Second),
            _ => Err(NumericsError::InvalidOrder { order }),
        }
    }
}

/// A validated differentiation request: order, step and perturbed axis.
///
/// Immutable once built. Order and step are checked at construction; the
/// axis can only be checked against the evaluation point and is checked on
/// every evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CentralDifference<T = f64> {
    order: DiffOrder,
    delta: T,
    axis: usize,
}

impl<T: Float> CentralDifference<T> {
    /// Create a stencil of the given order (1 or 2) and step `delta > 0`,
    /// perturbing axis 0.
    pub fn new(order: usize, delta: T) -> Result<Self> {
        let order = DiffOrder::try_from(order)?;
        Self::with_order(order, delta)
    }

    /// Same as [`CentralDifference::new`] with an already typed order.
    pub fn with_order(order: DiffOrder, delta: T) -> Result<Self> {
        if !(delta.is_finite() && delta > T::zero()) {
            return Err(NumericsError::step(delta));
        }
        Ok(Self {
            order,
            delta,
            axis: 0,
        })
    }

    /// First-derivative stencil
    pub fn first(delta: T) -> Result<Self> {
        Self::with_order(DiffOrder::First, delta)
    }

    /// Second-derivative stencil
    pub fn second(delta: T) -> Result<Self> {
        Self::with_order(DiffOrder::Second, delta)
    }

    /// Perturb positional argument `axis` instead of axis 0.
    pub fn along(self, axis: usize) -> Self {
        Self { axis, ..self }
    }

    pub fn order(&self) -> DiffOrder {
        self.order
    }

    pub fn delta(&self) -> T {
        self.delta
    }

    pub fn axis(&self) -> usize {
        self.axis
    }

    /// Evaluate the stencil for `f(point, args)`, perturbing `point[axis]`.
    pub fn eval_with<P, V, F>(&self, f: F, point: &[T], args: &P) -> Result<V>
    where
        F: Fn(&[T], &P) -> V,
        V: StencilValue<T>,
    {
        if self.axis >= point.len() {
            return Err(NumericsError::InvalidAxis {
                axis: self.axis,
                arity: point.len(),
            });
        }

        let x = point[self.axis];
        let mut shifted = point.to_vec();

        shifted[self.axis] = x + self.delta;
        let forward = f(&shifted, args);
        shifted[self.axis] = x - self.delta;
        let backward = f(&shifted, args);

        Ok(self.combine(forward, || f(point, args), backward))
    }

    /// Evaluate the stencil for `f(point)` with no auxiliary arguments.
    pub fn eval<V, F>(&self, f: F, point: &[T]) -> Result<V>
    where
        F: Fn(&[T]) -> V,
        V: StencilValue<T>,
    {
        self.eval_with(|p: &[T], _: &()| f(p), point, &())
    }

    /// Evaluate the stencil for a function of a single argument.
    ///
    /// Fails with [`NumericsError::InvalidAxis`] if the stencil was moved off
    /// axis 0.
    pub fn eval_scalar<V, F>(&self, f: F, x: T) -> Result<V>
    where
        F: Fn(T) -> V,
        V: StencilValue<T>,
    {
        if self.axis != 0 {
            return Err(NumericsError::InvalidAxis {
                axis: self.axis,
                arity: 1,
            });
        }
        Ok(self.combine(f(x + self.delta), || f(x), f(x - self.delta)))
    }

    /// Apply the scalar stencil independently at every point of `xs`.
    pub fn eval_scalar_batch<V, F>(&self, f: F, xs: &[T]) -> Result<Vec<V>>
    where
        T: Sync + Send,
        F: Fn(T) -> V + Sync + Send,
        V: StencilValue<T> + Send,
    {
        try_parallel_map(xs, |&x| self.eval_scalar(&f, x))
    }

    /// Bind a function and its fixed arguments into a reusable derivative.
    pub fn derivative<F, P>(self, f: F, args: P) -> Derivative<T, F, P> {
        Derivative {
            stencil: self,
            f,
            args,
        }
    }

    fn combine<V, C>(&self, forward: V, center: C, backward: V) -> V
    where
        V: StencilValue<T>,
        C: FnOnce() -> V,
    {
        let two = T::one() + T::one();
        match self.order {
            DiffOrder::First => (forward - backward) * (T::one() / (two * self.delta)),
            DiffOrder::Second => {
                (forward - center() * two + backward) * (T::one() / (self.delta * self.delta))
            }
        }
    }
}

/// A function, its fixed arguments and a stencil, bound together.
///
/// Evaluating it at a point approximates the derivative of `f` along the
/// stencil's axis with every other argument held at its supplied value.
#[derive(Debug, Clone)]
pub struct Derivative<T, F, P> {
    stencil: CentralDifference<T>,
    f: F,
    args: P,
}

impl<T: Float, F, P> Derivative<T, F, P> {
    pub fn stencil(&self) -> &CentralDifference<T> {
        &self.stencil
    }

    /// The bound auxiliary arguments
    pub fn args(&self) -> &P {
        &self.args
    }

    /// Approximate the derivative at `point`.
    pub fn eval<V>(&self, point: &[T]) -> Result<V>
    where
        F: Fn(&[T], &P) -> V,
        V: StencilValue<T>,
    {
        self.stencil.eval_with(&self.f, point, &self.args)
    }

    /// Approximate the derivative independently at every point.
    pub fn eval_batch<V>(&self, points: &[Vec<T>]) -> Result<Vec<V>>
    where
        T: Sync + Send,
        P: Sync,
        F: Fn(&[T], &P) -> V + Sync,
        V: StencilValue<T> + Send,
    {
        try_parallel_map(points, |p| self.eval(p))
    }
}

/// Build a bound derivative of `f` in one call.
///
/// `order` must be 1 or 2 and `delta` strictly positive; `axis` selects the
/// positional argument of `f` being perturbed and `args` are passed through
/// unchanged on every call.
pub fn central_difference<T, F, P>(
    f: F,
    order: usize,
    delta: T,
    axis: usize,
    args: P,
) -> Result<Derivative<T, F, P>>
where
    T: Float,
{
    Ok(CentralDifference::new(order, delta)?
        .along(axis)
        .derivative(f, args))
}
