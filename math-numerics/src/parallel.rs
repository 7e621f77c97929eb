//! Batch evaluation helpers
//!
//! Every batch operation in this workspace evaluates independent points:
//! no result depends on another. With the `parallel` feature the batch is
//! spread over the rayon thread pool, otherwise it runs sequentially. The
//! output is always co-indexed with the input.
//!
//! ```
//! use math_em_numerics::parallel::{parallel_map, try_parallel_map};
//!
//! let squares: Vec<f64> = parallel_map(&[1.0, 2.0, 3.0], |x| x * x);
//! assert_eq!(squares, vec![1.0, 4.0, 9.0]);
//!
//! let checked: Result<Vec<f64>, String> =
//!     try_parallel_map(&[1.0, -2.0], |&x| if x > 0.0 { Ok(x) } else { Err("neg".into()) });
//! assert!(checked.is_err());
//! ```

/// Check if parallel processing is available
#[inline]
pub fn is_parallel_available() -> bool {
    cfg!(feature = "parallel")
}

/// Map over a slice, in parallel when available.
#[cfg(feature = "parallel")]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    data.iter().map(f).collect()
}

/// Map over a range of indices, in parallel when available.
#[cfg(feature = "parallel")]
pub fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
pub fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    F: Fn(usize) -> U,
{
    (0..count).map(f).collect()
}

/// Fallible map over a slice.
///
/// The first error aborts the batch; no partial result is returned.
#[cfg(feature = "parallel")]
pub fn try_parallel_map<T, U, E, F>(data: &[T], f: F) -> Result<Vec<U>, E>
where
    T: Sync,
    U: Send,
    E: Send,
    F: Fn(&T) -> Result<U, E> + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
pub fn try_parallel_map<T, U, E, F>(data: &[T], f: F) -> Result<Vec<U>, E>
where
    F: Fn(&T) -> Result<U, E>,
{
    data.iter().map(f).collect()
}

/// Fallible map over a range of indices.
#[cfg(feature = "parallel")]
pub fn try_parallel_map_indexed<U, E, F>(count: usize, f: F) -> Result<Vec<U>, E>
where
    U: Send,
    E: Send,
    F: Fn(usize) -> Result<U, E> + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
pub fn try_parallel_map_indexed<U, E, F>(count: usize, f: F) -> Result<Vec<U>, E>
where
    F: Fn(usize) -> Result<U, E>,
{
    (0..count).map(f).collect()
}

/// Number of worker threads used by the batch helpers.
pub fn num_threads() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_map_preserves_order() {
        let data: Vec<usize> = (0..1000).collect();
        let out = parallel_map(&data, |&i| i * 3);
        assert!(out.iter().enumerate().all(|(i, &v)| v == 3 * i));
    }

    #[test]
    fn test_parallel_map_indexed() {
        let out = parallel_map_indexed(5, |i| i as f64 * 0.5);
        assert_eq!(out, vec![0.0, 0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_try_parallel_map_aborts_on_error() {
        let data: Vec<i32> = (0..100).collect();
        let out: Result<Vec<i32>, i32> =
            try_parallel_map(&data, |&i| if i == 57 { Err(i) } else { Ok(i) });
        assert_eq!(out, Err(57));
    }

    #[test]
    fn test_try_parallel_map_indexed_ok() {
        let out: Result<Vec<usize>, ()> = try_parallel_map_indexed(4, Ok);
        assert_eq!(out, Ok(vec![0, 1, 2, 3]));
    }

    #[test]
    fn test_num_threads_positive() {
        assert!(num_threads() >= 1);
        assert_eq!(is_parallel_available(), cfg!(feature = "parallel"));
    }
}
