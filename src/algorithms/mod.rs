//! Numerical kernels of the generalized symmetric-definite eigensolver.
//!
//! ** NOTE: We recommend using the high-level method [`crate::solvers::solve`] instead. These
//! modules are intended for use cases where fine-grained control over a single stage is required.
//!
//! The pipeline runs strictly in this order, each stage consuming the full output of the previous
//! one:
//!
//! 1. [`cholesky`]: `B = L L^T`.
//! 2. [`reduction`]: `C = L^{-1} A L^{-T}` by two triangular solves, and the back-transform
//!    `v = L^{-T} w`.
//! 3. [`tridiagonal`]: Householder reduction `C = Q T Q^T`.
//! 4. [`implicit_ql`]: eigenvalues of `T`, with the plane rotations accumulated into `Q`.

pub mod cholesky;
pub mod implicit_ql;
pub mod reduction;
pub mod tridiagonal;

use faer::Mat;

/// A real symmetric tridiagonal matrix together with the orthogonal transform that produced it.
///
/// `off_diagonal[i]` couples rows `i` and `i + 1`, so it has `n - 1` entries.
#[derive(Debug, Clone)]
pub struct Tridiagonal {
    pub diagonal: Vec<f64>,
    pub off_diagonal: Vec<f64>,
    /// Orthogonal `Q` with `C = Q T Q^T`. Column `j` is the `j`-th basis vector.
    pub q: Mat<f64>,
}

/// Relative precision used by the convergence and skip tests.
#[inline]
pub(crate) fn unit_roundoff() -> f64 {
    f64::EPSILON
}

/// Returns `|a|` carrying the sign of `b`, treating `b == 0` as positive.
#[inline]
pub(crate) fn with_sign(a: f64, b: f64) -> f64 {
    if b >= 0.0 { a.abs() } else { -a.abs() }
}
