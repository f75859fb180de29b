//! Cholesky factorization of the symmetric positive-definite mass matrix `B`.
//!
//! The factor `L` (lower triangular, positive diagonal, `B = L L^T`) is never inverted.
//! Instead [`CholeskyFactor`] exposes the two triangular solves `L x = b` and `L^T x = b`,
//! which is all the reduction and back-transformation stages need.

use crate::error::{EigenError, EigenErrorKind};
use faer::{Mat, MatRef};

/// The lower-triangular Cholesky factor of a positive-definite matrix.
#[derive(Debug, Clone)]
pub struct CholeskyFactor {
    l: Mat<f64>,
}

/// Computes `B = L L^T` with the outer-product (right-looking) algorithm.
///
/// Only the lower triangle of `b` is read. Pivots are processed in increasing index order;
/// step `k` depends on the trailing update of every earlier step, so no reordering is done.
///
/// A pivot `p` is rejected when `p <= pivot_tolerance * max|B_ii|`, reporting its index and
/// value through [`EigenErrorKind::NotPositiveDefinite`].
pub fn factorize(b: MatRef<'_, f64>, pivot_tolerance: f64) -> Result<CholeskyFactor, EigenError> {
    let n = b.nrows();
    if n != b.ncols() {
        return Err(EigenErrorKind::NotSquare {
            rows: n,
            cols: b.ncols(),
        }
        .into());
    }

    let max_diag = (0..n).fold(0.0_f64, |acc, i| acc.max(b[(i, i)].abs()));
    let threshold = pivot_tolerance * max_diag;

    let mut l = Mat::from_fn(n, n, |i, j| if i >= j { b[(i, j)] } else { 0.0 });

    for k in 0..n {
        let pivot = l[(k, k)];
        // The negated comparison also catches a NaN pivot.
        if !(pivot > threshold) {
            return Err(EigenErrorKind::NotPositiveDefinite {
                pivot: k,
                value: pivot,
            }
            .into());
        }
        let l_kk = pivot.sqrt();
        l[(k, k)] = l_kk;
        for i in (k + 1)..n {
            l[(i, k)] /= l_kk;
        }

        // Rank-one update of the trailing lower triangle.
        for j in (k + 1)..n {
            let l_jk = l[(j, k)];
            if l_jk == 0.0 {
                continue;
            }
            for i in j..n {
                let update = l[(i, k)] * l_jk;
                l[(i, j)] -= update;
            }
        }
    }

    if n > 0 {
        let min_diag = (0..n).fold(f64::INFINITY, |acc, i| acc.min(l[(i, i)]));
        log::debug!("Cholesky factorization of {n}x{n} matrix: smallest diagonal of L = {min_diag:e}");
    }

    Ok(CholeskyFactor { l })
}

impl CholeskyFactor {
    /// Returns the dimension of the factored matrix.
    #[inline]
    pub fn dim(&self) -> usize {
        self.l.nrows()
    }

    /// Returns a view of `L`.
    #[inline]
    pub fn l(&self) -> MatRef<'_, f64> {
        self.l.as_ref()
    }

    /// Solves `L x = rhs` in place by forward substitution.
    ///
    /// # Panics
    ///
    /// Panics if `x` does not have `n` entries.
    pub fn solve_lower_in_place(&self, x: &mut [f64]) {
        let n = self.dim();
        assert_eq!(n, x.len(), "Right-hand side length must equal the factor dimension.");
        for i in 0..n {
            let mut sum = x[i];
            for k in 0..i {
                sum -= self.l[(i, k)] * x[k];
            }
            x[i] = sum / self.l[(i, i)];
        }
    }

    /// Solves `L^T x = rhs` in place by back substitution.
    ///
    /// # Panics
    ///
    /// Panics if `x` does not have `n` entries.
    pub fn solve_lower_transpose_in_place(&self, x: &mut [f64]) {
        let n = self.dim();
        assert_eq!(n, x.len(), "Right-hand side length must equal the factor dimension.");
        for i in (0..n).rev() {
            let mut sum = x[i];
            for k in (i + 1)..n {
                sum -= self.l[(k, i)] * x[k];
            }
            x[i] = sum / self.l[(i, i)];
        }
    }

    /// Solves `B x = rhs` using both triangular solves.
    pub fn solve(&self, rhs: &[f64]) -> Vec<f64> {
        let mut x = rhs.to_vec();
        self.solve_lower_in_place(&mut x);
        self.solve_lower_transpose_in_place(&mut x);
        x
    }

    /// Returns `log(det(B)) = 2 * sum(log(L_ii))`.
    pub fn log_det(&self) -> f64 {
        2.0 * (0..self.dim()).map(|i| self.l[(i, i)].ln()).sum::<f64>()
    }
}
