//! Householder reduction of a dense symmetric matrix to tridiagonal form.
//!
//! Columns are processed first to last. Step `k` builds a reflector `H_k = I - τ v v^T`
//! acting on rows `k+1..n` that zeroes column `k` below the sub-diagonal, applies it from
//! both sides, and accumulates `Q ← Q H_k`. After `n - 2` steps `C = Q T Q^T`.
//!
//! A column whose entries below the sub-diagonal are already negligible is left alone:
//! no reflector is built, so there is no division by a vanishing norm. Reflectors are
//! normalized to a unit leading entry and never form squared magnitudes, so the reduction
//! holds for inputs anywhere in the finite floating-point range.

use super::{Tridiagonal, unit_roundoff, with_sign};
use faer::{Mat, MatRef};

/// Reduces the symmetric matrix `c` to tridiagonal form.
///
/// Only symmetric input is meaningful; both triangles are read.
///
/// # Panics
///
/// Panics if `c` is not square.
pub fn tridiagonalize(c: MatRef<'_, f64>) -> Tridiagonal {
    let n = c.nrows();
    assert_eq!(n, c.ncols(), "Tridiagonalization requires a square matrix.");

    let mut a = c.to_owned();
    let mut q = Mat::<f64>::identity(n, n);
    let skip_threshold = unit_roundoff() * a.norm_l2();

    let mut v = vec![0.0; n];
    let mut w = vec![0.0; n];
    let mut skipped = 0usize;

    for k in 0..n.saturating_sub(2) {
        // Scaled norm: raw squares of entries near 1e±160 overflow or underflow.
        let tail = a.col(k).subrows(k + 2, n - k - 2).norm_l2();
        if tail <= skip_threshold {
            for i in (k + 2)..n {
                a[(i, k)] = 0.0;
                a[(k, i)] = 0.0;
            }
            skipped += 1;
            continue;
        }

        let x0 = a[(k + 1, k)];
        let alpha = -with_sign(x0.hypot(tail), x0);

        // Householder vector v = (x - alpha e_1) / (x0 - alpha), so v[k+1] = 1. The signs of
        // alpha and x0 differ, hence |x0 - alpha| >= |alpha| > 0 and tau lies in [1, 2].
        let pivot = x0 - alpha;
        v.iter_mut().for_each(|vi| *vi = 0.0);
        v[k + 1] = 1.0;
        for i in (k + 2)..n {
            v[i] = a[(i, k)] / pivot;
        }
        let tau = (alpha - x0) / alpha;

        // p = tau A v, restricted to the active block: earlier rows are already reduced.
        for i in k..n {
            w[i] = tau * ((k + 1)..n).map(|j| a[(i, j)] * v[j]).sum::<f64>();
        }
        // w = p - (tau / 2)(v^T p) v
        let beta = 0.5 * tau * ((k + 1)..n).map(|i| v[i] * w[i]).sum::<f64>();
        for i in k..n {
            w[i] -= beta * v[i];
        }

        // A <- A - v w^T - w v^T
        for j in k..n {
            for i in k..n {
                a[(i, j)] -= v[i] * w[j] + w[i] * v[j];
            }
        }
        a[(k + 1, k)] = alpha;
        a[(k, k + 1)] = alpha;
        for i in (k + 2)..n {
            a[(i, k)] = 0.0;
            a[(k, i)] = 0.0;
        }

        // Q <- Q H_k = Q - tau (Q v) v^T
        for i in 0..n {
            let qv: f64 = ((k + 1)..n).map(|j| q[(i, j)] * v[j]).sum();
            if qv == 0.0 {
                continue;
            }
            for j in (k + 1)..n {
                q[(i, j)] -= tau * qv * v[j];
            }
        }
    }

    log::debug!(
        "Tridiagonalized {n}x{n} matrix ({skipped} column(s) already reduced)"
    );

    Tridiagonal {
        diagonal: (0..n).map(|i| a[(i, i)]).collect(),
        off_diagonal: (1..n).map(|i| a[(i, i - 1)]).collect(),
        q,
    }
}

impl Tridiagonal {
    /// Assembles the dense tridiagonal matrix `T`.
    pub fn to_dense(&self) -> Mat<f64> {
        let n = self.diagonal.len();
        let mut t = Mat::<f64>::zeros(n, n);
        for (i, &d) in self.diagonal.iter().enumerate() {
            t[(i, i)] = d;
        }
        for (i, &e) in self.off_diagonal.iter().enumerate() {
            t[(i, i + 1)] = e;
            t[(i + 1, i)] = e;
        }
        t
    }
}
