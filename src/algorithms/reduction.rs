//! Reduction of the pencil `(A, B)` to a standard symmetric eigenproblem.
//!
//! With `B = L L^T`, the problem `A v = λ B v` is equivalent to `C w = λ w` where
//! `C = L^{-1} A L^{-T}` and `v = L^{-T} w`. `C` is formed by two rounds of forward
//! substitution, never by an explicit inverse:
//!
//! 1. `X = L^{-1} A` (one forward solve per column of `A`).
//! 2. `C = L^{-1} X^T`, which equals `L^{-1} A L^{-T}` because `A` is symmetric.
//!
//! Round-off leaves `C` slightly asymmetric, so it is replaced by `(C + C^T) / 2` before
//! any symmetric-only algorithm sees it.

use super::cholesky::CholeskyFactor;
use faer::{Mat, MatRef};

/// Computes the symmetric matrix `C = L^{-1} A L^{-T}`.
///
/// # Panics
///
/// Panics if `a` is not square with the same dimension as the factor.
pub fn reduce(a: MatRef<'_, f64>, factor: &CholeskyFactor) -> Mat<f64> {
    let n = factor.dim();
    assert!(
        a.nrows() == n && a.ncols() == n,
        "Matrix dimension ({}x{}) must equal the Cholesky factor dimension ({}).",
        a.nrows(),
        a.ncols(),
        n
    );

    let mut column = vec![0.0; n];

    // X = L^{-1} A, stored transposed so that row i of `x_t` is column i of X.
    let mut x_t = Mat::<f64>::zeros(n, n);
    for j in 0..n {
        for i in 0..n {
            column[i] = a[(i, j)];
        }
        factor.solve_lower_in_place(&mut column);
        for i in 0..n {
            x_t[(j, i)] = column[i];
        }
    }

    // C = L^{-1} X^T.
    let mut c = Mat::<f64>::zeros(n, n);
    for j in 0..n {
        for i in 0..n {
            column[i] = x_t[(i, j)];
        }
        factor.solve_lower_in_place(&mut column);
        for i in 0..n {
            c[(i, j)] = column[i];
        }
    }

    let mut max_asymmetry = 0.0_f64;
    for j in 0..n {
        for i in 0..j {
            max_asymmetry = max_asymmetry.max((c[(i, j)] - c[(j, i)]).abs());
            let mean = 0.5 * (c[(i, j)] + c[(j, i)]);
            c[(i, j)] = mean;
            c[(j, i)] = mean;
        }
    }
    log::debug!("Reduced {n}x{n} pencil to standard form; asymmetry before averaging = {max_asymmetry:e}");

    c
}

/// Maps an eigenvector `w` of `C` back to the pencil: solves `L^T v = w` in place.
pub fn back_transform_in_place(factor: &CholeskyFactor, w: &mut [f64]) {
    factor.solve_lower_transpose_in_place(w);
}

/// Returns `v = L^{-T} w`.
pub fn back_transform(factor: &CholeskyFactor, w: &[f64]) -> Vec<f64> {
    let mut v = w.to_vec();
    back_transform_in_place(factor, &mut v);
    v
}
