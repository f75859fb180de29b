//! Implicit-shift QL iteration for a real symmetric tridiagonal matrix.
//!
//! The iteration works on deflation blocks `[l, m]`: starting from row `l`, `m` is the first
//! index whose off-diagonal entry is negligible,
//!
//! ```text
//! |e[m]| <= eps * (|d[m]| + |d[m + 1]|)
//! ```
//!
//! If `m == l` the eigenvalue `d[l]` has converged and the block moves on. Otherwise one QL
//! sweep with a Wilkinson shift (the eigenvalue of the leading 2x2 block closest to `d[l]`)
//! chases the bulge from `m` up to `l` with plane rotations. Every rotation is also applied to
//! the columns of the accumulated transform, which therefore ends up holding the eigenvectors.
//!
//! A block that needs more than the configured number of sweeps is reported as
//! [`EigenErrorKind::ConvergenceFailure`]; the partial state is discarded.

use super::{Tridiagonal, unit_roundoff, with_sign};
use crate::error::{EigenError, EigenErrorKind};
use faer::Mat;

/// Default cap on QL sweeps per deflation block.
pub const DEFAULT_MAX_ITERATIONS: usize = 30;

/// Eigenvalues of a tridiagonal matrix and the correspondingly rotated transform.
#[derive(Debug, Clone)]
pub struct QlOutput {
    /// Eigenvalues in the order the iteration produced them (not sorted).
    pub eigenvalues: Vec<f64>,
    /// Column `j` is the eigenvector belonging to `eigenvalues[j]`.
    pub eigenvectors: Mat<f64>,
    /// Total number of QL sweeps over all blocks.
    pub sweeps: usize,
}

/// Diagonalizes `tri` in place, consuming it.
///
/// When `tri.q` is the transform from [`super::tridiagonal::tridiagonalize`], the returned
/// eigenvectors are those of the original dense matrix. Pass the identity to obtain the
/// eigenvectors of `T` itself.
pub fn implicit_ql(tri: Tridiagonal, max_iterations: usize) -> Result<QlOutput, EigenError> {
    let Tridiagonal {
        diagonal: mut d,
        off_diagonal: mut e,
        mut q,
    } = tri;
    let n = d.len();
    if e.len() + 1 != n.max(1) || q.nrows() != q.ncols() || q.ncols() != n {
        return Err(EigenErrorKind::InputError(format!(
            "inconsistent tridiagonal system: {} diagonal entries, {} off-diagonal entries, {}x{} transform",
            n,
            e.len(),
            q.nrows(),
            q.ncols()
        ))
        .into());
    }
    // Sentinel so that e[m] is defined for the last row.
    e.push(0.0);

    let eps = unit_roundoff();
    let mut sweeps = 0;

    for l in 0..n {
        let mut iterations = 0;
        loop {
            let mut m = l;
            while m + 1 < n {
                let dd = d[m].abs() + d[m + 1].abs();
                if e[m].abs() <= eps * dd {
                    break;
                }
                m += 1;
            }
            if m == l {
                break;
            }
            if iterations == max_iterations {
                return Err(EigenErrorKind::ConvergenceFailure {
                    block: l,
                    iterations,
                }
                .into());
            }
            iterations += 1;

            // Wilkinson shift from the leading 2x2 block.
            let mut g = (d[l + 1] - d[l]) / (2.0 * e[l]);
            let mut r = g.hypot(1.0);
            g = d[m] - d[l] + e[l] / (g + with_sign(r, g));

            let (mut s, mut c, mut p) = (1.0_f64, 1.0_f64, 0.0_f64);
            let mut underflow = false;
            let mut i = m;
            while i > l {
                i -= 1;
                let f = s * e[i];
                let b = c * e[i];
                r = f.hypot(g);
                e[i + 1] = r;
                if r == 0.0 {
                    // The rotation degenerated: the block splits here, restart on it.
                    d[i + 1] -= p;
                    e[m] = 0.0;
                    underflow = true;
                    break;
                }
                s = f / r;
                c = g / r;
                g = d[i + 1] - p;
                r = (d[i] - g) * s + 2.0 * c * b;
                p = s * r;
                d[i + 1] = g + p;
                g = c * r - b;

                for k in 0..n {
                    let upper = q[(k, i + 1)];
                    let lower = q[(k, i)];
                    q[(k, i + 1)] = s * lower + c * upper;
                    q[(k, i)] = c * lower - s * upper;
                }
            }
            if underflow {
                continue;
            }
            d[l] -= p;
            e[l] = g;
            e[m] = 0.0;
        }
        sweeps += iterations;
    }

    log::debug!("Implicit QL converged on {n} eigenvalues in {sweeps} sweep(s)");

    Ok(QlOutput {
        eigenvalues: d,
        eigenvectors: q,
        sweeps,
    })
}
