//! This module provides the high-level API for solving the generalized symmetric-definite
//! eigenproblem `A v = λ B v`.
//!
//! [`solve`] wires the kernels of [`crate::algorithms`] into one pipeline:
//!
//! 1. Validate dimensions and symmetry of `A` and `B`.
//! 2. Factorize `B = L L^T`.
//! 3. Reduce to `C = L^{-1} A L^{-T}`.
//! 4. Tridiagonalize `C = Q T Q^T`.
//! 5. Diagonalize `T` by implicit QL, rotating `Q` into the eigenvectors of `C`.
//! 6. Back-transform `v = L^{-T} w`, re-normalize to `v^T B v = 1`, fix the sign.
//! 7. Sort ascending by eigenvalue (ties keep their original order).
//!
//! Any failure propagates unchanged; no partial spectrum is ever returned. The solver keeps
//! no state between calls.

use crate::{
    algorithms::{
        cholesky, implicit_ql,
        implicit_ql::DEFAULT_MAX_ITERATIONS,
        reduction, tridiagonal,
    },
    error::{EigenError, EigenErrorKind},
    matrix::DenseMatrix,
    spectrum::{EigenPair, Spectrum},
};
use faer::Mat;
use std::borrow::Cow;

/// How to treat an input matrix that is not symmetric within tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymmetryMode {
    /// Fail with [`EigenErrorKind::NotSymmetric`].
    Strict,
    /// Log a warning and continue with `(M + M^T) / 2`.
    #[default]
    Symmetrize,
}

/// Tunable parameters of the solver.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    pub symmetry: SymmetryMode,
    /// Allowed `|M[i][j] - M[j][i]|`, relative to the largest absolute entry of `M`.
    pub symmetry_tolerance: f64,
    /// A Cholesky pivot `<= pivot_tolerance * max|B_ii|` is treated as non-positive.
    pub pivot_tolerance: f64,
    /// Cap on implicit QL sweeps per deflation block.
    pub max_ql_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            symmetry: SymmetryMode::default(),
            symmetry_tolerance: 1e-10,
            pivot_tolerance: f64::EPSILON,
            max_ql_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    fn validate(&self) -> Result<(), EigenError> {
        if !(self.symmetry_tolerance.is_finite() && self.symmetry_tolerance >= 0.0) {
            return Err(EigenErrorKind::InputError(format!(
                "symmetry tolerance must be finite and non-negative, got {}",
                self.symmetry_tolerance
            ))
            .into());
        }
        if !(self.pivot_tolerance.is_finite() && self.pivot_tolerance >= 0.0) {
            return Err(EigenErrorKind::InputError(format!(
                "pivot tolerance must be finite and non-negative, got {}",
                self.pivot_tolerance
            ))
            .into());
        }
        Ok(())
    }
}

/// Solves `A v = λ B v` with the default [`SolverConfig`].
///
/// # Arguments
/// * `a`: The symmetric matrix `A` (e.g. a stiffness matrix).
/// * `b`: The symmetric positive-definite matrix `B` (e.g. a mass matrix).
///
/// # Returns
/// The [`Spectrum`] sorted ascending by eigenvalue, with every eigenvector normalized to
/// `v^T B v = 1`, or an [`EigenError`].
///
/// # Example
/// ```rust
/// use geneig::{DenseMatrix, solve};
///
/// let a = DenseMatrix::from_rows(&[[2.0, 0.0], [0.0, 8.0]]).unwrap();
/// let b = DenseMatrix::from_rows(&[[1.0, 0.0], [0.0, 2.0]]).unwrap();
/// let spectrum = solve(&a, &b).unwrap();
/// assert!((spectrum.eigenvalues()[0] - 2.0).abs() < 1e-12);
/// assert!((spectrum.eigenvalues()[1] - 4.0).abs() < 1e-12);
/// ```
pub fn solve(a: &DenseMatrix, b: &DenseMatrix) -> Result<Spectrum, EigenError> {
    solve_with(a, b, &SolverConfig::default())
}

/// Solves `A v = λ B v` with an explicit configuration.
pub fn solve_with(
    a: &DenseMatrix,
    b: &DenseMatrix,
    config: &SolverConfig,
) -> Result<Spectrum, EigenError> {
    config.validate()?;
    let n = a.dim();
    if b.dim() != n {
        return Err(EigenErrorKind::DimensionMismatch { a: n, b: b.dim() }.into());
    }
    log::debug!("Solving {n}x{n} generalized symmetric-definite eigenproblem");

    let a_checked = checked_symmetric('A', a, config)?;
    let b_checked = checked_symmetric('B', b, config)?;
    let a: &DenseMatrix = &a_checked;
    let b: &DenseMatrix = &b_checked;

    let factor = cholesky::factorize(b.as_faer(), config.pivot_tolerance)?;
    let c = reduction::reduce(a.as_faer(), &factor);
    let tri = tridiagonal::tridiagonalize(c.as_ref());
    let ql = implicit_ql::implicit_ql(tri, config.max_ql_iterations)?;

    let mut pairs = Vec::with_capacity(n);
    for j in 0..n {
        let mut v: Vec<f64> = (0..n).map(|i| ql.eigenvectors[(i, j)]).collect();
        reduction::back_transform_in_place(&factor, &mut v);
        normalize_b(b, &mut v)?;
        fix_sign(&mut v);
        pairs.push(EigenPair {
            value: ql.eigenvalues[j],
            vector: v,
        });
    }

    // A stable sort keeps the original column order among equal eigenvalues.
    pairs.sort_by(|x, y| x.value.total_cmp(&y.value));

    Ok(Spectrum::from_sorted(pairs))
}

/// Solves the standard symmetric eigenproblem `A v = λ v` (the pencil with `B = I`).
pub fn solve_standard(a: &DenseMatrix) -> Result<Spectrum, EigenError> {
    solve_standard_with(a, &SolverConfig::default())
}

/// Solves `A v = λ v` with an explicit configuration.
pub fn solve_standard_with(a: &DenseMatrix, config: &SolverConfig) -> Result<Spectrum, EigenError> {
    let identity = DenseMatrix::identity(a.dim())?;
    solve_with(a, &identity, config)
}

/// Returns the largest scaled residual over all eigenpairs:
///
/// ```text
/// max_j ||A v_j - λ_j B v_j||_∞ / ((||A||_max + |λ_j| ||B||_max) * n * ||v_j||_∞)
/// ```
///
/// Values near machine epsilon indicate a backward-stable solution.
pub fn max_scaled_residual(a: &DenseMatrix, b: &DenseMatrix, spectrum: &Spectrum) -> f64 {
    let n = a.dim() as f64;
    let (a_scale, b_scale) = (a.max_abs(), b.max_abs());
    spectrum
        .iter()
        .map(|pair| {
            let av = a.apply(&pair.vector);
            let bv = b.apply(&pair.vector);
            let residual = av
                .iter()
                .zip(&bv)
                .fold(0.0_f64, |acc, (x, y)| acc.max((x - pair.value * y).abs()));
            let v_scale = pair.vector.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));
            let denominator = (a_scale + pair.value.abs() * b_scale) * n * v_scale;
            residual / denominator.max(f64::MIN_POSITIVE)
        })
        .fold(0.0, f64::max)
}

/// Returns `||V^T B V - I||_F`, the loss of generalized orthonormality of the eigenvectors.
pub fn b_orthogonality_loss(b: &DenseMatrix, spectrum: &Spectrum) -> f64 {
    let n = spectrum.len();
    let v = spectrum.eigenvectors();
    let gram = v.as_ref().transpose() * b.as_faer() * &v;
    (&gram - &Mat::<f64>::identity(n, n)).norm_l2()
}

/// Checks symmetry of an input matrix, symmetrizing a copy when the configuration allows it.
fn checked_symmetric<'a>(
    name: char,
    m: &'a DenseMatrix,
    config: &SolverConfig,
) -> Result<Cow<'a, DenseMatrix>, EigenError> {
    if m.is_symmetric(config.symmetry_tolerance) {
        return Ok(Cow::Borrowed(m));
    }
    let (row, col, deviation) = m.max_asymmetry();
    match config.symmetry {
        SymmetryMode::Strict => Err(EigenErrorKind::NotSymmetric {
            matrix: name,
            row,
            col,
            deviation,
        }
        .into()),
        SymmetryMode::Symmetrize => {
            log::warn!(
                "Matrix {name} is not symmetric (entries ({row}, {col}) differ by {deviation:e}); using (M + M^T) / 2"
            );
            let mut symmetric = m.clone();
            symmetric.symmetrize();
            Ok(Cow::Owned(symmetric))
        }
    }
}

/// Scales `v` so that `v^T B v = 1`.
fn normalize_b(b: &DenseMatrix, v: &mut [f64]) -> Result<(), EigenError> {
    let bv = b.apply(v);
    let norm_sq: f64 = v.iter().zip(&bv).map(|(x, y)| x * y).sum();
    if !(norm_sq > 0.0 && norm_sq.is_finite()) {
        return Err(EigenErrorKind::InputError(format!(
            "eigenvector has non-positive B-norm {norm_sq:e}"
        ))
        .into());
    }
    let scale = norm_sq.sqrt().recip();
    v.iter_mut().for_each(|x| *x *= scale);
    Ok(())
}

/// Flips `v` so that its largest-magnitude component (the first one on ties) is positive.
fn fix_sign(v: &mut [f64]) {
    let mut pivot = 0.0_f64;
    for &x in v.iter() {
        if x.abs() > pivot.abs() {
            pivot = x;
        }
    }
    if pivot < 0.0 {
        v.iter_mut().for_each(|x| *x = -*x);
    }
}
