//! Integration test suite to verify the mathematical correctness of the generalized eigensolver.
//!
//! # Test Methodology
//!
//! A computed spectrum is accepted when it satisfies the properties that define the solution of
//! `A v = λ B v`, independent of how the solver got there:
//!
//! 1.  **Residual:** every pair satisfies `A v - λ B v ≈ 0`, measured by the scaled residual so
//!     that the bound does not depend on the magnitude of the inputs.
//! 2.  **B-orthonormality:** the eigenvector matrix `V` satisfies `V^T B V ≈ I`.
//! 3.  **Ordering:** eigenvalues come back in non-decreasing order.
//! 4.  **Agreement:** for `B = I` the eigenvalues match `faer`'s self-adjoint eigensolver.
//!
//! The problems are random symmetric `A` with random symmetric positive-definite `B`, built from
//! a fixed seed so the suite is deterministic.

use anyhow::{Result, anyhow, ensure};
use faer::{Mat, Side};
use geneig::{
    DenseMatrix, EigenErrorKind, SolverConfig, SymmetryMode, solve, solve_standard, solve_with,
    solvers::{b_orthogonality_loss, max_scaled_residual},
};
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Bound on the scaled residual. Backward-stable results sit a few ulps above zero.
const RESIDUAL_TOLERANCE: f64 = 1e-12;

/// Bound on `||V^T B V - I||_F`. Grows with `n` and the condition number of `B`.
const ORTHOGONALITY_TOLERANCE: f64 = 1e-9;

/// Builds a random symmetric `A` and a random symmetric positive-definite `B` of dimension `n`.
///
/// `B = G^T G + n I` keeps the condition number of the mass matrix small, so the checks below
/// measure the eigensolver rather than an ill-posed reduction.
fn create_random_pencil(n: usize, seed: u64) -> Result<(DenseMatrix, DenseMatrix)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut a = Mat::<f64>::zeros(n, n);
    for j in 0..n {
        for i in j..n {
            let value = rng.random_range(-1.0..1.0);
            a[(i, j)] = value;
            a[(j, i)] = value;
        }
    }
    let g = Mat::<f64>::from_fn(n, n, |_, _| rng.random_range(-1.0..1.0));
    let gram = g.as_ref().transpose() * &g;
    let b = Mat::from_fn(n, n, |i, j| {
        // Average the Gram product so rounding cannot leave it a few ulps asymmetric.
        let sym = 0.5 * (gram[(i, j)] + gram[(j, i)]);
        sym + if i == j { n as f64 } else { 0.0 }
    });
    Ok((DenseMatrix::from_faer(a)?, DenseMatrix::from_faer(b)?))
}

/// A macro to generate the boilerplate for each property test.
///
/// Every generated test builds one random pencil, solves it and checks ordering, residual and
/// B-orthonormality.
macro_rules! generate_property_test {
    ($test_name:ident, $n:expr, $seed:expr) => {
        #[test]
        fn $test_name() -> Result<()> {
            let (a, b) = create_random_pencil($n, $seed)?;
            let spectrum = solve(&a, &b)?;

            ensure!(spectrum.len() == $n, "expected {} pairs, got {}", $n, spectrum.len());

            let values = spectrum.eigenvalues();
            ensure!(
                values.windows(2).all(|w| w[0] <= w[1]),
                "eigenvalues are not sorted: {:?}",
                values
            );

            let residual = max_scaled_residual(&a, &b, &spectrum);
            ensure!(
                residual < RESIDUAL_TOLERANCE,
                "scaled residual too high: {}",
                residual
            );

            let loss = b_orthogonality_loss(&b, &spectrum);
            ensure!(
                loss < ORTHOGONALITY_TOLERANCE,
                "B-orthonormality loss too high: {}",
                loss
            );

            Ok(())
        }
    };
}

// --- Test Suite ---

generate_property_test!(test_random_pencil_n1, 1, 1);
generate_property_test!(test_random_pencil_n2, 2, 2);
generate_property_test!(test_random_pencil_n3, 3, 3);
generate_property_test!(test_random_pencil_n8, 8, 8);
generate_property_test!(test_random_pencil_n25, 25, 25);
generate_property_test!(test_random_pencil_n60, 60, 60);

/// With `B = I` the problem is the standard one, so faer's eigensolver gives the ground truth.
#[test]
fn test_identity_mass_matches_faer() -> Result<()> {
    let n = 40;
    let (a, _) = create_random_pencil(n, 7)?;
    let ours = solve_standard(&a)?.eigenvalues();

    let evd = a
        .as_faer()
        .self_adjoint_eigen(Side::Lower)
        .map_err(|e| anyhow!("EVD failed: {:?}", e))?;
    let s = evd.S();
    let mut reference: Vec<f64> = (0..n).map(|i| s[i]).collect();
    reference.sort_by(f64::total_cmp);

    let scale = a.max_abs();
    for (j, (x, y)) in ours.iter().zip(&reference).enumerate() {
        ensure!(
            (x - y).abs() <= 1e-12 * n as f64 * scale,
            "eigenvalue {} differs: {} vs {}",
            j,
            x,
            y
        );
    }
    Ok(())
}

/// Scaling `B` by `s` scales every eigenvalue by `1 / s`.
#[test]
fn test_mass_scaling_scales_eigenvalues() -> Result<()> {
    let n = 12;
    let (a, b) = create_random_pencil(n, 11)?;
    let scaled = DenseMatrix::from_faer(Mat::from_fn(n, n, |i, j| 4.0 * b.as_faer()[(i, j)]))?;

    let base = solve(&a, &b)?.eigenvalues();
    let quarter = solve(&a, &scaled)?.eigenvalues();
    let scale = base.iter().fold(1.0_f64, |acc, x| acc.max(x.abs()));
    for (x, y) in base.iter().zip(&quarter) {
        ensure!(
            (x / 4.0 - y).abs() <= 1e-12 * scale,
            "expected {} / 4, got {}",
            x,
            y
        );
    }
    Ok(())
}

/// Scaling `A` by `s` scales every eigenvalue by `s`, including near the limits of `f64`.
#[test]
fn test_extreme_stiffness_scaling() -> Result<()> {
    let dense = DenseMatrix::from_rows(&[[4.0, 1.0, -2.0], [1.0, 2.0, 0.5], [-2.0, 0.5, 3.0]])?;
    let (random, mass) = create_random_pencil(6, 13)?;

    for (a, b) in [(dense, DenseMatrix::identity(3)?), (random, mass)] {
        let base = solve(&a, &b)?.eigenvalues();
        let largest = base.iter().fold(0.0_f64, |acc, x| acc.max(x.abs()));

        for s in [1e-170, 1e160] {
            let n = a.dim();
            let scaled = DenseMatrix::from_faer(Mat::from_fn(n, n, |i, j| s * a.as_faer()[(i, j)]))?;
            let spectrum = solve(&scaled, &b)?;
            for (j, (x, y)) in spectrum.eigenvalues().iter().zip(&base).enumerate() {
                ensure!(
                    (x / s - y).abs() <= 1e-10 * largest,
                    "eigenvalue {} at scale {:e}: expected {}, got {}",
                    j,
                    s,
                    y,
                    x / s
                );
            }
            let residual = max_scaled_residual(&scaled, &b, &spectrum);
            ensure!(
                residual < RESIDUAL_TOLERANCE,
                "scaled residual too high at scale {:e}: {}",
                s,
                residual
            );
            let loss = b_orthogonality_loss(&b, &spectrum);
            ensure!(
                loss < ORTHOGONALITY_TOLERANCE,
                "B-orthonormality loss too high at scale {:e}: {}",
                s,
                loss
            );
        }
    }
    Ok(())
}

/// Two solves of the same input produce bit-identical spectra.
#[test]
fn test_repeated_solves_are_identical() -> Result<()> {
    let (a, b) = create_random_pencil(20, 5)?;
    let first = solve(&a, &b)?;
    let second = solve(&a, &b)?;
    ensure!(first == second, "repeated solves differ");
    Ok(())
}

/// The solver does not modify its inputs.
#[test]
fn test_inputs_are_untouched() -> Result<()> {
    let (a, b) = create_random_pencil(10, 9)?;
    let (a_before, b_before) = (a.clone(), b.clone());
    solve(&a, &b)?;
    ensure!(a == a_before && b == b_before, "solve modified its inputs");
    Ok(())
}

#[test]
fn test_two_storey_frame() -> Result<()> {
    let k = DenseMatrix::from_rows(&[[364.8, -182.4], [-182.4, 182.4]])?;
    let m = DenseMatrix::from_rows(&[[0.407, 0.0], [0.0, 0.407]])?;
    let spectrum = solve(&k, &m)?;
    let values = spectrum.eigenvalues();

    // Eigenvalues of [[2, -1], [-1, 1]] are (3 ± √5) / 2.
    let unit = 182.4 / 0.407;
    let expected = [
        unit * (3.0 - 5f64.sqrt()) / 2.0,
        unit * (3.0 + 5f64.sqrt()) / 2.0,
    ];
    for (x, y) in values.iter().zip(&expected) {
        ensure!((x - y).abs() <= 1e-10 * y, "expected {}, got {}", y, x);
    }

    // The fundamental mode moves both storeys the same way.
    let first = &spectrum.pairs()[0].vector;
    ensure!(first[0] > 0.0 && first[1] > 0.0, "unexpected mode shape {:?}", first);
    let second = &spectrum.pairs()[1].vector;
    ensure!(second[0] * second[1] < 0.0, "unexpected mode shape {:?}", second);
    Ok(())
}

#[test]
fn test_indefinite_mass_is_rejected() -> Result<()> {
    let (a, _) = create_random_pencil(4, 3)?;
    let b = DenseMatrix::from_rows(&[
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 2.0, 0.0, 0.0],
        [0.0, 0.0, -1.0, 0.0],
        [0.0, 0.0, 0.0, 3.0],
    ])?;
    let err = solve(&a, &b).err().ok_or_else(|| anyhow!("expected an error"))?;
    ensure!(
        matches!(err.kind(), EigenErrorKind::NotPositiveDefinite { pivot: 2, .. }),
        "unexpected error: {}",
        err
    );
    Ok(())
}

#[test]
fn test_strict_symmetry_rejects_asymmetric_input() -> Result<()> {
    let a = DenseMatrix::from_rows(&[[1.0, 2.0], [2.5, 1.0]])?;
    let b = DenseMatrix::identity(2)?;
    let config = SolverConfig {
        symmetry: SymmetryMode::Strict,
        ..SolverConfig::default()
    };
    let err = solve_with(&a, &b, &config)
        .err()
        .ok_or_else(|| anyhow!("expected an error"))?;
    ensure!(
        matches!(err.kind(), EigenErrorKind::NotSymmetric { matrix: 'A', .. }),
        "unexpected error: {}",
        err
    );

    // The default configuration symmetrizes and solves [[1, 2.25], [2.25, 1]].
    let values = solve(&a, &b)?.eigenvalues();
    ensure!((values[0] + 1.25).abs() < 1e-12, "got {:?}", values);
    ensure!((values[1] - 3.25).abs() < 1e-12, "got {:?}", values);
    Ok(())
}
