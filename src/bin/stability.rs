//! Experiment Runner for the Numerical Stability and Accuracy Analysis.
//!
//! This executable sweeps the problem dimension `n`, builds a random symmetric `A` and a random
//! symmetric positive-definite `B` for each size, and records how well the computed spectrum
//! satisfies the defining properties of the generalized eigenproblem:
//!
//! - the scaled residual `max_j ||A v_j - λ_j B v_j||`,
//! - the loss of B-orthonormality `||V^T B V - I||_F`,
//! - the deviation of `solve_standard(A)` from `faer`'s self-adjoint eigensolver.
//!
//! Wall-clock time and the process memory high-water mark are recorded alongside.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use faer::{Mat, Side};
use geneig::{
    DenseMatrix,
    algorithms::cholesky,
    solve, solve_standard,
    solvers::{b_orthogonality_loss, max_scaled_residual},
    utils::perf::memory_usage,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use serde::Serialize;
use std::{path::PathBuf, time::Instant};

/// The conditioning of the mass matrix B.
#[derive(ValueEnum, Clone, Debug, Copy, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ProblemScenario {
    /// `B = G^T G + n I`: eigenvalues of B are clustered away from zero.
    WellConditioned,
    /// `B = D (G^T G / n + 1e-6 I) D` with `D` spanning four orders of magnitude.
    IllConditioned,
}

/// Command-line arguments for the stability sweep.
#[derive(Parser, Debug)]
#[clap(
    name = "stability-runner",
    about = "Runs an accuracy analysis of the generalized symmetric eigensolver over random problems."
)]
struct StabilityArgs {
    /// The conditioning scenario for the mass matrix.
    #[clap(long, value_enum, default_value_t = ProblemScenario::WellConditioned)]
    scenario: ProblemScenario,
    /// Smallest problem dimension.
    #[clap(long, default_value_t = 10)]
    n_min: usize,
    /// Largest problem dimension.
    #[clap(long, default_value_t = 200)]
    n_max: usize,
    /// Step between problem dimensions.
    #[clap(long, default_value_t = 10)]
    n_step: usize,
    /// Seed for the random problem generator.
    #[clap(long, default_value_t = 42)]
    seed: u64,
    /// Path to the output CSV file where results will be written.
    #[clap(long, value_name = "PATH")]
    output: PathBuf,
}

/// A single row of the output CSV file.
#[derive(Debug, Serialize)]
struct StabilityResult {
    scenario: ProblemScenario,
    n: usize,
    /// `log(det(B))`; very negative values flag a nearly singular mass matrix.
    mass_log_det: f64,
    /// Largest scaled residual over all eigenpairs.
    max_scaled_residual: f64,
    /// `||V^T B V - I||_F`.
    b_orthogonality_loss: f64,
    /// Largest eigenvalue deviation of the `B = I` solve from faer, relative to `||A||_max`.
    standard_eigenvalue_deviation: f64,
    time_s: f64,
    peak_rss_kb: u64,
}

/// Generates a random symmetric matrix with entries in `[-1, 1)`.
fn random_symmetric(n: usize, rng: &mut StdRng) -> Mat<f64> {
    let mut a = Mat::<f64>::zeros(n, n);
    for j in 0..n {
        for i in j..n {
            let value = rng.random_range(-1.0..1.0);
            a[(i, j)] = value;
            a[(j, i)] = value;
        }
    }
    a
}

/// Generates a random symmetric positive-definite matrix for the given scenario.
fn random_mass(n: usize, scenario: ProblemScenario, rng: &mut StdRng) -> Mat<f64> {
    let g = Mat::<f64>::from_fn(n, n, |_, _| rng.random_range(-1.0..1.0));
    let gram = g.as_ref().transpose() * &g;
    match scenario {
        ProblemScenario::WellConditioned => {
            Mat::from_fn(n, n, |i, j| gram[(i, j)] + if i == j { n as f64 } else { 0.0 })
        }
        ProblemScenario::IllConditioned => {
            let d: Vec<f64> = (0..n)
                .map(|i| 10f64.powf(-4.0 * i as f64 / (n - 1).max(1) as f64))
                .collect();
            Mat::from_fn(n, n, |i, j| {
                let core = gram[(i, j)] / n as f64 + if i == j { 1e-6 } else { 0.0 };
                d[i] * core * d[j]
            })
        }
    }
}

/// Compares `solve_standard(A)` against faer's self-adjoint eigendecomposition.
fn standard_deviation(a: &DenseMatrix) -> Result<f64> {
    let ours = solve_standard(a)?.eigenvalues();
    let evd = a
        .as_faer()
        .self_adjoint_eigen(Side::Lower)
        .map_err(|e| anyhow!("Reference EVD failed: {:?}", e))?;
    let s = evd.S();
    let mut reference: Vec<f64> = (0..a.dim()).map(|i| s[i]).collect();
    reference.sort_by(f64::total_cmp);

    let scale = a.max_abs().max(f64::MIN_POSITIVE);
    Ok(ours
        .iter()
        .zip(&reference)
        .fold(0.0_f64, |acc, (x, y)| acc.max((x - y).abs() / scale)))
}

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .try_init()?;
    let args = StabilityArgs::parse();
    if args.n_min == 0 || args.n_step == 0 || args.n_min > args.n_max {
        return Err(anyhow!(
            "Invalid size range: n_min={}, n_max={}, n_step={}",
            args.n_min,
            args.n_max,
            args.n_step
        ));
    }
    log::info!(
        "Starting stability analysis for scenario {:?}, n in {}..={} step {}",
        args.scenario,
        args.n_min,
        args.n_max,
        args.n_step
    );

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("Failed to create output file {:?}", args.output))?;

    for n in (args.n_min..=args.n_max).step_by(args.n_step) {
        log::info!("Running for n = {}...", n);
        let a = DenseMatrix::from_faer(random_symmetric(n, &mut rng))?;
        let b = DenseMatrix::from_faer(random_mass(n, args.scenario, &mut rng))?;

        let start = Instant::now();
        let spectrum = match solve(&a, &b) {
            Ok(spectrum) => spectrum,
            Err(err) => {
                log::warn!("Solve failed at n={}: {}. Skipping.", n, err);
                continue;
            }
        };
        let time_s = start.elapsed().as_secs_f64();
        let mass_log_det = cholesky::factorize(b.as_faer(), f64::EPSILON)?.log_det();

        writer.serialize(StabilityResult {
            scenario: args.scenario,
            n,
            mass_log_det,
            max_scaled_residual: max_scaled_residual(&a, &b, &spectrum),
            b_orthogonality_loss: b_orthogonality_loss(&b, &spectrum),
            standard_eigenvalue_deviation: standard_deviation(&a)?,
            time_s,
            peak_rss_kb: memory_usage().peak_resident_kb,
        })?;
    }

    writer.flush()?;
    log::info!(
        "Stability analysis complete. Results saved to {:?}.",
        &args.output
    );
    Ok(())
}
