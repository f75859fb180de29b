//! Command-line front end for the generalized symmetric eigensolver.
//!
//! Reads two matrices in delimited-text form (rows separated by `;`, entries by `,`), solves
//! `A v = λ B v`, and prints two lines to stdout:
//!
//! 1. the eigenvalues in ascending order, comma-joined;
//! 2. the eigenvector matrix (eigenvectors as columns) flattened row-major, comma-joined.
//!
//! ```text
//! $ geneig "364.8,-182.4;-182.4,182.4" ".407,0;0,.407"
//! ```
//!
//! Diagnostics go to stderr through `env_logger`.

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use geneig::{
    ModalAnalysis, SolverConfig, SymmetryMode, solve_with,
    utils::codec::{format_matrix, format_spectrum, format_values, parse_matrix},
};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[clap(
    name = "geneig",
    about = "Solves the generalized symmetric-definite eigenproblem A v = λ B v."
)]
struct CliArgs {
    /// The symmetric matrix A, e.g. "364.8,-182.4;-182.4,182.4".
    #[clap(allow_hyphen_values = true)]
    a: String,
    /// The symmetric positive-definite matrix B, e.g. ".407,0;0,.407".
    #[clap(allow_hyphen_values = true)]
    b: String,
    /// Reject non-symmetric input instead of symmetrizing it.
    #[clap(long)]
    strict_symmetry: bool,
    /// Relative tolerance for the symmetry check.
    #[clap(long, default_value_t = 1e-10)]
    symmetry_tolerance: f64,
    /// Relative tolerance below which a Cholesky pivot of B counts as non-positive.
    #[clap(long, default_value_t = f64::EPSILON)]
    pivot_tolerance: f64,
    /// Maximum implicit QL sweeps per deflation block.
    #[clap(long, default_value_t = 30)]
    max_iterations: usize,
    /// Also print natural angular frequencies and periods, treating A as stiffness and B as mass.
    #[clap(long)]
    modal: bool,
    /// Also print the Rayleigh damping matrix giving this damping ratio in the first and last modes.
    #[clap(long, value_name = "ZETA")]
    damping: Option<f64>,
    /// Enable debug logging of the solver stages.
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    env_logger::Builder::new()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logger: {}", e))?;

    let a = parse_matrix(&args.a).context("Failed to parse matrix A")?;
    let b = parse_matrix(&args.b).context("Failed to parse matrix B")?;

    let config = SolverConfig {
        symmetry: if args.strict_symmetry {
            SymmetryMode::Strict
        } else {
            SymmetryMode::Symmetrize
        },
        symmetry_tolerance: args.symmetry_tolerance,
        pivot_tolerance: args.pivot_tolerance,
        max_ql_iterations: args.max_iterations,
    };

    let spectrum = solve_with(&a, &b, &config).context("Eigenvalue analysis failed")?;
    let (values, vectors) = format_spectrum(&spectrum);
    println!("{values}");
    println!("{vectors}");

    if args.modal || args.damping.is_some() {
        let modal = ModalAnalysis::from_spectrum(&spectrum).context("Modal analysis failed")?;
        if args.modal {
            println!("{}", format_values(modal.angular_frequencies()));
            println!("{}", format_values(&modal.periods()));
        }
        if let Some(zeta) = args.damping {
            let last = modal.len() - 1;
            let damping = modal
                .rayleigh_damping(&a, &b, zeta, 0, last)
                .context("Failed to build the Rayleigh damping matrix")?;
            println!("{}", format_matrix(&damping));
        }
    }

    Ok(())
}
