//! Generalized symmetric-definite eigensolver.
//!
//! This crate solves the dense generalized eigenproblem
//!
//! $$\mathbf{A}\mathbf{v} = \lambda \mathbf{B}\mathbf{v},$$
//!
//! where $\mathbf{A}$ is real symmetric and $\mathbf{B}$ is real symmetric positive-definite,
//! returning every eigenvalue in ascending order together with eigenvectors normalized to
//! $\mathbf{v}^T\mathbf{B}\mathbf{v} = 1$.
//!
//! Storage is provided by the [`faer`] linear algebra framework; the numerical work is split into
//! independently testable kernels (see [`algorithms`]):
//!
//! 1. **Cholesky factorization** $\mathbf{B} = \mathbf{L}\mathbf{L}^T$.
//! 2. **Reduction** to the standard problem $\mathbf{C} = \mathbf{L}^{-1}\mathbf{A}\mathbf{L}^{-T}$
//!    by triangular solves (no explicit inverse).
//! 3. **Householder tridiagonalization** $\mathbf{C} = \mathbf{Q}\mathbf{T}\mathbf{Q}^T$.
//! 4. **Implicit QL iteration** with Wilkinson shifts on $\mathbf{T}$, accumulating rotations into
//!    $\mathbf{Q}$.
//! 5. **Back-transformation** $\mathbf{v} = \mathbf{L}^{-T}\mathbf{w}$.
//!
//! ## Example Usage
//!
//! A two-storey shear frame with stiffness matrix `K` and lumped mass matrix `M`. The
//! eigenvalues of the pencil `(K, M)` are the squared natural angular frequencies.
//!
//! ```rust
//! use geneig::{DenseMatrix, solve, solvers::{b_orthogonality_loss, max_scaled_residual}};
//!
//! let k = DenseMatrix::from_rows(&[[364.8, -182.4], [-182.4, 182.4]]).unwrap();
//! let m = DenseMatrix::from_rows(&[[0.407, 0.0], [0.0, 0.407]]).unwrap();
//!
//! let spectrum = solve(&k, &m).unwrap();
//! let values = spectrum.eigenvalues();
//! assert!(values[0] < values[1]);
//!
//! // Every pair satisfies K v = λ M v and the vectors are M-orthonormal.
//! assert!(max_scaled_residual(&k, &m, &spectrum) < 1e-12);
//! assert!(b_orthogonality_loss(&m, &spectrum) < 1e-12);
//! ```
//!
//! ## Conventions
//!
//! - Eigenvalues are sorted ascending; equal eigenvalues keep the order in which the QL
//!   iteration produced them.
//! - The sign of an eigenvector is mathematically arbitrary. This crate makes the
//!   largest-magnitude component positive so that repeated solves print identical output.
//! - Tolerances and the iteration cap are set through [`SolverConfig`].

pub mod algorithms;
pub mod error;
pub mod matrix;
pub mod modal;
pub mod solvers;
pub mod spectrum;
pub mod time_history;
pub mod utils;

// Re-export the main API for convenient access.
pub use error::{EigenError, EigenErrorKind};
pub use matrix::DenseMatrix;
pub use modal::ModalAnalysis;
pub use solvers::{SolverConfig, SymmetryMode, solve, solve_standard, solve_standard_with, solve_with};
pub use spectrum::{EigenPair, Spectrum};
pub use time_history::{NewmarkParams, ResponseHistory, ground_motion_response};
