//! This module defines the custom error types for the library.
//!
//! Every failure that can occur while solving a generalized symmetric-definite
//! eigenproblem is collected into a single enum, [`EigenErrorKind`], and surfaced
//! through the public wrapper [`EigenError`]. None of these conditions are retried or
//! converted into NaN results: they are mathematical preconditions of the problem, not
//! transient faults.
//!
//! Using the [`thiserror`] crate allows us to create idiomatic error types with minimal
//! boilerplate.
use thiserror::Error;

/// Represents all possible errors that can occur while building matrices or
/// solving an eigenproblem.
///
/// The distinct failure is available through [`EigenError::kind`].
#[derive(Error, Debug, Clone)]
#[error(transparent)]
pub struct EigenError(#[from] EigenErrorKind);

impl EigenError {
    /// Returns the specific kind of failure.
    pub fn kind(&self) -> &EigenErrorKind {
        &self.0
    }
}

/// The distinct kinds of errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EigenErrorKind {
    /// The two input matrices of the pencil `(A, B)` do not have the same dimension.
    #[error("Dimension mismatch: A is {a}x{a} but B is {b}x{b}.")]
    DimensionMismatch { a: usize, b: usize },

    /// A matrix was constructed or supplied with a different number of rows and columns.
    #[error("Matrix is not square: {rows} rows and {cols} columns.")]
    NotSquare { rows: usize, cols: usize },

    /// A matrix with zero rows was supplied.
    #[error("Matrix is empty: at least a 1x1 matrix is required.")]
    Empty,

    /// The flat data supplied to a constructor has the wrong length.
    #[error("Invalid matrix data: expected {expected} entries, got {actual}.")]
    InvalidData { expected: usize, actual: usize },

    /// An entry is NaN or infinite.
    #[error("Matrix entry ({row}, {col}) is not finite.")]
    NonFinite { row: usize, col: usize },

    /// Element access outside `[0, n)`.
    #[error("Index ({row}, {col}) is out of range for a {dim}x{dim} matrix.")]
    IndexOutOfRange { row: usize, col: usize, dim: usize },

    /// An input matrix deviates from symmetry by more than the configured tolerance
    /// while strict symmetry checking is enabled.
    #[error(
        "Matrix {matrix} is not symmetric: entries ({row}, {col}) and ({col}, {row}) differ by {deviation:e}."
    )]
    NotSymmetric {
        matrix: char,
        row: usize,
        col: usize,
        deviation: f64,
    },

    /// The Cholesky factorization of `B` met a non-positive pivot.
    #[error("Matrix B is not positive definite: pivot {pivot} has value {value:e}.")]
    NotPositiveDefinite { pivot: usize, value: f64 },

    /// The implicit QL iteration exceeded its iteration cap on a deflation block.
    #[error(
        "Implicit QL iteration failed to converge for the block starting at index {block} after {iterations} iterations."
    )]
    ConvergenceFailure { block: usize, iterations: usize },

    /// Indicates that an invalid input parameter was provided to a function.
    #[error("Invalid input parameter: {0}")]
    InputError(String),
}

// Manually implement PartialEq for the public error type.
// We compare the inner `EigenErrorKind`.
impl PartialEq for EigenError {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialEq<EigenErrorKind> for EigenError {
    fn eq(&self, other: &EigenErrorKind) -> bool {
        &self.0 == other
    }
}
