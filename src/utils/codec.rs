//! Delimited-text encoding of matrices and spectra.
//!
//! A matrix is written row by row: rows are separated by `;`, entries within a row by `,`,
//! and whitespace around either delimiter is ignored. A single trailing `;` is accepted.
//!
//! ```text
//! 364.8,-182.4;-182.4,182.4
//! ```
//!
//! A spectrum is written as two comma-joined lines: the ascending eigenvalues, then the
//! eigenvector matrix (eigenvectors as columns) flattened in row-major order.

use crate::{error::EigenError, matrix::DenseMatrix, spectrum::Spectrum};
use thiserror::Error;

/// Represents all possible errors that can occur while decoding a matrix.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The input contains no rows.
    #[error("Format error: the matrix text is empty.")]
    Empty,
    /// A row between two `;` delimiters contains nothing.
    #[error("Format error: row {row} is empty.")]
    EmptyRow { row: usize },
    /// An entry is not a valid floating point number.
    #[error("Parse error: failed to parse float from '{token}' at row {row}, column {col}.")]
    ParseFloat {
        row: usize,
        col: usize,
        token: String,
    },
    /// Rows have different lengths.
    #[error("Format error: row {row} has {actual} entries, expected {expected}.")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// The decoded values do not form a valid matrix (e.g. not square).
    #[error("Invalid matrix: {0}")]
    Matrix(#[from] EigenError),
}

/// Decodes a matrix from its delimited-text form.
pub fn parse_matrix(text: &str) -> Result<DenseMatrix, CodecError> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed);
    if trimmed.trim().is_empty() {
        return Err(CodecError::Empty);
    }

    let mut rows: Vec<Vec<f64>> = Vec::new();
    for (row, line) in trimmed.split(';').enumerate() {
        if line.trim().is_empty() {
            return Err(CodecError::EmptyRow { row });
        }
        let values = line
            .split(',')
            .enumerate()
            .map(|(col, token)| {
                let token = token.trim();
                token.parse::<f64>().map_err(|_| CodecError::ParseFloat {
                    row,
                    col,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, CodecError>>()?;

        if let Some(first) = rows.first() {
            if first.len() != values.len() {
                return Err(CodecError::RaggedRow {
                    row,
                    expected: first.len(),
                    actual: values.len(),
                });
            }
        }
        rows.push(values);
    }

    Ok(DenseMatrix::from_rows(&rows)?)
}

/// Encodes a matrix in the delimited-text form accepted by [`parse_matrix`].
pub fn format_matrix(matrix: &DenseMatrix) -> String {
    let n = matrix.dim();
    matrix
        .to_row_major()
        .chunks(n)
        .map(format_values)
        .collect::<Vec<_>>()
        .join(";")
}

/// Joins values with `,` using the shortest representation that round-trips.
pub fn format_values(values: &[f64]) -> String {
    values
        .iter()
        .map(f64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Formats a spectrum as `(eigenvalue line, eigenvector line)`.
pub fn format_spectrum(spectrum: &Spectrum) -> (String, String) {
    let n = spectrum.len();
    let vectors = spectrum.eigenvectors();
    let flattened: Vec<f64> = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .map(|(i, j)| vectors[(i, j)])
        .collect();
    (
        format_values(&spectrum.eigenvalues()),
        format_values(&flattened),
    )
}
