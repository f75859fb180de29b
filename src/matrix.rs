//! This module defines the dense square matrix type that flows through the solver pipeline.
//!
//! [`DenseMatrix`] is a thin, bounds-checked wrapper over a [`faer::Mat<f64>`]. The
//! numerical kernels in [`crate::algorithms`] work on the underlying `faer` storage
//! directly; the wrapper exists to enforce the invariants every matrix in the pipeline
//! shares:
//!
//! 1.  **Square and non-empty**: `n >= 1` and the row count equals the column count.
//! 2.  **Finite**: no NaN or infinite entry is ever accepted into a solve.
//! 3.  **Checked access**: [`DenseMatrix::get`] and [`DenseMatrix::set`] return
//!     [`EigenErrorKind::IndexOutOfRange`] instead of panicking.
//!
//! Rows and columns are exposed as lazy, restartable iterators of length `n`.

use crate::error::{EigenError, EigenErrorKind};
use faer::{Mat, MatRef};

/// A dense, real, square matrix of dimension `n x n`.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix {
    inner: Mat<f64>,
}

impl DenseMatrix {
    /// Creates an `n x n` matrix filled with zeros.
    pub fn zeros(n: usize) -> Result<Self, EigenError> {
        if n == 0 {
            return Err(EigenErrorKind::Empty.into());
        }
        Ok(Self {
            inner: Mat::zeros(n, n),
        })
    }

    /// Creates the `n x n` identity matrix.
    pub fn identity(n: usize) -> Result<Self, EigenError> {
        if n == 0 {
            return Err(EigenErrorKind::Empty.into());
        }
        Ok(Self {
            inner: Mat::identity(n, n),
        })
    }

    /// Builds a matrix from a nested sequence of rows.
    ///
    /// Every row must have exactly as many entries as there are rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, EigenError> {
        let n = rows.len();
        if n == 0 {
            return Err(EigenErrorKind::Empty.into());
        }
        if let Some(row) = rows.iter().find(|row| row.as_ref().len() != n) {
            return Err(EigenErrorKind::NotSquare {
                rows: n,
                cols: row.as_ref().len(),
            }
            .into());
        }
        Self::from_faer(Mat::from_fn(n, n, |i, j| rows[i].as_ref()[j]))
    }

    /// Builds an `n x n` matrix from a flat slice stored in row-major order.
    pub fn from_row_major(n: usize, data: &[f64]) -> Result<Self, EigenError> {
        check_flat_len(n, data)?;
        Self::from_faer(Mat::from_fn(n, n, |i, j| data[i * n + j]))
    }

    /// Builds an `n x n` matrix from a flat slice stored in column-major order.
    pub fn from_col_major(n: usize, data: &[f64]) -> Result<Self, EigenError> {
        check_flat_len(n, data)?;
        Self::from_faer(Mat::from_fn(n, n, |i, j| data[j * n + i]))
    }

    /// Wraps an existing `faer` matrix after validating the shared invariants.
    pub fn from_faer(inner: Mat<f64>) -> Result<Self, EigenError> {
        if inner.nrows() == 0 || inner.ncols() == 0 {
            return Err(EigenErrorKind::Empty.into());
        }
        if inner.nrows() != inner.ncols() {
            return Err(EigenErrorKind::NotSquare {
                rows: inner.nrows(),
                cols: inner.ncols(),
            }
            .into());
        }
        let n = inner.nrows();
        for j in 0..n {
            for i in 0..n {
                if !inner[(i, j)].is_finite() {
                    return Err(EigenErrorKind::NonFinite { row: i, col: j }.into());
                }
            }
        }
        Ok(Self { inner })
    }

    /// Returns the dimension `n`.
    #[inline]
    pub fn dim(&self) -> usize {
        self.inner.nrows()
    }

    /// Returns the entry at `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> Result<f64, EigenError> {
        self.check_index(i, j)?;
        Ok(self.inner[(i, j)])
    }

    /// Overwrites the entry at `(i, j)`.
    ///
    /// Non-finite values are rejected so that the matrix stays valid for solving.
    pub fn set(&mut self, i: usize, j: usize, value: f64) -> Result<(), EigenError> {
        self.check_index(i, j)?;
        if !value.is_finite() {
            return Err(EigenErrorKind::NonFinite { row: i, col: j }.into());
        }
        self.inner[(i, j)] = value;
        Ok(())
    }

    /// Returns row `i` as a lazy sequence of `n` values.
    pub fn row(
        &self,
        i: usize,
    ) -> Result<impl ExactSizeIterator<Item = f64> + Clone + '_, EigenError> {
        self.check_index(i, 0)?;
        Ok((0..self.dim()).map(move |j| self.inner[(i, j)]))
    }

    /// Returns column `j` as a lazy sequence of `n` values.
    pub fn col(
        &self,
        j: usize,
    ) -> Result<impl ExactSizeIterator<Item = f64> + Clone + '_, EigenError> {
        self.check_index(0, j)?;
        Ok((0..self.dim()).map(move |i| self.inner[(i, j)]))
    }

    /// Returns the entries in row-major order.
    pub fn to_row_major(&self) -> Vec<f64> {
        let n = self.dim();
        (0..n)
            .flat_map(|i| (0..n).map(move |j| self.inner[(i, j)]))
            .collect()
    }

    /// Finds the largest violation of symmetry, `|M[i][j] - M[j][i]|`.
    ///
    /// Returns `(i, j, deviation)` with `i < j`, or `(0, 0, 0.0)` for a symmetric matrix.
    pub fn max_asymmetry(&self) -> (usize, usize, f64) {
        let n = self.dim();
        let mut worst = (0, 0, 0.0);
        for j in 0..n {
            for i in 0..j {
                let deviation = (self.inner[(i, j)] - self.inner[(j, i)]).abs();
                if deviation > worst.2 {
                    worst = (i, j, deviation);
                }
            }
        }
        worst
    }

    /// Returns the largest absolute entry.
    pub fn max_abs(&self) -> f64 {
        let n = self.dim();
        let mut max = 0.0_f64;
        for j in 0..n {
            for i in 0..n {
                max = max.max(self.inner[(i, j)].abs());
            }
        }
        max
    }

    /// Checks whether the matrix is symmetric within `tolerance`, relative to its
    /// largest entry (or absolute when all entries are below one).
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        self.max_asymmetry().2 <= tolerance * self.max_abs().max(1.0)
    }

    /// Replaces the matrix by `(M + M^T) / 2`.
    pub fn symmetrize(&mut self) {
        let n = self.dim();
        for j in 0..n {
            for i in 0..j {
                let mean = 0.5 * (self.inner[(i, j)] + self.inner[(j, i)]);
                self.inner[(i, j)] = mean;
                self.inner[(j, i)] = mean;
            }
        }
    }

    /// Computes the product `M x` for a vector of length `n`.
    ///
    /// # Panics
    ///
    /// Panics if `x` does not have `n` entries.
    pub fn apply(&self, x: &[f64]) -> Vec<f64> {
        let n = self.dim();
        assert_eq!(
            n,
            x.len(),
            "Dimension mismatch: matrix columns ({}) do not match vector length ({}).",
            n,
            x.len(),
        );
        (0..n)
            .map(|i| (0..n).map(|j| self.inner[(i, j)] * x[j]).sum())
            .collect()
    }

    /// Returns an immutable `faer` view of the storage.
    #[inline]
    pub fn as_faer(&self) -> MatRef<'_, f64> {
        self.inner.as_ref()
    }

    /// Consumes the wrapper and returns the underlying `faer` matrix.
    #[inline]
    pub fn into_inner(self) -> Mat<f64> {
        self.inner
    }

    fn check_index(&self, i: usize, j: usize) -> Result<(), EigenError> {
        let dim = self.dim();
        if i >= dim || j >= dim {
            return Err(EigenErrorKind::IndexOutOfRange { row: i, col: j, dim }.into());
        }
        Ok(())
    }
}

fn check_flat_len(n: usize, data: &[f64]) -> Result<(), EigenError> {
    if n == 0 {
        return Err(EigenErrorKind::Empty.into());
    }
    if data.len() != n * n {
        return Err(EigenErrorKind::InvalidData {
            expected: n * n,
            actual: data.len(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::mat;

    #[test]
    fn test_constructors_agree() {
        let rows = DenseMatrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        let row_major = DenseMatrix::from_row_major(2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let col_major = DenseMatrix::from_col_major(2, &[1.0, 3.0, 2.0, 4.0]).unwrap();
        let faer = DenseMatrix::from_faer(mat![[1.0, 2.0], [3.0, 4.0]]).unwrap();

        assert_eq!(rows, row_major);
        assert_eq!(rows, col_major);
        assert_eq!(rows, faer);
        assert_eq!(rows.to_row_major(), vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_invalid_shapes_are_rejected() {
        let empty: [[f64; 0]; 0] = [];
        assert_eq!(
            DenseMatrix::from_rows(&empty).unwrap_err(),
            EigenErrorKind::Empty
        );
        assert_eq!(
            DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]).unwrap_err(),
            EigenErrorKind::NotSquare { rows: 2, cols: 1 }
        );
        assert_eq!(
            DenseMatrix::from_row_major(2, &[1.0, 2.0, 3.0]).unwrap_err(),
            EigenErrorKind::InvalidData {
                expected: 4,
                actual: 3
            }
        );
        assert_eq!(
            DenseMatrix::from_faer(Mat::zeros(2, 3)).unwrap_err(),
            EigenErrorKind::NotSquare { rows: 2, cols: 3 }
        );
        assert_eq!(
            DenseMatrix::from_rows(&[[1.0, f64::NAN], [0.0, 1.0]]).unwrap_err(),
            EigenErrorKind::NonFinite { row: 0, col: 1 }
        );
    }

    #[test]
    fn test_checked_access() {
        let mut m = DenseMatrix::zeros(2).unwrap();
        m.set(1, 0, 5.0).unwrap();
        assert_eq!(m.get(1, 0).unwrap(), 5.0);
        assert_eq!(
            m.get(2, 0).unwrap_err(),
            EigenErrorKind::IndexOutOfRange {
                row: 2,
                col: 0,
                dim: 2
            }
        );
        assert_eq!(
            m.set(0, 7, 1.0).unwrap_err(),
            EigenErrorKind::IndexOutOfRange {
                row: 0,
                col: 7,
                dim: 2
            }
        );
        assert!(m.set(0, 0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_row_and_col_are_restartable() {
        let m = DenseMatrix::from_rows(&[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]])
            .unwrap();
        let row = m.row(1).unwrap();
        assert_eq!(row.len(), 3);
        assert_eq!(row.clone().collect::<Vec<_>>(), vec![4.0, 5.0, 6.0]);
        assert_eq!(row.sum::<f64>(), 15.0);
        assert_eq!(m.col(2).unwrap().collect::<Vec<_>>(), vec![3.0, 6.0, 9.0]);
        assert!(m.row(3).is_err());
        assert!(m.col(3).is_err());
    }

    #[test]
    fn test_symmetry_helpers() {
        let mut m = DenseMatrix::from_rows(&[[2.0, 1.0], [1.5, 3.0]]).unwrap();
        assert_eq!(m.max_asymmetry(), (0, 1, 0.5));
        assert!(!m.is_symmetric(1e-10));

        m.symmetrize();
        assert_eq!(m.get(0, 1).unwrap(), 1.25);
        assert_eq!(m.get(1, 0).unwrap(), 1.25);
        assert!(m.is_symmetric(0.0));
    }

    #[test]
    fn test_apply() {
        let m = DenseMatrix::from_rows(&[[2.0, -1.0], [-1.0, 2.0]]).unwrap();
        assert_eq!(m.apply(&[1.0, 2.0]), vec![0.0, 3.0]);
    }

    #[test]
    #[should_panic(
        expected = "Dimension mismatch: matrix columns (2) do not match vector length (3)."
    )]
    fn test_apply_dimension_mismatch_panic() {
        let m = DenseMatrix::identity(2).unwrap();
        m.apply(&[1.0, 2.0, 3.0]);
    }
}
