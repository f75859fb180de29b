//! Structural modal analysis on top of a generalized eigen-solution.
//!
//! For a structure with stiffness matrix `K` and mass matrix `M`, free vibration satisfies
//! `K φ = ω² M φ`. Solving the pencil `(K, M)` therefore yields the squared angular natural
//! frequencies as eigenvalues and the mode shapes as eigenvectors. This module turns a
//! [`Spectrum`] into those engineering quantities and builds a Rayleigh damping matrix
//! `C = a0 M + a1 K` from two target modes.

use crate::{
    error::{EigenError, EigenErrorKind},
    matrix::DenseMatrix,
    solvers::solve,
    spectrum::Spectrum,
};
use faer::Mat;
use std::f64::consts::PI;

/// Natural frequencies and mode shapes of a structure.
#[derive(Debug, Clone)]
pub struct ModalAnalysis {
    angular_frequencies: Vec<f64>,
    modal_matrix: Mat<f64>,
}

impl ModalAnalysis {
    /// Solves `K φ = ω² M φ` and derives the modal quantities.
    pub fn from_matrices(
        stiffness: &DenseMatrix,
        mass: &DenseMatrix,
    ) -> Result<Self, EigenError> {
        let spectrum = solve(stiffness, mass)?;
        Self::from_spectrum(&spectrum)
    }

    /// Derives the modal quantities from an existing spectrum of `(K, M)`.
    ///
    /// Eigenvalues slightly below zero (within round-off of the largest eigenvalue) are
    /// treated as rigid-body modes with `ω = 0`; clearly negative ones mean `K` is not
    /// positive semi-definite and are rejected.
    pub fn from_spectrum(spectrum: &Spectrum) -> Result<Self, EigenError> {
        let n = spectrum.len();
        if n == 0 {
            return Err(EigenErrorKind::Empty.into());
        }
        let largest = spectrum
            .iter()
            .fold(0.0_f64, |acc, pair| acc.max(pair.value.abs()));
        let floor = -(n as f64) * f64::EPSILON * largest.max(1.0);

        let mut angular_frequencies = Vec::with_capacity(n);
        for (mode, pair) in spectrum.iter().enumerate() {
            if pair.value < floor {
                return Err(EigenErrorKind::InputError(format!(
                    "mode {mode} has negative eigenvalue {:e}; the stiffness matrix is not positive semi-definite",
                    pair.value
                ))
                .into());
            }
            angular_frequencies.push(pair.value.max(0.0).sqrt());
        }

        let mut modal_matrix = spectrum.eigenvectors();
        for j in 0..n {
            let column: Vec<f64> = (0..n).map(|i| modal_matrix[(i, j)]).collect();
            let reference = reference_component(&column);
            for i in 0..n {
                modal_matrix[(i, j)] /= reference;
            }
        }

        Ok(Self {
            angular_frequencies,
            modal_matrix,
        })
    }

    /// Number of modes.
    pub fn len(&self) -> usize {
        self.angular_frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angular_frequencies.is_empty()
    }

    /// Angular natural frequencies `ω_i` in rad per unit time, ascending.
    pub fn angular_frequencies(&self) -> &[f64] {
        &self.angular_frequencies
    }

    /// Cyclic natural frequencies `ω_i / 2π`.
    pub fn frequencies(&self) -> Vec<f64> {
        self.angular_frequencies.iter().map(|w| w / (2.0 * PI)).collect()
    }

    /// Natural periods `2π / ω_i`; infinite for rigid-body modes.
    pub fn periods(&self) -> Vec<f64> {
        self.angular_frequencies
            .iter()
            .map(|&w| if w > 0.0 { 2.0 * PI / w } else { f64::INFINITY })
            .collect()
    }

    /// Mode shapes as columns, each scaled so its first component is one.
    ///
    /// A mode whose first component is numerically zero is scaled by its largest-magnitude
    /// component instead.
    pub fn modal_matrix(&self) -> &Mat<f64> {
        &self.modal_matrix
    }

    /// Rayleigh coefficients `(a0, a1)` giving damping ratio `zeta` in modes `i` and `j`:
    ///
    /// ```text
    /// a0 = 2 ζ ω_i ω_j / (ω_i + ω_j)    (mass proportional)
    /// a1 = 2 ζ / (ω_i + ω_j)            (stiffness proportional)
    /// ```
    pub fn rayleigh_coefficients(
        &self,
        zeta: f64,
        i: usize,
        j: usize,
    ) -> Result<(f64, f64), EigenError> {
        if !(zeta.is_finite() && zeta >= 0.0) {
            return Err(EigenErrorKind::InputError(format!(
                "damping ratio must be finite and non-negative, got {zeta}"
            ))
            .into());
        }
        let n = self.len();
        let (w_i, w_j) = match (self.angular_frequencies.get(i), self.angular_frequencies.get(j)) {
            (Some(&w_i), Some(&w_j)) => (w_i, w_j),
            _ => {
                return Err(EigenErrorKind::InputError(format!(
                    "mode indices ({i}, {j}) out of range for {n} modes"
                ))
                .into());
            }
        };
        let sum = w_i + w_j;
        if sum <= 0.0 {
            return Err(EigenErrorKind::InputError(format!(
                "modes {i} and {j} are both rigid-body modes"
            ))
            .into());
        }
        Ok((2.0 * zeta * w_i * w_j / sum, 2.0 * zeta / sum))
    }

    /// Builds the Rayleigh damping matrix `C = a0 M + a1 K`.
    pub fn rayleigh_damping(
        &self,
        stiffness: &DenseMatrix,
        mass: &DenseMatrix,
        zeta: f64,
        i: usize,
        j: usize,
    ) -> Result<DenseMatrix, EigenError> {
        if stiffness.dim() != mass.dim() {
            return Err(EigenErrorKind::DimensionMismatch {
                a: stiffness.dim(),
                b: mass.dim(),
            }
            .into());
        }
        let (a0, a1) = self.rayleigh_coefficients(zeta, i, j)?;
        let (k, m) = (stiffness.as_faer(), mass.as_faer());
        let n = stiffness.dim();
        DenseMatrix::from_faer(Mat::from_fn(n, n, |r, c| a0 * m[(r, c)] + a1 * k[(r, c)]))
    }
}

/// The component a mode shape is scaled by: the first one unless it is numerically zero.
fn reference_component(column: &[f64]) -> f64 {
    let largest = column
        .iter()
        .fold(0.0_f64, |acc, &x| if x.abs() > acc.abs() { x } else { acc });
    match column.first() {
        Some(&first) if first.abs() > f64::EPSILON.sqrt() * largest.abs() => first,
        _ if largest != 0.0 => largest,
        _ => 1.0,
    }
}
