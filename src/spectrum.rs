//! The result of a solve: eigenvalue / eigenvector pairs sorted by eigenvalue.

use faer::Mat;

/// One solution `(λ, v)` of `A v = λ B v`.
///
/// The eigenvector is normalized so that `v^T B v = 1`. Its sign is mathematically
/// arbitrary; the solver fixes it by making the largest-magnitude component positive.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenPair {
    pub value: f64,
    pub vector: Vec<f64>,
}

/// All `n` eigenpairs of a pencil, sorted ascending by eigenvalue.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spectrum {
    pairs: Vec<EigenPair>,
}

impl Spectrum {
    /// Wraps pairs that are already sorted ascending.
    pub(crate) fn from_sorted(pairs: Vec<EigenPair>) -> Self {
        debug_assert!(pairs.windows(2).all(|w| w[0].value <= w[1].value));
        Self { pairs }
    }

    /// Number of eigenpairs, equal to the problem dimension.
    #[inline]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[inline]
    pub fn pairs(&self) -> &[EigenPair] {
        &self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EigenPair> {
        self.pairs.iter()
    }

    /// Returns the eigenvalues in ascending order.
    pub fn eigenvalues(&self) -> Vec<f64> {
        self.pairs.iter().map(|pair| pair.value).collect()
    }

    /// Returns the `n x n` matrix whose column `j` is the `j`-th eigenvector.
    pub fn eigenvectors(&self) -> Mat<f64> {
        let n = self.pairs.len();
        Mat::from_fn(n, n, |i, j| self.pairs[j].vector[i])
    }

    pub fn into_pairs(self) -> Vec<EigenPair> {
        self.pairs
    }
}

impl IntoIterator for Spectrum {
    type Item = EigenPair;
    type IntoIter = std::vec::IntoIter<EigenPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a> IntoIterator for &'a Spectrum {
    type Item = &'a EigenPair;
    type IntoIter = std::slice::Iter<'a, EigenPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
