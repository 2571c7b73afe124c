// src/eigen.rs

use crate::diagnostics::EigenDiagnostics;
use crate::error::PcaError;
use crate::linalg_backends::{BackendEigh, LinAlgBackendProvider};
use log::{debug, info, log_enabled, trace, warn, Level};
use ndarray::{Array1, Array2, ArrayView1, Axis};
use std::cmp::Ordering;
use std::time::Instant;

/// Rule deciding which eigenpairs of the descending-sorted spectrum are kept.
///
/// Every rule selects a prefix of the sorted spectrum. Percentages are fractions of the total
/// eigenvalue sum (0.07 means 7%); out-of-range percentages are clamped, never rejected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Selection {
    /// The `k` largest eigenpairs. `k` larger than the matrix side is a shape error.
    TopK(usize),
    /// The shortest prefix whose cumulative eigenvalue sum exceeds `p * total`.
    ///
    /// A negative (or NaN) `p` keeps every eigenpair, as does a `p` no prefix can exceed
    /// (`p >= 1`, or an all-zero spectrum). `p = 0` keeps one eigenpair when the largest
    /// eigenvalue is positive.
    CumulativeVariance(f64),
    /// Every eigenpair whose eigenvalue alone exceeds `p * total`.
    ///
    /// A negative (or NaN) `p` keeps every eigenpair; a `p` nothing reaches keeps none.
    IndividualShare(f64),
}

/// Sum of a spectrum accumulated front to back, in the order the selection rules walk it.
/// `ArrayBase::sum` uses a different summation order and can round to a different value.
fn spectrum_total(sorted_eigenvalues: ArrayView1<f64>) -> f64 {
    sorted_eigenvalues.iter().fold(0.0, |acc, &value| acc + value)
}

impl Selection {
    /// Number of leading eigenpairs this rule keeps from `sorted_eigenvalues`
    /// (descending, non-negative) whose sum is `total`.
    fn retained_count(&self, sorted_eigenvalues: ArrayView1<f64>, total: f64) -> usize {
        let available = sorted_eigenvalues.len();
        match *self {
            Selection::TopK(k) => k.min(available),
            Selection::CumulativeVariance(p) => {
                if p.is_nan() || p < 0.0 || p >= 1.0 {
                    return available;
                }
                let threshold = p * total;
                let mut cumulative = 0.0;
                for (i, &value) in sorted_eigenvalues.iter().enumerate() {
                    cumulative += value;
                    if cumulative > threshold {
                        return i + 1;
                    }
                }
                available
            }
            Selection::IndividualShare(p) => {
                if p.is_nan() || p < 0.0 {
                    return available;
                }
                let threshold = p * total;
                sorted_eigenvalues
                    .iter()
                    .take_while(|&&value| value > threshold)
                    .count()
            }
        }
    }
}

/// A selected set of eigenpairs of a covariance matrix, sorted by descending eigenvalue.
#[derive(Clone, Debug, PartialEq)]
pub struct Eigenbasis {
    /// Selected eigenvalues, descending. Shape: (k)
    eigenvalues: Array1<f64>,
    /// Unit eigenvectors as columns, matching `eigenvalues`. Shape: (d, k)
    eigenvectors: Array2<f64>,
    /// Sum of the full spectrum, selected or not.
    total_variance: f64,
}

impl Eigenbasis {
    pub fn eigenvalues(&self) -> &Array1<f64> {
        &self.eigenvalues
    }

    pub fn eigenvectors(&self) -> &Array2<f64> {
        &self.eigenvectors
    }

    /// The selected eigenvalues as a (k, k) diagonal matrix. Off-diagonal entries are exactly 0.
    pub fn lambda(&self) -> Array2<f64> {
        Array2::from_diag(&self.eigenvalues)
    }

    /// Number of selected eigenpairs.
    pub fn len(&self) -> usize {
        self.eigenvalues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eigenvalues.is_empty()
    }

    /// Sum of all eigenvalues of the decomposed matrix (its trace, up to rounding).
    pub fn total_variance(&self) -> f64 {
        self.total_variance
    }

    /// Fraction of the total variance explained by each selected eigenpair.
    /// All zeros when the spectrum is all zero.
    pub fn explained_variance_ratio(&self) -> Array1<f64> {
        if self.total_variance > 0.0 {
            self.eigenvalues.mapv(|v| v / self.total_variance)
        } else {
            Array1::zeros(self.eigenvalues.len())
        }
    }

    /// Splits into `(Lambda, U)`: the (k, k) diagonal eigenvalue matrix and the (d, k)
    /// eigenvector matrix.
    pub fn into_parts(self) -> (Array2<f64>, Array2<f64>) {
        (Array2::from_diag(&self.eigenvalues), self.eigenvectors)
    }
}

/// Eigendecomposes the symmetric matrix `s` and keeps the eigenpairs chosen by `selection`,
/// using the backend selected by cargo features.
///
/// # Errors
/// * [`PcaError::ShapeMismatch`] if `s` is not square, or `TopK(k)` asks for more eigenpairs
///   than `s` has rows.
/// * [`PcaError::Decomposition`] if `s` contains NaN or infinite entries, or the solver fails.
pub fn decompose(s: &Array2<f64>, selection: Selection) -> Result<Eigenbasis, PcaError> {
    decompose_with(&LinAlgBackendProvider::new(), s, selection)
}

/// Same as [`decompose`] with an explicit eigensolver backend.
pub fn decompose_with<B: BackendEigh>(
    backend: &B,
    s: &Array2<f64>,
    selection: Selection,
) -> Result<Eigenbasis, PcaError> {
    let (n_rows, n_cols) = s.dim();
    if n_rows != n_cols {
        return Err(PcaError::ShapeMismatch(format!(
            "covariance matrix must be square, got {} x {}",
            n_rows, n_cols
        )));
    }
    if let Selection::TopK(k) = selection {
        if k > n_rows {
            return Err(PcaError::ShapeMismatch(format!(
                "requested {} eigenpairs from a {} x {} matrix",
                k, n_rows, n_cols
            )));
        }
    }
    if s.iter().any(|v| !v.is_finite()) {
        return Err(PcaError::Decomposition(
            "matrix contains NaN or infinite entries".to_string(),
        ));
    }

    let start = Instant::now();
    let raw = backend
        .eigh_upper(s)
        .map_err(|e| PcaError::Decomposition(e.to_string()))?;
    info!(
        "Eigendecomposed {} x {} matrix with {} in {:?}",
        n_rows,
        n_cols,
        backend.name(),
        start.elapsed()
    );

    // Stable sort: equal eigenvalues keep the solver's order.
    let mut order: Vec<usize> = (0..raw.eigenvalues.len()).collect();
    order.sort_by(|&a, &b| {
        raw.eigenvalues[b]
            .partial_cmp(&raw.eigenvalues[a])
            .unwrap_or(Ordering::Equal)
    });

    // A PSD matrix has no negative eigenvalues; rounding can still produce tiny ones.
    let sorted_eigenvalues: Array1<f64> = order
        .iter()
        .map(|&i| raw.eigenvalues[i].max(0.0))
        .collect();
    let total_variance = spectrum_total(sorted_eigenvalues.view());
    if n_rows > 0 && total_variance <= 0.0 {
        warn!("Matrix has an all-zero spectrum; eigenvectors are arbitrary.");
    }

    let keep = selection.retained_count(sorted_eigenvalues.view(), total_variance);
    trace!("Selection {:?} retains {} of {} eigenpairs", selection, keep, n_rows);

    let eigenvalues = sorted_eigenvalues.slice_move(ndarray::s![..keep]);
    let mut eigenvectors = raw.eigenvectors.select(Axis(1), &order[..keep]);
    for mut column in eigenvectors.columns_mut() {
        let norm = column.dot(&column).sqrt();
        if norm > 1e-9 {
            column.mapv_inplace(|x| x / norm);
        }
    }

    let basis = Eigenbasis {
        eigenvalues,
        eigenvectors,
        total_variance,
    };

    debug!(
        "Selected {} of {} eigenpairs ({:?}), explaining {:.4} of the total variance {:.6e}",
        basis.len(),
        n_rows,
        selection,
        basis.explained_variance_ratio().sum(),
        total_variance
    );
    if log_enabled!(Level::Debug) {
        debug!("{:?}", EigenDiagnostics::collect(s, &basis));
    }

    Ok(basis)
}

/// The `k` largest eigenpairs of `s` as `(Lambda, U)`: Lambda is (k, k) diagonal with
/// descending eigenvalues, U is (d, k) with the matching unit eigenvectors as columns.
///
/// # Errors
/// [`PcaError::ShapeMismatch`] if `s` is not square or `k > d`; [`PcaError::Decomposition`]
/// if the eigensolver fails.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use digit_pca::get_eig;
///
/// let s = array![[2.0, 0.0], [0.0, 5.0]];
/// let (lambda, u) = get_eig(&s, 1).unwrap();
/// assert_eq!(lambda.dim(), (1, 1));
/// assert!((lambda[[0, 0]] - 5.0).abs() < 1e-12);
/// assert_eq!(u.dim(), (2, 1));
/// ```
pub fn get_eig(s: &Array2<f64>, k: usize) -> Result<(Array2<f64>, Array2<f64>), PcaError> {
    decompose(s, Selection::TopK(k)).map(Eigenbasis::into_parts)
}

/// The shortest descending prefix of eigenpairs whose eigenvalues sum to more than
/// `p` times the total variance, as `(Lambda, U)`.
///
/// `p < 0` and `p >= 1` both select the full spectrum; see [`Selection::CumulativeVariance`].
pub fn get_eig_perc(s: &Array2<f64>, p: f64) -> Result<(Array2<f64>, Array2<f64>), PcaError> {
    decompose(s, Selection::CumulativeVariance(p)).map(Eigenbasis::into_parts)
}

/// Every eigenpair whose eigenvalue on its own exceeds `p` times the total variance,
/// as `(Lambda, U)`. See [`Selection::IndividualShare`].
pub fn get_eig_share(s: &Array2<f64>, p: f64) -> Result<(Array2<f64>, Array2<f64>), PcaError> {
    decompose(s, Selection::IndividualShare(p)).map(Eigenbasis::into_parts)
}
