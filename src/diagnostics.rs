// src/diagnostics.rs

use crate::eigen::Eigenbasis;
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// Numeric health of one eigendecomposition, logged at debug level by [`crate::decompose`].
#[derive(Debug, Clone, Default)]
pub struct EigenDiagnostics {
    pub matrix_dims: (usize, usize),
    pub selected_components: usize,
    /// max |S - Sᵀ|
    pub symmetry_error: f64,
    /// ||I - UᵀU||_F, `None` for an empty selection.
    pub orthogonality_error: Option<f64>,
    /// ||SU - UΛ||_F / ||S||_F, `None` for an empty selection.
    pub eigen_residual_rel: Option<f64>,
    pub total_variance: f64,
    pub explained_variance: f64,
    pub eigenvalues_sample: Vec<f64>,
}

impl EigenDiagnostics {
    pub fn collect(s: &Array2<f64>, basis: &Eigenbasis) -> Self {
        let u = basis.eigenvectors().view();
        let lambda = basis.lambda();
        Self {
            matrix_dims: s.dim(),
            selected_components: basis.len(),
            symmetry_error: compute_symmetry_error(&s.view()),
            orthogonality_error: compute_orthogonality_error(&u),
            eigen_residual_rel: compute_eigen_residual(&s.view(), &lambda.view(), &u),
            total_variance: basis.total_variance(),
            explained_variance: basis.explained_variance_ratio().sum(),
            eigenvalues_sample: sample_eigenvalues(&basis.eigenvalues().view(), 5),
        }
    }
}

/// Frobenius norm.
pub fn compute_frob_norm(matrix: &ArrayView2<f64>) -> f64 {
    if matrix.is_empty() {
        return 0.0;
    }
    matrix.iter().map(|&x| x * x).sum::<f64>().sqrt()
}

/// Largest absolute difference between `s` and its transpose. Non-square input is infinitely
/// asymmetric.
pub fn compute_symmetry_error(s: &ArrayView2<f64>) -> f64 {
    if s.nrows() != s.ncols() {
        return f64::INFINITY;
    }
    s.iter()
        .zip(s.t().iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}

/// ||I - UᵀU||_F.
pub fn compute_orthogonality_error(u: &ArrayView2<f64>) -> Option<f64> {
    if u.nrows() == 0 || u.ncols() == 0 {
        return None;
    }
    let utu = u.t().dot(u);
    let diff = Array2::<f64>::eye(utu.nrows()) - utu;
    Some(compute_frob_norm(&diff.view()))
}

/// Relative residual of the eigen equation, ||SU - UΛ||_F / ||S||_F.
pub fn compute_eigen_residual(
    s: &ArrayView2<f64>,
    lambda: &ArrayView2<f64>,
    u: &ArrayView2<f64>,
) -> Option<f64> {
    if u.ncols() == 0 {
        return None;
    }
    if s.ncols() != u.nrows() || u.ncols() != lambda.nrows() || lambda.nrows() != lambda.ncols() {
        return None;
    }
    let diff = s.dot(u) - u.dot(lambda);
    let norm_diff = compute_frob_norm(&diff.view());
    let norm_s = compute_frob_norm(s);
    if norm_s < 1e-12 {
        if norm_diff < 1e-12 {
            Some(0.0)
        } else {
            Some(f64::INFINITY)
        }
    } else {
        Some(norm_diff / norm_s)
    }
}

/// Largest |column sum| of `x`; zero for a column-centered matrix.
pub fn max_abs_column_sum(x: &ArrayView2<f64>) -> f64 {
    x.sum_axis(Axis(0))
        .iter()
        .map(|v| v.abs())
        .fold(0.0, f64::max)
}

/// Picks `count` values evenly spaced over `values`, always including the first and last.
pub fn sample_eigenvalues(values: &ArrayView1<f64>, count: usize) -> Vec<f64> {
    let len = values.len();
    if len == 0 || count == 0 {
        return Vec::new();
    }
    if count >= len {
        return values.to_vec();
    }
    if count == 1 {
        return vec![values[0]];
    }
    (0..count)
        .map(|i| {
            let idx = (i as f64 * (len - 1) as f64 / (count - 1) as f64).round() as usize;
            values[idx.min(len - 1)]
        })
        .collect()
}
