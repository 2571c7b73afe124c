// src/covariance.rs

use crate::error::PcaError;
use log::{debug, info};
use ndarray::Array2;
use std::time::Instant;

/// Sample covariance `S = XᵀX / (n - 1)` of a column-centered (n_samples, n_features) matrix.
///
/// The result is (n_features, n_features) and exactly symmetric: the product is averaged with
/// its transpose, so `S[[i, j]] == S[[j, i]]` holds bit for bit. Diagonal entries are sums of
/// squares and therefore non-negative. `x` is not re-centered here.
///
/// # Errors
/// Returns [`PcaError::InsufficientSamples`] when `x` has fewer than 2 rows.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use digit_pca::get_covariance;
///
/// let x = array![[-1.0, 2.0], [1.0, -2.0]];
/// let s = get_covariance(&x).unwrap();
/// assert_eq!(s, array![[2.0, -4.0], [-4.0, 8.0]]);
/// ```
pub fn get_covariance(x: &Array2<f64>) -> Result<Array2<f64>, PcaError> {
    let n_samples = x.nrows();
    if n_samples < 2 {
        return Err(PcaError::InsufficientSamples { n_samples });
    }

    let start = Instant::now();
    let mut cov_matrix = x.t().dot(x);
    cov_matrix /= (n_samples - 1) as f64;

    // Blocked GEMM kernels may round the two triangles differently.
    let transposed = cov_matrix.t().to_owned();
    cov_matrix += &transposed;
    cov_matrix *= 0.5;

    info!(
        "Built {} x {} covariance matrix from {} samples in {:?}",
        cov_matrix.nrows(),
        cov_matrix.ncols(),
        n_samples,
        start.elapsed()
    );
    debug!(
        "Covariance trace (total variance): {:.6e}",
        cov_matrix.diag().sum()
    );
    Ok(cov_matrix)
}
