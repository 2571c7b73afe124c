// src/linalg_backends.rs

use ndarray::{Array1, Array2};
use std::error::Error;

/// Error type returned by the backends; converted into `PcaError` by the callers.
pub type BackendError = Box<dyn Error + Send + Sync>;

/// Output of a symmetric eigendecomposition.
#[derive(Debug)]
pub struct EighOutput {
    /// Eigenvalues in the order the solver returns them (ascending for both backends).
    pub eigenvalues: Array1<f64>,
    /// Eigenvectors as columns of the matrix.
    /// eigenvectors.column(i) corresponds to eigenvalues[i].
    pub eigenvectors: Array2<f64>,
}

/// Symmetric eigendecomposition reading the upper triangle (LAPACK's DSYEVD convention).
/// Implementers may assume `matrix` is square and symmetric.
pub trait BackendEigh {
    fn eigh_upper(&self, matrix: &Array2<f64>) -> Result<EighOutput, BackendError>;

    /// Short backend name for log messages.
    fn name(&self) -> &'static str;
}

// --- ndarray-linalg (LAPACK) backend ---
use ndarray_linalg::{Eigh as NdLinalgEigh, UPLO};

#[derive(Debug, Default, Copy, Clone)]
pub struct NdarrayLinAlgBackend;

impl BackendEigh for NdarrayLinAlgBackend {
    fn eigh_upper(&self, matrix: &Array2<f64>) -> Result<EighOutput, BackendError> {
        if matrix.is_empty() {
            return Ok(EighOutput {
                eigenvalues: Array1::zeros(0),
                eigenvectors: Array2::zeros((0, 0)),
            });
        }
        let (eigenvalues, eigenvectors) = matrix.eigh(UPLO::Upper)?;
        Ok(EighOutput {
            eigenvalues,
            eigenvectors,
        })
    }

    fn name(&self) -> &'static str {
        "ndarray-linalg"
    }
}

// --- faer backend ---
#[cfg(feature = "backend_faer")]
mod faer_specific_code {
    use super::{BackendEigh, BackendError, EighOutput};
    use ndarray::{Array1, Array2};

    #[derive(Debug, Default, Copy, Clone)]
    pub struct FaerLinAlgBackend;

    impl BackendEigh for FaerLinAlgBackend {
        fn eigh_upper(&self, matrix: &Array2<f64>) -> Result<EighOutput, BackendError> {
            let n = matrix.nrows();
            if n == 0 {
                return Ok(EighOutput {
                    eigenvalues: Array1::zeros(0),
                    eigenvectors: Array2::zeros((0, 0)),
                });
            }
            // Copying element-wise sidesteps ndarray layout (C, F or strided views).
            let faer_matrix = faer::Mat::<f64>::from_fn(n, n, |i, j| matrix[[i, j]]);
            let eig = faer_matrix
                .as_ref()
                .self_adjoint_eigen(faer::Side::Upper)
                .map_err(|e| format!("faer self-adjoint eigendecomposition failed: {:?}", e))?;

            let values = eig.S().column_vector();
            let vectors = eig.U();
            Ok(EighOutput {
                eigenvalues: Array1::from_shape_fn(n, |i| values[i]),
                eigenvectors: Array2::from_shape_fn((n, n), |(i, j)| vectors[(i, j)]),
            })
        }

        fn name(&self) -> &'static str {
            "faer"
        }
    }
}

#[cfg(feature = "backend_faer")]
pub use faer_specific_code::FaerLinAlgBackend;

/// Dispatches to the backend selected by cargo features: faer with `backend_faer`,
/// LAPACK through ndarray-linalg otherwise.
#[derive(Debug, Default, Copy, Clone)]
pub struct LinAlgBackendProvider;

impl LinAlgBackendProvider {
    pub fn new() -> Self {
        Self
    }
}

impl BackendEigh for LinAlgBackendProvider {
    fn eigh_upper(&self, matrix: &Array2<f64>) -> Result<EighOutput, BackendError> {
        #[cfg(feature = "backend_faer")]
        {
            FaerLinAlgBackend.eigh_upper(matrix)
        }
        #[cfg(not(feature = "backend_faer"))]
        {
            NdarrayLinAlgBackend.eigh_upper(matrix)
        }
    }

    fn name(&self) -> &'static str {
        #[cfg(feature = "backend_faer")]
        {
            FaerLinAlgBackend.name()
        }
        #[cfg(not(feature = "backend_faer"))]
        {
            NdarrayLinAlgBackend.name()
        }
    }
}
