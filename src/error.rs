// src/error.rs

use std::path::PathBuf;

/// Errors raised by the PCA pipeline.
///
/// Percentages passed to the variance-based selectors are never an error; they are clamped by
/// the selection rules in [`crate::eigen::Selection`].
#[derive(Debug, thiserror::Error)]
pub enum PcaError {
    /// The dataset file is missing, unreadable, or does not hold a supported 2-D `.npy` array.
    #[error("cannot load dataset from {path:?}: {reason}")]
    FileAccess { path: PathBuf, reason: String },

    /// Operand dimensions do not fit together.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// The sample covariance needs at least two samples (it divides by n - 1).
    #[error("covariance needs at least 2 samples, got {n_samples}")]
    InsufficientSamples { n_samples: usize },

    /// The eigensolver rejected its input or failed to converge.
    #[error("eigendecomposition failed: {0}")]
    Decomposition(String),
}

impl PcaError {
    pub(crate) fn file_access(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        PcaError::FileAccess {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
