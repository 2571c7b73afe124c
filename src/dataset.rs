// src/dataset.rs

use crate::error::PcaError;
use log::{debug, info, log_enabled, trace, warn, Level};
use ndarray::{Array2, Axis};
use ndarray_npy::{read_npy, ReadNpyError, ReadableElement};
use std::path::Path;
use std::time::Instant;

type NpyReader = fn(&Path) -> Result<Array2<f64>, ReadNpyError>;

/// Element types accepted in the `.npy` file, tried in order. Everything is widened to `f64`.
const ELEMENT_READERS: [(&str, NpyReader); 5] = [
    ("f64", |path: &Path| read_npy::<_, Array2<f64>>(path)),
    ("f32", |path: &Path| read_widened::<f32>(path, f64::from)),
    ("u8", |path: &Path| read_widened::<u8>(path, f64::from)),
    ("i64", |path: &Path| read_widened::<i64>(path, |v| v as f64)),
    ("i32", |path: &Path| read_widened::<i32>(path, f64::from)),
];

fn read_widened<T: ReadableElement + Copy>(
    path: &Path,
    widen: fn(T) -> f64,
) -> Result<Array2<f64>, ReadNpyError> {
    let raw: Array2<T> = read_npy(path)?;
    Ok(raw.mapv(widen))
}

/// Reads a 2-D array of shape (n_samples, n_features) from a `.npy` file.
///
/// Integer and `f32` payloads are widened to `f64`; both C and Fortran order are accepted.
///
/// # Errors
/// Returns [`PcaError::FileAccess`] if the file is missing or unreadable, is not an `.npy`
/// file, holds an array that is not 2-D, or uses an unsupported element type.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, PcaError> {
    let path = path.as_ref();
    let start = Instant::now();

    for (element_type, read) in ELEMENT_READERS {
        match read(path) {
            Ok(data) => {
                info!(
                    "Loaded dataset {:?} ({} elements) with shape {:?} in {:?}",
                    path,
                    element_type,
                    data.dim(),
                    start.elapsed()
                );
                return Ok(data);
            }
            Err(ReadNpyError::WrongDescriptor(descriptor)) => {
                trace!(
                    "Dataset {:?} is not stored as {}: descriptor {:?}",
                    path,
                    element_type,
                    descriptor
                );
            }
            Err(err) => return Err(PcaError::file_access(path, err)),
        }
    }

    Err(PcaError::file_access(
        path,
        "unsupported element type (expected f64, f32, u8, i64 or i32)",
    ))
}

/// Subtracts each column's mean so that every feature sums to zero across samples.
///
/// A matrix with no rows is returned unchanged.
pub fn center_columns(mut data: Array2<f64>) -> Array2<f64> {
    let mean_vector = match data.mean_axis(Axis(0)) {
        Some(mean) => mean,
        None => {
            debug!("Dataset has no samples; skipping centering.");
            return data;
        }
    };
    data -= &mean_vector;
    data
}

// Stops at the first element that differs from the first one.
fn is_constant(data: &Array2<f64>) -> bool {
    match data.iter().next() {
        Some(&first) => data.iter().all(|&v| v == first),
        None => false,
    }
}

/// Loads a dataset with [`load_dataset`] and centers it with [`center_columns`].
///
/// # Errors
/// Propagates [`PcaError::FileAccess`] from the loader.
pub fn load_and_center_dataset<P: AsRef<Path>>(path: P) -> Result<Array2<f64>, PcaError> {
    let data = load_dataset(path)?;

    if log_enabled!(Level::Warn) && is_constant(&data) {
        warn!("Dataset is constant-valued; centering yields an all-zero matrix.");
    }

    let centered = center_columns(data);
    debug!("Centered dataset with shape {:?}", centered.dim());
    Ok(centered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn centering_zeroes_every_column_mean() {
        let data = array![[1.0, 10.0, -3.0], [3.0, 20.0, -3.0], [5.0, 60.0, -3.0]];
        let centered = center_columns(data);

        assert_eq!(centered.dim(), (3, 3));
        for column in centered.columns() {
            assert_abs_diff_eq!(column.sum(), 0.0, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(centered[[0, 0]], -2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(centered[[2, 1]], 30.0, epsilon = 1e-12);
        // Constant columns become zero.
        assert!(centered.column(2).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn centering_empty_matrix_is_a_no_op() {
        let data = Array2::<f64>::zeros((0, 4));
        let centered = center_columns(data);
        assert_eq!(centered.dim(), (0, 4));
    }

    #[test]
    fn constant_check_stops_on_first_difference() {
        assert!(is_constant(&array![[2.0, 2.0], [2.0, 2.0]]));
        assert!(!is_constant(&array![[2.0, 2.0], [2.0, 2.5]]));
        assert!(!is_constant(&Array2::<f64>::zeros((0, 3))));
    }

    #[test]
    fn missing_file_is_a_file_access_error() {
        let err = load_dataset("/nonexistent/dir/mnist.npy").unwrap_err();
        match err {
            PcaError::FileAccess { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/dir/mnist.npy"))
            }
            other => panic!("expected FileAccess, got {:?}", other),
        }
    }
}
