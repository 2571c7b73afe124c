// src/projection.rs

use crate::error::PcaError;
use log::trace;
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1};

fn check_sample_matches_basis<S>(x: &ArrayBase<S, Ix1>, u: &Array2<f64>) -> Result<(), PcaError>
where
    S: Data<Elem = f64>,
{
    if x.len() != u.nrows() {
        return Err(PcaError::ShapeMismatch(format!(
            "sample has {} features but the eigenbasis has {} rows",
            x.len(),
            u.nrows()
        )));
    }
    Ok(())
}

/// Coordinates of a centered sample in the eigenbasis: `Uᵀx`, one entry per column of `u`.
///
/// `x` may be an owned vector or a view such as `data.row(i)`.
///
/// # Errors
/// [`PcaError::ShapeMismatch`] if `x.len() != u.nrows()`.
pub fn project_coordinates<S>(
    x: &ArrayBase<S, Ix1>,
    u: &Array2<f64>,
) -> Result<Array1<f64>, PcaError>
where
    S: Data<Elem = f64>,
{
    check_sample_matches_basis(x, u)?;
    Ok(u.t().dot(x))
}

/// Projects a centered sample onto the span of the columns of `u` and maps it back into
/// feature space: `U(Uᵀx)`.
///
/// The result is a flat vector with the same length as `x`. Columns of `u` are assumed
/// orthonormal (as returned by [`crate::get_eig`]); no further normalization happens.
///
/// # Errors
/// [`PcaError::ShapeMismatch`] if `x.len() != u.nrows()`.
///
/// # Examples
///
/// ```
/// use ndarray::array;
/// use digit_pca::project_image;
///
/// let u = array![[1.0], [0.0], [0.0]];
/// let x = array![3.0, -4.0, 5.0];
/// assert_eq!(project_image(&x, &u).unwrap(), array![3.0, 0.0, 0.0]);
/// ```
pub fn project_image<S>(
    x: &ArrayBase<S, Ix1>,
    u: &Array2<f64>,
) -> Result<Array1<f64>, PcaError>
where
    S: Data<Elem = f64>,
{
    let coordinates = project_coordinates(x, u)?;
    trace!("Projected sample onto {} eigenvectors", coordinates.len());
    Ok(u.dot(&coordinates))
}
