//! Numeric rank estimation.
//!
//! The rank is computed on the dense grid exactly as stored, with missing
//! cells taken at face value and no imputation. This is a rough default
//! for the target rank of a completion, not a statistical estimate; pass
//! an explicit rank whenever one is known.

use matcomp_core::{
    error::{MatrixError, Result},
    types::{DMatrix, Scalar},
};
use nalgebra::SVD;
use num_traits::Float;

/// Number of singular values above `max(σ) · max(m, n) · ε`.
///
/// # Errors
///
/// Returns `NumericalError` if the matrix contains NaN or infinite cells,
/// which happens when missing cells are stored as NaN.
pub fn numeric_rank<T: Scalar>(matrix: &DMatrix<T>) -> Result<usize> {
    if matrix.is_empty() {
        return Ok(0);
    }
    if matrix.iter().any(|&x| !Float::is_finite(x)) {
        return Err(MatrixError::numerical_error(
            "cannot estimate the rank of a matrix with non-finite cells; pass an explicit rank",
        ));
    }

    let svd = SVD::new(matrix.clone(), false, false);
    let singular_values = &svd.singular_values;
    let max_sv = singular_values
        .iter()
        .copied()
        .fold(T::zero(), |acc, s| Float::max(acc, s));
    let dim = <T as Scalar>::from_usize(matrix.nrows().max(matrix.ncols()));
    let tolerance = max_sv * dim * <T as Scalar>::EPSILON;

    Ok(singular_values.iter().filter(|&&s| s > tolerance).count())
}
