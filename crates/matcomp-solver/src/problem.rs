//! Observation sets handed to low-rank solvers.

use matcomp_core::{
    error::{MatrixError, Result},
    missing::MissingPolicy,
    types::{Coord, Scalar},
    view::MatrixView,
};

/// Known cells of a matrix as three aligned sequences.
///
/// Entry `k` of `row_indices`, `col_indices` and `values` describes one
/// observation. Observations are stored in row-major order when built from
/// a view.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletionProblem<T: Scalar> {
    rows: usize,
    cols: usize,
    row_indices: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<T>,
}

impl<T: Scalar> CompletionProblem<T> {
    /// Create a problem from aligned sequences.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if the sequences differ in length and
    /// `IndexOutOfBounds` if a coordinate lies outside `rows x cols`.
    pub fn new(
        rows: usize,
        cols: usize,
        row_indices: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if row_indices.len() != col_indices.len() || row_indices.len() != values.len() {
            return Err(MatrixError::invariant_violation(format!(
                "observation sequences are misaligned: {} rows, {} cols, {} values",
                row_indices.len(),
                col_indices.len(),
                values.len()
            )));
        }
        if let Some((&i, &j)) = row_indices
            .iter()
            .zip(&col_indices)
            .find(|&(&i, &j)| i >= rows || j >= cols)
        {
            return Err(MatrixError::index_out_of_bounds(i, j, (rows, cols)));
        }

        Ok(Self {
            rows,
            cols,
            row_indices,
            col_indices,
            values,
        })
    }

    /// Collect the known cells of `view` under `policy`, in row-major order.
    pub fn from_view(view: &MatrixView<T>, policy: &MissingPolicy<T>) -> Result<Self> {
        let known = view.known(policy);
        let mut row_indices = Vec::with_capacity(known.len());
        let mut col_indices = Vec::with_capacity(known.len());
        let mut values = Vec::with_capacity(known.len());
        for (i, j) in known {
            row_indices.push(i);
            col_indices.push(j);
            values.push(view[(i, j)]);
        }
        Self::new(view.nrows(), view.ncols(), row_indices, col_indices, values)
    }

    /// Number of rows of the full matrix.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns of the full matrix.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing is observed.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Row coordinate of each observation.
    pub fn row_indices(&self) -> &[usize] {
        &self.row_indices
    }

    /// Column coordinate of each observation.
    pub fn col_indices(&self) -> &[usize] {
        &self.col_indices
    }

    /// Observed values.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// `(row, col)` pairs of each observation.
    pub fn positions(&self) -> Vec<Coord> {
        self.row_indices
            .iter()
            .copied()
            .zip(self.col_indices.iter().copied())
            .collect()
    }
}
