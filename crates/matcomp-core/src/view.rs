//! Labelled, immutable matrix views.
//!
//! A [`MatrixView`] wraps a dense grid of numeric cells together with the
//! row and column labels of the table it came from. Views are never mutated
//! in place: every transformation (dropping lines, hiding cells, monotone
//! repair) returns a new view, so the grid and its labels always stay in
//! sync.

use std::ops::Index;

use crate::{
    error::{MatrixError, Result},
    missing::MissingPolicy,
    types::{Coord, DMatrix, Orientation, Scalar},
};
use num_traits::Float;

/// Immutable 2-D table of numeric cells with row and column labels.
///
/// Deserialization goes through [`MatrixView::with_labels`], so label
/// counts that disagree with the grid shape are rejected.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMatrixView<T>"))]
pub struct MatrixView<T: Scalar> {
    grid: DMatrix<T>,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
}

/// Unchecked serialized form of a [`MatrixView`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawMatrixView<T: Scalar> {
    grid: DMatrix<T>,
    row_labels: Vec<String>,
    col_labels: Vec<String>,
}

#[cfg(feature = "serde")]
impl<T: Scalar> TryFrom<RawMatrixView<T>> for MatrixView<T> {
    type Error = MatrixError;

    fn try_from(raw: RawMatrixView<T>) -> Result<Self> {
        MatrixView::from_matrix(raw.grid).with_labels(raw.row_labels, raw.col_labels)
    }
}

fn default_labels(count: usize) -> Vec<String> {
    (0..count).map(|i| i.to_string()).collect()
}

impl<T: Scalar> MatrixView<T> {
    /// Create a view from a dense matrix, labelling rows and columns by
    /// their positions.
    pub fn from_matrix(grid: DMatrix<T>) -> Self {
        let row_labels = default_labels(grid.nrows());
        let col_labels = default_labels(grid.ncols());
        Self {
            grid,
            row_labels,
            col_labels,
        }
    }

    /// Create a view from row vectors.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the rows do not all have the same length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
            return Err(MatrixError::invalid_argument(
                "rows",
                format!(
                    "ragged input: row {} has {} cells, expected {}",
                    i,
                    row.len(),
                    ncols
                ),
            ));
        }

        let flat: Vec<T> = rows.into_iter().flatten().collect();
        Ok(Self::from_matrix(DMatrix::from_row_slice(nrows, ncols, &flat)))
    }

    /// Replace the row and column labels.
    ///
    /// # Errors
    ///
    /// Returns `DimensionMismatch` if the label counts do not match the shape.
    pub fn with_labels(self, row_labels: Vec<String>, col_labels: Vec<String>) -> Result<Self> {
        if row_labels.len() != self.nrows() || col_labels.len() != self.ncols() {
            return Err(MatrixError::dimension_mismatch(
                format!("{} row labels and {} column labels", self.nrows(), self.ncols()),
                format!(
                    "{} row labels and {} column labels",
                    row_labels.len(),
                    col_labels.len()
                ),
            ));
        }
        Ok(Self {
            grid: self.grid,
            row_labels,
            col_labels,
        })
    }

    /// Assemble a view from parts whose shapes are already consistent.
    pub(crate) fn from_parts(
        grid: DMatrix<T>,
        row_labels: Vec<String>,
        col_labels: Vec<String>,
    ) -> Self {
        debug_assert_eq!(grid.nrows(), row_labels.len());
        debug_assert_eq!(grid.ncols(), col_labels.len());
        Self {
            grid,
            row_labels,
            col_labels,
        }
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.grid.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.grid.ncols()
    }

    /// `(rows, cols)` shape of the view.
    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    /// Returns `true` if the view has no cells.
    pub fn is_empty(&self) -> bool {
        self.grid.is_empty()
    }

    /// Cell value at `(row, col)`, if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        self.grid.get((row, col)).copied()
    }

    /// Dense grid backing this view.
    pub fn grid(&self) -> &DMatrix<T> {
        &self.grid
    }

    /// Row labels, in row order.
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Column labels, in column order.
    pub fn col_labels(&self) -> &[String] {
        &self.col_labels
    }

    /// Array-of-arrays copy of the grid, one `Vec` per row.
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.grid
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    /// Number of lines for the given orientation.
    pub fn line_count(&self, orientation: Orientation) -> usize {
        match orientation {
            Orientation::AlongRows => self.nrows(),
            Orientation::AlongColumns => self.ncols(),
        }
    }

    /// Full sequence of values along one line, missing cells included.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a valid line index.
    pub fn line(&self, orientation: Orientation, index: usize) -> Vec<T> {
        match orientation {
            Orientation::AlongRows => self.grid.row(index).iter().copied().collect(),
            Orientation::AlongColumns => self.grid.column(index).iter().copied().collect(),
        }
    }

    /// Coordinates of every known cell under `policy`, in row-major order.
    pub fn known(&self, policy: &MissingPolicy<T>) -> Vec<Coord> {
        let (nrows, ncols) = self.shape();
        let mut indices = Vec::new();
        for i in 0..nrows {
            for j in 0..ncols {
                if policy.is_known(self.grid[(i, j)]) {
                    indices.push((i, j));
                }
            }
        }
        indices
    }

    /// Remove every row whose cells all equal `val`.
    ///
    /// Rows containing NaN are never dropped. Remaining rows keep their
    /// relative order and labels.
    pub fn drop_zero_rows(&self, val: T) -> Self {
        let keep: Vec<usize> = (0..self.nrows())
            .filter(|&i| self.grid.row(i).iter().any(|&x| x != val))
            .collect();
        tracing::debug!(
            dropped = self.nrows() - keep.len(),
            remaining = keep.len(),
            "dropped uniform rows"
        );
        self.select_rows(&keep)
    }

    /// Remove every column whose cells all equal `val`.
    ///
    /// Columns containing NaN are never dropped. Remaining columns keep
    /// their relative order and labels.
    pub fn drop_zero_cols(&self, val: T) -> Self {
        let keep: Vec<usize> = (0..self.ncols())
            .filter(|&j| self.grid.column(j).iter().any(|&x| x != val))
            .collect();
        tracing::debug!(
            dropped = self.ncols() - keep.len(),
            remaining = keep.len(),
            "dropped uniform columns"
        );
        self.select_cols(&keep)
    }

    /// New view containing only the listed rows, in the given order.
    pub(crate) fn select_rows(&self, rows: &[usize]) -> Self {
        let grid = self.grid.select_rows(rows.iter());
        let row_labels = rows.iter().map(|&i| self.row_labels[i].clone()).collect();
        Self::from_parts(grid, row_labels, self.col_labels.clone())
    }

    /// New view containing only the listed columns, in the given order.
    pub(crate) fn select_cols(&self, cols: &[usize]) -> Self {
        let grid = self.grid.select_columns(cols.iter());
        let col_labels = cols.iter().map(|&j| self.col_labels[j].clone()).collect();
        Self::from_parts(grid, self.row_labels.clone(), col_labels)
    }

    /// New view with the given cells overwritten.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfBounds` if any coordinate lies outside the view.
    pub fn with_cells<I>(&self, cells: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Coord, T)>,
    {
        let shape = self.shape();
        let mut grid = self.grid.clone();
        for ((i, j), value) in cells {
            if i >= shape.0 || j >= shape.1 {
                return Err(MatrixError::index_out_of_bounds(i, j, shape));
            }
            grid[(i, j)] = value;
        }
        Ok(Self::from_parts(
            grid,
            self.row_labels.clone(),
            self.col_labels.clone(),
        ))
    }

    /// Cell-wise identity check that treats two NaN cells as equal.
    ///
    /// Labels are compared as well.
    pub fn is_identical_to(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && self.row_labels == other.row_labels
            && self.col_labels == other.col_labels
            && self
                .grid
                .iter()
                .zip(other.grid.iter())
                .all(|(&a, &b)| a == b || (Float::is_nan(a) && Float::is_nan(b)))
    }
}

impl<T: Scalar> Index<Coord> for MatrixView<T> {
    type Output = T;

    fn index(&self, index: Coord) -> &T {
        &self.grid[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> MatrixView<f64> {
        MatrixView::from_rows(vec![
            vec![1.0, 0.0, 3.0],
            vec![0.0, 0.0, 0.0],
            vec![4.0, f64::NAN, 6.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_from_rows_layout() {
        let view = sample();
        assert_eq!(view.shape(), (3, 3));
        assert_eq!(view[(0, 2)], 3.0);
        assert_eq!(view[(2, 0)], 4.0);
        assert_eq!(view.row_labels(), &["0", "1", "2"]);
        assert_eq!(view.to_rows()[0], vec![1.0, 0.0, 3.0]);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = MatrixView::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, MatrixError::InvalidArgument { .. }));
    }

    #[test]
    fn test_known_nan_policy() {
        let view = sample();
        let known = view.known(&MissingPolicy::NotANumber);
        assert_eq!(known.len(), 8);
        assert!(!known.contains(&(2, 1)));
    }

    #[test]
    fn test_known_zero_policy_row_major() {
        let view = sample();
        let known = view.known(&MissingPolicy::zero());
        assert_eq!(known, vec![(0, 0), (0, 2), (2, 0), (2, 2)]);
    }

    #[test]
    fn test_known_full_matrix() {
        let view = MatrixView::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]])
            .unwrap();
        assert_eq!(view.known(&MissingPolicy::zero()).len(), 6);
        assert_eq!(view.known(&MissingPolicy::NotANumber).len(), 6);
    }

    #[test]
    fn test_drop_zero_rows() {
        let view = MatrixView::from_rows(vec![
            vec![1.0, 2.0, 3.0],
            vec![0.0, 0.0, 0.0],
            vec![4.0, 0.0, 6.0],
        ])
        .unwrap();
        let dropped = view.drop_zero_rows(0.0);
        assert_eq!(dropped.shape(), (2, 3));
        assert_eq!(dropped.to_rows(), vec![vec![1.0, 2.0, 3.0], vec![4.0, 0.0, 6.0]]);
        assert_eq!(dropped.row_labels(), &["0", "2"]);
    }

    #[test]
    fn test_drop_zero_cols_custom_value() {
        let view = MatrixView::from_rows(vec![vec![7.0, 1.0, 7.0], vec![7.0, 2.0, f64::NAN]])
            .unwrap();
        let dropped = view.drop_zero_cols(7.0);
        assert_eq!(dropped.ncols(), 2);
        assert_eq!(dropped.col_labels(), &["1", "2"]);
    }

    #[test]
    fn test_with_cells_out_of_bounds() {
        let view = sample();
        let err = view.with_cells([((3, 0), 1.0)]).unwrap_err();
        assert!(matches!(err, MatrixError::IndexOutOfBounds { .. }));
    }

    #[test]
    fn test_with_labels_mismatch() {
        let view = sample();
        let err = view
            .with_labels(vec!["a".into()], vec!["x".into(), "y".into(), "z".into()])
            .unwrap_err();
        assert!(matches!(err, MatrixError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_identity_with_nan() {
        let view = sample();
        assert!(view.is_identical_to(&view.clone()));
        let changed = view.with_cells([((0, 0), 9.0)]).unwrap();
        assert!(!view.is_identical_to(&changed));
    }

    #[test]
    fn test_lines() {
        let view = sample();
        assert_eq!(view.line(Orientation::AlongRows, 0), vec![1.0, 0.0, 3.0]);
        assert_eq!(view.line(Orientation::AlongColumns, 2), vec![3.0, 0.0, 6.0]);
        assert_eq!(view.line_count(Orientation::AlongColumns), 3);
    }
}
