//! Random masking of rows, columns and individual entries.
//!
//! Row and column hiding removes whole lines and keeps no record of what
//! was removed. Entry hiding overwrites a sample of known cells with the
//! policy's missing marker and returns a [`HiddenEntries`] record holding
//! the ground truth, which is the only way to score a completion later.
//!
//! Every sampling operation takes the random generator explicitly; seed it
//! (e.g. `StdRng::seed_from_u64`) for reproducible experiments.

use std::collections::BTreeMap;

use rand::{seq::index, Rng};

use crate::{
    error::{MatrixError, Result},
    missing::MissingPolicy,
    types::{Coord, DMatrix, Scalar},
    view::MatrixView,
};
use num_traits::Float;

/// Number of items to hide: `floor(fraction * population)`.
///
/// # Errors
///
/// Returns `InvalidArgument` if `fraction` is not a finite value in `[0, 1]`.
pub fn hide_count(fraction: f64, population: usize) -> Result<usize> {
    if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
        return Err(MatrixError::invalid_argument(
            "fraction",
            format!("must be a finite value in [0, 1], got {}", fraction),
        ));
    }
    let count = (fraction * population as f64).floor() as usize;
    Ok(count.min(population))
}

/// Sample `amount` distinct indices from `0..population` and return the
/// complement in ascending order.
fn surviving_indices<R: Rng + ?Sized>(rng: &mut R, population: usize, amount: usize) -> Vec<usize> {
    let mut hidden = vec![false; population];
    for i in index::sample(rng, population, amount) {
        hidden[i] = true;
    }
    (0..population).filter(|&i| !hidden[i]).collect()
}

impl<T: Scalar> MatrixView<T> {
    /// Remove `floor(fraction * nrows)` rows chosen uniformly at random.
    ///
    /// The removed rows are discarded; no record of their values is kept.
    pub fn hide_rows<R: Rng + ?Sized>(&self, fraction: f64, rng: &mut R) -> Result<Self> {
        let amount = hide_count(fraction, self.nrows())?;
        let keep = surviving_indices(rng, self.nrows(), amount);
        tracing::debug!(hidden = amount, remaining = keep.len(), "hid rows");
        Ok(self.select_rows(&keep))
    }

    /// Remove `floor(fraction * ncols)` columns chosen uniformly at random.
    ///
    /// The removed columns are discarded; no record of their values is kept.
    pub fn hide_cols<R: Rng + ?Sized>(&self, fraction: f64, rng: &mut R) -> Result<Self> {
        let amount = hide_count(fraction, self.ncols())?;
        let keep = surviving_indices(rng, self.ncols(), amount);
        tracing::debug!(hidden = amount, remaining = keep.len(), "hid columns");
        Ok(self.select_cols(&keep))
    }

    /// Hide `floor(fraction * |known|)` known cells chosen uniformly at random.
    ///
    /// Each sampled cell is overwritten with `policy.marker()` in a copy of
    /// the view, and its original value is stored in the returned record.
    pub fn hide_entries<R: Rng + ?Sized>(
        &self,
        fraction: f64,
        policy: &MissingPolicy<T>,
        rng: &mut R,
    ) -> Result<(Self, HiddenEntries<T>)> {
        let known = self.known(policy);
        let amount = hide_count(fraction, known.len())?;

        let mut hidden = BTreeMap::new();
        for k in index::sample(rng, known.len(), amount) {
            let coord = known[k];
            hidden.insert(coord, self[coord]);
        }

        let marker = policy.marker();
        let masked = self.with_cells(hidden.keys().map(|&coord| (coord, marker)))?;
        tracing::debug!(
            known = known.len(),
            hidden = hidden.len(),
            "hid entries"
        );
        Ok((masked, HiddenEntries { entries: hidden }))
    }
}

/// Ground-truth values of cells hidden by [`MatrixView::hide_entries`].
///
/// Keys are ordered row-major. Every key was a known cell of the source
/// view and is missing in the masked view.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HiddenEntries<T: Scalar> {
    entries: BTreeMap<Coord, T>,
}

impl<T: Scalar> HiddenEntries<T> {
    /// Number of hidden cells.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing was hidden.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Original value of a hidden cell.
    pub fn get(&self, coord: Coord) -> Option<T> {
        self.entries.get(&coord).copied()
    }

    /// Returns `true` if `coord` was hidden.
    pub fn contains(&self, coord: Coord) -> bool {
        self.entries.contains_key(&coord)
    }

    /// Iterate over `(coordinate, original value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, T)> + '_ {
        self.entries.iter().map(|(&c, &v)| (c, v))
    }

    /// Write every hidden value back into `view`.
    ///
    /// Restoring into the masked view returned alongside this record
    /// reproduces the source view exactly.
    pub fn restore(&self, view: &MatrixView<T>) -> Result<MatrixView<T>> {
        view.with_cells(self.iter())
    }

    /// Root-mean-square error of `completed` over the hidden cells.
    ///
    /// Returns `None` when nothing was hidden.
    pub fn rmse(&self, completed: &DMatrix<T>) -> Result<Option<T>> {
        let errors = self.errors(completed)?;
        if errors.is_empty() {
            return Ok(None);
        }
        let sum_sq = errors.iter().fold(T::zero(), |acc, &e| acc + e * e);
        let n = <T as Scalar>::from_usize(errors.len());
        Ok(Some(Float::sqrt(sum_sq / n)))
    }

    /// Largest absolute error of `completed` over the hidden cells.
    pub fn max_abs_error(&self, completed: &DMatrix<T>) -> Result<Option<T>> {
        let errors = self.errors(completed)?;
        Ok(errors
            .into_iter()
            .map(Float::abs)
            .fold(None, |acc: Option<T>, e| Some(acc.map_or(e, |m| Float::max(m, e)))))
    }

    fn errors(&self, completed: &DMatrix<T>) -> Result<Vec<T>> {
        let shape = completed.shape();
        self.iter()
            .map(|((i, j), truth)| {
                completed
                    .get((i, j))
                    .map(|&estimate| estimate - truth)
                    .ok_or_else(|| MatrixError::index_out_of_bounds(i, j, shape))
            })
            .collect()
    }
}

impl<T: Scalar> FromIterator<(Coord, T)> for HiddenEntries<T> {
    fn from_iter<I: IntoIterator<Item = (Coord, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
