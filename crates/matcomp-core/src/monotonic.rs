//! Detection of monotonicity violations along rows or columns.
//!
//! The scan walks each line in order, tracking the last known value. A
//! known cell strictly smaller than that value is flagged, and every known
//! cell (flagged or not) becomes the new last value. Missing cells are
//! skipped entirely: they are never flagged and never update the tracker.

use std::collections::BTreeMap;

use crate::{
    missing::MissingPolicy,
    types::{Orientation, Scalar},
    view::MatrixView,
};

/// How the "last seen" tracker is initialised for each line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SeedPolicy {
    /// Seed from the raw first cell, even when it is missing.
    ///
    /// A missing NaN seed never triggers a flag, but a sentinel seed (e.g.
    /// zero) is compared against like any other value, so a negative first
    /// known cell after a leading zero is reported.
    #[default]
    FirstCell,
    /// Seed from the first known cell of the line.
    FirstKnown,
}

/// Positions where each line decreases, keyed by line index.
///
/// Only lines with at least one decrease appear. Positions are listed in
/// scan order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MonotonicityReport {
    orientation: Option<Orientation>,
    violations: BTreeMap<usize, Vec<usize>>,
}

impl MonotonicityReport {
    /// Orientation the report was produced for.
    pub fn orientation(&self) -> Option<Orientation> {
        self.orientation
    }

    /// Number of non-monotone lines.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns `true` if every line is monotone.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Decrease positions for one line, if it was flagged.
    pub fn positions(&self, line: usize) -> Option<&[usize]> {
        self.violations.get(&line).map(Vec::as_slice)
    }

    /// Returns `true` if `line` has at least one decrease.
    pub fn is_flagged(&self, line: usize) -> bool {
        self.violations.contains_key(&line)
    }

    /// Indices of flagged lines in ascending order.
    pub fn lines(&self) -> impl Iterator<Item = usize> + '_ {
        self.violations.keys().copied()
    }

    /// Iterate over `(line, positions)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[usize])> + '_ {
        self.violations.iter().map(|(&l, p)| (l, p.as_slice()))
    }

    /// Total number of flagged positions across all lines.
    pub fn violation_count(&self) -> usize {
        self.violations.values().map(Vec::len).sum()
    }
}

/// Scanner reporting where rows or columns fail to be non-decreasing.
#[derive(Debug, Clone)]
pub struct MonotonicityAnalyzer<T: Scalar> {
    policy: MissingPolicy<T>,
    seed: SeedPolicy,
    emit_report: bool,
}

impl<T: Scalar> Default for MonotonicityAnalyzer<T> {
    fn default() -> Self {
        Self::new(MissingPolicy::zero())
    }
}

impl<T: Scalar> MonotonicityAnalyzer<T> {
    /// Creates an analyzer skipping cells that are missing under `policy`.
    pub fn new(policy: MissingPolicy<T>) -> Self {
        Self {
            policy,
            seed: SeedPolicy::default(),
            emit_report: false,
        }
    }

    /// Sets the seed policy.
    pub fn with_seed_policy(mut self, seed: SeedPolicy) -> Self {
        self.seed = seed;
        self
    }

    /// Enables or disables the summary log line emitted after each scan.
    pub fn with_report(mut self, emit_report: bool) -> Self {
        self.emit_report = emit_report;
        self
    }

    /// Missingness policy used to skip cells.
    pub fn policy(&self) -> &MissingPolicy<T> {
        &self.policy
    }

    /// Scan every line of `view` in the given orientation.
    pub fn scan(&self, view: &MatrixView<T>, orientation: Orientation) -> MonotonicityReport {
        let mut violations = BTreeMap::new();
        for index in 0..view.line_count(orientation) {
            let spots = self.scan_line(&view.line(orientation, index));
            if !spots.is_empty() {
                violations.insert(index, spots);
            }
        }

        if self.emit_report {
            tracing::info!(
                orientation = ?orientation,
                non_monotone = violations.len(),
                "{} {} are non increasing in at least one spot",
                violations.len(),
                orientation.line_noun()
            );
        }

        MonotonicityReport {
            orientation: Some(orientation),
            violations,
        }
    }

    /// Positions within `line` where a known value drops below the last
    /// known value.
    pub fn scan_line(&self, line: &[T]) -> Vec<usize> {
        let seed = match self.seed {
            SeedPolicy::FirstCell => line.first().copied(),
            SeedPolicy::FirstKnown => line.iter().copied().find(|&x| self.policy.is_known(x)),
        };
        let Some(mut last) = seed else {
            return Vec::new();
        };

        let mut spots = Vec::new();
        for (pos, &value) in line.iter().enumerate() {
            if self.policy.is_missing(value) {
                continue;
            }
            if value < last {
                spots.push(pos);
            }
            last = value;
        }
        spots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn column_view(values: &[f64]) -> MatrixView<f64> {
        MatrixView::from_rows(values.iter().map(|&v| vec![v]).collect()).unwrap()
    }

    #[test]
    fn test_detects_single_decrease() {
        let view = column_view(&[1.0, 3.0, 2.0, 5.0]);
        let report = MonotonicityAnalyzer::new(MissingPolicy::zero())
            .scan(&view, Orientation::AlongColumns);
        assert_eq!(report.len(), 1);
        assert_eq!(report.positions(0), Some(&[2][..]));
    }

    #[test]
    fn test_leading_sentinel_seed() {
        // The raw zero seed is smaller than every positive value, so row 1
        // is not reported against row 0; only the 3 -> 2 drop is.
        let view = column_view(&[0.0, 3.0, 2.0, 5.0]);
        let report = MonotonicityAnalyzer::new(MissingPolicy::zero())
            .scan(&view, Orientation::AlongColumns);
        assert_eq!(report.positions(0), Some(&[2][..]));
    }

    #[test]
    fn test_seed_policy_changes_negative_case() {
        let line = [0.0, -2.0, -1.0];
        let first_cell = MonotonicityAnalyzer::new(MissingPolicy::zero());
        assert_eq!(first_cell.scan_line(&line), vec![1]);

        let first_known = first_cell.with_seed_policy(SeedPolicy::FirstKnown);
        assert!(first_known.scan_line(&line).is_empty());
    }

    #[test]
    fn test_skips_missing_cells() {
        let analyzer = MonotonicityAnalyzer::new(MissingPolicy::zero());
        assert!(analyzer.scan_line(&[1.0, 0.0, 2.0, f64::NAN, 3.0]).is_empty());
        assert_eq!(analyzer.scan_line(&[4.0, 0.0, 1.0, 0.0, 0.5]), vec![2, 4]);
    }

    #[test]
    fn test_nan_seed_never_flags() {
        let analyzer = MonotonicityAnalyzer::new(MissingPolicy::NotANumber);
        assert!(analyzer.scan_line(&[f64::NAN, 5.0, 6.0]).is_empty());
        assert_eq!(analyzer.scan_line(&[f64::NAN, 5.0, 4.0]), vec![2]);
    }

    #[test]
    fn test_flagged_value_updates_tracker() {
        // After 5 -> 1 is flagged, tracking continues from 1, so 2 is legal.
        let analyzer = MonotonicityAnalyzer::new(MissingPolicy::zero());
        assert_eq!(analyzer.scan_line(&[5.0, 1.0, 2.0]), vec![1]);
    }

    #[test]
    fn test_along_rows() {
        let view = MatrixView::from_rows(vec![
            vec![1.0, 2.0, 3.0],
            vec![3.0, 2.0, 1.0],
            vec![1.0, 1.0, 1.0],
        ])
        .unwrap();
        let report = MonotonicityAnalyzer::new(MissingPolicy::zero())
            .with_report(true)
            .scan(&view, Orientation::AlongRows);
        assert_eq!(report.orientation(), Some(Orientation::AlongRows));
        assert_eq!(report.lines().collect::<Vec<_>>(), vec![1]);
        assert_eq!(report.positions(1), Some(&[1, 2][..]));
        assert_eq!(report.violation_count(), 2);
        assert!(!report.is_flagged(0));
    }

    #[test]
    fn test_empty_view() {
        let view = MatrixView::<f64>::from_rows(vec![]).unwrap();
        let report = MonotonicityAnalyzer::default().scan(&view, Orientation::AlongColumns);
        assert!(report.is_empty());
    }
}
