//! Monotone repair of rows or columns.
//!
//! Lines flagged by the [`MonotonicityAnalyzer`] are replaced wholesale by
//! their monotone projection: a non-decreasing regressor is fitted through
//! the full line against positions `0..len`, and every cell of the line
//! takes the fitted value. Sentinel cells are fitted at face value; NaN
//! cells are left out of the fit and receive interpolated values. Cells
//! that were already in order may change. Lines that are not flagged are
//! copied unchanged.

use crate::{
    error::{MatrixError, Result},
    isotonic::{IsotonicRegression, MonotoneModel, MonotoneRegressor},
    missing::MissingPolicy,
    monotonic::{MonotonicityAnalyzer, MonotonicityReport},
    types::{Orientation, Scalar},
    view::MatrixView,
};

/// Replaces non-monotone lines of a view with their monotone projection.
#[derive(Debug, Clone)]
pub struct IsotonicEnforcer<T: Scalar, R = IsotonicRegression> {
    analyzer: MonotonicityAnalyzer<T>,
    regressor: R,
}

impl<T: Scalar> Default for IsotonicEnforcer<T, IsotonicRegression> {
    fn default() -> Self {
        Self::new(MissingPolicy::zero())
    }
}

impl<T: Scalar> IsotonicEnforcer<T, IsotonicRegression> {
    /// Creates an enforcer using [`IsotonicRegression`] and an analyzer that
    /// skips cells missing under `policy`.
    pub fn new(policy: MissingPolicy<T>) -> Self {
        Self {
            analyzer: MonotonicityAnalyzer::new(policy),
            regressor: IsotonicRegression,
        }
    }
}

impl<T, R> IsotonicEnforcer<T, R>
where
    T: Scalar,
    R: MonotoneRegressor<T>,
{
    /// Creates an enforcer from an explicit analyzer and regressor.
    pub fn with_parts(analyzer: MonotonicityAnalyzer<T>, regressor: R) -> Self {
        Self {
            analyzer,
            regressor,
        }
    }

    /// Replaces the analyzer used to find lines needing repair.
    pub fn with_analyzer(mut self, analyzer: MonotonicityAnalyzer<T>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Analyzer used to find lines needing repair.
    pub fn analyzer(&self) -> &MonotonicityAnalyzer<T> {
        &self.analyzer
    }

    /// Repair every non-monotone line in the given orientation.
    pub fn enforce(&self, view: &MatrixView<T>, orientation: Orientation) -> Result<MatrixView<T>> {
        let report = self.analyzer.scan(view, orientation);
        self.enforce_with_report(view, orientation, &report)
    }

    /// Repair the lines listed in `report`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `report` was produced for the other
    /// orientation or lists a line outside `view`, and propagates fit
    /// failures of the regressor.
    pub fn enforce_with_report(
        &self,
        view: &MatrixView<T>,
        orientation: Orientation,
        report: &MonotonicityReport,
    ) -> Result<MatrixView<T>> {
        if let Some(scanned) = report.orientation() {
            if scanned != orientation {
                return Err(MatrixError::invalid_argument(
                    "report",
                    format!(
                        "report lists {} but {} were requested",
                        scanned.line_noun(),
                        orientation.line_noun()
                    ),
                ));
            }
        }
        let line_count = view.line_count(orientation);
        if let Some(line) = report.lines().find(|&line| line >= line_count) {
            return Err(MatrixError::invalid_argument(
                "report",
                format!(
                    "line {} is out of range for a view with {} {}",
                    line,
                    line_count,
                    orientation.line_noun()
                ),
            ));
        }

        let mut grid = view.grid().clone();

        for line in report.lines() {
            let values = view.line(orientation, line);
            let positions: Vec<T> = (0..values.len()).map(<T as Scalar>::from_usize).collect();
            let model = self.regressor.fit(&positions, &values)?;
            let fitted = model.predict(&positions);

            match orientation {
                Orientation::AlongRows => {
                    for (j, value) in fitted.into_iter().enumerate() {
                        grid[(line, j)] = value;
                    }
                }
                Orientation::AlongColumns => {
                    for (i, value) in fitted.into_iter().enumerate() {
                        grid[(i, line)] = value;
                    }
                }
            }
        }

        tracing::debug!(
            orientation = ?orientation,
            repaired = report.len(),
            "enforced monotone lines"
        );

        Ok(MatrixView::from_parts(
            grid,
            view.row_labels().to_vec(),
            view.col_labels().to_vec(),
        ))
    }
}
