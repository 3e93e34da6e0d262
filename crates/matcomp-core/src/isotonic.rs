//! Monotone (isotonic) regression.
//!
//! [`MonotoneRegressor`] is the seam the enforcer fits lines through; any
//! order-preserving regressor can be plugged in. [`IsotonicRegression`] is
//! the default implementation, a weighted Pool Adjacent Violators fit that
//! predicts by linear interpolation between fitted knots and clamps outside
//! the fitted range.

use crate::{
    error::{MatrixError, Result},
    types::Scalar,
};
use num_traits::Float;

/// A regressor producing non-decreasing fits.
pub trait MonotoneRegressor<T: Scalar> {
    /// Fitted model type.
    type Model: MonotoneModel<T>;

    /// Fit a non-decreasing function through `(positions[i], values[i])`.
    fn fit(&self, positions: &[T], values: &[T]) -> Result<Self::Model>;
}

/// A fitted monotone model.
pub trait MonotoneModel<T: Scalar> {
    /// Evaluate the model at each position.
    fn predict(&self, positions: &[T]) -> Vec<T>;
}

/// Increasing isotonic regression via Pool Adjacent Violators.
///
/// Points with a NaN position or value are ignored during fitting. Repeated
/// positions are pooled into a single weighted observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsotonicRegression;

impl IsotonicRegression {
    /// Create a new isotonic regressor.
    pub fn new() -> Self {
        Self
    }
}

/// Knots of a fitted isotonic regression.
#[derive(Debug, Clone, PartialEq)]
pub struct IsotonicFit<T: Scalar> {
    /// Distinct fitted positions in ascending order
    pub thresholds: Vec<T>,
    /// Non-decreasing fitted value at each threshold
    pub values: Vec<T>,
}

impl<T: Scalar> MonotoneRegressor<T> for IsotonicRegression {
    type Model = IsotonicFit<T>;

    fn fit(&self, positions: &[T], values: &[T]) -> Result<IsotonicFit<T>> {
        if positions.len() != values.len() {
            return Err(MatrixError::dimension_mismatch(
                format!("{} values", positions.len()),
                format!("{} values", values.len()),
            ));
        }

        let mut pairs: Vec<(T, T)> = positions
            .iter()
            .zip(values)
            .filter(|&(&x, &y)| !Float::is_nan(x) && !Float::is_nan(y))
            .map(|(&x, &y)| (x, y))
            .collect();
        if pairs.is_empty() {
            return Err(MatrixError::invalid_argument(
                "values",
                "isotonic regression needs at least one non-NaN observation",
            ));
        }
        pairs.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        // Pool repeated positions: (x, weighted sum, weight)
        let mut points: Vec<(T, T, T)> = Vec::with_capacity(pairs.len());
        for (x, y) in pairs {
            match points.last_mut() {
                Some(last) if last.0 == x => {
                    last.1 = last.1 + y;
                    last.2 = last.2 + T::one();
                }
                _ => points.push((x, y, T::one())),
            }
        }

        // PAV: blocks of (sum, weight, number of points)
        let mut blocks: Vec<(T, T, usize)> = Vec::with_capacity(points.len());
        for &(_, sum, weight) in &points {
            blocks.push((sum, weight, 1));
            while blocks.len() >= 2 {
                let len = blocks.len();
                let (sum_last, w_last, n_last) = blocks[len - 1];
                let (sum_prev, w_prev, n_prev) = blocks[len - 2];
                if sum_last / w_last < sum_prev / w_prev {
                    blocks.truncate(len - 2);
                    blocks.push((sum_prev + sum_last, w_prev + w_last, n_prev + n_last));
                } else {
                    break;
                }
            }
        }

        let thresholds = points.iter().map(|p| p.0).collect();
        let mut fitted = Vec::with_capacity(points.len());
        for (sum, weight, count) in blocks {
            let mean = sum / weight;
            fitted.extend(std::iter::repeat(mean).take(count));
        }

        Ok(IsotonicFit {
            thresholds,
            values: fitted,
        })
    }
}

impl<T: Scalar> IsotonicFit<T> {
    fn predict_one(&self, x: T) -> T {
        let n = self.thresholds.len();
        if n == 0 || Float::is_nan(x) {
            return <T as Float>::nan();
        }
        if x <= self.thresholds[0] {
            return self.values[0];
        }
        if x >= self.thresholds[n - 1] {
            return self.values[n - 1];
        }

        // First threshold strictly greater than x; 1 <= hi <= n - 1 here.
        let hi = self.thresholds.partition_point(|&t| t <= x);
        let lo = hi - 1;
        let (x0, x1) = (self.thresholds[lo], self.thresholds[hi]);
        let (y0, y1) = (self.values[lo], self.values[hi]);
        if x == x0 {
            return y0;
        }
        y0 + (x - x0) / (x1 - x0) * (y1 - y0)
    }
}

impl<T: Scalar> MonotoneModel<T> for IsotonicFit<T> {
    fn predict(&self, positions: &[T]) -> Vec<T> {
        positions.iter().map(|&x| self.predict_one(x)).collect()
    }
}
