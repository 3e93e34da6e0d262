//! Type definitions and aliases shared across the workspace.
//!
//! This module provides the numeric trait for cell values, matrix aliases
//! and the coordinate type used by known-set queries and hidden records.

use nalgebra::{Dyn, OMatrix, OVector, RealField, Scalar as NalgebraScalar};
use num_traits::{Float, FromPrimitive};
use std::fmt::{Debug, Display};

/// Trait for scalar cell types (f32 or f64).
///
/// This trait combines all the numeric traits required by the masking,
/// regression and completion code.
pub trait Scalar:
    NalgebraScalar
    + RealField
    + Float
    + FromPrimitive
    + Display
    + Debug
    + Default
    + Copy
    + Send
    + Sync
    + 'static
{
    /// Machine epsilon for this scalar type.
    const EPSILON: Self;

    /// Default relative residual tolerance for iterative solvers.
    const DEFAULT_TOLERANCE: Self;

    /// Default ridge regularization for least-squares subproblems.
    const DEFAULT_REGULARIZATION: Self;

    /// Convert to f64 (for logging/display).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn to_f64(self) -> f64 {
        num_traits::cast(self).expect("Failed to convert to f64")
    }

    /// Convert from usize (for positions and counts).
    ///
    /// # Panics
    ///
    /// Panics if the conversion fails.
    fn from_usize(v: usize) -> Self {
        <Self as FromPrimitive>::from_usize(v).expect("Failed to convert from usize")
    }
}

impl Scalar for f32 {
    const EPSILON: Self = f32::EPSILON;
    const DEFAULT_TOLERANCE: Self = 1e-4;
    const DEFAULT_REGULARIZATION: Self = 1e-4;
}

impl Scalar for f64 {
    const EPSILON: Self = f64::EPSILON;
    const DEFAULT_TOLERANCE: Self = 1e-6;
    const DEFAULT_REGULARIZATION: Self = 1e-8;
}

/// Type alias for a dynamically-sized matrix.
pub type DMatrix<T> = OMatrix<T, Dyn, Dyn>;

/// Type alias for a dynamically-sized vector.
pub type DVector<T> = OVector<T, Dyn>;

/// A `(row_index, col_index)` cell coordinate.
pub type Coord = (usize, usize);

/// Line direction used by the monotonicity tools.
///
/// `AlongColumns` walks each column top-to-bottom; `AlongRows` walks each
/// row left-to-right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Orientation {
    /// Each row is a line; positions are column indices.
    AlongRows,
    /// Each column is a line; positions are row indices.
    AlongColumns,
}

impl Orientation {
    /// Human-readable plural noun for the lines of this orientation.
    pub fn line_noun(self) -> &'static str {
        match self {
            Orientation::AlongRows => "rows",
            Orientation::AlongColumns => "columns",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(<f64 as Scalar>::from_usize(7), 7.0);
        assert_eq!(Scalar::to_f64(2.5f32), 2.5);
        assert!(<f64 as Scalar>::DEFAULT_TOLERANCE > 0.0);
    }

    #[test]
    fn test_orientation_noun() {
        assert_eq!(Orientation::AlongRows.line_noun(), "rows");
        assert_eq!(Orientation::AlongColumns.line_noun(), "columns");
    }
}
