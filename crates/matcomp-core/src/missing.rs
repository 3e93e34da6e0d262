//! Missingness policies.
//!
//! A cell is *known* when it is neither NaN nor, under a sentinel policy,
//! equal to the sentinel value. The policy is passed explicitly to every
//! operation that needs to tell observed cells from missing ones, so that a
//! legitimate zero is never silently confused with "unknown".

use crate::types::Scalar;
use num_traits::Float;

/// How missing cells are represented in a matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum MissingPolicy<T: Scalar> {
    /// Missing cells are NaN.
    NotANumber,
    /// Missing cells hold this placeholder value (typically zero). NaN
    /// cells are treated as missing as well.
    Sentinel(T),
}

impl<T: Scalar> Default for MissingPolicy<T> {
    fn default() -> Self {
        MissingPolicy::NotANumber
    }
}

impl<T: Scalar> MissingPolicy<T> {
    /// Zero-as-missing policy.
    pub fn zero() -> Self {
        MissingPolicy::Sentinel(T::zero())
    }

    /// Returns `true` if `value` counts as missing under this policy.
    #[inline]
    pub fn is_missing(&self, value: T) -> bool {
        if Float::is_nan(value) {
            return true;
        }
        match *self {
            MissingPolicy::NotANumber => false,
            MissingPolicy::Sentinel(sentinel) => value == sentinel,
        }
    }

    /// Returns `true` if `value` is an observed cell under this policy.
    #[inline]
    pub fn is_known(&self, value: T) -> bool {
        !self.is_missing(value)
    }

    /// The value written into a cell to mark it missing.
    pub fn marker(&self) -> T {
        match *self {
            MissingPolicy::NotANumber => <T as Float>::nan(),
            MissingPolicy::Sentinel(sentinel) => sentinel,
        }
    }
}
