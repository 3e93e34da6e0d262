//! Core types for preparing matrix-completion experiments.
//!
//! This crate provides the labelled [`MatrixView`](view::MatrixView), the
//! masking operations that simulate missingness, and the tools that detect
//! and repair monotonicity violations along rows or columns.
//!
//! # Key Concepts
//!
//! - **Missingness policy**: whether missing cells are NaN or a sentinel value
//! - **Known entries**: cells that are observed under a policy
//! - **Hidden-entry record**: ground truth for cells masked during an experiment
//! - **Monotone projection**: a line replaced by its isotonic fit
//!
//! # Modules
//!
//! - [`enforce`]: Whole-line monotone repair
//! - [`error`]: Error types
//! - [`isotonic`]: Monotone regressor trait and isotonic regression
//! - [`masking`]: Row, column and entry hiding
//! - [`missing`]: Missingness policies
//! - [`monotonic`]: Monotonicity violation scanning
//! - [`types`]: Scalar trait and type aliases
//! - [`view`]: Immutable labelled matrix views

pub mod enforce;
pub mod error;
pub mod isotonic;
pub mod masking;
pub mod missing;
pub mod monotonic;
pub mod types;
pub mod view;

// Re-export commonly used items at the crate root
pub use error::{CompletionError, CompletionResult, MatrixError, Result};
pub use types::{Coord, Orientation, Scalar};

/// Prelude module for convenient imports.
///
/// # Example
/// ```
/// use matcomp_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::enforce::IsotonicEnforcer;
    pub use crate::error::{CompletionError, CompletionResult, MatrixError, Result};
    pub use crate::isotonic::{IsotonicFit, IsotonicRegression, MonotoneModel, MonotoneRegressor};
    pub use crate::masking::{hide_count, HiddenEntries};
    pub use crate::missing::MissingPolicy;
    pub use crate::monotonic::{MonotonicityAnalyzer, MonotonicityReport, SeedPolicy};
    pub use crate::types::{Coord, DMatrix, DVector, Orientation, Scalar};
    pub use crate::view::MatrixView;
}
