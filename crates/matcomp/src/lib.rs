//! Masking, monotone repair and low-rank completion for numeric tables.
//!
//! `matcomp` prepares and evaluates matrix-completion experiments: it hides
//! entries of a table to simulate missingness while keeping the ground
//! truth, detects and repairs monotonicity violations along rows or
//! columns, and hands the partially observed matrix to a low-rank solver.
//!
//! This crate re-exports [`matcomp_core`] and [`matcomp_solver`] and adds
//! the configuration-driven [`Experiment`](experiment::Experiment) pipeline.
//!
//! # Quick start
//!
//! ```
//! use matcomp::prelude::*;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let view = MatrixView::from_rows(vec![
//!     vec![1.0, 2.0, 3.0],
//!     vec![2.0, 4.0, 6.0],
//!     vec![3.0, 6.0, 9.0],
//! ])
//! .unwrap();
//!
//! let policy = MissingPolicy::zero();
//! let mut rng = StdRng::seed_from_u64(1);
//! let (masked, hidden) = view.hide_entries(0.2, &policy, &mut rng).unwrap();
//! assert_eq!(hidden.len(), 1);
//!
//! let factors = CompletionAdapter::new(policy)
//!     .with_rank(1)
//!     .complete(&masked, &AlternatingLeastSquares::<f64>::default())
//!     .unwrap();
//! assert_eq!(factors.right.shape(), (1, 3));
//! ```

pub mod experiment;

pub use matcomp_core::{
    enforce, error, isotonic, masking, missing, monotonic, types, view, CompletionError,
    CompletionResult, Coord, MatrixError, Orientation, Result, Scalar,
};
pub use matcomp_solver::{adapter, als, problem, rank, solver};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::experiment::{Experiment, ExperimentConfig, ExperimentOutcome};
    pub use matcomp_core::prelude::*;
    pub use matcomp_solver::prelude::*;
}
