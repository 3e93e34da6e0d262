//! Low-rank completion for partially observed matrix views.
//!
//! This crate connects [`MatrixView`](matcomp_core::view::MatrixView)s to
//! low-rank matrix completion solvers.
//!
//! # Modules
//!
//! - [`adapter`]: Collects observations and delegates to a solver
//! - [`als`]: Alternating least squares solver
//! - [`problem`]: Aligned observation sequences
//! - [`rank`]: Numeric rank estimation
//! - [`solver`]: The `LowRankSolver` trait
//!
//! # Example
//!
//! ```
//! use matcomp_core::prelude::*;
//! use matcomp_solver::prelude::*;
//!
//! let view = MatrixView::from_rows(vec![
//!     vec![1.0, 2.0, 3.0],
//!     vec![2.0, 0.0, 6.0],
//!     vec![3.0, 6.0, 9.0],
//! ])
//! .unwrap();
//!
//! let solver = AlternatingLeastSquares::new(AlsConfig::<f64>::new().with_tolerance(1e-10));
//! let factors = CompletionAdapter::new(MissingPolicy::zero())
//!     .with_rank(1)
//!     .complete(&view, &solver)
//!     .unwrap();
//! assert_eq!(factors.left.shape(), (3, 1));
//! ```

pub mod adapter;
pub mod als;
pub mod problem;
pub mod rank;
pub mod solver;

pub use adapter::CompletionAdapter;
pub use als::{AlsConfig, AlternatingLeastSquares, Factorization, SolverReport, TerminationReason};
pub use problem::CompletionProblem;
pub use rank::numeric_rank;
pub use solver::LowRankSolver;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::adapter::CompletionAdapter;
    pub use crate::als::{
        AlsConfig, AlternatingLeastSquares, Factorization, SolverReport, TerminationReason,
    };
    pub use crate::problem::CompletionProblem;
    pub use crate::rank::numeric_rank;
    pub use crate::solver::LowRankSolver;
}
