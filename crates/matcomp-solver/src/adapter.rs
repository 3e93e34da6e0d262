//! Adapter between matrix views and low-rank solvers.
//!
//! The adapter collects the known cells of a view, picks a rank (explicit,
//! or estimated from the dense grid), and delegates to a [`LowRankSolver`],
//! returning its output unchanged. Convergence is the solver's concern; the
//! adapter only fails if its own inputs are malformed.

use matcomp_core::{
    error::CompletionResult,
    missing::MissingPolicy,
    types::Scalar,
    view::MatrixView,
};

use crate::{problem::CompletionProblem, rank::numeric_rank, solver::LowRankSolver};

/// Packages known cells of a view and hands them to a solver.
#[derive(Debug, Clone)]
pub struct CompletionAdapter<T: Scalar> {
    policy: MissingPolicy<T>,
    rank: Option<usize>,
}

impl<T: Scalar> Default for CompletionAdapter<T> {
    fn default() -> Self {
        Self::new(MissingPolicy::zero())
    }
}

impl<T: Scalar> CompletionAdapter<T> {
    /// Creates an adapter treating cells missing under `policy` as unknown.
    pub fn new(policy: MissingPolicy<T>) -> Self {
        Self { policy, rank: None }
    }

    /// Sets an explicit target rank.
    ///
    /// The rank is forwarded to the solver as is, even when it exceeds the
    /// matrix dimensions.
    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Missingness policy used to select observations.
    pub fn policy(&self) -> &MissingPolicy<T> {
        &self.policy
    }

    /// Rank to request for `view`: the explicit rank if set, otherwise the
    /// numeric rank of the dense grid with missing cells at face value.
    pub fn resolve_rank(&self, view: &MatrixView<T>) -> CompletionResult<usize> {
        match self.rank {
            Some(rank) => Ok(rank),
            None => Ok(numeric_rank(view.grid())?),
        }
    }

    /// Observations of `view` as aligned row, column and value sequences.
    pub fn problem(&self, view: &MatrixView<T>) -> CompletionResult<CompletionProblem<T>> {
        Ok(CompletionProblem::from_view(view, &self.policy)?)
    }

    /// Complete `view` with `solver`, returning the solver's raw output.
    pub fn complete<S>(&self, view: &MatrixView<T>, solver: &S) -> CompletionResult<S::Output>
    where
        S: LowRankSolver<T> + ?Sized,
    {
        let rank = self.resolve_rank(view)?;
        let problem = self.problem(view)?;
        tracing::debug!(
            rows = problem.rows(),
            cols = problem.cols(),
            rank,
            observations = problem.len(),
            "delegating to low-rank solver"
        );
        solver.solve(
            problem.rows(),
            problem.cols(),
            rank,
            &problem.positions(),
            problem.values(),
        )
    }
}
