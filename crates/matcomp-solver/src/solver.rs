//! The low-rank solver seam.
//!
//! A solver receives the full matrix shape, a target rank and the known
//! observations, and returns whatever factors and status it produces. The
//! completion adapter forwards that output untouched.

use matcomp_core::{
    error::CompletionResult,
    types::{Coord, Scalar},
};

/// A low-rank matrix completion solver.
///
/// `positions[k]` and `values[k]` describe the same observation. Solvers
/// are free to reject ranks they cannot handle; callers pass the requested
/// rank through without correction.
pub trait LowRankSolver<T: Scalar> {
    /// Raw solver output, typically `(left factor, right factor, status)`.
    type Output;

    /// Complete a `rows x cols` matrix of the given rank from observations.
    fn solve(
        &self,
        rows: usize,
        cols: usize,
        rank: usize,
        positions: &[Coord],
        values: &[T],
    ) -> CompletionResult<Self::Output>;
}

impl<T, F, O> LowRankSolver<T> for F
where
    T: Scalar,
    F: Fn(usize, usize, usize, &[Coord], &[T]) -> CompletionResult<O>,
{
    type Output = O;

    fn solve(
        &self,
        rows: usize,
        cols: usize,
        rank: usize,
        positions: &[Coord],
        values: &[T],
    ) -> CompletionResult<O> {
        self(rows, cols, rank, positions, values)
    }
}
