//! Alternating least squares for fixed-rank matrix completion.
//!
//! This module implements a default [`LowRankSolver`] that fits
//! `M ≈ X·Y` with `X ∈ ℝ^{m×k}` and `Y ∈ ℝ^{k×n}` to the observed entries
//! of `M`.
//!
//! # Algorithm Overview
//!
//! 1. Initialise `X` and `Y` from a truncated SVD of the observations with
//!    missing cells set to zero, splitting each singular value evenly
//!    between the two factors
//! 2. For each row `i`, solve the ridge problem
//!    `min_x Σ_{j ∈ Ω_i} (x·y_j - M_ij)² + λ‖x‖²`
//! 3. For each column `j`, solve the symmetric problem for `y_j`
//! 4. Stop when the relative residual over known entries drops below the
//!    tolerance, stops improving, or the iteration cap is reached
//!
//! Rows or columns without any observation receive a zero factor.

use std::time::{Duration, Instant};

use matcomp_core::{
    error::{CompletionError, CompletionResult, MatrixError},
    missing::MissingPolicy,
    types::{Coord, DMatrix, DVector, Scalar},
    view::MatrixView,
};
use nalgebra::SVD;
use num_traits::Float;

use crate::solver::LowRankSolver;

/// Reason the solver stopped iterating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TerminationReason {
    /// Relative residual fell below the tolerance
    Converged,
    /// Relative residual stopped decreasing by more than the tolerance
    Stagnated,
    /// Iteration cap reached
    MaxIterations,
}

/// Status of a solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverReport<T: Scalar> {
    /// Number of completed sweeps over rows and columns
    pub iterations: usize,
    /// Final `‖P_Ω(XY - M)‖_F / ‖P_Ω(M)‖_F`
    pub residual: T,
    /// Why the solver stopped
    pub termination: TerminationReason,
    /// Wall-clock time spent in the solver
    pub duration: Duration,
}

impl<T: Scalar> SolverReport<T> {
    /// Returns `true` if the residual tolerance was met.
    pub fn converged(&self) -> bool {
        self.termination == TerminationReason::Converged
    }
}

/// Low-rank factors returned by [`AlternatingLeastSquares`].
#[derive(Debug, Clone)]
pub struct Factorization<T: Scalar> {
    /// Left factor `X` (m × k)
    pub left: DMatrix<T>,
    /// Right factor `Y` (k × n)
    pub right: DMatrix<T>,
    /// Solver status
    pub report: SolverReport<T>,
}

impl<T: Scalar> Factorization<T> {
    /// Rank of the factorization.
    pub fn rank(&self) -> usize {
        self.left.ncols()
    }

    /// Dense completed matrix `X·Y`.
    pub fn reconstruct(&self) -> DMatrix<T> {
        &self.left * &self.right
    }

    /// Copy of `view` with every missing cell replaced by its completed
    /// value. Known cells are kept as observed.
    pub fn fill_missing(
        &self,
        view: &MatrixView<T>,
        policy: &MissingPolicy<T>,
    ) -> CompletionResult<MatrixView<T>> {
        let completed = self.reconstruct();
        if completed.shape() != view.shape() {
            return Err(MatrixError::dimension_mismatch(
                format!("{:?}", view.shape()),
                format!("{:?}", completed.shape()),
            )
            .into());
        }

        let (rows, cols) = view.shape();
        let mut cells = Vec::new();
        for i in 0..rows {
            for j in 0..cols {
                if policy.is_missing(view[(i, j)]) {
                    cells.push(((i, j), completed[(i, j)]));
                }
            }
        }
        Ok(view.with_cells(cells)?)
    }
}

/// Configuration for the alternating least squares solver.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AlsConfig<T: Scalar> {
    /// Maximum number of sweeps
    pub max_iterations: usize,

    /// Relative residual tolerance
    pub tolerance: T,

    /// Ridge penalty λ on each factor row/column
    pub regularization: T,
}

impl<T: Scalar> Default for AlsConfig<T> {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: T::DEFAULT_TOLERANCE,
            regularization: T::DEFAULT_REGULARIZATION,
        }
    }
}

impl<T: Scalar> AlsConfig<T> {
    /// Creates a new configuration with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of sweeps.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the relative residual tolerance.
    pub fn with_tolerance(mut self, tolerance: T) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the ridge penalty.
    pub fn with_regularization(mut self, regularization: T) -> Self {
        self.regularization = regularization;
        self
    }

    /// Check every parameter is in range.
    pub fn validate(&self) -> CompletionResult<()> {
        if self.max_iterations == 0 {
            return Err(CompletionError::invalid_configuration(
                "max_iterations",
                "must be at least 1",
            ));
        }
        if !Float::is_finite(self.tolerance) || self.tolerance <= T::zero() {
            return Err(CompletionError::invalid_configuration(
                "tolerance",
                format!("must be positive and finite, got {}", self.tolerance),
            ));
        }
        if !Float::is_finite(self.regularization) || self.regularization < T::zero() {
            return Err(CompletionError::invalid_configuration(
                "regularization",
                format!("must be non-negative and finite, got {}", self.regularization),
            ));
        }
        Ok(())
    }
}

/// Fixed-rank completion by alternating ridge regressions.
#[derive(Debug, Clone, Default)]
pub struct AlternatingLeastSquares<T: Scalar> {
    config: AlsConfig<T>,
}

impl<T: Scalar> AlternatingLeastSquares<T> {
    /// Creates a solver with the given configuration.
    pub fn new(config: AlsConfig<T>) -> Self {
        Self { config }
    }

    /// Solver configuration.
    pub fn config(&self) -> &AlsConfig<T> {
        &self.config
    }
}

impl<T: Scalar> LowRankSolver<T> for AlternatingLeastSquares<T> {
    type Output = Factorization<T>;

    fn solve(
        &self,
        rows: usize,
        cols: usize,
        rank: usize,
        positions: &[Coord],
        values: &[T],
    ) -> CompletionResult<Factorization<T>> {
        self.config.validate()?;
        if rank == 0 || rank > rows.min(cols) {
            return Err(CompletionError::invalid_configuration(
                "rank",
                format!(
                    "rank {} must lie in 1..={} for a {}x{} matrix",
                    rank,
                    rows.min(cols),
                    rows,
                    cols
                ),
            ));
        }
        if positions.len() != values.len() {
            return Err(MatrixError::invariant_violation(format!(
                "{} positions but {} values",
                positions.len(),
                values.len()
            ))
            .into());
        }
        if positions.is_empty() {
            return Err(CompletionError::invalid_configuration(
                "observations",
                "at least one known entry is required",
            ));
        }

        let start = Instant::now();
        let mut by_row: Vec<Vec<(usize, T)>> = vec![Vec::new(); rows];
        let mut by_col: Vec<Vec<(usize, T)>> = vec![Vec::new(); cols];
        let mut observed = DMatrix::zeros(rows, cols);
        for (&(i, j), &value) in positions.iter().zip(values) {
            if i >= rows || j >= cols {
                return Err(MatrixError::index_out_of_bounds(i, j, (rows, cols)).into());
            }
            if !Float::is_finite(value) {
                return Err(MatrixError::numerical_error(format!(
                    "observation at ({}, {}) is not finite",
                    i, j
                ))
                .into());
            }
            by_row[i].push((j, value));
            by_col[j].push((i, value));
            observed[(i, j)] = value;
        }

        let (mut left, mut right) = initial_factors(&observed, rank)?;
        let norm = Float::sqrt(values.iter().fold(T::zero(), |acc, &v| acc + v * v));
        let scale = if norm > T::zero() { norm } else { T::one() };
        let lambda = self.config.regularization;
        let tolerance = self.config.tolerance;

        let mut residual = relative_residual(&left, &right, positions, values, scale);
        let mut termination = TerminationReason::MaxIterations;
        let mut iterations = 0;

        tracing::debug!(
            rows,
            cols,
            rank,
            observations = values.len(),
            initial_residual = Scalar::to_f64(residual),
            "starting alternating least squares"
        );

        for iteration in 1..=self.config.max_iterations {
            iterations = iteration;

            for (i, observations) in by_row.iter().enumerate() {
                let x = solve_ridge(observations, |j| right.column(j).into_owned(), rank, lambda)?;
                left.set_row(i, &x.transpose());
            }
            for (j, observations) in by_col.iter().enumerate() {
                let y = solve_ridge(observations, |i| left.row(i).transpose(), rank, lambda)?;
                right.set_column(j, &y);
            }

            let previous = residual;
            residual = relative_residual(&left, &right, positions, values, scale);
            tracing::trace!(iteration, residual = Scalar::to_f64(residual), "sweep");

            if !Float::is_finite(residual) {
                return Err(CompletionError::solver_failed(format!(
                    "residual became non-finite at iteration {}",
                    iteration
                )));
            }
            if residual <= tolerance {
                termination = TerminationReason::Converged;
                break;
            }
            if Float::abs(previous - residual) <= tolerance * previous {
                termination = TerminationReason::Stagnated;
                break;
            }
        }

        let report = SolverReport {
            iterations,
            residual,
            termination,
            duration: start.elapsed(),
        };
        tracing::info!(
            iterations,
            residual = Scalar::to_f64(residual),
            termination = ?termination,
            "alternating least squares finished"
        );

        Ok(Factorization {
            left,
            right,
            report,
        })
    }
}

/// Truncated SVD of the zero-filled observations, `X = U_k √Σ_k`,
/// `Y = √Σ_k V_kᵀ`.
fn initial_factors<T: Scalar>(
    observed: &DMatrix<T>,
    rank: usize,
) -> CompletionResult<(DMatrix<T>, DMatrix<T>)> {
    let svd = SVD::new(observed.clone(), true, true);
    let u = svd
        .u
        .ok_or_else(|| CompletionError::solver_failed("SVD failed to compute U"))?;
    let v_t = svd
        .v_t
        .ok_or_else(|| CompletionError::solver_failed("SVD failed to compute V^T"))?;

    let mut left = u.columns(0, rank).into_owned();
    let mut right = v_t.rows(0, rank).into_owned();
    for r in 0..rank {
        let weight = Float::sqrt(svd.singular_values[r]);
        left.column_mut(r).scale_mut(weight);
        right.row_mut(r).scale_mut(weight);
    }
    Ok((left, right))
}

/// Solve `(Σ f fᵀ + λI) x = Σ v f` over one row's or column's observations.
fn solve_ridge<T, F>(
    observations: &[(usize, T)],
    factor: F,
    rank: usize,
    lambda: T,
) -> CompletionResult<DVector<T>>
where
    T: Scalar,
    F: Fn(usize) -> DVector<T>,
{
    if observations.is_empty() {
        return Ok(DVector::zeros(rank));
    }

    let mut gram = DMatrix::<T>::identity(rank, rank) * lambda;
    let mut rhs = DVector::<T>::zeros(rank);
    for &(index, value) in observations {
        let f = factor(index);
        gram.ger(T::one(), &f, &f, T::one());
        rhs.axpy(value, &f, T::one());
    }

    if let Some(cholesky) = gram.clone().cholesky() {
        return Ok(cholesky.solve(&rhs));
    }
    gram.lu().solve(&rhs).ok_or_else(|| {
        CompletionError::solver_failed(
            "singular least-squares subproblem; increase the regularization",
        )
    })
}

fn relative_residual<T: Scalar>(
    left: &DMatrix<T>,
    right: &DMatrix<T>,
    positions: &[Coord],
    values: &[T],
    scale: T,
) -> T {
    let rank = left.ncols();
    let sum_sq = positions
        .iter()
        .zip(values)
        .fold(T::zero(), |acc, (&(i, j), &value)| {
            let estimate = (0..rank).fold(T::zero(), |s, r| s + left[(i, r)] * right[(r, j)]);
            let diff = estimate - value;
            acc + diff * diff
        });
    Float::sqrt(sum_sq) / scale
}
