//! End-to-end tests for the completion adapter and the ALS solver.
//!
//! These tests verify:
//! - Coordinate/value alignment of the sequences handed to a solver
//! - Recovery of hidden entries of a random low-rank matrix
//! - Pass-through of ranks the solver rejects

use approx::assert_relative_eq;
use matcomp_core::prelude::*;
use matcomp_solver::prelude::*;
use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

/// Random `rows x cols` matrix of exact rank `rank`.
fn random_low_rank(rows: usize, cols: usize, rank: usize, seed: u64) -> DMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let left: DMatrix<f64> = DMatrix::from_fn(rows, rank, |_, _| StandardNormal.sample(&mut rng));
    let right: DMatrix<f64> = DMatrix::from_fn(rank, cols, |_, _| StandardNormal.sample(&mut rng));
    left * right
}

#[test]
fn test_problem_alignment_for_diagonal() {
    let view = MatrixView::from_rows(vec![
        vec![1.0, 0.0, 0.0],
        vec![0.0, 2.0, 0.0],
        vec![0.0, 0.0, 3.0],
    ])
    .unwrap();
    let problem = CompletionAdapter::new(MissingPolicy::zero())
        .problem(&view)
        .unwrap();

    assert_eq!(problem.len(), 3);
    assert_eq!(problem.row_indices().len(), problem.values().len());
    assert_eq!(problem.col_indices().len(), problem.values().len());
    for (k, (i, j)) in problem.positions().into_iter().enumerate() {
        assert_eq!(problem.values()[k], view[(i, j)]);
    }
}

#[test]
fn test_recovers_hidden_entries_of_low_rank_matrix() {
    let full = random_low_rank(20, 15, 2, 17);
    let view = MatrixView::from_matrix(full);
    let policy = MissingPolicy::NotANumber;

    let mut rng = StdRng::seed_from_u64(99);
    let (masked, hidden) = view.hide_entries(0.25, &policy, &mut rng).unwrap();
    assert_eq!(hidden.len(), 75);

    let solver = AlternatingLeastSquares::new(
        AlsConfig::<f64>::new()
            .with_max_iterations(3000)
            .with_tolerance(1e-12)
            .with_regularization(1e-12),
    );
    let factors = CompletionAdapter::new(policy)
        .with_rank(2)
        .complete(&masked, &solver)
        .unwrap();

    let completed = factors.reconstruct();
    let rmse = hidden.rmse(&completed).unwrap().unwrap();
    assert!(rmse < 1e-3, "rmse too large: {rmse}");

    let filled = factors.fill_missing(&masked, &policy).unwrap();
    for ((i, j), truth) in hidden.iter() {
        assert_relative_eq!(filled[(i, j)], truth, epsilon = 1e-2);
    }
}

#[test]
fn test_estimated_rank_on_sentinel_grid() {
    let full = random_low_rank(6, 5, 2, 3);
    let view = MatrixView::from_matrix(full);
    let adapter = CompletionAdapter::new(MissingPolicy::zero());
    assert_eq!(adapter.resolve_rank(&view).unwrap(), 2);
}

#[test]
fn test_oversized_rank_is_the_solvers_failure() {
    let view = MatrixView::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let err = CompletionAdapter::new(MissingPolicy::zero())
        .with_rank(5)
        .complete(&view, &AlternatingLeastSquares::<f64>::default())
        .unwrap_err();
    assert!(matches!(
        err,
        CompletionError::InvalidConfiguration { ref parameter, .. } if parameter == "rank"
    ));
}
