//! Integration tests for the experiment pipeline.
//!
//! These tests verify:
//! - Seeded runs are reproducible
//! - Hidden entries of a low-rank table are recovered
//! - Monotone repair never turns missing cells into observations
//! - Dropping all-zero lines happens before masking

use approx::assert_relative_eq;
use matcomp::prelude::*;
use pretty_assertions::assert_eq;
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn low_rank_positive(rows: usize, cols: usize, seed: u64) -> MatrixView<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let left = DMatrix::from_fn(rows, 2, |_, _| {
        let x: f64 = StandardNormal.sample(&mut rng);
        x.abs() + 0.5
    });
    let right = DMatrix::from_fn(2, cols, |_, _| {
        let x: f64 = StandardNormal.sample(&mut rng);
        x.abs() + 0.5
    });
    MatrixView::from_matrix(left * right)
}

fn solver_config() -> AlsConfig<f64> {
    AlsConfig::new()
        .with_max_iterations(3000)
        .with_tolerance(1e-12)
        .with_regularization(1e-12)
}

#[test]
fn test_recovers_low_rank_table() {
    init_tracing();
    let view = low_rank_positive(18, 12, 5);
    let config = ExperimentConfig {
        hide_fraction: 0.25,
        seed: 11,
        rank: Some(2),
        solver: solver_config(),
        ..ExperimentConfig::default()
    };

    let outcome = Experiment::new(config).run(&view).unwrap();
    assert_eq!(outcome.hidden.len(), 54);
    assert!(outcome.report.is_none());
    let rmse = outcome.rmse.unwrap();
    assert!(rmse < 1e-2, "rmse too large: {rmse}");

    // Known cells are kept as observed.
    for (i, j) in outcome.observed.known(&MissingPolicy::zero()) {
        assert_eq!(outcome.completed[(i, j)], view[(i, j)]);
    }
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let view = low_rank_positive(8, 6, 1);
    let config = ExperimentConfig {
        hide_fraction: 0.5,
        seed: 3,
        rank: Some(2),
        ..ExperimentConfig::default()
    };

    let a = Experiment::new(config.clone()).run(&view).unwrap();
    let b = Experiment::new(config).run(&view).unwrap();
    assert_eq!(a.hidden, b.hidden);
    assert!(a.observed.is_identical_to(&b.observed));
}

#[test]
fn test_repair_keeps_missing_cells_missing() {
    init_tracing();
    let view = MatrixView::from_rows(vec![
        vec![1.0, 5.0, 2.0],
        vec![3.0, 4.0, 2.5],
        vec![2.0, 6.0, 3.0],
        vec![4.0, 7.0, 1.0],
        vec![5.0, 8.0, 6.0],
    ])
    .unwrap();
    let config = ExperimentConfig {
        hide_fraction: 0.2,
        seed: 21,
        enforce: Some(Orientation::AlongColumns),
        emit_report: true,
        rank: Some(1),
        ..ExperimentConfig::default()
    };

    let outcome = Experiment::new(config).run(&view).unwrap();
    let policy = MissingPolicy::zero();

    // Hidden cells are still missing after repair.
    for (coord, _) in outcome.hidden.iter() {
        assert_eq!(outcome.observed[coord], 0.0);
    }
    assert_eq!(
        outcome.observed.known(&policy).len(),
        view.known(&policy).len() - outcome.hidden.len()
    );

    // Known cells of repaired columns are non-decreasing.
    let report = outcome.report.unwrap();
    for column in report.lines() {
        let known: Vec<f64> = outcome
            .observed
            .line(Orientation::AlongColumns, column)
            .into_iter()
            .filter(|&v| policy.is_known(v))
            .collect();
        assert!(known.windows(2).all(|w| w[1] >= w[0] - 1e-9), "{known:?}");
    }
}

#[test]
fn test_drops_zero_lines_before_masking() {
    let view = MatrixView::from_rows(vec![
        vec![1.0, 0.0, 2.0],
        vec![0.0, 0.0, 0.0],
        vec![3.0, 0.0, 6.0],
    ])
    .unwrap();
    let config = ExperimentConfig {
        hide_fraction: 0.0,
        drop_zero_rows: true,
        drop_zero_cols: true,
        rank: Some(1),
        ..ExperimentConfig::default()
    };

    let outcome = Experiment::new(config).run(&view).unwrap();
    assert_eq!(outcome.observed.shape(), (2, 2));
    assert_eq!(outcome.observed.row_labels(), &["0", "2"]);
    assert_eq!(outcome.observed.col_labels(), &["0", "2"]);
    assert!(outcome.hidden.is_empty());
    assert!(outcome.rmse.is_none());
    assert_relative_eq!(outcome.completed[(1, 1)], 6.0);
}

#[test]
fn test_config_from_file() {
    let dir = std::env::temp_dir().join("matcomp-config-test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("experiment.toml");
    std::fs::write(&path, "hide_fraction = 0.1\nseed = 9\n").unwrap();

    let config = ExperimentConfig::from_file(&path).unwrap();
    assert_eq!(config.seed, 9);
    assert_relative_eq!(config.hide_fraction, 0.1);

    let missing = dir.join("does-not-exist.toml");
    assert!(matches!(
        ExperimentConfig::from_file(&missing),
        Err(CompletionError::Config(_))
    ));
}
