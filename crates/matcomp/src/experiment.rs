//! Configuration-driven completion experiments.
//!
//! An experiment takes a fully or partially observed table, optionally
//! drops all-zero rows and columns, hides a random fraction of the known
//! entries, optionally repairs monotonicity, completes the masked matrix
//! with alternating least squares and scores the result on the hidden
//! cells.
//!
//! # Example
//!
//! ```
//! use matcomp::prelude::*;
//!
//! let config = ExperimentConfig::from_toml_str(
//!     r#"
//!     hide_fraction = 0.25
//!     seed = 7
//!     rank = 1
//!
//!     [solver]
//!     tolerance = 1e-10
//!     "#,
//! )
//! .unwrap();
//!
//! let view = MatrixView::from_rows(vec![
//!     vec![1.0, 2.0, 3.0, 4.0],
//!     vec![2.0, 4.0, 6.0, 8.0],
//!     vec![3.0, 6.0, 9.0, 12.0],
//!     vec![4.0, 8.0, 12.0, 16.0],
//! ])
//! .unwrap();
//!
//! let outcome = Experiment::new(config).run(&view).unwrap();
//! assert_eq!(outcome.hidden.len(), 4);
//! ```

use std::path::Path;

use matcomp_core::{
    enforce::IsotonicEnforcer,
    error::{CompletionError, CompletionResult},
    masking::{hide_count, HiddenEntries},
    missing::MissingPolicy,
    monotonic::{MonotonicityAnalyzer, MonotonicityReport, SeedPolicy},
    types::Orientation,
    view::MatrixView,
};
use matcomp_solver::{AlsConfig, AlternatingLeastSquares, CompletionAdapter, Factorization};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Settings for a single experiment run.
///
/// Every field has a default, so a TOML document only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// How missing cells are represented
    pub missing: MissingPolicy<f64>,

    /// Fraction of known entries to hide
    pub hide_fraction: f64,

    /// Seed for the masking generator
    pub seed: u64,

    /// Drop rows whose cells all equal zero before masking
    pub drop_zero_rows: bool,

    /// Drop columns whose cells all equal zero before masking
    pub drop_zero_cols: bool,

    /// Orientation to repair after masking, if any
    pub enforce: Option<Orientation>,

    /// Seed policy of the monotonicity scan
    pub seed_policy: SeedPolicy,

    /// Log a summary of non-monotone lines
    pub emit_report: bool,

    /// Completion rank; estimated from the masked grid when absent
    pub rank: Option<usize>,

    /// Solver settings
    pub solver: AlsConfig<f64>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            missing: MissingPolicy::zero(),
            hide_fraction: 0.2,
            seed: 0,
            drop_zero_rows: false,
            drop_zero_cols: false,
            enforce: None,
            seed_policy: SeedPolicy::FirstCell,
            emit_report: false,
            rank: None,
            solver: AlsConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> CompletionResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| CompletionError::Config(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> CompletionResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CompletionError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Check every setting is in range.
    pub fn validate(&self) -> CompletionResult<()> {
        hide_count(self.hide_fraction, 0)?;
        self.solver.validate()
    }
}

/// Results of an experiment run.
#[derive(Debug, Clone)]
pub struct ExperimentOutcome {
    /// Masked (and possibly repaired) view handed to the solver
    pub observed: MatrixView<f64>,
    /// Ground truth of the hidden cells
    pub hidden: HiddenEntries<f64>,
    /// Monotonicity report of the masked view, when repair was requested
    pub report: Option<MonotonicityReport>,
    /// Raw solver output
    pub factors: Factorization<f64>,
    /// Observed view with every missing cell filled from the factors
    pub completed: MatrixView<f64>,
    /// Root-mean-square error over the hidden cells
    pub rmse: Option<f64>,
}

/// Runs the masking, repair and completion pipeline.
#[derive(Debug, Clone, Default)]
pub struct Experiment {
    config: ExperimentConfig,
}

impl Experiment {
    /// Creates an experiment with the given configuration.
    pub fn new(config: ExperimentConfig) -> Self {
        Self { config }
    }

    /// Experiment configuration.
    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Run the experiment on `source`.
    pub fn run(&self, source: &MatrixView<f64>) -> CompletionResult<ExperimentOutcome> {
        let config = &self.config;
        config.validate()?;
        let policy = config.missing;

        let mut view = source.clone();
        if config.drop_zero_rows {
            view = view.drop_zero_rows(0.0);
        }
        if config.drop_zero_cols {
            view = view.drop_zero_cols(0.0);
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let (masked, hidden) = view.hide_entries(config.hide_fraction, &policy, &mut rng)?;

        let (observed, report) = match config.enforce {
            Some(orientation) => {
                let (repaired, report) = self.repair(&masked, orientation)?;
                (repaired, Some(report))
            }
            None => (masked, None),
        };

        let solver = AlternatingLeastSquares::new(config.solver.clone());
        let mut adapter = CompletionAdapter::new(policy);
        if let Some(rank) = config.rank {
            adapter = adapter.with_rank(rank);
        }
        let factors = adapter.complete(&observed, &solver)?;

        let completed = factors.fill_missing(&observed, &policy)?;
        let rmse = hidden.rmse(completed.grid())?;
        tracing::info!(
            rows = observed.nrows(),
            cols = observed.ncols(),
            hidden = hidden.len(),
            rank = factors.rank(),
            rmse = ?rmse,
            "experiment finished"
        );

        Ok(ExperimentOutcome {
            observed,
            hidden,
            report,
            factors,
            completed,
            rmse,
        })
    }

    /// Repair lines of the masked view, then put the missing marker back on
    /// every cell that was missing so fitted values never become
    /// observations.
    fn repair(
        &self,
        masked: &MatrixView<f64>,
        orientation: Orientation,
    ) -> CompletionResult<(MatrixView<f64>, MonotonicityReport)> {
        let policy = self.config.missing;
        let analyzer = MonotonicityAnalyzer::new(policy)
            .with_seed_policy(self.config.seed_policy)
            .with_report(self.config.emit_report);
        let enforcer = IsotonicEnforcer::new(policy).with_analyzer(analyzer);
        let report = enforcer.analyzer().scan(masked, orientation);
        let repaired = enforcer.enforce_with_report(masked, orientation, &report)?;

        let marker = policy.marker();
        let missing = (0..masked.nrows())
            .flat_map(|i| (0..masked.ncols()).map(move |j| (i, j)))
            .filter(|&coord| policy.is_missing(masked[coord]))
            .map(|coord| (coord, marker));
        Ok((repaired.with_cells(missing)?, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_from_empty_toml() {
        let config = ExperimentConfig::from_toml_str("").unwrap();
        assert_eq!(config, ExperimentConfig::default());
    }

    #[test]
    fn test_parses_full_config() {
        let config = ExperimentConfig::from_toml_str(
            r#"
            missing = "not_a_number"
            hide_fraction = 0.5
            seed = 42
            drop_zero_rows = true
            enforce = "along_columns"
            seed_policy = "first_known"
            emit_report = true
            rank = 3

            [solver]
            max_iterations = 50
            regularization = 0.001
            "#,
        )
        .unwrap();

        assert_eq!(config.missing, MissingPolicy::NotANumber);
        assert_eq!(config.enforce, Some(Orientation::AlongColumns));
        assert_eq!(config.seed_policy, SeedPolicy::FirstKnown);
        assert_eq!(config.rank, Some(3));
        assert_eq!(config.solver.max_iterations, 50);
        assert_eq!(config.solver.tolerance, AlsConfig::<f64>::default().tolerance);
    }

    #[test]
    fn test_sentinel_policy_table() {
        let config = ExperimentConfig::from_toml_str("missing = { sentinel = -1.0 }").unwrap();
        assert_eq!(config.missing, MissingPolicy::Sentinel(-1.0));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            ExperimentConfig::from_toml_str("hide_fraction = 2.0"),
            Err(CompletionError::Matrix(_))
        ));
        assert!(matches!(
            ExperimentConfig::from_toml_str("hide_fraction = \"half\""),
            Err(CompletionError::Config(_))
        ));
        assert!(ExperimentConfig::from_toml_str("[solver]\nmax_iterations = 0").is_err());
    }
}
