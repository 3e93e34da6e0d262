//! Error types for matrix views, masking and completion.
//!
//! This module defines the error types shared by the masking engine, the
//! monotonicity tools and the completion adapter.

use thiserror::Error;

/// Errors that can occur while building or transforming a matrix view.
#[derive(Debug, Clone, Error)]
pub enum MatrixError {
    /// An argument is outside its valid domain.
    ///
    /// Raised for fractions outside `[0, 1]`, ragged input rows, empty
    /// regression inputs and similar malformed requests.
    #[error("Invalid argument `{parameter}`: {reason}")]
    InvalidArgument {
        /// Name of the offending parameter
        parameter: String,
        /// Description of why the argument is invalid
        reason: String,
    },

    /// Dimension mismatch between inputs.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected dimensions
        expected: String,
        /// Actual dimensions
        actual: String,
    },

    /// A cell coordinate lies outside the view.
    #[error("Index ({row}, {col}) is out of bounds for a {rows}x{cols} matrix")]
    IndexOutOfBounds {
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Number of rows in the view
        rows: usize,
        /// Number of columns in the view
        cols: usize,
    },

    /// Numerical failure, such as a decomposition over non-finite values.
    #[error("Numerical error: {reason}")]
    NumericalError {
        /// Description of the numerical issue
        reason: String,
    },

    /// Internal invariant violated.
    ///
    /// Never expected for correctly constructed inputs; indicates a bug.
    #[error("Internal invariant violated: {reason}")]
    InvariantViolation {
        /// Description of the broken invariant
        reason: String,
    },
}

impl MatrixError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument<S1, S2>(parameter: S1, reason: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::InvalidArgument {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a DimensionMismatch error.
    pub fn dimension_mismatch<S1, S2>(expected: S1, actual: S2) -> Self
    where
        S1: std::fmt::Display,
        S2: std::fmt::Display,
    {
        Self::DimensionMismatch {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    /// Create an IndexOutOfBounds error.
    pub fn index_out_of_bounds(row: usize, col: usize, shape: (usize, usize)) -> Self {
        Self::IndexOutOfBounds {
            row,
            col,
            rows: shape.0,
            cols: shape.1,
        }
    }

    /// Create a NumericalError with a custom reason.
    pub fn numerical_error<S: Into<String>>(reason: S) -> Self {
        Self::NumericalError {
            reason: reason.into(),
        }
    }

    /// Create an InvariantViolation error.
    pub fn invariant_violation<S: Into<String>>(reason: S) -> Self {
        Self::InvariantViolation {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while preparing or running a completion.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// Propagated matrix error.
    #[error("Matrix operation failed: {0}")]
    Matrix(#[from] MatrixError),

    /// The low-rank solver reported a failure.
    #[error("Solver failed: {reason}")]
    SolverFailed {
        /// Description of the solver failure
        reason: String,
    },

    /// Invalid solver or experiment configuration.
    #[error("Invalid configuration `{parameter}`: {reason}")]
    InvalidConfiguration {
        /// Name of the invalid parameter
        parameter: String,
        /// Description of the configuration error
        reason: String,
    },

    /// Configuration text could not be parsed.
    #[error("Configuration parse error: {0}")]
    Config(String),
}

impl CompletionError {
    /// Create a SolverFailed error.
    pub fn solver_failed<S: Into<String>>(reason: S) -> Self {
        Self::SolverFailed {
            reason: reason.into(),
        }
    }

    /// Create an InvalidConfiguration error.
    pub fn invalid_configuration<S1, S2>(parameter: S1, reason: S2) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        Self::InvalidConfiguration {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for operations that can produce MatrixError.
pub type Result<T> = std::result::Result<T, MatrixError>;

/// Result type alias for completion operations.
pub type CompletionResult<T> = std::result::Result<T, CompletionError>;
