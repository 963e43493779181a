//! Error types for IV/WoE computation.
//!
//! Input-validation failures are raised before any binning happens and are
//! reported straight to the caller. Degenerate bins are never errors; they
//! show up as data (`zero_bins`, `miv = 0`).

use thiserror::Error;

/// Errors returned by the IV engine.
#[derive(Error, Debug)]
pub enum IvError {
    /// The outcome column is not part of the dataset.
    #[error("Outcome column '{0}' not found in dataset")]
    MissingColumn(String),

    /// A requested variable is not part of the dataset.
    #[error("Variable '{0}' not found in dataset")]
    UnknownVariable(String),

    /// No variables are left to analyse once the outcome column is excluded.
    #[error("No variables to analyse: dataset only holds the outcome column")]
    EmptyVariableList,

    /// The outcome column was requested as a predictor.
    #[error("Outcome column '{0}' cannot be analysed as a variable")]
    OutcomeAsVariable(String),

    /// The outcome column holds something other than 0/1.
    #[error("Outcome column '{column}' must be binary (0/1), found value '{value}'")]
    NonBinaryOutcome { column: String, value: String },

    /// An outcome mapping that does not fit the outcome column.
    #[error("Invalid outcome mapping for column '{column}': {reason}")]
    InvalidMapping { column: String, reason: String },

    /// Binning configuration out of range.
    #[error("Invalid binning configuration: {0}")]
    InvalidConfig(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

/// Result alias used throughout the library.
pub type IvResult<T> = std::result::Result<T, IvError>;
