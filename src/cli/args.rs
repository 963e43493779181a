//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{BinningConfig, IvOptions, OutcomeMapping};

/// ivscreen - Rank predictors by Information Value against a binary outcome
#[derive(Parser, Debug)]
#[command(name = "ivscreen")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Input file path (CSV or Parquet)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Outcome column name (binary 0/1, or mapped with --event-value/--non-event-value).
    /// If not provided, will be selected interactively from available columns.
    #[arg(short = 'y', long, visible_alias = "target")]
    pub outcome: Option<String>,

    /// Value in the outcome column that represents EVENT (maps to 1).
    #[arg(long, requires = "non_event_value")]
    pub event_value: Option<String>,

    /// Value in the outcome column that represents NON-EVENT (maps to 0).
    #[arg(long, requires = "event_value")]
    pub non_event_value: Option<String>,

    /// Print one ranked row per variable instead of the per-bin detail
    #[arg(short, long, default_value = "false")]
    pub summary: bool,

    /// Variables to analyse (comma-separated). Defaults to every column except the outcome.
    #[arg(long, value_delimiter = ',')]
    pub vars: Vec<String>,

    /// Log each variable as it is binned
    #[arg(short, long, default_value = "false")]
    pub verbose: bool,

    /// Complexity threshold for numeric binning (0.0 to 1.0).
    /// A split is kept only if it removes at least this share of the root impurity.
    #[arg(long, default_value = "1e-7", value_parser = validate_complexity)]
    pub complexity: f64,

    /// Minimum bin size as percentage of analysed rows for numeric binning (0-50].
    #[arg(long, default_value = "10.0", value_parser = validate_min_bucket_pct)]
    pub min_bucket_pct: f64,

    /// Maximum depth of the numeric split tree
    #[arg(long, default_value = "30", value_parser = clap::value_parser!(u16).range(1..))]
    pub max_depth: u16,

    /// Write the result table to this file (CSV or Parquet, determined by extension)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Write the full analysis (metadata, summary and bins) as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write the dataset with an added `<variable>_woe` column per variable
    #[arg(long)]
    pub woe_output: Option<PathBuf>,

    /// Skip interactive prompts
    #[arg(long, default_value = "false")]
    pub no_confirm: bool,

    /// Number of rows to use for schema inference (CSV only).
    /// Use 0 for full table scan (very slow for large files).
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,
}

impl Cli {
    /// Numeric binning configuration from the flags
    pub fn binning_config(&self) -> BinningConfig {
        BinningConfig {
            complexity: self.complexity,
            min_bucket_pct: self.min_bucket_pct,
            max_depth: self.max_depth as usize,
        }
    }

    /// Outcome mapping, when both values are given
    pub fn outcome_mapping(&self) -> Option<OutcomeMapping> {
        match (&self.event_value, &self.non_event_value) {
            (Some(event), Some(non_event)) => Some(OutcomeMapping::new(event, non_event)),
            _ => None,
        }
    }

    /// Options for the run; `summary` mirrors the flag
    pub fn iv_options(&self, mapping: Option<OutcomeMapping>) -> IvOptions {
        IvOptions {
            summary: self.summary,
            variables: if self.vars.is_empty() {
                None
            } else {
                Some(self.vars.clone())
            },
            verbose: self.verbose,
            binning: Some(self.binning_config()),
            outcome_mapping: mapping,
        }
    }
}

/// Validator for the complexity parameter
fn validate_complexity(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if !(0.0..=1.0).contains(&value) {
        Err(format!("complexity must be between 0.0 and 1.0, got {}", value))
    } else {
        Ok(value)
    }
}

/// Validator for the min_bucket_pct parameter
fn validate_min_bucket_pct(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;

    if value <= 0.0 || value > 50.0 {
        Err(format!(
            "min_bucket_pct must be greater than 0.0 and at most 50.0, got {}",
            value
        ))
    } else {
        Ok(value)
    }
}
