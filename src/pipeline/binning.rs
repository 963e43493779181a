//! Shared binning types: bin labels, per-bin records, the WoE/IV formula,
//! and the [`Binner`] seam the dispatcher calls through.

use polars::prelude::*;
use serde::{Serialize, Serializer};
use std::fmt;

use super::outcome::Outcome;
use crate::error::{IvError, IvResult};

/// Label printed for the missing-value bin
pub const MISSING_LABEL: &str = "NA";

/// Default complexity threshold (relative impurity decrease a split must reach)
const DEFAULT_COMPLEXITY: f64 = 1e-7;

/// Default minimum bin size as a percentage of analysed rows
const DEFAULT_MIN_BUCKET_PCT: f64 = 10.0;

/// Default maximum tree depth
const DEFAULT_MAX_DEPTH: usize = 30;

/// Variable type used for binner dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VariableKind {
    Numeric,
    Categorical,
}

impl VariableKind {
    /// Resolve the kind from a column dtype. Only primitive numerics are
    /// binned as intervals; strings, booleans, categoricals and anything
    /// else are treated as categories.
    pub fn of(dtype: &DataType) -> Self {
        if dtype.is_primitive_numeric() {
            VariableKind::Numeric
        } else {
            VariableKind::Categorical
        }
    }
}

impl fmt::Display for VariableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableKind::Numeric => write!(f, "numeric"),
            VariableKind::Categorical => write!(f, "categorical"),
        }
    }
}

/// Identity of a bin
#[derive(Debug, Clone, PartialEq)]
pub enum BinLabel {
    /// Half-open numeric interval `[lower, upper)`
    Interval { lower: f64, upper: f64 },
    /// A single category value
    Category(String),
    /// Rows where the variable is missing
    Missing,
}

impl BinLabel {
    /// Whether a numeric value falls inside this bin
    pub fn contains(&self, value: f64) -> bool {
        match self {
            BinLabel::Interval { lower, upper } => value >= *lower && value < *upper,
            _ => false,
        }
    }
}

impl fmt::Display for BinLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinLabel::Interval { lower, upper } => write!(f, "[{},{})", lower, upper),
            BinLabel::Category(value) => write!(f, "{}", value),
            BinLabel::Missing => write!(f, "{}", MISSING_LABEL),
        }
    }
}

impl Serialize for BinLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One bin of one variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinRecord {
    /// Name of the source variable
    pub variable: String,
    /// Interval, category or missing marker
    pub bin_label: BinLabel,
    /// Rows in this bin with outcome = 0
    pub outcome_0: u64,
    /// Rows in this bin with outcome = 1
    pub outcome_1: u64,
    /// Weight of Evidence, 0 for degenerate bins
    pub woe: f64,
    /// Marginal contribution to Information Value
    pub miv: f64,
}

impl BinRecord {
    /// Build a record, computing WoE and `miv` against the variable's totals
    pub fn new(
        variable: &str,
        bin_label: BinLabel,
        outcome_0: u64,
        outcome_1: u64,
        total_0: u64,
        total_1: u64,
    ) -> Self {
        let (woe, miv) = calculate_woe_iv(outcome_0, outcome_1, total_0, total_1);
        Self {
            variable: variable.to_string(),
            bin_label,
            outcome_0,
            outcome_1,
            woe,
            miv,
        }
    }

    /// Bin population
    pub fn count(&self) -> u64 {
        self.outcome_0 + self.outcome_1
    }

    /// A bin holding only one outcome class
    pub fn is_zero_bin(&self) -> bool {
        self.outcome_0 == 0 || self.outcome_1 == 0
    }
}

/// Calculate WoE and IV contribution for a bin
///
/// `woe = ln(pct_1 / pct_0)`, `miv = (pct_1 - pct_0) * woe`, where the
/// shares are taken against the variable's outcome totals. A bin with no
/// observations of one class has `woe = 0` and `miv = 0`.
pub fn calculate_woe_iv(outcome_0: u64, outcome_1: u64, total_0: u64, total_1: u64) -> (f64, f64) {
    if outcome_0 == 0 || outcome_1 == 0 {
        return (0.0, 0.0);
    }

    let pct_0 = outcome_0 as f64 / total_0 as f64;
    let pct_1 = outcome_1 as f64 / total_1 as f64;

    let woe = (pct_1 / pct_0).ln();
    (woe, (pct_1 - pct_0) * woe)
}

/// Configuration for the numeric tree binner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BinningConfig {
    /// Minimum impurity decrease, relative to the root, for a split to be kept
    pub complexity: f64,
    /// Minimum bin size as a percentage of analysed rows (0-50]
    pub min_bucket_pct: f64,
    /// Maximum depth of the split tree
    pub max_depth: usize,
}

impl Default for BinningConfig {
    fn default() -> Self {
        Self {
            complexity: DEFAULT_COMPLEXITY,
            min_bucket_pct: DEFAULT_MIN_BUCKET_PCT,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl BinningConfig {
    pub fn validate(&self) -> IvResult<()> {
        if !(0.0..=1.0).contains(&self.complexity) {
            return Err(IvError::InvalidConfig(format!(
                "complexity must be between 0.0 and 1.0, got {}",
                self.complexity
            )));
        }
        if !(self.min_bucket_pct > 0.0 && self.min_bucket_pct <= 50.0) {
            return Err(IvError::InvalidConfig(format!(
                "min_bucket_pct must be in (0, 50], got {}",
                self.min_bucket_pct
            )));
        }
        if self.max_depth == 0 {
            return Err(IvError::InvalidConfig("max_depth must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Minimum rows per bin for a variable with `n` analysed rows
    pub fn min_bucket(&self, n: usize) -> usize {
        ((n as f64 * self.min_bucket_pct / 100.0).ceil() as usize).max(1)
    }
}

/// Splits one variable into bins with per-bin outcome counts.
///
/// Implementations must partition the rows they analyse (no overlap, no
/// omission) and compute `miv` with [`calculate_woe_iv`].
pub trait Binner: Send + Sync {
    fn bin(&self, df: &DataFrame, variable: &str, outcome: &Outcome) -> IvResult<Vec<BinRecord>>;
}
