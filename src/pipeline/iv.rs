//! Information Value (IV) screening across variables
//!
//! The dispatcher resolves the variable list, sends every variable to the
//! binner matching its type, and concatenates the per-bin records. In summary
//! mode the records are reduced to one ranked row per variable with a
//! strength label.

use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

use super::binning::{BinRecord, Binner, BinningConfig, VariableKind};
use super::categorical::CategoryBinner;
use super::outcome::{Outcome, OutcomeMapping};
use super::tree::TreeBinner;
use crate::error::{IvError, IvResult};

/// Options for a single IV computation
#[derive(Debug, Clone, Default)]
pub struct IvOptions {
    /// Reduce the detail table to one row per variable
    pub summary: bool,
    /// Variables to analyse; `None` means every column except the outcome
    pub variables: Option<Vec<String>>,
    /// Trace each variable at info level instead of debug
    pub verbose: bool,
    /// Numeric binner configuration; `None` uses the defaults
    pub binning: Option<BinningConfig>,
    /// Map a non-binary outcome column to 0/1
    pub outcome_mapping: Option<OutcomeMapping>,
}

/// Strength of a variable, derived from its Information Value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Strength {
    #[serde(rename = "Suspicious")]
    Suspicious,
    #[serde(rename = "Very strong")]
    VeryStrong,
    #[serde(rename = "Strong")]
    Strong,
    #[serde(rename = "Average")]
    Average,
    #[serde(rename = "Weak")]
    Weak,
    #[serde(rename = "Very weak")]
    VeryWeak,
}

impl Strength {
    /// Classify an IV. Lower bounds are inclusive; NaN and negative values
    /// fall through to `VeryWeak`.
    pub fn from_iv(iv: f64) -> Self {
        if iv >= 1.0 {
            Strength::Suspicious
        } else if iv >= 0.5 {
            Strength::VeryStrong
        } else if iv >= 0.2 {
            Strength::Strong
        } else if iv >= 0.1 {
            Strength::Average
        } else if iv >= 0.02 {
            Strength::Weak
        } else {
            Strength::VeryWeak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strength::Suspicious => "Suspicious",
            Strength::VeryStrong => "Very strong",
            Strength::Strong => "Strong",
            Strength::Average => "Average",
            Strength::Weak => "Weak",
            Strength::VeryWeak => "Very weak",
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the summary table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSummary {
    pub variable: String,
    /// Sum of `miv` over the variable's bins
    pub information_value: f64,
    pub bins: usize,
    /// Bins holding only one outcome class
    pub zero_bins: usize,
    pub strength: Strength,
}

/// Result of [`compute_iv`]
#[derive(Debug, Clone, PartialEq)]
pub enum IvTable {
    /// One row per bin per variable, in variable order
    Detail(Vec<BinRecord>),
    /// One row per variable, sorted by IV descending
    Summary(Vec<VariableSummary>),
}

impl IvTable {
    pub fn len(&self) -> usize {
        match self {
            IvTable::Detail(records) => records.len(),
            IvTable::Summary(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render as a polars DataFrame.
    ///
    /// Detail: `variable, bin_label, outcome_0, outcome_1, miv`.
    /// Summary: `Variable, InformationValue, Bins, ZeroBins, Strength`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        match self {
            IvTable::Detail(records) => DataFrame::new(vec![
                Column::new(
                    "variable".into(),
                    records.iter().map(|r| r.variable.as_str()).collect::<Vec<_>>(),
                ),
                Column::new(
                    "bin_label".into(),
                    records.iter().map(|r| r.bin_label.to_string()).collect::<Vec<_>>(),
                ),
                Column::new(
                    "outcome_0".into(),
                    records.iter().map(|r| r.outcome_0).collect::<Vec<_>>(),
                ),
                Column::new(
                    "outcome_1".into(),
                    records.iter().map(|r| r.outcome_1).collect::<Vec<_>>(),
                ),
                Column::new("miv".into(), records.iter().map(|r| r.miv).collect::<Vec<_>>()),
            ]),
            IvTable::Summary(rows) => DataFrame::new(vec![
                Column::new(
                    "Variable".into(),
                    rows.iter().map(|r| r.variable.as_str()).collect::<Vec<_>>(),
                ),
                Column::new(
                    "InformationValue".into(),
                    rows.iter().map(|r| r.information_value).collect::<Vec<_>>(),
                ),
                Column::new(
                    "Bins".into(),
                    rows.iter().map(|r| r.bins as u64).collect::<Vec<_>>(),
                ),
                Column::new(
                    "ZeroBins".into(),
                    rows.iter().map(|r| r.zero_bins as u64).collect::<Vec<_>>(),
                ),
                Column::new(
                    "Strength".into(),
                    rows.iter().map(|r| r.strength.label()).collect::<Vec<_>>(),
                ),
            ]),
        }
    }
}

/// Dispatches variables to a numeric and a categorical binner
pub struct IvEngine {
    /// `None` builds a [`TreeBinner`] from `IvOptions::binning` on each run
    numeric: Option<Box<dyn Binner>>,
    categorical: Box<dyn Binner>,
}

impl IvEngine {
    /// Engine with the tree binner and the category binner. The tree binner
    /// is configured per run from `IvOptions::binning`.
    pub fn new() -> Self {
        Self {
            numeric: None,
            categorical: Box::new(CategoryBinner),
        }
    }

    /// Engine with caller-supplied binners. Runs on this engine reject
    /// `IvOptions::binning`, which only configures the built-in tree binner.
    pub fn with_binners(numeric: Box<dyn Binner>, categorical: Box<dyn Binner>) -> Self {
        Self {
            numeric: Some(numeric),
            categorical,
        }
    }

    /// Run the computation
    pub fn run(
        &self,
        df: &DataFrame,
        outcome_column: &str,
        options: &IvOptions,
    ) -> IvResult<IvTable> {
        let records = self.bin_all(df, outcome_column, options)?;

        if options.summary {
            Ok(IvTable::Summary(summarize(&records)))
        } else {
            Ok(IvTable::Detail(records))
        }
    }

    /// Validate the request and bin every variable, concatenating the
    /// records in variable order. `options.summary` is not consulted.
    pub fn bin_all(
        &self,
        df: &DataFrame,
        outcome_column: &str,
        options: &IvOptions,
    ) -> IvResult<Vec<BinRecord>> {
        let tree;
        let numeric: &dyn Binner = match (&self.numeric, &options.binning) {
            (Some(_), Some(_)) => {
                return Err(IvError::InvalidConfig(
                    "binning options apply to the built-in tree binner only".to_string(),
                ))
            }
            (Some(binner), None) => binner.as_ref(),
            (None, config) => {
                let config = config.clone().unwrap_or_default();
                config.validate()?;
                tree = TreeBinner::new(config);
                &tree
            }
        };

        let plan = resolve_variables(df, outcome_column, options.variables.as_deref())?;
        let outcome = Outcome::resolve(df, outcome_column, options.outcome_mapping.as_ref())?;

        let per_variable: Vec<Vec<BinRecord>> = plan
            .par_iter()
            .map(|(variable, kind)| {
                if options.verbose {
                    info!(variable = %variable, binner = %kind, "binning variable");
                } else {
                    debug!(variable = %variable, binner = %kind, "binning variable");
                }

                match kind {
                    VariableKind::Numeric => numeric.bin(df, variable, &outcome),
                    VariableKind::Categorical => self.categorical.bin(df, variable, &outcome),
                }
            })
            .collect::<IvResult<_>>()?;

        Ok(per_variable.into_iter().flatten().collect())
    }
}

impl Default for IvEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute IV/WoE statistics for the variables of `df` against `outcome_column`
///
/// # Arguments
/// * `df` - Dataset, read only
/// * `outcome_column` - Name of the binary (0/1) outcome column
/// * `options` - Summary mode, variable list, verbosity, binning configuration
///
/// # Returns
/// The detail table, or the summary table sorted by IV descending
pub fn compute_iv(df: &DataFrame, outcome_column: &str, options: &IvOptions) -> IvResult<IvTable> {
    IvEngine::new().run(df, outcome_column, options)
}

/// Detail records only, regardless of `options.summary`
pub fn compute_bins(
    df: &DataFrame,
    outcome_column: &str,
    options: &IvOptions,
) -> IvResult<Vec<BinRecord>> {
    IvEngine::new().bin_all(df, outcome_column, options)
}

/// Resolve the variables to analyse, with their kinds, in request order
fn resolve_variables(
    df: &DataFrame,
    outcome_column: &str,
    requested: Option<&[String]>,
) -> IvResult<Vec<(String, VariableKind)>> {
    if df.get_column_index(outcome_column).is_none() {
        return Err(IvError::MissingColumn(outcome_column.to_string()));
    }

    let names: Vec<String> = match requested {
        Some(names) => {
            let mut unique: Vec<String> = Vec::with_capacity(names.len());
            for name in names {
                if df.get_column_index(name).is_none() {
                    return Err(IvError::UnknownVariable(name.clone()));
                }
                if name == outcome_column {
                    return Err(IvError::OutcomeAsVariable(name.clone()));
                }
                // Repeats would be binned twice and merged by `summarize`
                if !unique.contains(name) {
                    unique.push(name.clone());
                }
            }
            unique
        }
        None => df
            .get_column_names()
            .into_iter()
            .filter(|name| name.as_str() != outcome_column)
            .map(|name| name.to_string())
            .collect(),
    };

    if names.is_empty() {
        return Err(IvError::EmptyVariableList);
    }

    names
        .into_iter()
        .map(|name| -> IvResult<(String, VariableKind)> {
            let kind = VariableKind::of(df.column(&name)?.dtype());
            Ok((name, kind))
        })
        .collect()
}

/// Reduce detail records to one summary row per variable, sorted by IV
/// descending. Ties keep first-appearance order.
pub fn summarize(records: &[BinRecord]) -> Vec<VariableSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<VariableSummary> = Vec::new();

    for record in records {
        let slot = *index.entry(record.variable.as_str()).or_insert_with(|| {
            rows.push(VariableSummary {
                variable: record.variable.clone(),
                information_value: 0.0,
                bins: 0,
                zero_bins: 0,
                strength: Strength::VeryWeak,
            });
            rows.len() - 1
        });

        let row = &mut rows[slot];
        row.information_value += record.miv;
        row.bins += 1;
        if record.is_zero_bin() {
            row.zero_bins += 1;
        }
    }

    for row in &mut rows {
        row.strength = Strength::from_iv(row.information_value);
    }

    rows.sort_by(|a, b| {
        b.information_value
            .partial_cmp(&a.information_value)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    rows
}
