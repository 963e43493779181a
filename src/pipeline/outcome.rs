//! Outcome column resolution
//!
//! Turns the outcome column into a per-row `Option<u8>` vector (0, 1, or
//! excluded) that every binner shares. Non-binary outcomes can be mapped to
//! 0/1 with an [`OutcomeMapping`].

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{IvError, IvResult};

/// Tolerance for floating point comparison when checking binary 0/1 values
const TOLERANCE: f64 = 1e-9;

/// Mapping for converting outcome column values to binary 0/1
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeMapping {
    /// Value that maps to 1 (event)
    pub event_value: String,
    /// Value that maps to 0 (non-event)
    pub non_event_value: String,
}

impl OutcomeMapping {
    pub fn new(event_value: impl Into<String>, non_event_value: impl Into<String>) -> Self {
        Self {
            event_value: event_value.into(),
            non_event_value: non_event_value.into(),
        }
    }
}

/// Result of inspecting an outcome column
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeAnalysis {
    /// Column already holds only 0/1 values
    AlreadyBinary,
    /// Column needs a mapping - contains these unique values
    NeedsMapping { unique_values: Vec<String> },
}

/// Binary outcome values for every row of a dataset.
///
/// `None` marks rows excluded from the analysis: a null outcome, or a value
/// matching neither side of a mapping.
#[derive(Debug, Clone)]
pub struct Outcome {
    column: String,
    values: Vec<Option<u8>>,
}

impl Outcome {
    /// Resolve the outcome column, optionally through a mapping.
    ///
    /// Without a mapping every non-null value must be 0 or 1.
    pub fn resolve(
        df: &DataFrame,
        column: &str,
        mapping: Option<&OutcomeMapping>,
    ) -> IvResult<Self> {
        let col = df
            .column(column)
            .map_err(|_| IvError::MissingColumn(column.to_string()))?;

        let values = match mapping {
            Some(mapping) => map_outcome(col, column, mapping)?,
            None => binary_outcome(col, column)?,
        };

        Ok(Self {
            column: column.to_string(),
            values,
        })
    }

    /// Build an outcome directly from resolved values.
    pub fn from_values(column: impl Into<String>, values: Vec<Option<u8>>) -> Self {
        Self {
            column: column.into(),
            values,
        }
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    pub fn values(&self) -> &[Option<u8>] {
        &self.values
    }

    /// Count (outcome = 0, outcome = 1, excluded) rows
    pub fn counts(&self) -> (usize, usize, usize) {
        let zeros = self.values.iter().filter(|v| **v == Some(0)).count();
        let ones = self.values.iter().filter(|v| **v == Some(1)).count();
        (zeros, ones, self.values.len() - zeros - ones)
    }
}

/// Inspect an outcome column to decide whether it needs a value mapping
pub fn analyze_outcome_column(df: &DataFrame, column: &str) -> IvResult<OutcomeAnalysis> {
    let col = df
        .column(column)
        .map_err(|_| IvError::MissingColumn(column.to_string()))?;

    if binary_outcome(col, column).is_ok() {
        return Ok(OutcomeAnalysis::AlreadyBinary);
    }

    let mut unique_values: Vec<String> = column_to_string_vec(col)?
        .into_iter()
        .flatten()
        .collect();
    unique_values.sort();
    unique_values.dedup();

    Ok(OutcomeAnalysis::NeedsMapping { unique_values })
}

fn binary_outcome(col: &Column, column: &str) -> IvResult<Vec<Option<u8>>> {
    if col.dtype().is_primitive_numeric() {
        let float_col = col.cast(&DataType::Float64)?;
        return float_col
            .f64()?
            .into_iter()
            .map(|v| match v {
                None => Ok(None),
                Some(x) if x.abs() < TOLERANCE => Ok(Some(0)),
                Some(x) if (x - 1.0).abs() < TOLERANCE => Ok(Some(1)),
                Some(x) => Err(IvError::NonBinaryOutcome {
                    column: column.to_string(),
                    value: x.to_string(),
                }),
            })
            .collect();
    }

    column_to_string_vec(col)?
        .into_iter()
        .map(|v| match v.as_deref() {
            None => Ok(None),
            Some("0") | Some("false") => Ok(Some(0)),
            Some("1") | Some("true") => Ok(Some(1)),
            Some(other) => Err(IvError::NonBinaryOutcome {
                column: column.to_string(),
                value: other.to_string(),
            }),
        })
        .collect()
}

fn map_outcome(
    col: &Column,
    column: &str,
    mapping: &OutcomeMapping,
) -> IvResult<Vec<Option<u8>>> {
    if mapping.event_value == mapping.non_event_value {
        return Err(IvError::InvalidMapping {
            column: column.to_string(),
            reason: format!(
                "event and non-event values are both '{}'",
                mapping.event_value
            ),
        });
    }

    let values: Vec<Option<u8>> = column_to_string_vec(col)?
        .iter()
        .map(|v| match v {
            Some(s) if s == &mapping.event_value => Some(1),
            Some(s) if s == &mapping.non_event_value => Some(0),
            _ => None,
        })
        .collect();

    for (expected, label) in [(1u8, &mapping.event_value), (0u8, &mapping.non_event_value)] {
        if !values.contains(&Some(expected)) {
            return Err(IvError::InvalidMapping {
                column: column.to_string(),
                reason: format!("value '{}' does not occur in the column", label),
            });
        }
    }

    Ok(values)
}

/// Convert a column to a Vec of Option<String> for comparison
pub(crate) fn column_to_string_vec(col: &Column) -> IvResult<Vec<Option<String>>> {
    let values: Vec<Option<String>> = match col.dtype() {
        DataType::String => col
            .str()?
            .into_iter()
            .map(|v| v.map(|s| s.to_string()))
            .collect(),
        DataType::Int8 | DataType::Int16 | DataType::Int32 | DataType::Int64 => {
            let cast = col.cast(&DataType::Int64)?;
            cast.i64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::UInt8 | DataType::UInt16 | DataType::UInt32 | DataType::UInt64 => {
            let cast = col.cast(&DataType::UInt64)?;
            cast.u64()?
                .into_iter()
                .map(|v| v.map(|n| n.to_string()))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let cast = col.cast(&DataType::Float64)?;
            cast.f64()?
                .into_iter()
                .map(|v| v.map(|n| format!("{}", n)))
                .collect()
        }
        DataType::Boolean => col
            .bool()?
            .into_iter()
            .map(|v| v.map(|b| b.to_string()))
            .collect(),
        _ => {
            let cast = col.cast(&DataType::String)?;
            cast.str()?
                .into_iter()
                .map(|v| v.map(|s| s.to_string()))
                .collect()
        }
    };

    Ok(values)
}
