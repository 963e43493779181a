//! Replace variables with their Weight of Evidence
//!
//! Uses detail records from a previous IV run to append one `<variable>_woe`
//! column per binned variable.

use polars::prelude::*;
use std::collections::HashMap;

use super::binning::{BinLabel, BinRecord, VariableKind};
use super::outcome::column_to_string_vec;
use crate::error::{IvError, IvResult};

/// Suffix of the generated WoE columns
pub const WOE_SUFFIX: &str = "_woe";

/// Append a WoE column for every variable present in `records`.
///
/// Numeric values are looked up by interval, categorical values by label.
/// Missing values take the WoE of the `NA` bin when one exists; NaN and
/// infinite numerics count as missing. Values that match no bin (an unseen
/// category, or a numeric variable whose missing rows were not binned)
/// become null.
pub fn apply_woe(df: &DataFrame, records: &[BinRecord]) -> IvResult<DataFrame> {
    let mut grouped: Vec<(&str, Vec<&BinRecord>)> = Vec::new();
    for record in records {
        match grouped.iter_mut().find(|(name, _)| *name == record.variable) {
            Some((_, bins)) => bins.push(record),
            None => grouped.push((record.variable.as_str(), vec![record])),
        }
    }

    let mut out = df.clone();
    for (variable, bins) in grouped {
        let col = df
            .column(variable)
            .map_err(|_| IvError::UnknownVariable(variable.to_string()))?;

        let missing_woe = bins
            .iter()
            .find(|b| b.bin_label == BinLabel::Missing)
            .map(|b| b.woe);

        let woe_values: Vec<Option<f64>> = match VariableKind::of(col.dtype()) {
            VariableKind::Numeric => {
                let float_col = col.cast(&DataType::Float64)?;
                float_col
                    .f64()?
                    .into_iter()
                    .map(|v| match v {
                        Some(x) if x.is_finite() => {
                            bins.iter().find(|b| b.bin_label.contains(x)).map(|b| b.woe)
                        }
                        _ => missing_woe,
                    })
                    .collect()
            }
            VariableKind::Categorical => {
                let lookup: HashMap<String, f64> = bins
                    .iter()
                    .filter_map(|b| match &b.bin_label {
                        BinLabel::Category(value) => Some((value.clone(), b.woe)),
                        _ => None,
                    })
                    .collect();

                column_to_string_vec(col)?
                    .into_iter()
                    .map(|v| match v {
                        Some(value) => lookup.get(&value).copied(),
                        None => missing_woe,
                    })
                    .collect()
            }
        };

        let name = format!("{}{}", variable, WOE_SUFFIX);
        out.with_column(Column::new(name.into(), woe_values))?;
    }

    Ok(out)
}
