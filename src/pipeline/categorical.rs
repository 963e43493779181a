//! Categorical binning: one bin per distinct category value
//!
//! Values are compared as strings, so booleans and categorical dtypes bin the
//! same way as text. Missing values get their own trailing bin.

use polars::prelude::*;
use std::collections::BTreeMap;

use super::binning::{BinLabel, BinRecord, Binner};
use super::outcome::{column_to_string_vec, Outcome};
use crate::error::IvResult;

/// Categorical binner; takes no configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct CategoryBinner;

impl Binner for CategoryBinner {
    fn bin(&self, df: &DataFrame, variable: &str, outcome: &Outcome) -> IvResult<Vec<BinRecord>> {
        let col = df.column(variable)?;
        let values = column_to_string_vec(col)?;

        // (outcome_0, outcome_1) per category, sorted by category text
        let mut category_stats: BTreeMap<String, (u64, u64)> = BTreeMap::new();
        let mut missing = (0u64, 0u64);

        for (value, target) in values.into_iter().zip(outcome.values().iter()) {
            let Some(target) = target else {
                continue;
            };
            let entry = match value {
                Some(category) => category_stats.entry(category).or_insert((0, 0)),
                None => &mut missing,
            };
            if *target == 1 {
                entry.1 += 1;
            } else {
                entry.0 += 1;
            }
        }

        let total_0 = category_stats.values().map(|(z, _)| z).sum::<u64>() + missing.0;
        let total_1 = category_stats.values().map(|(_, o)| o).sum::<u64>() + missing.1;

        let mut bins: Vec<BinRecord> = category_stats
            .into_iter()
            .map(|(category, (zeros, ones))| {
                BinRecord::new(
                    variable,
                    BinLabel::Category(category),
                    zeros,
                    ones,
                    total_0,
                    total_1,
                )
            })
            .collect();

        if missing.0 + missing.1 > 0 {
            bins.push(BinRecord::new(
                variable,
                BinLabel::Missing,
                missing.0,
                missing.1,
                total_0,
                total_1,
            ));
        }

        Ok(bins)
    }
}
