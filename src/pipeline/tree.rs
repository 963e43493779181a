//! Numeric binning via recursive binary partition
//!
//! A small classification tree on a single variable: each node takes the cut
//! that most reduces Gini impurity, subject to a minimum bucket size, a depth
//! limit and a complexity threshold. The leaves become half-open intervals.

use polars::prelude::*;

use super::binning::{BinLabel, BinRecord, Binner, BinningConfig};
use super::outcome::Outcome;
use crate::error::IvResult;

/// Numeric binner driven by a [`BinningConfig`]
#[derive(Debug, Clone, Default)]
pub struct TreeBinner {
    config: BinningConfig,
}

impl TreeBinner {
    pub fn new(config: BinningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BinningConfig {
        &self.config
    }
}

impl Binner for TreeBinner {
    fn bin(&self, df: &DataFrame, variable: &str, outcome: &Outcome) -> IvResult<Vec<BinRecord>> {
        let col = df.column(variable)?;
        let float_col = col.cast(&DataType::Float64)?;
        let values = float_col.f64()?;

        // Missing, NaN and infinite values and excluded outcomes do not take
        // part in the split. They still count towards the outcome totals.
        let mut pairs: Vec<(f64, u8)> = values
            .into_iter()
            .zip(outcome.values().iter())
            .filter_map(|(v, t)| match (v, t) {
                (Some(val), Some(target)) if val.is_finite() => Some((val, *target)),
                _ => None,
            })
            .collect();

        if pairs.is_empty() {
            return Ok(Vec::new());
        }

        pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

        let (total_0, total_1, _) = outcome.counts();
        let totals = (total_0 as u64, total_1 as u64);

        let cuts = find_cuts(&pairs, &self.config);
        Ok(bins_from_cuts(variable, &pairs, &cuts, totals))
    }
}

/// Gini impurity of a node: `2 * p * (1 - p)` with p the share of ones
fn gini_impurity(zeros: u64, ones: u64) -> f64 {
    let total = zeros + ones;
    if total == 0 {
        return 0.0;
    }
    let p = ones as f64 / total as f64;
    2.0 * p * (1.0 - p)
}

fn class_counts(pairs: &[(f64, u8)]) -> (u64, u64) {
    let ones = pairs.iter().filter(|(_, t)| *t == 1).count() as u64;
    (pairs.len() as u64 - ones, ones)
}

/// Find the split that maximizes the decrease of total (count-weighted)
/// impurity.
///
/// Returns `(split_index, decrease)` where `split_index` is where the right
/// side starts. Splits never separate equal values and leave at least
/// `min_bucket` rows on each side.
fn find_best_split(pairs: &[(f64, u8)], min_bucket: usize) -> Option<(usize, f64)> {
    let n = pairs.len();
    if n < 2 * min_bucket {
        return None;
    }

    let (total_zeros, total_ones) = class_counts(pairs);
    let parent = n as f64 * gini_impurity(total_zeros, total_ones);

    let mut best: Option<(usize, f64)> = None;
    let mut left_zeros = 0u64;
    let mut left_ones = 0u64;

    for i in 0..n - 1 {
        if pairs[i].1 == 1 {
            left_ones += 1;
        } else {
            left_zeros += 1;
        }

        let left_count = i + 1;
        let right_count = n - left_count;
        if left_count < min_bucket || right_count < min_bucket {
            continue;
        }
        if pairs[i].0 == pairs[i + 1].0 {
            continue;
        }

        let right_zeros = total_zeros - left_zeros;
        let right_ones = total_ones - left_ones;
        let children = left_count as f64 * gini_impurity(left_zeros, left_ones)
            + right_count as f64 * gini_impurity(right_zeros, right_ones);
        let decrease = parent - children;

        if decrease > best.map_or(0.0, |(_, d)| d) {
            best = Some((left_count, decrease));
        }
    }

    best
}

struct SplitContext {
    min_bucket: usize,
    max_depth: usize,
    /// Smallest absolute impurity decrease worth a split
    min_decrease: f64,
}

fn split_recursive(
    pairs: &[(f64, u8)],
    offset: usize,
    depth: usize,
    ctx: &SplitContext,
    split_indices: &mut Vec<usize>,
) {
    if depth >= ctx.max_depth {
        return;
    }

    if let Some((local_idx, decrease)) = find_best_split(pairs, ctx.min_bucket) {
        if decrease < ctx.min_decrease {
            return;
        }
        split_indices.push(offset + local_idx);

        let (left, right) = pairs.split_at(local_idx);
        split_recursive(left, offset, depth + 1, ctx, split_indices);
        split_recursive(right, offset + local_idx, depth + 1, ctx, split_indices);
    }
}

/// Compute the sorted split indices for value-sorted pairs
fn find_cuts(pairs: &[(f64, u8)], config: &BinningConfig) -> Vec<usize> {
    let (zeros, ones) = class_counts(pairs);
    let root_impurity = pairs.len() as f64 * gini_impurity(zeros, ones);
    if root_impurity <= 0.0 {
        return Vec::new();
    }

    let ctx = SplitContext {
        min_bucket: config.min_bucket(pairs.len()),
        max_depth: config.max_depth,
        min_decrease: config.complexity * root_impurity,
    };

    let mut split_indices = Vec::new();
    split_recursive(pairs, 0, 0, &ctx, &mut split_indices);
    split_indices.sort_unstable();
    split_indices
}

/// Turn split indices into interval bins with midpoint cut values.
///
/// `totals` are the dataset-wide outcome counts, not the counts of `pairs`.
fn bins_from_cuts(
    variable: &str,
    pairs: &[(f64, u8)],
    split_indices: &[usize],
    totals: (u64, u64),
) -> Vec<BinRecord> {
    let (total_0, total_1) = totals;

    let mut bins = Vec::with_capacity(split_indices.len() + 1);
    let mut start = 0;
    let mut lower = f64::NEG_INFINITY;

    for end in split_indices.iter().copied().chain(std::iter::once(pairs.len())) {
        let upper = if end < pairs.len() {
            // Halve first so two values near f64::MAX do not overflow
            pairs[end - 1].0 / 2.0 + pairs[end].0 / 2.0
        } else {
            f64::INFINITY
        };

        let (zeros, ones) = class_counts(&pairs[start..end]);
        bins.push(BinRecord::new(
            variable,
            BinLabel::Interval { lower, upper },
            zeros,
            ones,
            total_0,
            total_1,
        ));

        start = end;
        lower = upper;
    }

    bins
}
