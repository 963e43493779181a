//! IV analysis export functionality

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{BinRecord, BinningConfig, Strength, VariableSummary};

/// Metadata about the analysis run
#[derive(Serialize)]
pub struct AnalysisMetadata {
    /// Timestamp of the analysis (ISO 8601 format)
    pub timestamp: String,
    /// ivscreen version
    pub ivscreen_version: String,
    /// Input file path
    pub input_file: String,
    /// Outcome column name
    pub outcome_column: String,
    /// Numeric binner configuration
    pub binning: BinningConfig,
}

/// Aggregate statistics of the analysis
#[derive(Serialize)]
pub struct AnalysisOverview {
    pub variables_analyzed: usize,
    pub total_bins: usize,
    pub total_zero_bins: usize,
    /// Variable count per strength label, strongest first
    pub strength_counts: Vec<(String, usize)>,
}

/// Complete IV analysis export
#[derive(Serialize)]
pub struct IvAnalysisExport<'a> {
    pub metadata: AnalysisMetadata,
    pub overview: AnalysisOverview,
    pub summary: &'a [VariableSummary],
    pub bins: &'a [BinRecord],
}

/// Parameters for the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a str,
    pub outcome_column: &'a str,
    pub binning: &'a BinningConfig,
}

fn overview(summary: &[VariableSummary], bins: &[BinRecord]) -> AnalysisOverview {
    let strength_counts = [
        Strength::Suspicious,
        Strength::VeryStrong,
        Strength::Strong,
        Strength::Average,
        Strength::Weak,
        Strength::VeryWeak,
    ]
    .iter()
    .map(|s| {
        (
            s.label().to_string(),
            summary.iter().filter(|row| row.strength == *s).count(),
        )
    })
    .collect();

    AnalysisOverview {
        variables_analyzed: summary.len(),
        total_bins: bins.len(),
        total_zero_bins: bins.iter().filter(|b| b.is_zero_bin()).count(),
        strength_counts,
    }
}

/// Serialize an IV analysis to pretty JSON
pub fn iv_analysis_json(
    summary: &[VariableSummary],
    bins: &[BinRecord],
    params: &ExportParams,
) -> Result<String> {
    let export = IvAnalysisExport {
        metadata: AnalysisMetadata {
            timestamp: Utc::now().to_rfc3339(),
            ivscreen_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.to_string(),
            outcome_column: params.outcome_column.to_string(),
            binning: params.binning.clone(),
        },
        overview: overview(summary, bins),
        summary,
        bins,
    };

    serde_json::to_string_pretty(&export).context("Failed to serialize IV analysis to JSON")
}

/// Export IV analysis results to a JSON file
///
/// # Arguments
/// * `summary` - Ranked per-variable summary
/// * `bins` - Per-bin detail records
/// * `output_path` - Path to write the JSON file
/// * `params` - Export parameters for metadata
pub fn export_iv_analysis(
    summary: &[VariableSummary],
    bins: &[BinRecord],
    output_path: &Path,
    params: &ExportParams,
) -> Result<()> {
    let json = iv_analysis_json(summary, bins, params)?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write IV analysis to {}", output_path.display()))?;

    Ok(())
}
