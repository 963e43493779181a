//! ivscreen: Information Value screening CLI
//!
//! Loads a dataset, bins every predictor against a binary outcome, and
//! prints the per-bin WoE detail or the ranked IV summary.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use ivscreen::cli::{select_outcome_column, select_outcome_mapping, Cli};
use ivscreen::pipeline::{
    analyze_outcome_column, apply_woe, compute_bins, dataset_stats, get_column_names, load_dataset,
    save_dataset, summarize, IvTable, OutcomeAnalysis,
};
use ivscreen::report::{display_detail, display_summary, export_iv_analysis, ExportParams};
use ivscreen::utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_info, print_step_header, print_step_time, print_success,
};

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let input = &cli.input;

    let outcome = match &cli.outcome {
        Some(outcome) => outcome.clone(),
        None if cli.no_confirm => anyhow::bail!(
            "Outcome column is required when using --no-confirm. Use -y/--outcome to specify."
        ),
        None => {
            let columns = get_column_names(input, cli.infer_schema_length)?;
            select_outcome_column(&columns)?
        }
    };

    let binning = cli.binning_config();
    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(input, &outcome, &binning);

    // Step 1: Load dataset
    print_step_header(1, "Load Dataset");
    let step_start = Instant::now();
    let spinner = create_spinner("Loading dataset...");
    let df = load_dataset(input, cli.infer_schema_length)?;
    finish_with_success(&spinner, "Dataset loaded");

    let (rows, cols, memory_mb) = dataset_stats(&df);
    println!("\n    {} Dataset Statistics:", style("✧").cyan());
    println!("      Rows: {}", rows);
    println!("      Columns: {}", cols);
    println!("      Estimated memory: {:.2} MB", memory_mb);
    print_step_time(step_start.elapsed());

    // Non-binary outcomes need an event/non-event mapping
    let mapping = match cli.outcome_mapping() {
        Some(mapping) => Some(mapping),
        None => match analyze_outcome_column(&df, &outcome)? {
            OutcomeAnalysis::AlreadyBinary => None,
            OutcomeAnalysis::NeedsMapping { unique_values } => {
                if cli.no_confirm {
                    anyhow::bail!(
                        "Outcome column '{}' is not binary (values: {:?}). \
                         Use --event-value and --non-event-value.",
                        outcome,
                        unique_values
                    );
                }
                Some(select_outcome_mapping(&outcome, &unique_values)?)
            }
        },
    };

    // Step 2: Binning and IV
    print_step_header(2, "Information Value Analysis");
    let step_start = Instant::now();
    let spinner = create_spinner("Binning variables...");
    let options = cli.iv_options(mapping);
    let records = compute_bins(&df, &outcome, &options)?;
    let summary = summarize(&records);

    let zero_bins: usize = summary.iter().map(|s| s.zero_bins).sum();
    if zero_bins > 0 {
        finish_with_warning(
            &spinner,
            &format!(
                "Analyzed {} variable(s), {} bin(s) with a single outcome class",
                summary.len(),
                zero_bins
            ),
        );
    } else {
        finish_with_success(&spinner, &format!("Analyzed {} variable(s)", summary.len()));
    }
    print_step_time(step_start.elapsed());

    if cli.summary {
        display_summary(&summary);
    } else {
        display_detail(&records);
    }

    // Step 3: Save outputs
    if cli.output.is_some() || cli.json.is_some() || cli.woe_output.is_some() {
        print_step_header(3, "Save Results");
        let step_start = Instant::now();

        if let Some(path) = &cli.output {
            let table = if cli.summary {
                IvTable::Summary(summary.clone())
            } else {
                IvTable::Detail(records.clone())
            };
            let mut table_df = table.to_dataframe().context("Failed to build result table")?;
            save_dataset(&mut table_df, path)?;
            print_success(&format!("Saved table to {}", path.display()));
        }

        if let Some(path) = &cli.json {
            let input_file = input.display().to_string();
            let params = ExportParams {
                input_file: &input_file,
                outcome_column: &outcome,
                binning: &binning,
            };
            export_iv_analysis(&summary, &records, path, &params)?;
            print_success(&format!("Saved analysis to {}", path.display()));
        }

        if let Some(path) = &cli.woe_output {
            let mut encoded = apply_woe(&df, &records).context("Failed to apply WoE encoding")?;
            save_dataset(&mut encoded, path)?;
            print_success(&format!("Saved WoE-encoded dataset to {}", path.display()));
        }

        print_step_time(step_start.elapsed());
    } else {
        print_info("No output files requested");
    }

    print_completion();

    Ok(())
}
