//! Dataset loading and saving for CSV and Parquet files

use anyhow::{Context, Result};
use polars::prelude::*;
use std::path::Path;

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn scan_dataset(path: &Path, infer_schema_length: usize) -> Result<LazyFrame> {
    // 0 means a full table scan for schema inference
    let infer = if infer_schema_length == 0 {
        None
    } else {
        Some(infer_schema_length)
    };

    let lf = match file_extension(path).as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_infer_schema_length(infer)
            .finish()
            .with_context(|| format!("Failed to load CSV file: {}", path.display()))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .with_context(|| format!("Failed to load Parquet file: {}", path.display()))?,
        other => anyhow::bail!(
            "Unsupported file format: '{}'. Supported formats: csv, parquet",
            other
        ),
    };

    Ok(lf)
}

/// Load a dataset from a file (CSV or Parquet based on extension)
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    scan_dataset(path, infer_schema_length)?
        .collect()
        .with_context(|| format!("Failed to read dataset: {}", path.display()))
}

/// Read only the column names of a dataset
pub fn get_column_names(path: &Path, infer_schema_length: usize) -> Result<Vec<String>> {
    let mut lf = scan_dataset(path, infer_schema_length)?;
    let schema = lf
        .collect_schema()
        .with_context(|| format!("Failed to read schema: {}", path.display()))?;
    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}

/// Shape and estimated in-memory size (MB) of a loaded dataset
pub fn dataset_stats(df: &DataFrame) -> (usize, usize, f64) {
    let (rows, cols) = df.shape();
    let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
    (rows, cols, memory_mb)
}

/// Save a dataset to file (CSV or Parquet based on extension)
pub fn save_dataset(df: &mut DataFrame, path: &Path) -> Result<()> {
    match file_extension(path).as_str() {
        "csv" => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            CsvWriter::new(&mut file)
                .finish(df)
                .with_context(|| format!("Failed to write CSV file: {}", path.display()))?;
        }
        "parquet" => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            ParquetWriter::new(file)
                .finish(df)
                .with_context(|| format!("Failed to write Parquet file: {}", path.display()))?;
        }
        other => anyhow::bail!(
            "Unsupported output format: '{}'. Supported formats: csv, parquet",
            other
        ),
    }

    Ok(())
}
