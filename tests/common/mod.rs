//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Outcome counts per duration level: (value, outcome_0, outcome_1)
pub const DURATION_LEVELS: [(f64, usize, usize); 3] = [(1.0, 30, 10), (2.0, 20, 20), (3.0, 10, 30)];

/// Create a 120-row credit-style DataFrame with known characteristics
///
/// This DataFrame includes:
/// - `gb`: Binary outcome (60 zeros, 60 ones)
/// - `duration`: Three levels with outcome counts (30,10), (20,20), (10,30)
/// - `purpose`: Categorical with a quarter of the values missing
/// - `amount`: Pseudo-random numeric feature
/// - `flag`: Constant string, a single bin with zero IV
pub fn create_credit_dataframe() -> DataFrame {
    let mut gb: Vec<i32> = Vec::new();
    let mut duration: Vec<f64> = Vec::new();
    for (value, zeros, ones) in DURATION_LEVELS {
        for j in 0..(zeros + ones) {
            duration.push(value);
            gb.push(if j < zeros { 0 } else { 1 });
        }
    }

    let n = gb.len();
    let purpose: Vec<Option<&str>> = (0..n)
        .map(|i| match i % 4 {
            0 => Some("car"),
            1 => Some("tv"),
            2 => Some("business"),
            _ => None,
        })
        .collect();
    let amount: Vec<f64> = (0..n).map(|i| ((i * 37) % 101) as f64 * 10.0).collect();
    let flag: Vec<&str> = vec!["yes"; n];

    df! {
        "gb" => gb,
        "duration" => duration,
        "purpose" => purpose,
        "amount" => amount,
        "flag" => flag,
    }
    .unwrap()
}

/// Add a categorical variable where one category only ever has outcome = 1
pub fn with_leaky_variable(df: &DataFrame) -> DataFrame {
    let gb: Vec<i32> = df
        .column("gb")
        .unwrap()
        .i32()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    let leak: Vec<&str> = gb
        .iter()
        .enumerate()
        .map(|(i, &t)| if t == 1 && i % 2 == 0 { "X" } else { "Y" })
        .collect();

    let mut out = df.clone();
    out.with_column(Column::new("leak".into(), leak)).unwrap();
    out
}

/// Create a larger random DataFrame for property and stress tests
pub fn create_large_test_dataframe(rows: usize, cols: usize, seed: u64) -> DataFrame {
    use rand::{Rng, SeedableRng};
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);

    let mut columns: Vec<Column> = Vec::with_capacity(cols + 2);

    let target: Vec<i32> = (0..rows).map(|_| rng.gen_range(0..2)).collect();

    for i in 0..cols {
        let values: Vec<Option<f64>> = (0..rows)
            .map(|r| {
                if rng.gen::<f64>() < 0.05 {
                    None
                } else {
                    Some(rng.gen::<f64>() * 100.0 + target[r] as f64 * i as f64 * 10.0)
                }
            })
            .collect();
        columns.push(Column::new(format!("feature_{}", i).into(), values));
    }

    let segment: Vec<&str> = (0..rows)
        .map(|_| ["a", "b", "c", "d"][rng.gen_range(0..4)])
        .collect();
    columns.push(Column::new("segment".into(), segment));
    columns.push(Column::new("target".into(), target));

    DataFrame::new(columns).unwrap()
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Assert two floats are equal within tolerance
pub fn assert_close(actual: f64, expected: f64, what: &str) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "{}: expected {}, got {}",
        what,
        expected,
        actual
    );
}
