//! Integration tests for IV computation and summarization

use ivscreen::pipeline::*;
use ivscreen::IvError;
use polars::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::*;

fn detail(df: &DataFrame, outcome: &str, options: &IvOptions) -> Vec<BinRecord> {
    match compute_iv(df, outcome, options).unwrap() {
        IvTable::Detail(records) => records,
        IvTable::Summary(_) => panic!("Expected a detail table"),
    }
}

fn summary(df: &DataFrame, outcome: &str, options: &IvOptions) -> Vec<VariableSummary> {
    let options = IvOptions {
        summary: true,
        ..options.clone()
    };
    match compute_iv(df, outcome, &options).unwrap() {
        IvTable::Summary(rows) => rows,
        IvTable::Detail(_) => panic!("Expected a summary table"),
    }
}

fn vars(names: &[&str]) -> Option<Vec<String>> {
    Some(names.iter().map(|s| s.to_string()).collect())
}

#[test]
fn test_worked_example_duration() {
    let df = create_credit_dataframe();
    let options = IvOptions {
        variables: vars(&["duration"]),
        ..Default::default()
    };

    let records = detail(&df, "gb", &options);
    let counts: Vec<(u64, u64)> = records.iter().map(|r| (r.outcome_0, r.outcome_1)).collect();
    assert_eq!(counts, vec![(30, 10), (20, 20), (10, 30)]);

    assert_close(records[0].woe, (1.0f64 / 3.0).ln(), "bin 1 WoE");
    assert_close(records[1].woe, 0.0, "bin 2 WoE");
    assert_close(records[2].woe, 3.0f64.ln(), "bin 3 WoE");

    let rows = summary(&df, "gb", &options);
    assert_eq!(rows.len(), 1);
    let expected_iv: f64 = records.iter().map(|r| r.miv).sum();
    assert_close(rows[0].information_value, expected_iv, "IV equals sum of miv");
    assert_close(rows[0].information_value, 2.0 / 3.0 * 3.0f64.ln(), "IV closed form");
    assert_eq!(rows[0].bins, 3);
    assert_eq!(rows[0].zero_bins, 0);
    assert_eq!(rows[0].strength, Strength::VeryStrong);
}

#[test]
fn test_detail_keeps_variable_order() {
    let df = create_credit_dataframe();
    let records = detail(&df, "gb", &IvOptions::default());

    let mut order: Vec<&str> = Vec::new();
    for record in &records {
        if order.last() != Some(&record.variable.as_str()) {
            order.push(record.variable.as_str());
        }
    }
    assert_eq!(order, vec!["duration", "purpose", "amount", "flag"]);
}

#[test]
fn test_bins_partition_each_variable() {
    let df = create_credit_dataframe();
    let records = detail(&df, "gb", &IvOptions::default());

    for variable in ["duration", "purpose", "amount", "flag"] {
        let total: u64 = records
            .iter()
            .filter(|r| r.variable == variable)
            .map(|r| r.count())
            .sum();
        assert_eq!(total, 120, "Bins of '{}' should cover every row", variable);
    }

    let purpose_labels: Vec<String> = records
        .iter()
        .filter(|r| r.variable == "purpose")
        .map(|r| r.bin_label.to_string())
        .collect();
    assert_eq!(purpose_labels, vec!["business", "car", "tv", "NA"]);
}

#[test]
fn test_summary_matches_detail_sums() {
    let df = create_credit_dataframe();
    let records = detail(&df, "gb", &IvOptions::default());
    let rows = summary(&df, "gb", &IvOptions::default());

    assert_eq!(rows.len(), 4);
    for row in &rows {
        let bins: Vec<&BinRecord> = records.iter().filter(|r| r.variable == row.variable).collect();
        let miv_sum: f64 = bins.iter().map(|r| r.miv).sum();
        let zero_bins = bins.iter().filter(|r| r.outcome_0 == 0 || r.outcome_1 == 0).count();

        assert_close(row.information_value, miv_sum, &row.variable);
        assert_eq!(row.bins, bins.len());
        assert_eq!(row.zero_bins, zero_bins);
        assert_eq!(row.strength, Strength::from_iv(row.information_value));
    }
}

#[test]
fn test_summary_sorted_and_stable() {
    let df = create_credit_dataframe();
    let first = summary(&df, "gb", &IvOptions::default());
    let second = summary(&df, "gb", &IvOptions::default());

    for pair in first.windows(2) {
        assert!(
            pair[0].information_value >= pair[1].information_value,
            "Summary should be sorted descending: {} >= {}",
            pair[0].information_value,
            pair[1].information_value
        );
    }
    assert_eq!(first, second, "Repeated calls should give identical output");
    assert_eq!(first[0].variable, "duration");

    let flag = first.iter().find(|r| r.variable == "flag").unwrap();
    assert_eq!(flag.bins, 1);
    assert_close(flag.information_value, 0.0, "constant variable IV");
    assert_eq!(flag.strength, Strength::VeryWeak);
}

#[test]
fn test_single_class_bin_increments_zero_bins() {
    let df = create_credit_dataframe();
    let baseline = summary(&df, "gb", &IvOptions::default());

    let leaky = with_leaky_variable(&df);
    let rows = summary(&leaky, "gb", &IvOptions::default());

    let leak = rows.iter().find(|r| r.variable == "leak").unwrap();
    assert_eq!(leak.bins, 2);
    assert_eq!(leak.zero_bins, 1);
    // Only the mixed bin contributes: Y = (60, 30) against totals (60, 60)
    assert_close(leak.information_value, -0.5 * 0.5f64.ln(), "leak IV");

    for row in &baseline {
        let after = rows.iter().find(|r| r.variable == row.variable).unwrap();
        assert_eq!(after, row, "Other variables are unaffected");
    }
}

#[test]
fn test_unknown_variable_fails_without_output() {
    let df = create_credit_dataframe();
    let options = IvOptions {
        variables: vars(&["nonexistent_col"]),
        ..Default::default()
    };

    let result = compute_iv(&df, "gb", &options);
    assert!(matches!(result, Err(IvError::UnknownVariable(ref v)) if v == "nonexistent_col"));
}

#[test]
fn test_missing_outcome_column() {
    let df = create_credit_dataframe();
    let result = compute_iv(&df, "default_flag", &IvOptions::default());
    assert!(matches!(result, Err(IvError::MissingColumn(ref c)) if c == "default_flag"));
}

#[test]
fn test_empty_variable_list() {
    let df = df! { "gb" => [0i32, 1, 0, 1] }.unwrap();
    let result = compute_iv(&df, "gb", &IvOptions::default());
    assert!(matches!(result, Err(IvError::EmptyVariableList)));
}

#[test]
fn test_missing_column_reported_before_unknown_variable() {
    let df = create_credit_dataframe();
    let options = IvOptions {
        variables: vars(&["nonexistent_col"]),
        ..Default::default()
    };
    let result = compute_iv(&df, "default_flag", &options);
    assert!(matches!(result, Err(IvError::MissingColumn(_))));
}

#[test]
fn test_non_binary_outcome_and_mapping() {
    let df = df! {
        "status" => ["good", "bad", "good", "bad", "good", "bad", "unknown", "good"],
        "grade" => ["A", "B", "A", "B", "A", "A", "B", "B"],
    }
    .unwrap();

    let result = compute_iv(&df, "status", &IvOptions::default());
    assert!(matches!(result, Err(IvError::NonBinaryOutcome { .. })));

    let options = IvOptions {
        outcome_mapping: Some(OutcomeMapping::new("bad", "good")),
        ..Default::default()
    };
    let records = detail(&df, "status", &options);
    let total: u64 = records.iter().map(|r| r.count()).sum();
    assert_eq!(total, 7, "The 'unknown' row is excluded");
}

#[test]
fn test_binning_config_is_forwarded() {
    let df = create_credit_dataframe();
    let options = IvOptions {
        variables: vars(&["duration"]),
        binning: Some(BinningConfig {
            min_bucket_pct: 50.0,
            ..Default::default()
        }),
        ..Default::default()
    };

    let records = detail(&df, "gb", &options);
    assert_eq!(records.len(), 1, "No split leaves 60 rows on each side");
}

#[test]
fn test_invalid_binning_config() {
    let df = create_credit_dataframe();
    let options = IvOptions {
        binning: Some(BinningConfig {
            complexity: -1.0,
            ..Default::default()
        }),
        ..Default::default()
    };

    assert!(matches!(
        compute_iv(&df, "gb", &options),
        Err(IvError::InvalidConfig(_))
    ));
}

#[test]
fn test_verbose_does_not_change_results() {
    let df = create_credit_dataframe();
    let quiet = detail(&df, "gb", &IvOptions::default());
    let verbose = detail(
        &df,
        "gb",
        &IvOptions {
            verbose: true,
            ..Default::default()
        },
    );
    assert_eq!(quiet, verbose);
}

/// Returns the worked-example bins for any variable
struct FixedBinner;

impl Binner for FixedBinner {
    fn bin(
        &self,
        _df: &DataFrame,
        variable: &str,
        _outcome: &Outcome,
    ) -> ivscreen::IvResult<Vec<BinRecord>> {
        Ok(vec![
            BinRecord::new(variable, BinLabel::Category("low".into()), 30, 10, 60, 60),
            BinRecord::new(variable, BinLabel::Category("mid".into()), 20, 20, 60, 60),
            BinRecord::new(variable, BinLabel::Category("high".into()), 10, 30, 60, 60),
        ])
    }
}

struct FailingBinner;

impl Binner for FailingBinner {
    fn bin(
        &self,
        _df: &DataFrame,
        variable: &str,
        _outcome: &Outcome,
    ) -> ivscreen::IvResult<Vec<BinRecord>> {
        Err(IvError::InvalidConfig(format!("cannot bin '{}'", variable)))
    }
}

#[test]
fn test_engine_dispatches_by_kind() {
    let df = create_credit_dataframe();
    let engine = IvEngine::with_binners(Box::new(FixedBinner), Box::new(CategoryBinner));

    let table = engine.run(&df, "gb", &IvOptions::default()).unwrap();
    let IvTable::Detail(records) = table else {
        panic!("Expected a detail table");
    };

    // Numeric variables went through the fixed binner
    for variable in ["duration", "amount"] {
        let labels: Vec<String> = records
            .iter()
            .filter(|r| r.variable == variable)
            .map(|r| r.bin_label.to_string())
            .collect();
        assert_eq!(labels, vec!["low", "mid", "high"]);
    }
    // Categorical variables did not
    assert!(records
        .iter()
        .filter(|r| r.variable == "purpose")
        .all(|r| r.bin_label.to_string() != "low"));
}

#[test]
fn test_engine_fails_fast_on_binner_error() {
    let df = create_credit_dataframe();
    let engine = IvEngine::with_binners(Box::new(TreeBinner::default()), Box::new(FailingBinner));

    let result = engine.run(&df, "gb", &IvOptions::default());
    assert!(matches!(result, Err(IvError::InvalidConfig(_))));

    // Numeric-only requests never reach the failing binner
    let options = IvOptions {
        variables: vars(&["duration", "amount"]),
        summary: true,
        ..Default::default()
    };
    let table = engine.run(&df, "gb", &options).unwrap();
    assert_eq!(table.len(), 2);
}

#[test]
fn test_summary_dataframe_rendering() {
    let df = create_credit_dataframe();
    let options = IvOptions {
        summary: true,
        ..Default::default()
    };
    let table = compute_iv(&df, "gb", &options).unwrap();
    let out = table.to_dataframe().unwrap();

    assert_eq!(out.height(), 4);
    let ivs: Vec<f64> = out
        .column("InformationValue")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .map(|v| v.unwrap())
        .collect();
    for pair in ivs.windows(2) {
        assert!(pair[0] >= pair[1]);
    }

    let first = out.column("Variable").unwrap().str().unwrap().get(0);
    assert_eq!(first, Some("duration"));
    let strength = out.column("Strength").unwrap().str().unwrap().get(0);
    assert_eq!(strength, Some("Very strong"));
}

#[test]
fn test_random_dataset_properties() {
    let df = create_large_test_dataframe(2000, 6, 42);
    let records = detail(&df, "target", &IvOptions::default());
    let rows = summarize(&records);

    assert_eq!(rows.len(), 7);

    for i in 0..6 {
        let name = format!("feature_{}", i);
        let non_missing = df.height() - df.column(&name).unwrap().null_count();
        let total: u64 = records
            .iter()
            .filter(|r| r.variable == name)
            .map(|r| r.count())
            .sum();
        assert_eq!(total as usize, non_missing, "Numeric bins cover non-missing rows of {}", name);

        // Bins respect the default 10% minimum bucket
        let min_bucket = BinningConfig::default().min_bucket(non_missing) as u64;
        assert!(records
            .iter()
            .filter(|r| r.variable == name)
            .all(|r| r.count() >= min_bucket));
    }

    let segment_total: u64 = records
        .iter()
        .filter(|r| r.variable == "segment")
        .map(|r| r.count())
        .sum();
    assert_eq!(segment_total as usize, df.height());

    // Strongly shifted features outrank the pure-noise one
    let iv_of = |name: &str| rows.iter().find(|r| r.variable == name).unwrap().information_value;
    assert!(iv_of("feature_5") > iv_of("feature_0"));
}

#[test]
fn test_apply_woe_on_detail() {
    let df = create_credit_dataframe();
    let records = detail(&df, "gb", &IvOptions::default());
    let encoded = apply_woe(&df, &records).unwrap();

    assert_eq!(encoded.width(), df.width() + 4);
    let duration_woe: Vec<Option<f64>> = encoded
        .column("duration_woe")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect();
    assert_close(duration_woe[0].unwrap(), (1.0f64 / 3.0).ln(), "first row WoE");
    assert_close(duration_woe[119].unwrap(), 3.0f64.ln(), "last row WoE");

    let purpose_woe = encoded.column("purpose_woe").unwrap();
    assert_eq!(purpose_woe.null_count(), 0, "Missing purposes take the NA bin WoE");
}

#[test]
fn test_numeric_woe_uses_dataset_totals() {
    let df = create_credit_dataframe();
    // Blank out `amount` on every fifth row
    let amount: Vec<Option<f64>> = df
        .column("amount")
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .enumerate()
        .map(|(i, v)| if i % 5 == 0 { None } else { v })
        .collect();
    let mut df = df;
    df.with_column(Column::new("amount".into(), amount)).unwrap();

    let options = IvOptions {
        variables: vars(&["amount"]),
        ..Default::default()
    };
    let records = detail(&df, "gb", &options);

    let binned: u64 = records.iter().map(|r| r.count()).sum();
    assert_eq!(binned, 96, "Missing amounts stay out of the numeric bins");

    for record in &records {
        let (woe, miv) = calculate_woe_iv(record.outcome_0, record.outcome_1, 60, 60);
        assert_close(record.woe, woe, "WoE against dataset totals");
        assert_close(record.miv, miv, "miv against dataset totals");
    }
}

#[test]
fn test_repeated_variable_is_binned_once() {
    let df = create_credit_dataframe();
    let once = summary(
        &df,
        "gb",
        &IvOptions {
            variables: vars(&["duration"]),
            ..Default::default()
        },
    );
    let twice = summary(
        &df,
        "gb",
        &IvOptions {
            variables: vars(&["duration", "purpose", "duration"]),
            ..Default::default()
        },
    );

    assert_eq!(twice.len(), 2);
    let duration = twice.iter().find(|r| r.variable == "duration").unwrap();
    assert_eq!(duration, &once[0]);
    assert_eq!(duration.bins, 3);
    assert_eq!(duration.strength, Strength::VeryStrong);

    let records = detail(
        &df,
        "gb",
        &IvOptions {
            variables: vars(&["purpose", "duration", "purpose"]),
            ..Default::default()
        },
    );
    let variables: Vec<&str> = records.iter().map(|r| r.variable.as_str()).collect();
    assert_eq!(variables.iter().filter(|v| **v == "purpose").count(), 4);
    assert_eq!(variables[0], "purpose");
}

#[test]
fn test_default_engine_applies_binning_options() {
    let df = create_credit_dataframe();
    let options = IvOptions {
        variables: vars(&["duration"]),
        binning: Some(BinningConfig {
            min_bucket_pct: 50.0,
            ..Default::default()
        }),
        ..Default::default()
    };

    let table = IvEngine::default().run(&df, "gb", &options).unwrap();
    assert_eq!(table.len(), 1, "The 50% bucket leaves duration in one bin");

    let table = IvEngine::default()
        .run(
            &df,
            "gb",
            &IvOptions {
                binning: None,
                ..options
            },
        )
        .unwrap();
    assert_eq!(table.len(), 3);
}

#[test]
fn test_custom_binners_reject_binning_options() {
    let df = create_credit_dataframe();
    let engine = IvEngine::with_binners(Box::new(FixedBinner), Box::new(CategoryBinner));
    let options = IvOptions {
        binning: Some(BinningConfig::default()),
        ..Default::default()
    };

    assert!(matches!(
        engine.run(&df, "gb", &options),
        Err(IvError::InvalidConfig(_))
    ));
}
