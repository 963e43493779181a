//! Terminal tables for IV results

use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, CellAlignment, Color, Table};
use console::style;

use crate::pipeline::{BinRecord, Strength, VariableSummary};

fn strength_color(strength: Strength) -> Color {
    match strength {
        Strength::Suspicious => Color::Magenta,
        Strength::VeryStrong => Color::Green,
        Strength::Strong => Color::Cyan,
        Strength::Average => Color::Yellow,
        Strength::Weak => Color::White,
        Strength::VeryWeak => Color::DarkGrey,
    }
}

fn header(cells: &[&str]) -> Vec<Cell> {
    cells
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

fn print_indented(table: &Table) {
    for line in table.to_string().lines() {
        println!("    {}", line);
    }
}

fn print_title(icon: &str, title: &str) {
    println!();
    println!("    {} {}", style(icon).cyan(), style(title).white().bold());
    println!("    {}", style("─".repeat(50)).dim());
    println!();
}

/// Build the summary table (one row per variable)
pub fn summary_table(rows: &[VariableSummary]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["Variable", "InformationValue", "Bins", "ZeroBins", "Strength"]));

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.variable),
            Cell::new(format!("{:.4}", row.information_value)).set_alignment(CellAlignment::Right),
            Cell::new(row.bins).set_alignment(CellAlignment::Right),
            Cell::new(row.zero_bins)
                .set_alignment(CellAlignment::Right)
                .fg(if row.zero_bins > 0 { Color::Red } else { Color::White }),
            Cell::new(row.strength.label())
                .fg(strength_color(row.strength))
                .add_attribute(Attribute::Bold),
        ]);
    }

    table
}

/// Build the detail table (one row per bin)
pub fn detail_table(records: &[BinRecord]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header(&["variable", "bin_label", "outcome_0", "outcome_1", "woe", "miv"]));

    for record in records {
        let zero = record.is_zero_bin();
        table.add_row(vec![
            Cell::new(&record.variable),
            Cell::new(record.bin_label.to_string()),
            Cell::new(record.outcome_0).set_alignment(CellAlignment::Right),
            Cell::new(record.outcome_1).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.4}", record.woe))
                .set_alignment(CellAlignment::Right)
                .fg(if zero { Color::Red } else { Color::White }),
            Cell::new(format!("{:.4}", record.miv)).set_alignment(CellAlignment::Right),
        ]);
    }

    table
}

/// Print the ranked summary with a strength breakdown
pub fn display_summary(rows: &[VariableSummary]) {
    print_title("📋", "INFORMATION VALUE SUMMARY");
    print_indented(&summary_table(rows));

    let suspicious: Vec<&str> = rows
        .iter()
        .filter(|r| r.strength == Strength::Suspicious)
        .map(|r| r.variable.as_str())
        .collect();
    if !suspicious.is_empty() {
        println!();
        println!(
            "      {} {}:",
            style("Suspiciously high IV (check for leakage)").yellow(),
            style(format!("({})", suspicious.len())).dim()
        );
        for variable in suspicious {
            println!("        {} {}", style("•").dim(), variable);
        }
    }
}

/// Print the per-bin detail table
pub fn display_detail(records: &[BinRecord]) {
    print_title("📝", "BIN DETAIL");
    print_indented(&detail_table(records));
}
