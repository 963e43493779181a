//! Terminal styling utilities

use console::{style, Emoji};
use std::path::Path;
use std::time::Duration;

use crate::pipeline::BinningConfig;

// Emoji icons with fallbacks for terminals that don't support them
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "[*] ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", ">> ");
pub static CHART: Emoji<'_, '_> = Emoji("📊 ", "");
pub static FOLDER: Emoji<'_, '_> = Emoji("📂 ", "");
pub static TARGET: Emoji<'_, '_> = Emoji("🎯 ", "");
pub static CLOCK: Emoji<'_, '_> = Emoji("⏱️  ", "");

/// Print the application banner
pub fn print_banner(version: &str) {
    println!();
    println!(
        "    {} {}",
        style("ivscreen").cyan().bold(),
        style(format!("v{}", version)).dim()
    );
    println!(
        "    {}",
        style("Information Value and Weight of Evidence screening").dim()
    );
    println!("    {}", style("━".repeat(50)).dim());
    println!();
}

/// Print configuration card
pub fn print_config(input: &Path, outcome: &str, config: &BinningConfig) {
    let box_width = 56;
    let line = "─".repeat(box_width - 2);

    println!("    ┌{}┐", line);
    println!("    │ {:<52}│", style("Configuration").cyan().bold());
    println!("    ├{}┤", line);
    println!("    │  {}Input:   {:<39}│", FOLDER, truncate_path(input, 38));
    println!("    │  {}Outcome: {:<39}│", TARGET, truncate_string(outcome, 38));
    println!("    ├{}┤", line);
    println!(
        "    │  {}Complexity:     {:<32}│",
        CHART,
        style(format!("{:e}", config.complexity)).yellow()
    );
    println!(
        "    │  {}Min bucket:     {:<32}│",
        CHART,
        style(format!("{:.1}%", config.min_bucket_pct)).yellow()
    );
    println!(
        "    │  {}Max depth:      {:<32}│",
        CHART,
        style(config.max_depth).yellow()
    );
    println!("    └{}┘", line);
    println!();
}

/// Print a step header with styling
pub fn print_step_header(step_num: u8, title: &str) {
    println!();
    println!(
        "    {} {} {}",
        style(format!("STEP {}", step_num)).cyan().bold(),
        style("│").dim(),
        style(title).white().bold()
    );
    println!("    {}", style("─".repeat(50)).dim());
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("    {} {}", style("✓").green().bold(), style(message).green());
}

/// Print an info message
pub fn print_info(message: &str) {
    println!("    {}{}", INFO, message);
}

/// Print how long a step took
pub fn print_step_time(elapsed: Duration) {
    println!(
        "    {}{}",
        CLOCK,
        style(format!("{:.2}s", elapsed.as_secs_f64())).dim()
    );
}

/// Print the final completion message
pub fn print_completion() {
    println!();
    println!(
        "    {}{}",
        ROCKET,
        style("IV screening complete!").green().bold()
    );
    println!();
}

fn truncate_path(path: &Path, max_len: usize) -> String {
    truncate_string(&path.display().to_string(), max_len)
}

fn truncate_string(s: &str, max_len: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_len {
        s.to_string()
    } else {
        let tail: String = chars[chars.len() - (max_len - 3)..].iter().collect();
        format!("...{}", tail)
    }
}
