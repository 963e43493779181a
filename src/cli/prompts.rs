//! Interactive prompts using dialoguer

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Select};

use crate::pipeline::OutcomeMapping;

/// Prompt the user to pick the outcome column
pub fn select_outcome_column(columns: &[String]) -> Result<String> {
    let idx = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select the outcome column")
        .items(columns)
        .default(0)
        .interact()?;
    Ok(columns[idx].clone())
}

/// Prompt the user to map a non-binary outcome to event / non-event values
pub fn select_outcome_mapping(column: &str, values: &[String]) -> Result<OutcomeMapping> {
    let theme = ColorfulTheme::default();

    let event_idx = Select::with_theme(&theme)
        .with_prompt(format!("'{}' is not binary. Which value is the EVENT (1)?", column))
        .items(values)
        .default(0)
        .interact()?;

    let remaining: Vec<&String> = values
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != event_idx)
        .map(|(_, v)| v)
        .collect();
    if remaining.is_empty() {
        anyhow::bail!("Outcome column '{}' has a single value; nothing to map to 0", column);
    }

    let non_event_idx = Select::with_theme(&theme)
        .with_prompt("Which value is the NON-EVENT (0)?")
        .items(&remaining)
        .default(0)
        .interact()?;

    Ok(OutcomeMapping::new(
        values[event_idx].clone(),
        remaining[non_event_idx].clone(),
    ))
}
