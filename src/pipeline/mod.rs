//! Pipeline module - outcome resolution, binning, IV aggregation and I/O

pub mod binning;
pub mod categorical;
pub mod encode;
pub mod iv;
pub mod loader;
pub mod outcome;
pub mod tree;

pub use binning::{calculate_woe_iv, BinLabel, BinRecord, Binner, BinningConfig, VariableKind};
pub use categorical::CategoryBinner;
pub use encode::*;
pub use iv::*;
pub use loader::*;
pub use outcome::{analyze_outcome_column, Outcome, OutcomeAnalysis, OutcomeMapping};
pub use tree::TreeBinner;
