//! ivscreen: Information Value screening library
//!
//! Bins every predictor of a dataset against a binary outcome, computes
//! Weight of Evidence and Information Value per bin, and ranks variables by
//! total IV with a strength label.

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use error::{IvError, IvResult};
pub use pipeline::{compute_iv, IvOptions, IvTable};
