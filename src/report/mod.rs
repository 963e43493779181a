//! Report module - terminal tables and JSON export of IV results

pub mod iv_export;
pub mod summary;

pub use iv_export::*;
pub use summary::*;
