//! Terminal helpers - progress spinners and styled output

mod progress;
mod styling;

pub use progress::*;
pub use styling::*;
