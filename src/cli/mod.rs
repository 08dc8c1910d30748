//! Command-line interface for collector-admin.

mod commands;
pub mod helpers;
pub mod progress;

pub use commands::{is_verbose, run};
