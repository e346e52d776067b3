//! Presentation layer for toybox
//!
//! This crate contains the CLI definition and its dispatch, the usage table
//! printer and the console formatter for finished runs.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, CliError, Invocation};
pub use cli::dispatch::{DispatchError, Launcher};
pub use output::console::ConsoleFormatter;
pub use output::usage::{ConsoleUsagePrinter, UsageTable};
