//! Usage printing port
//!
//! Implementations live in the presentation layer.

use toybox_domain::Requisite;

/// Prints how a toy is configured
pub trait UsagePrinter: Send + Sync {
    /// Print the parameter table of `toy`
    fn print_usage(&self, toy: &str, requisites: &[&dyn Requisite]);

    /// Print an example configuration as `key=value` lines
    fn print_examples(&self, _toy: &str, _examples: &[(String, String)]) {}
}

/// No-op printer for when usage output is not wanted
pub struct NoUsage;

impl UsagePrinter for NoUsage {
    fn print_usage(&self, _toy: &str, _requisites: &[&dyn Requisite]) {}
}
