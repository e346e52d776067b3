//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure and presentation adapters
//! must implement.

pub mod configuration_source;
pub mod resource_provider;
pub mod toy;
pub mod usage_printer;
