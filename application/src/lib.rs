//! Application layer for toybox
//!
//! This crate contains the ports toys and adapters plug into, parameter
//! resolution, and the lifecycle orchestrator. It depends only on the
//! domain layer.

pub mod ports;
pub mod runtime;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    configuration_source::{ConfigurationSource, InMemorySource, SourceError},
    resource_provider::{NoResources, ResourceProvider},
    toy::{ResourceOf, Toy, ToyError},
    usage_printer::{NoUsage, UsagePrinter},
};
pub use runtime::{PoolReport, StopReason, StopSignal, WorkerPool};
pub use use_cases::play_toy::{DynToy, PlayError, PlayReport, PlayToyUseCase};
pub use use_cases::resolve_parameters::{ParameterResolver, Resolution, ResolutionSummary};
