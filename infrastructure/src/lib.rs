//! Infrastructure layer for toybox
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: configuration sources, the directory resource
//! provider, and the built-in toys with their registry.

pub mod config;
pub mod providers;
pub mod toys;

// Re-export commonly used types
pub use config::{
    ArgumentSource, ConfigurationFactory, LayeredSource, NativeSource, PropertiesSource,
};
pub use providers::{DirectoryLease, DirectoryProvider};
pub use toys::{RegistryError, ToyRegistry};
