//! Resource provider port
//!
//! A toy that talks to an external system gets its handle from a provider
//! built out of its resolved parameters. The orchestrator acquires the
//! resource before the toy is built and releases it exactly once afterwards.

use super::configuration_source::ConfigurationSource;
use super::toy::ToyError;
use async_trait::async_trait;

/// Acquires and releases the resource a toy runs against
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    type Resource: Send + Sync;

    /// Provider name, for logs
    fn name(&self) -> &str;

    async fn acquire(&self, source: &dyn ConfigurationSource) -> Result<Self::Resource, ToyError>;

    async fn release(&self, resource: Self::Resource) -> Result<(), ToyError>;
}

/// Provider for toys that need nothing external
#[derive(Debug, Clone, Copy, Default)]
pub struct NoResources;

#[async_trait]
impl ResourceProvider for NoResources {
    type Resource = ();

    fn name(&self) -> &str {
        "none"
    }

    async fn acquire(&self, _source: &dyn ConfigurationSource) -> Result<(), ToyError> {
        Ok(())
    }

    async fn release(&self, _resource: ()) -> Result<(), ToyError> {
        Ok(())
    }
}
