//! Toy port
//!
//! A toy is a single administrative operation. It owns its parameters,
//! lends them out for resolution, and runs once against the resource its
//! provider hands back.

use super::resource_provider::ResourceProvider;
use async_trait::async_trait;
use thiserror::Error;
use toybox_domain::{ParameterError, Requisites, ReturnCode};

/// Failure reported by a toy hook
#[derive(Error, Debug)]
pub enum ToyError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("panicked: {0}")]
    Panicked(String),
}

impl ToyError {
    pub fn msg(message: impl Into<String>) -> Self {
        ToyError::Message(message.into())
    }
}

/// Resource type a toy runs against
pub type ResourceOf<T> = <<T as Toy>::Provider as ResourceProvider>::Resource;

/// A lifecycle participant driven by the play orchestrator.
///
/// Hooks are called in a fixed order: [`requisite`](Toy::requisite),
/// [`cross_validate`](Toy::cross_validate), [`provider`](Toy::provider),
/// [`build`](Toy::build), [`have_fun`](Toy::have_fun) and finally
/// [`destroy`](Toy::destroy). `destroy` runs whenever `provider` was called,
/// even when a later hook failed.
#[async_trait]
pub trait Toy: Send + Sync {
    type Provider: ResourceProvider;

    fn name(&self) -> &str;

    /// Leading key segment shared by this toy's parameters, e.g. `rf`
    fn parameter_prefix(&self) -> &str;

    /// Declare every parameter, in the order it should be resolved
    fn requisite<'a>(&'a mut self, requisites: &mut Requisites<'a>);

    /// `key=value` pairs shown together with the usage table
    fn example_configuration(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// Checks spanning several parameters, run after every one is resolved
    fn cross_validate(&mut self) -> Result<(), ToyError> {
        Ok(())
    }

    fn provider(&self) -> Result<Self::Provider, ToyError>;

    async fn build(&mut self, _resource: &ResourceOf<Self>) -> Result<(), ToyError> {
        Ok(())
    }

    async fn have_fun(&mut self, resource: &ResourceOf<Self>) -> Result<ReturnCode, ToyError>;

    async fn destroy(&mut self) -> Result<(), ToyError> {
        Ok(())
    }
}
