//! Runs a parsed invocation against a toy factory and a source factory

use super::commands::{Cli, Invocation};
use crate::output::console::ConsoleFormatter;
use std::path::Path;
use thiserror::Error;
use toybox_application::{
    ConfigurationSource, DynToy, PlayError, PlayToyUseCase, SourceError, UsagePrinter,
};
use toybox_domain::ReturnCode;
use tracing::info;

#[derive(Error, Debug)]
pub enum DispatchError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Toy(E),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Play(#[from] PlayError),
}

/// Toy lookup and configuration loading, injected by the binary
pub struct Launcher<C, S> {
    names: Vec<&'static str>,
    create: C,
    open_source: S,
}

impl<C, S, E> Launcher<C, S>
where
    E: std::error::Error + 'static,
    C: Fn(&str) -> Result<Box<dyn DynToy>, E>,
    S: FnOnce(&Path, &[String]) -> Result<Box<dyn ConfigurationSource>, SourceError>,
{
    pub fn new(names: Vec<&'static str>, create: C, open_source: S) -> Self {
        Self {
            names,
            create,
            open_source,
        }
    }

    /// Help and list never touch the configuration directory.
    pub async fn dispatch(
        self,
        invocation: Invocation,
        use_case: &PlayToyUseCase,
        usage: &dyn UsagePrinter,
    ) -> Result<ReturnCode, DispatchError<E>> {
        match invocation {
            Invocation::Help { toy: None } => {
                println!("{}", Cli::help_text());
                println!("{}", ConsoleFormatter::format_toy_list(&self.names));
                Ok(ReturnCode::Help)
            }
            Invocation::Help { toy: Some(name) } => {
                let mut toy = (self.create)(&name).map_err(DispatchError::Toy)?;
                Ok(toy.how_to_play(use_case, usage)?)
            }
            Invocation::List => {
                println!("{}", ConsoleFormatter::format_toy_list(&self.names));
                Ok(ReturnCode::Success)
            }
            Invocation::Play {
                toy: name,
                conf_dir,
                overrides,
            } => {
                let mut toy = (self.create)(&name).map_err(DispatchError::Toy)?;
                let source = (self.open_source)(&conf_dir, &overrides)?;
                info!(toy = %name, source = %source.describe(), "Starting toybox");

                let report = toy.play(use_case, source.as_ref(), usage).await;
                println!("{}", ConsoleFormatter::format_report(&report));
                Ok(report.return_code())
            }
        }
    }
}
