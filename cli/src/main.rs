//! CLI entrypoint for toybox
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::Result;
use clap::Parser;
use std::path::Path;
use toybox_application::PlayToyUseCase;
use toybox_infrastructure::{ConfigurationFactory, ToyRegistry};
use toybox_presentation::{Cli, ConsoleUsagePrinter, Launcher};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // === Dependency Injection ===
    let registry = ToyRegistry::builtin();
    let launcher = Launcher::new(
        registry.names(),
        |name: &str| registry.create(name),
        |dir: &Path, overrides: &[String]| ConfigurationFactory::with_overrides(dir, overrides),
    );

    let code = launcher
        .dispatch(cli.invocation()?, &PlayToyUseCase::new(), &ConsoleUsagePrinter)
        .await?;
    std::process::exit(code.code());
}
