//! Picks the configuration source for a configuration directory

use super::arguments::ArgumentSource;
use super::layered::LayeredSource;
use super::native::{NativeSource, toml_files};
use super::properties::PropertiesSource;
use std::path::Path;
use toybox_application::{ConfigurationSource, SourceError};
use tracing::info;

/// Site-wide property file; only honoured when it starts with [`SITE_HEADER`]
pub const SITE_FILE: &str = "toy-site.conf";
pub const SITE_HEADER: &str = "# toybox-site";
/// Plain property file
pub const PROPERTIES_FILE: &str = "toy.properties";

/// Builds the source a toy is resolved against
pub struct ConfigurationFactory;

impl ConfigurationFactory {
    /// Select the source for `dir`.
    ///
    /// In order: `toy-site.conf` (with its mandatory header),
    /// `toy.properties`, any `*.toml` files.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Box<dyn ConfigurationSource>, SourceError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(SourceError::NotADirectory(dir.to_path_buf()));
        }

        let site = dir.join(SITE_FILE);
        if site.is_file() {
            info!(path = %site.display(), "Using site configuration");
            return Ok(Box::new(PropertiesSource::load_authorized(&site, SITE_HEADER)?));
        }

        let properties = dir.join(PROPERTIES_FILE);
        if properties.is_file() {
            info!(path = %properties.display(), "Using property file");
            return Ok(Box::new(PropertiesSource::load(&properties)?));
        }

        if !toml_files(dir)?.is_empty() {
            info!(dir = %dir.display(), "Using native configuration");
            return Ok(Box::new(NativeSource::load(dir)?));
        }

        Err(SourceError::NoConfigurationFile(dir.to_path_buf()))
    }

    /// Directory source with `--key value` tokens layered on top
    pub fn with_overrides<S: AsRef<str>>(
        dir: impl AsRef<Path>,
        overrides: &[S],
    ) -> Result<Box<dyn ConfigurationSource>, SourceError> {
        let base = Self::from_directory(dir)?;
        let arguments = ArgumentSource::parse(overrides.iter().map(|s| s.as_ref().to_string()))?;
        if arguments.is_empty() {
            return Ok(base);
        }
        Ok(Box::new(LayeredSource::new().layer(arguments).layer_boxed(base)))
    }
}
