//! Flat `key=value` property files

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use toybox_application::{ConfigurationSource, SourceError};
use tracing::debug;

/// Configuration read from a property file.
///
/// One `key=value` pair per line, split at the first `=`. The key is trimmed,
/// the value only loses its leading whitespace, so `sep= | ` reads as `"| "`.
/// Blank lines, lines starting with `#` or `//`, and lines without `=` are
/// skipped. A repeated key keeps its last value.
#[derive(Debug, Clone)]
pub struct PropertiesSource {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl PropertiesSource {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let content = read(path)?;
        Ok(Self::from_content(path, &content))
    }

    /// Load a file whose first line must be exactly `header`
    pub fn load_authorized(path: impl AsRef<Path>, header: &str) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let content = read(path)?;

        let first_line = content.lines().next().unwrap_or_default();
        if first_line.trim_end_matches('\r') != header {
            return Err(SourceError::Unauthorized {
                path: path.to_path_buf(),
                header: header.to_string(),
            });
        }
        Ok(Self::from_content(path, &content))
    }

    fn from_content(path: &Path, content: &str) -> Self {
        let values = parse_properties(content);
        debug!(path = %path.display(), keys = values.len(), "Loaded property file");
        Self {
            path: path.to_path_buf(),
            values,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn read(path: &Path) -> Result<String, SourceError> {
    std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn parse_properties(content: &str) -> BTreeMap<String, String> {
    content
        .lines()
        .map(str::trim_start)
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with("//"))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim_start().to_string()))
        .filter(|(key, _)| !key.is_empty())
        .collect()
}

impl ConfigurationSource for PropertiesSource {
    fn describe(&self) -> String {
        format!("properties:{}", self.path.display())
    }

    fn keys(&self) -> Vec<String> {
        self.values
            .iter()
            .filter(|(_, value)| !value.is_empty())
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn get_string(&self, key: &str) -> Result<Option<String>, SourceError> {
        Ok(self.values.get(key).filter(|v| !v.is_empty()).cloned())
    }
}
