//! Configuration source port
//!
//! A read-only key/value view built once per run. Infrastructure adapters
//! only have to answer [`ConfigurationSource::get_string`]; every typed getter
//! is derived from it and behaves the same across all forms.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while loading a source or parsing one of its values
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Value '{raw}' of '{key}' is not a valid {expected}")]
    Malformed {
        key: String,
        expected: String,
        raw: String,
    },

    #[error("Value '{raw}' of '{key}' is not a valid list: {reason}")]
    MalformedList {
        key: String,
        raw: String,
        reason: &'static str,
    },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    #[error("No configuration file found in {0}")]
    NoConfigurationFile(PathBuf),

    #[error("{path} is not authorized, its first line must be '{header}'")]
    Unauthorized { path: PathBuf, header: String },

    #[error("Argument '--{0}' has no value")]
    MissingArgumentValue(String),

    #[error("Unexpected argument '{0}', expected '--key value'")]
    UnexpectedToken(String),

    #[error("Native configuration error: {0}")]
    Native(String),
}

/// Read-only view over configured parameter values.
///
/// A key whose stored value is empty counts as absent: `contains_key` is
/// false for it and every getter returns `Ok(None)`.
pub trait ConfigurationSource: Send + Sync {
    /// Where the values come from, for logs
    fn describe(&self) -> String;

    /// Every key with a non-empty value
    fn keys(&self) -> Vec<String>;

    fn get_string(&self, key: &str) -> Result<Option<String>, SourceError>;

    fn contains_key(&self, key: &str) -> bool {
        matches!(self.get_string(key), Ok(Some(_)))
    }

    /// Split the stored value on `delimiter`.
    ///
    /// Sources with a native list representation override this.
    fn get_strings(&self, key: &str, delimiter: &str) -> Result<Option<Vec<String>>, SourceError> {
        self.get_string(key)?
            .map(|raw| split_list(key, &raw, delimiter))
            .transpose()
    }

    fn get_int(&self, key: &str) -> Result<Option<i32>, SourceError> {
        parse_with(self.get_string(key)?, key, "Int")
    }

    fn get_long(&self, key: &str) -> Result<Option<i64>, SourceError> {
        parse_with(self.get_string(key)?, key, "Long")
    }

    fn get_short(&self, key: &str) -> Result<Option<i16>, SourceError> {
        parse_with(self.get_string(key)?, key, "Short")
    }

    fn get_float(&self, key: &str) -> Result<Option<f32>, SourceError> {
        parse_with(self.get_string(key)?, key, "Float")
    }

    fn get_double(&self, key: &str) -> Result<Option<f64>, SourceError> {
        parse_with(self.get_string(key)?, key, "Double")
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>, SourceError> {
        self.get_string(key)?
            .map(|raw| parse_bool(key, &raw))
            .transpose()
    }

    fn get_bool_or(&self, key: &str, default: bool) -> Result<bool, SourceError> {
        Ok(self.get_bool(key)?.unwrap_or(default))
    }

    /// Match one of `variants` case-insensitively, yielding the canonical name
    fn get_enum(&self, key: &str, variants: &[&str]) -> Result<Option<String>, SourceError> {
        self.get_string(key)?
            .map(|raw| parse_enum(key, &raw, variants))
            .transpose()
    }

    fn get_enum_or(&self, key: &str, variants: &[&str], default: &str) -> Result<String, SourceError> {
        Ok(self
            .get_enum(key, variants)?
            .unwrap_or_else(|| default.to_string()))
    }
}

/// Split a delimited list, rejecting empty elements
pub fn split_list(key: &str, raw: &str, delimiter: &str) -> Result<Vec<String>, SourceError> {
    let malformed = |reason| SourceError::MalformedList {
        key: key.to_string(),
        raw: raw.to_string(),
        reason,
    };

    if delimiter.is_empty() {
        return Err(malformed("delimiter is empty"));
    }

    raw.split(delimiter)
        .map(|element| {
            let element = element.trim();
            if element.is_empty() {
                Err(malformed("list contains an empty element"))
            } else {
                Ok(element.to_string())
            }
        })
        .collect()
}

pub fn parse_bool(key: &str, raw: &str) -> Result<bool, SourceError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SourceError::Malformed {
            key: key.to_string(),
            expected: "Bool".to_string(),
            raw: raw.to_string(),
        }),
    }
}

pub fn parse_enum(key: &str, raw: &str, variants: &[&str]) -> Result<String, SourceError> {
    let wanted = raw.trim();
    variants
        .iter()
        .find(|variant| variant.eq_ignore_ascii_case(wanted))
        .map(|variant| variant.to_string())
        .ok_or_else(|| SourceError::Malformed {
            key: key.to_string(),
            expected: format!("one of [{}]", variants.join(", ")),
            raw: raw.to_string(),
        })
}

fn parse_with<T: FromStr>(
    raw: Option<String>,
    key: &str,
    expected: &str,
) -> Result<Option<T>, SourceError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| SourceError::Malformed {
            key: key.to_string(),
            expected: expected.to_string(),
            raw,
        })
}

/// Source backed by an in-memory map
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    name: String,
    values: BTreeMap<String, String>,
}

impl InMemorySource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Later inserts of the same key win
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }
}

impl FromIterator<(String, String)> for InMemorySource {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            name: "memory".to_string(),
            values: iter.into_iter().collect(),
        }
    }
}

impl ConfigurationSource for InMemorySource {
    fn describe(&self) -> String {
        self.name.clone()
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
