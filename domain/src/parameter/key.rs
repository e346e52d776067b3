//! Parameter key value object

use crate::core::error::ParameterError;

/// A validated parameter key, e.g. `rf.old_names`.
///
/// Keys are looked up verbatim in configuration sources, so anything that
/// could not survive a `key=value` line or a `--key value` token is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterKey(String);

impl ParameterKey {
    pub fn new(key: impl Into<String>) -> Result<Self, ParameterError> {
        let key = key.into();
        let reason = if key.is_empty() {
            Some("key is empty")
        } else if key.chars().any(char::is_whitespace) {
            Some("key contains whitespace")
        } else if key.contains('=') {
            Some("key contains '='")
        } else if key.starts_with('#') || key.starts_with("//") {
            Some("key starts with a comment marker")
        } else if key.starts_with('-') {
            Some("key starts with '-'")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ParameterError::MalformedKey { key, reason }),
            None => Ok(Self(key)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Segment before the first `.`, used as the toy prefix
    pub fn prefix(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ParameterKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
