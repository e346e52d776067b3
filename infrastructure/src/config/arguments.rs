//! Parameters passed as trailing command-line tokens

use std::collections::BTreeMap;
use toybox_application::{ConfigurationSource, SourceError};

/// Configuration from raw tokens of the form `--key value` or `--key=value`
#[derive(Debug, Clone, Default)]
pub struct ArgumentSource {
    values: BTreeMap<String, String>,
}

impl ArgumentSource {
    pub fn parse<I, S>(tokens: I) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut values = BTreeMap::new();
        let mut tokens = tokens.into_iter().map(Into::into);

        while let Some(token) = tokens.next() {
            let Some(flag) = token.strip_prefix("--") else {
                return Err(SourceError::UnexpectedToken(token));
            };

            if let Some((key, value)) = flag.split_once('=') {
                if key.is_empty() {
                    return Err(SourceError::UnexpectedToken(token));
                }
                values.insert(key.to_string(), value.to_string());
                continue;
            }

            if flag.is_empty() {
                return Err(SourceError::UnexpectedToken(token));
            }
            // The next token is the value, whatever it looks like.
            match tokens.next() {
                Some(value) => {
                    values.insert(flag.to_string(), value);
                }
                None => return Err(SourceError::MissingArgumentValue(flag.to_string())),
            }
        }

        Ok(Self { values })
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ConfigurationSource for ArgumentSource {
    fn describe(&self) -> String {
        "arguments".to_string()
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
