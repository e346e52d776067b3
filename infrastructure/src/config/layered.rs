//! Ordered overlay of configuration sources

use std::collections::BTreeSet;
use toybox_application::{ConfigurationSource, SourceError};

/// The first layer that holds a key answers for it
pub struct LayeredSource {
    layers: Vec<Box<dyn ConfigurationSource>>,
}

impl LayeredSource {
    pub fn new() -> Self {
        Self { layers: Vec::new() }
    }

    /// Add a layer below the existing ones
    pub fn layer(mut self, source: impl ConfigurationSource + 'static) -> Self {
        self.layers.push(Box::new(source));
        self
    }

    pub fn layer_boxed(mut self, source: Box<dyn ConfigurationSource>) -> Self {
        self.layers.push(source);
        self
    }

    fn owner(&self, key: &str) -> Option<&dyn ConfigurationSource> {
        self.layers
            .iter()
            .find(|layer| layer.contains_key(key))
            .map(|layer| &**layer)
    }
}

impl Default for LayeredSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationSource for LayeredSource {
    fn describe(&self) -> String {
        self.layers
            .iter()
            .map(|layer| layer.describe())
            .collect::<Vec<_>>()
            .join(" > ")
    }

    fn keys(&self) -> Vec<String> {
        self.layers
            .iter()
            .flat_map(|layer| layer.keys())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn get_string(&self, key: &str) -> Result<Option<String>, SourceError> {
        match self.owner(key) {
            Some(layer) => layer.get_string(key),
            None => Ok(None),
        }
    }

    fn get_strings(&self, key: &str, delimiter: &str) -> Result<Option<Vec<String>>, SourceError> {
        match self.owner(key) {
            Some(layer) => layer.get_strings(key, delimiter),
            None => Ok(None),
        }
    }
}
