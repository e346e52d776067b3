//! Name to constructor table of the built-in toys

use super::{LinesToString, LoadWriter, MarsRover, RenameFiles};
use std::collections::BTreeMap;
use thiserror::Error;
use toybox_application::DynToy;
use toybox_domain::ParameterError;
use tracing::debug;

/// Builds a fresh toy
pub type ToyFactory = fn() -> Result<Box<dyn DynToy>, ParameterError>;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Unknown toy '{name}', available toys: {available}")]
    UnknownToy { name: String, available: String },

    #[error("Toy '{name}' declares an invalid parameter: {source}")]
    Declaration {
        name: String,
        #[source]
        source: ParameterError,
    },
}

/// Toys selectable by name on the command line
#[derive(Debug, Clone, Default)]
pub struct ToyRegistry {
    factories: BTreeMap<&'static str, ToyFactory>,
}

fn boxed<T: DynToy + 'static>(toy: Result<T, ParameterError>) -> Result<Box<dyn DynToy>, ParameterError> {
    toy.map(|toy| Box::new(toy) as Box<dyn DynToy>)
}

impl ToyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every toy shipped with toybox
    pub fn builtin() -> Self {
        Self::new()
            .register(super::lines_to_string::NAME, || boxed(LinesToString::new()))
            .register(super::rename_files::NAME, || boxed(RenameFiles::new()))
            .register(super::mars_rover::NAME, || boxed(MarsRover::new()))
            .register(super::load_writer::NAME, || boxed(LoadWriter::new()))
    }

    /// Add `factory` under `name`, replacing any earlier one
    pub fn register(mut self, name: &'static str, factory: ToyFactory) -> Self {
        self.factories.insert(name, factory);
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn create(&self, name: &str) -> Result<Box<dyn DynToy>, RegistryError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| RegistryError::UnknownToy {
                name: name.to_string(),
                available: self.names().join(", "),
            })?;

        debug!(toy = name, "Creating toy");
        factory().map_err(|source| RegistryError::Declaration {
            name: name.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_toys_construct() {
        let registry = ToyRegistry::builtin();
        assert_eq!(
            registry.names(),
            vec!["lines_to_string", "load_writer", "mars_rover", "rename_files"]
        );
        for name in registry.names() {
            let toy = registry.create(name).unwrap();
            assert_eq!(toy.name(), name);
        }
    }

    #[test]
    fn test_unknown_toy() {
        let err = ToyRegistry::builtin().create("split_table").err().unwrap();
        assert!(matches!(err, RegistryError::UnknownToy { .. }));
        assert!(err.to_string().contains("mars_rover"));
    }

    #[test]
    fn test_bad_declaration_is_reported() {
        let registry = ToyRegistry::new().register("broken", || {
            Err(ParameterError::MalformedKey {
                key: "bad key".to_string(),
                reason: "key contains whitespace",
            })
        });
        assert!(matches!(
            registry.create("broken"),
            Err(RegistryError::Declaration { .. })
        ));
    }
}
