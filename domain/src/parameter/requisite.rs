//! Type-erased view of a parameter and the ordered set a toy declares

use super::key::ParameterKey;
use super::parameter::Parameter;
use super::value::{ParamValue, RawValue, TypeTag};
use crate::core::error::ParameterError;
use std::collections::HashSet;

/// Object-safe face of a [`Parameter`], so parameters of different value
/// types can be declared, resolved and printed together.
pub trait Requisite: Send + Sync {
    fn key(&self) -> &ParameterKey;
    fn type_tag(&self) -> TypeTag;
    fn is_required(&self) -> bool;
    fn description(&self) -> &str;
    fn delimiter(&self) -> &str;
    fn default_display(&self) -> Option<String>;
    /// Effective value, falling back to the default
    fn value_display(&self) -> Option<String>;
    fn is_unset(&self) -> bool;
    fn has_current(&self) -> bool;

    /// Resolve from a raw source value.
    ///
    /// Fails with `TypeMismatch` when `raw` does not carry this parameter's
    /// type, otherwise behaves like [`Parameter::resolve`].
    fn resolve_raw(&mut self, raw: Option<RawValue>) -> Result<(), ParameterError>;
}

impl<T: ParamValue> Requisite for Parameter<T> {
    fn key(&self) -> &ParameterKey {
        Parameter::key(self)
    }

    fn type_tag(&self) -> TypeTag {
        T::type_tag()
    }

    fn is_required(&self) -> bool {
        Parameter::is_required(self)
    }

    fn description(&self) -> &str {
        Parameter::description(self)
    }

    fn delimiter(&self) -> &str {
        Parameter::delimiter(self)
    }

    fn default_display(&self) -> Option<String> {
        self.default_value().map(|v| v.render(Parameter::delimiter(self)))
    }

    fn value_display(&self) -> Option<String> {
        self.render()
    }

    fn is_unset(&self) -> bool {
        Parameter::is_unset(self)
    }

    fn has_current(&self) -> bool {
        Parameter::has_current(self)
    }

    fn resolve_raw(&mut self, raw: Option<RawValue>) -> Result<(), ParameterError> {
        let Some(raw) = raw else {
            return self.resolve(None);
        };
        let found = raw.type_name();
        match T::from_raw(raw) {
            Some(value) => self.resolve(Some(value)),
            None => Err(ParameterError::TypeMismatch {
                key: Parameter::key(self).to_string(),
                expected: T::type_tag().to_string(),
                found: found.to_string(),
            }),
        }
    }
}

/// Parameters declared by one toy, in declaration order.
///
/// Entries borrow the toy's own fields mutably, so resolving through
/// `Requisites` writes straight into the toy.
#[derive(Default)]
pub struct Requisites<'a> {
    entries: Vec<&'a mut dyn Requisite>,
}

impl<'a> Requisites<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, requisite: &'a mut dyn Requisite) -> &mut Self {
        self.entries.push(requisite);
        self
    }

    /// Reject a declaration that uses one key twice
    pub fn ensure_unique_keys(&self) -> Result<(), ParameterError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            if !seen.insert(entry.key().as_str()) {
                return Err(ParameterError::DuplicateKey {
                    key: entry.key().to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&(dyn Requisite + 'a)> {
        self.entries.get(index).map(|entry| &**entry)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut (dyn Requisite + 'a)> {
        self.entries.get_mut(index).map(|entry| &mut **entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(dyn Requisite + 'a)> {
        self.entries.iter().map(|entry| &**entry)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut (dyn Requisite + 'a)> {
        self.entries.iter_mut().map(|entry| &mut **entry)
    }

    /// Read-only view for usage printing
    pub fn view(&self) -> Vec<&dyn Requisite> {
        self.entries
            .iter()
            .map(|entry| &**entry as &dyn Requisite)
            .collect()
    }

    pub fn find(&self, key: &str) -> Option<&(dyn Requisite + 'a)> {
        self.iter().find(|r| r.key().as_str() == key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.iter().map(|r| r.key().to_string()).collect()
    }
}

impl std::fmt::Debug for Requisites<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.keys()).finish()
    }
}
