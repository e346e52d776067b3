//! Resolve parameters use case
//!
//! Walks a toy's requisites once, in declaration order, and resolves each
//! one against a configuration source with the getter matching its type.

use super::play_toy::PlayError;
use crate::ports::configuration_source::{ConfigurationSource, SourceError};
use crate::ports::usage_printer::UsagePrinter;
use toybox_domain::{RawValue, Requisites, TypeTag};
use tracing::debug;

/// Where a parameter's effective value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    FromSource,
    Default,
    Unset,
}

/// Outcome of resolution, per key, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionSummary {
    entries: Vec<(String, Resolution)>,
}

impl ResolutionSummary {
    pub fn get(&self, key: &str) -> Option<Resolution> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, resolution)| *resolution)
    }

    pub fn entries(&self) -> &[(String, Resolution)] {
        &self.entries
    }

    pub fn count(&self, resolution: Resolution) -> usize {
        self.entries.iter().filter(|(_, r)| *r == resolution).count()
    }
}

/// Resolves declared parameters against a source.
///
/// Resolution is not transactional: when a later parameter fails, the ones
/// before it keep their resolved values.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterResolver;

impl ParameterResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(
        &self,
        toy: &str,
        requisites: &mut Requisites<'_>,
        source: &dyn ConfigurationSource,
        usage: &dyn UsagePrinter,
    ) -> Result<ResolutionSummary, PlayError> {
        let mut summary = ResolutionSummary::default();

        for index in 0..requisites.len() {
            let Some(requisite) = requisites.get(index) else {
                break;
            };
            let key = requisite.key().to_string();
            let required = requisite.is_required();
            let raw = fetch_raw(source, &key, requisite.type_tag(), requisite.delimiter())?;

            if raw.is_none() && required {
                usage.print_usage(toy, &requisites.view());
                return Err(PlayError::MissingRequiredParameter { key });
            }

            let from_source = raw.is_some();
            if let Some(requisite) = requisites.get_mut(index) {
                requisite.resolve_raw(raw)?;
                let resolution = if from_source {
                    Resolution::FromSource
                } else if requisite.is_unset() {
                    Resolution::Unset
                } else {
                    Resolution::Default
                };
                debug!(key = %key, resolution = ?resolution, "Resolved parameter");
                summary.entries.push((key, resolution));
            }
        }

        Ok(summary)
    }
}

/// Read `key` with the getter matching `tag`
fn fetch_raw(
    source: &dyn ConfigurationSource,
    key: &str,
    tag: TypeTag,
    delimiter: &str,
) -> Result<Option<RawValue>, SourceError> {
    Ok(match tag {
        TypeTag::String => source.get_string(key)?.map(RawValue::String),
        TypeTag::StringList => source.get_strings(key, delimiter)?.map(RawValue::StringList),
        TypeTag::Int => source.get_int(key)?.map(RawValue::Int),
        TypeTag::Long => source.get_long(key)?.map(RawValue::Long),
        TypeTag::Short => source.get_short(key)?.map(RawValue::Short),
        TypeTag::Float => source.get_float(key)?.map(RawValue::Float),
        TypeTag::Double => source.get_double(key)?.map(RawValue::Double),
        TypeTag::Bool => source.get_bool(key)?.map(RawValue::Bool),
        TypeTag::Enum(variants) => source.get_enum(key, variants)?.map(RawValue::Enum),
    })
}
