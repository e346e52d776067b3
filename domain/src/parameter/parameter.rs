//! Typed, constrained parameter declared by a toy

use super::constraint::Constraint;
use super::key::ParameterKey;
use super::value::{ParamValue, TypeTag};
use crate::core::error::ParameterError;

const DEFAULT_DELIMITER: &str = ",";

/// A named, typed, constrained input of a toy.
///
/// `current` stays empty until the parameter is resolved from a
/// configuration source or set explicitly; [`value`](Self::value) falls back
/// to the default.
#[derive(Debug, Clone)]
pub struct Parameter<T: ParamValue> {
    key: ParameterKey,
    description: String,
    required: bool,
    default: Option<T>,
    current: Option<T>,
    delimiter: String,
    constraints: Vec<Constraint<T>>,
}

pub type StringParameter = Parameter<String>;
pub type StringListParameter = Parameter<Vec<String>>;
pub type IntParameter = Parameter<i32>;
pub type LongParameter = Parameter<i64>;
pub type ShortParameter = Parameter<i16>;
pub type FloatParameter = Parameter<f32>;
pub type DoubleParameter = Parameter<f64>;
pub type BoolParameter = Parameter<bool>;

impl<T: ParamValue> Parameter<T> {
    pub fn builder(key: impl Into<String>) -> ParameterBuilder<T> {
        ParameterBuilder::new(key)
    }

    /// Plain construction without constraints
    pub fn declare(
        key: impl Into<String>,
        required: bool,
        default: Option<T>,
        description: impl Into<String>,
    ) -> Result<Self, ParameterError> {
        let mut builder = Self::builder(key).description(description);
        builder.required = required;
        builder.default = default;
        builder.build()
    }

    /// Attach another constraint. The default, if any, must satisfy it.
    pub fn add_constraint(mut self, constraint: Constraint<T>) -> Result<Self, ParameterError> {
        if let Some(default) = &self.default {
            if !constraint.check(default) {
                return Err(ParameterError::InvalidDefault {
                    key: self.key.to_string(),
                    constraint: constraint.description().to_string(),
                    actual: default.render(&self.delimiter),
                });
            }
        }
        self.constraints.push(constraint);
        Ok(self)
    }

    /// Accept `candidate` as the current value.
    ///
    /// `None` leaves the parameter as it is. Constraints are checked in
    /// declaration order and the first failure is returned without touching
    /// the current value.
    pub fn resolve(&mut self, candidate: Option<T>) -> Result<(), ParameterError> {
        let Some(candidate) = candidate else {
            return Ok(());
        };
        if let Some(violated) = self.first_violation(&candidate) {
            return Err(ParameterError::ConstraintViolation {
                key: self.key.to_string(),
                constraint: violated.description().to_string(),
                actual: candidate.render(&self.delimiter),
            });
        }
        self.current = Some(candidate);
        Ok(())
    }

    pub fn set(&mut self, value: T) -> Result<(), ParameterError> {
        self.resolve(Some(value))
    }

    /// Current value, or the default when nothing was resolved
    pub fn value(&self) -> Option<&T> {
        self.current.as_ref().or(self.default.as_ref())
    }

    pub fn require(&self) -> Result<&T, ParameterError> {
        self.value().ok_or_else(|| ParameterError::Unset {
            key: self.key.to_string(),
        })
    }

    pub fn is_unset(&self) -> bool {
        self.value().is_none()
    }

    /// Whether a value was resolved or set, ignoring the default
    pub fn has_current(&self) -> bool {
        self.current.is_some()
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn key(&self) -> &ParameterKey {
        &self.key
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default_value(&self) -> Option<&T> {
        self.default.as_ref()
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn type_tag(&self) -> TypeTag {
        T::type_tag()
    }

    pub fn constraints(&self) -> &[Constraint<T>] {
        &self.constraints
    }

    pub fn render(&self) -> Option<String> {
        self.value().map(|v| v.render(&self.delimiter))
    }

    fn first_violation(&self, candidate: &T) -> Option<&Constraint<T>> {
        self.constraints.iter().find(|c| !c.check(candidate))
    }
}

/// Fluent builder for [`Parameter`]
#[derive(Debug, Clone)]
pub struct ParameterBuilder<T: ParamValue> {
    key: String,
    description: String,
    required: bool,
    default: Option<T>,
    delimiter: String,
    constraints: Vec<Constraint<T>>,
}

impl<T: ParamValue> ParameterBuilder<T> {
    fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: String::new(),
            required: false,
            default: None,
            delimiter: DEFAULT_DELIMITER.to_string(),
            constraints: Vec::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, default: T) -> Self {
        self.default = Some(default);
        self
    }

    pub fn constraint(
        self,
        description: impl Into<String>,
        predicate: impl Fn(&T) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.with_constraint(Constraint::new(description, predicate))
    }

    pub fn with_constraint(mut self, constraint: Constraint<T>) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Delimiter used to split and join list values
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub fn build(self) -> Result<Parameter<T>, ParameterError> {
        let key = ParameterKey::new(self.key)?;

        if let Some(default) = &self.default {
            if let Some(violated) = self.constraints.iter().find(|c| !c.check(default)) {
                return Err(ParameterError::InvalidDefault {
                    key: key.to_string(),
                    constraint: violated.description().to_string(),
                    actual: default.render(&self.delimiter),
                });
            }
        }

        Ok(Parameter {
            key,
            description: self.description,
            required: self.required,
            default: self.default,
            current: None,
            delimiter: self.delimiter,
            constraints: self.constraints,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn k_parameter() -> IntParameter {
        IntParameter::builder("k")
            .default_value(5)
            .description("a small number")
            .constraint("v > 1", |v| *v > 1)
            .constraint("v <= 10", |v| *v <= 10)
            .build()
            .unwrap()
    }

    #[test]
    fn test_default_then_rejected_then_accepted() {
        let mut k = k_parameter();
        assert_eq!(k.value(), Some(&5));

        let err = k.resolve(Some(20)).unwrap_err();
        assert_eq!(
            err,
            ParameterError::ConstraintViolation {
                key: "k".to_string(),
                constraint: "v <= 10".to_string(),
                actual: "20".to_string(),
            }
        );
        assert_eq!(k.value(), Some(&5));
        assert!(!k.has_current());

        k.resolve(Some(7)).unwrap();
        assert_eq!(k.value(), Some(&7));
    }

    #[test]
    fn test_range_bounds() {
        let mut k = k_parameter();
        k.resolve(Some(10)).unwrap();
        assert_eq!(k.value(), Some(&10));

        for rejected in [11, 1] {
            let err = k.resolve(Some(rejected)).unwrap_err();
            assert!(matches!(err, ParameterError::ConstraintViolation { .. }));
            assert_eq!(k.value(), Some(&10));
        }
    }

    #[test]
    fn test_first_failing_constraint_is_reported() {
        let mut k = k_parameter();
        let err = k.set(0).unwrap_err();
        assert!(err.to_string().contains("'v > 1'"));
    }

    #[test]
    fn test_absent_candidate_is_idempotent() {
        let mut k = k_parameter();
        k.resolve(None).unwrap();
        k.resolve(None).unwrap();
        assert_eq!(k.value(), Some(&5));
        assert!(!k.has_current());
    }

    #[test]
    fn test_invalid_default_rejected_at_build() {
        let err = IntParameter::builder("k")
            .default_value(0)
            .with_constraint(Constraint::positive())
            .build()
            .unwrap_err();
        assert!(matches!(err, ParameterError::InvalidDefault { .. }));
    }

    #[test]
    fn test_add_constraint_rechecks_default() {
        let p = IntParameter::declare("lw.workers", false, Some(0), "workers").unwrap();
        assert!(p.add_constraint(Constraint::positive()).is_err());
    }

    #[test]
    fn test_malformed_key_rejected_at_build() {
        let err = StringParameter::builder("bad key").build().unwrap_err();
        assert!(matches!(err, ParameterError::MalformedKey { .. }));
    }

    #[test]
    fn test_required_without_value_is_unset() {
        let p = StringParameter::builder("lts.lines").required().build().unwrap();
        assert!(p.is_required());
        assert!(p.is_unset());
        assert_eq!(
            p.require().unwrap_err(),
            ParameterError::Unset {
                key: "lts.lines".to_string()
            }
        );
    }

    #[test]
    fn test_list_render_uses_declared_delimiter() {
        let mut names = StringListParameter::builder("rf.old_names")
            .delimiter(";")
            .build()
            .unwrap();
        names
            .set(vec!["a".to_string(), "b".to_string()])
            .unwrap();
        assert_eq!(names.render().as_deref(), Some("a;b"));
        assert_eq!(names.type_tag(), TypeTag::StringList);
    }

    #[test]
    fn test_string_default() {
        let p = StringParameter::builder("lts.decorator")
            .default_value("'".to_string())
            .build()
            .unwrap();
        assert_eq!(p.value().map(String::as_str), Some("'"));
    }
}
