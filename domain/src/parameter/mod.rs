//! Declarative, typed, constrained parameters.
//!
//! A toy owns its [`Parameter`]s as plain fields and lends them to the
//! orchestrator through [`Requisites`] for resolution.

pub mod constraint;
pub mod key;
#[allow(clippy::module_inception)]
pub mod parameter;
pub mod requisite;
pub mod value;

pub use constraint::{Constraint, Measured};
pub use key::ParameterKey;
pub use parameter::{
    BoolParameter, DoubleParameter, FloatParameter, IntParameter, LongParameter, Parameter,
    ParameterBuilder, ShortParameter, StringListParameter, StringParameter,
};
pub use requisite::{Requisite, Requisites};
pub use value::{ParamValue, RawValue, ToyEnum, TypeTag};
