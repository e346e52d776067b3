//! Domain layer for toybox
//!
//! This crate contains the parameter system and the toy lifecycle state
//! machine. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! ## Parameter
//!
//! A toy declares its inputs as typed [`Parameter`]s with a key, an optional
//! default and a list of [`Constraint`]s. Resolution against a
//! configuration source happens in the application layer.
//!
//! ## Lifecycle
//!
//! Every run walks the same [`LifecycleState`]s; [`Lifecycle`] rejects any
//! transition outside the table.

pub mod core;
pub mod lifecycle;
pub mod parameter;

// Re-export commonly used types
pub use crate::core::{
    error::{LifecycleError, ParameterError},
    return_code::ReturnCode,
};
pub use lifecycle::{Lifecycle, LifecycleState};
pub use parameter::{
    BoolParameter, Constraint, DoubleParameter, FloatParameter, IntParameter, LongParameter,
    Measured, ParamValue, Parameter, ParameterBuilder, ParameterKey, RawValue, Requisite,
    Requisites, ShortParameter, StringListParameter, StringParameter, ToyEnum, TypeTag,
};
