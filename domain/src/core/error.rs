//! Domain error types

use crate::lifecycle::LifecycleState;
use thiserror::Error;

/// Errors raised while declaring, resolving or reading a parameter
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Malformed parameter key '{key}': {reason}")]
    MalformedKey { key: String, reason: &'static str },

    #[error("Parameter '{key}' is declared more than once")]
    DuplicateKey { key: String },

    #[error("{key}'s value {actual} doesn't satisfy constraint '{constraint}'")]
    ConstraintViolation {
        key: String,
        constraint: String,
        actual: String,
    },

    #[error("Default value {actual} of '{key}' doesn't satisfy constraint '{constraint}'")]
    InvalidDefault {
        key: String,
        constraint: String,
        actual: String,
    },

    #[error("Parameter '{key}' expects {expected}, got {found}")]
    TypeMismatch {
        key: String,
        expected: String,
        found: String,
    },

    #[error("Parameter '{key}' has no value")]
    Unset { key: String },
}

impl ParameterError {
    /// Key of the parameter this error is about
    pub fn key(&self) -> &str {
        match self {
            ParameterError::MalformedKey { key, .. }
            | ParameterError::DuplicateKey { key }
            | ParameterError::ConstraintViolation { key, .. }
            | ParameterError::InvalidDefault { key, .. }
            | ParameterError::TypeMismatch { key, .. }
            | ParameterError::Unset { key } => key,
        }
    }

    /// Check if this error is a constraint violation on a resolved value
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, ParameterError::ConstraintViolation { .. })
    }
}

/// Errors raised by the toy lifecycle state machine
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Illegal lifecycle transition from {from} to {to}")]
    IllegalTransition {
        from: LifecycleState,
        to: LifecycleState,
    },
}
