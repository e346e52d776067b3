//! Core domain concepts shared across all subdomains.
//!
//! - [`return_code::ReturnCode`] — completion code of a toy run
//! - [`error::ParameterError`] / [`error::LifecycleError`] — domain-level errors

pub mod error;
pub mod return_code;
