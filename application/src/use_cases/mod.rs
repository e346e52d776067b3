//! Application use cases

pub mod play_toy;
pub mod resolve_parameters;
