//! Toy lifecycle state machine.
//!
//! Every run walks the same stages regardless of the toy's domain logic:
//! declare parameters, resolve them against a configuration source,
//! cross-validate, acquire resources, run, and release. The state machine
//! only records and polices the walk; the application layer drives it.

pub mod state;

pub use state::{Lifecycle, LifecycleState};
