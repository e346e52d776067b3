//! Resource providers for the built-in toys

pub mod directory;

pub use directory::{DirectoryLease, DirectoryProvider, LOCK_FILE};
