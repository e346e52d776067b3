//! Built-in toys that run without a cluster, and the registry naming them

pub mod lines_to_string;
pub mod load_writer;
pub mod mars_rover;
pub mod registry;
pub mod rename_files;

pub use lines_to_string::LinesToString;
pub use load_writer::{LoadStats, LoadWriter, ValueKind};
pub use mars_rover::{Direction, MarsRover, Plateau, Position};
pub use registry::{RegistryError, ToyFactory, ToyRegistry};
pub use rename_files::RenameFiles;
