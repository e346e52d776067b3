pub mod console;
pub mod usage;
