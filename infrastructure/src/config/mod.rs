//! Configuration sources and the factory selecting one per directory

pub mod arguments;
pub mod factory;
pub mod layered;
pub mod native;
pub mod properties;

pub use arguments::ArgumentSource;
pub use factory::{ConfigurationFactory, PROPERTIES_FILE, SITE_FILE, SITE_HEADER};
pub use layered::LayeredSource;
pub use native::NativeSource;
pub use properties::PropertiesSource;
