//! Configuration module

mod settings;

pub use settings::Config;
pub use settings::Environment;
pub use settings::DEFAULT_CONFIG_FILE;
