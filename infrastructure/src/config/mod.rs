//! Configuration loading.
//!
//! TOML files merged over built-in defaults, highest priority last:
//! defaults, XDG global config, project `crewcall.toml`, explicit path.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileDataConfig, FileDispatchConfig, FileStoreConfig,
};
pub use loader::ConfigLoader;
