//! Project configuration
//!
//! Resolves the node endpoint and signing account from `aspect.config.json`.

pub mod project;

pub use project::{
    ConfigError, ConfigResolver, Configuration, NetworkConfig, ProjectConfig, CONFIG_FILE_NAME,
    DEFAULT_NETWORK,
};
