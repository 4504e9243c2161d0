//! Project configuration file
//!
//! A narrow schema over `aspect.config.json`: only the network endpoint, the
//! signing accounts, the Aspect system addresses and the compiler toolchain
//! are read.

use crate::compiler::Toolchain;
use crate::core::ASPECT_SYSTEM_ADDRESS;
use crate::rpc::ReceiptPolling;
use alloy_primitives::Address;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration file looked up in the project directory
pub const CONFIG_FILE_NAME: &str = "aspect.config.json";

/// Network used when none is selected
pub const DEFAULT_NETWORK: &str = "artela";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{} does not exist. Please create it.", .0.display())]
    MissingFile(PathBuf),
    #[error("Node URL for network '{network}' is not configured in {}. Please set it.", .path.display())]
    MissingUrl { network: String, path: PathBuf },
    #[error("Accounts for network '{network}' are not configured in {}. Please set them.", .path.display())]
    MissingAccounts { network: String, path: PathBuf },
    #[error("Invalid address for {field}: {value}")]
    InvalidAddress { field: &'static str, value: String },
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse {}: {source}", .path.display())]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl ConfigError {
    /// Whether this is a "not configured yet" condition rather than a broken file
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            ConfigError::MissingFile(_)
                | ConfigError::MissingUrl { .. }
                | ConfigError::MissingAccounts { .. }
        )
    }
}

/// Raw project file
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub networks: HashMap<String, NetworkConfig>,
    #[serde(default)]
    pub compiler: Toolchain,
}

/// One entry under `networks`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkConfig {
    pub url: Option<String>,
    pub accounts: Option<Vec<String>>,
    pub aspect_registry: Option<String>,
    pub aspect_core: Option<String>,
    pub receipt_poll_interval_ms: Option<u64>,
    pub receipt_timeout_secs: Option<u64>,
}

/// Resolved settings for chain commands
#[derive(Clone)]
pub struct Configuration {
    pub node_url: String,
    pub private_key: String,
    /// Target of deploy and bind transactions
    pub aspect_registry: Address,
    /// Target of unbind transactions
    pub aspect_core: Address,
    pub receipt: ReceiptPolling,
}

impl Configuration {
    /// Configuration with default system addresses and polling
    pub fn new(node_url: &str, private_key: &str) -> Self {
        Self {
            node_url: node_url.to_string(),
            private_key: private_key.trim().to_string(),
            aspect_registry: ASPECT_SYSTEM_ADDRESS,
            aspect_core: ASPECT_SYSTEM_ADDRESS,
            receipt: ReceiptPolling::default(),
        }
    }
}

impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("node_url", &self.node_url)
            .field("private_key", &"<redacted>")
            .field("aspect_registry", &self.aspect_registry)
            .field("aspect_core", &self.aspect_core)
            .field("receipt", &self.receipt)
            .finish()
    }
}

/// Locates the project file and extracts the selected network
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    path: PathBuf,
    network: String,
}

impl ConfigResolver {
    /// Resolver for `aspect.config.json` in `base_dir`
    pub fn new(base_dir: &Path) -> Self {
        Self::from_path(base_dir.join(CONFIG_FILE_NAME))
    }

    /// Resolver for the current working directory
    pub fn from_current_dir() -> Result<Self, ConfigError> {
        Ok(Self::new(&std::env::current_dir()?))
    }

    /// Resolver for an explicit file
    pub fn from_path(path: PathBuf) -> Self {
        Self {
            path,
            network: DEFAULT_NETWORK.to_string(),
        }
    }

    /// Select a network other than the default
    pub fn with_network(mut self, network: &str) -> Self {
        self.network = network.to_string();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    /// Read and parse the project file
    pub fn load_project(&self) -> Result<ProjectConfig, ConfigError> {
        if !self.path.exists() {
            return Err(ConfigError::MissingFile(self.path.clone()));
        }

        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|source| ConfigError::ParseError {
            path: self.path.clone(),
            source,
        })
    }

    /// Project file, or defaults when it does not exist
    pub fn load_project_or_default(&self) -> Result<ProjectConfig, ConfigError> {
        match self.load_project() {
            Err(ConfigError::MissingFile(path)) => {
                log::debug!("{} not found, using defaults", path.display());
                Ok(ProjectConfig::default())
            }
            other => other,
        }
    }

    /// Resolve node URL, signing key and system addresses
    pub fn resolve(&self) -> Result<Configuration, ConfigError> {
        let project = self.load_project()?;
        let network = project
            .networks
            .get(&self.network)
            .ok_or_else(|| self.missing_url())?;

        let node_url = network
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| self.missing_url())?;

        let private_key = network
            .accounts
            .as_ref()
            .and_then(|accounts| accounts.first())
            .ok_or_else(|| ConfigError::MissingAccounts {
                network: self.network.clone(),
                path: self.path.clone(),
            })?;

        let mut config = Configuration::new(node_url, private_key);
        if let Some(registry) = &network.aspect_registry {
            config.aspect_registry = parse_address("aspectRegistry", registry)?;
        }
        if let Some(core) = &network.aspect_core {
            config.aspect_core = parse_address("aspectCore", core)?;
        }
        if let Some(ms) = network.receipt_poll_interval_ms {
            config.receipt.interval = Duration::from_millis(ms);
        }
        if let Some(secs) = network.receipt_timeout_secs {
            config.receipt.timeout = Duration::from_secs(secs);
        }

        log::debug!("Resolved configuration: {:?}", config);
        Ok(config)
    }

    fn missing_url(&self) -> ConfigError {
        ConfigError::MissingUrl {
            network: self.network.clone(),
            path: self.path.clone(),
        }
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidAddress {
            field,
            value: value.to_string(),
        })
}
