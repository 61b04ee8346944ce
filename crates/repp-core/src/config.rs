//! Configuration loading and typed config structures for Repp.
//!
//! The canonical configuration lives in `repp-config.yaml`. This module
//! defines strongly-typed structs mirroring the YAML layout and a loader that
//! reads the file, applies environment overrides, and validates the result.
//! Every section except `contracts` falls back to defaults when absent.

use std::path::Path;

use repp_chain::ChainConfig;
use repp_types::Address;
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but is not usable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ReppConfig {
    /// Network identity and endpoints.
    #[serde(default)]
    pub chain: ChainConfig,

    /// Wallet relay settings.
    #[serde(default)]
    pub wallet: WalletConfig,

    /// Contract addresses.
    #[serde(default)]
    pub contracts: ContractsConfig,

    /// Event catalog settings.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// HTTP API settings.
    #[serde(default)]
    pub server: ApiConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ReppConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `REPP_RPC_URL` overrides `chain.rpc_http`
    /// - `REPP_WALLET_URL` overrides `wallet.relay_url`
    /// - `REPP_REGISTRY_ADDRESS` overrides `contracts.registry`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse_with(yaml, |key| std::env::var(key).ok())
    }

    /// Parse configuration using `lookup` in place of the process environment.
    ///
    /// # Errors
    ///
    /// Same as [`ReppConfig::parse`].
    pub fn parse_with(
        yaml: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(url) = lookup("REPP_RPC_URL") {
            self.chain.rpc_http = url;
        }
        if let Some(url) = lookup("REPP_WALLET_URL") {
            self.wallet.relay_url = url;
        }
        if let Some(addr) = lookup("REPP_REGISTRY_ADDRESS") {
            let parsed = addr.parse().map_err(|e| {
                ConfigError::Invalid(format!("invalid REPP_REGISTRY_ADDRESS: {e}"))
            })?;
            self.contracts.registry = Some(parsed);
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let registry = self.registry_address()?;
        if registry.is_zero() {
            return Err(ConfigError::Invalid(
                "contracts.registry must not be the zero address".to_owned(),
            ));
        }
        if self.catalog.default_stake_points == 0 {
            return Err(ConfigError::Invalid(
                "catalog.default_stake_points must be positive".to_owned(),
            ));
        }
        Ok(())
    }

    /// The event registry contract address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if no registry address is configured.
    pub fn registry_address(&self) -> Result<Address, ConfigError> {
        self.contracts
            .registry
            .ok_or_else(|| ConfigError::Invalid("contracts.registry is required".to_owned()))
    }
}

/// Wallet relay settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WalletConfig {
    /// Application key sent to the wallet relay.
    #[serde(default)]
    pub app_key: Option<String>,

    /// JSON-RPC URL of the wallet relay.
    #[serde(default = "default_relay_url")]
    pub relay_url: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            app_key: None,
            relay_url: default_relay_url(),
        }
    }
}

/// Contract addresses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContractsConfig {
    /// Event registry contract receiving `registerForEvent` calls.
    #[serde(default)]
    pub registry: Option<Address>,
}

/// Event catalog settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// Seed the catalog with demo events at startup.
    #[serde(default = "default_true")]
    pub seed_demo_events: bool,

    /// Number of generated demo events after the workshop event.
    #[serde(default = "default_demo_event_count")]
    pub demo_event_count: usize,

    /// Stake applied to new events that do not specify one.
    #[serde(default = "default_stake_points")]
    pub default_stake_points: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_demo_events: true,
            demo_event_count: default_demo_event_count(),
            default_stake_points: default_stake_points(),
        }
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Bind host.
    #[serde(default = "default_host")]
    pub host: String,

    /// Bind port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit newline-delimited JSON instead of human-readable lines.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_relay_url() -> String {
    String::from("http://127.0.0.1:8545")
}

const fn default_true() -> bool {
    true
}

const fn default_demo_event_count() -> usize {
    8
}

const fn default_stake_points() -> u32 {
    5
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    String::from("info")
}
