//! Configuration management for the transaction submitter
//!
//! Loads configuration from TOML files with environment variable substitution.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable pointing at the configuration file
pub const CONFIG_ENV: &str = "APTOS_SUBMITTER_CONFIG";

/// Advisory shown when writes are disabled and no message is configured
pub const DEFAULT_READ_ONLY_MESSAGE: &str =
    "This app is in read-only mode. Transactions are disabled.";

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub network: NetworkConfig,
    #[serde(default)]
    pub submitter: SubmitterConfig,
    #[serde(default)]
    pub confirmation: ConfirmationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    pub name: NetworkName,
    /// Overrides the public full node for `name`
    #[serde(default)]
    pub node_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NetworkName {
    Mainnet,
    Testnet,
    Devnet,
    Local,
}

impl NetworkName {
    /// Public full node REST endpoint
    pub fn default_node_url(&self) -> &'static str {
        match self {
            NetworkName::Mainnet => "https://fullnode.mainnet.aptoslabs.com/v1",
            NetworkName::Testnet => "https://fullnode.testnet.aptoslabs.com/v1",
            NetworkName::Devnet => "https://fullnode.devnet.aptoslabs.com/v1",
            NetworkName::Local => "http://127.0.0.1:8080/v1",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SubmitterConfig {
    /// Refuse every write and show `read_only_message` instead
    pub read_only: bool,
    pub read_only_message: String,
    /// Also notify the user on wallet rejections other than unfunded accounts
    pub notify_submission_errors: bool,
}

impl Default for SubmitterConfig {
    fn default() -> Self {
        Self {
            read_only: false,
            read_only_message: DEFAULT_READ_ONLY_MESSAGE.to_string(),
            notify_submission_errors: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfirmationConfig {
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
    /// Treat committed-but-aborted transactions as failures
    pub check_success: bool,
}

impl Default for ConfirmationConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            poll_interval_ms: 1_000,
            check_success: true,
        }
    }
}

impl ConfirmationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Settings {
    /// Load settings from the file named by `APTOS_SUBMITTER_CONFIG`
    pub fn load() -> Result<Self> {
        let config_path = env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));

        Self::load_from(&config_path)
    }

    /// Load settings from a specific file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml(&config_str)
    }

    /// Parse settings from TOML text, substituting environment variables
    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config_str = substitute_env_vars(config_str);

        let settings: Settings =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        let node_url = self.node_url();
        let parsed = reqwest::Url::parse(node_url)
            .with_context(|| format!("Invalid node URL: {}", node_url))?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            anyhow::bail!("Node URL must be an http(s) URL with a host: {}", node_url);
        }

        if self.confirmation.timeout_secs == 0 {
            anyhow::bail!("confirmation.timeout_secs must be greater than zero");
        }

        if self.confirmation.poll_interval_ms == 0 {
            anyhow::bail!("confirmation.poll_interval_ms must be greater than zero");
        }

        if self.confirmation.poll_interval() > self.confirmation.timeout() {
            anyhow::bail!("confirmation.poll_interval_ms exceeds confirmation.timeout_secs");
        }

        if self.submitter.read_only && self.submitter.read_only_message.trim().is_empty() {
            tracing::warn!("Read-only mode enabled without a message - users will see an empty notice");
        }

        Ok(())
    }

    /// Effective node REST endpoint
    pub fn node_url(&self) -> &str {
        self.network
            .node_url
            .as_deref()
            .unwrap_or_else(|| self.network.name.default_node_url())
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    lazy_static::lazy_static! {
        static ref ENV_VAR: regex::Regex =
            regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env var pattern");
    }

    let mut result = input.to_string();
    for cap in ENV_VAR.captures_iter(input) {
        let var_name = &cap[1];
        let var_value = env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}
