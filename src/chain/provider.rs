//! REST client for an Aptos full node

use super::{confirmation, ConfirmationWaiter, TransactionLookup};
use crate::config::ConfirmationConfig;
use crate::error::{ConfirmationError, SubmitterError, SubmitterResult};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Per-request timeout; the confirmation deadline is enforced separately
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Ledger summary returned by the node index endpoint
///
/// Aptos encodes u64 values as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerInfo {
    pub chain_id: u8,
    pub epoch: String,
    pub ledger_version: String,
    pub block_height: String,
    pub ledger_timestamp: String,
    #[serde(default)]
    pub node_role: Option<String>,
}

impl LedgerInfo {
    pub fn ledger_version(&self) -> Option<u64> {
        self.ledger_version.parse().ok()
    }

    pub fn block_height(&self) -> Option<u64> {
        self.block_height.parse().ok()
    }
}

/// Thin client over the node REST API
pub struct AptosRestClient {
    /// Base URL including the API version, without trailing slash
    node_url: String,
    http: reqwest::Client,
    confirmation: ConfirmationConfig,
}

impl AptosRestClient {
    /// Create a client for `node_url` (e.g. `https://fullnode.mainnet.aptoslabs.com/v1`)
    pub fn new(node_url: &str, confirmation: ConfirmationConfig) -> SubmitterResult<Self> {
        let parsed = Url::parse(node_url)
            .map_err(|e| SubmitterError::Config(format!("Invalid node URL {}: {}", node_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") || !parsed.has_host() {
            return Err(SubmitterError::Config(format!(
                "Node URL must be an http(s) URL with a host: {}",
                node_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            node_url: node_url.trim_end_matches('/').to_string(),
            http,
            confirmation,
        })
    }

    pub fn node_url(&self) -> &str {
        &self.node_url
    }

    pub fn confirmation_config(&self) -> &ConfirmationConfig {
        &self.confirmation
    }

    /// Fetch the current ledger info (doubles as a health check)
    pub async fn ledger_info(&self) -> SubmitterResult<LedgerInfo> {
        let info = self
            .http
            .get(format!("{}/", self.node_url))
            .send()
            .await?
            .error_for_status()?
            .json::<LedgerInfo>()
            .await?;
        debug!(
            "Node {} at ledger version {}",
            self.node_url, info.ledger_version
        );
        Ok(info)
    }
}

#[async_trait]
impl TransactionLookup for AptosRestClient {
    async fn transaction_by_hash(&self, hash: &str) -> Result<Option<Value>, ConfirmationError> {
        let url = format!("{}/transactions/by_hash/{}", self.node_url, hash);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ConfirmationError::Rpc(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<Value>()
                .await
                .map(Some)
                .map_err(|e| ConfirmationError::Rpc(e.to_string())),
            status if status.is_client_error() => Err(ConfirmationError::Rejected(format!(
                "GET {} returned {}",
                url, status
            ))),
            status => Err(ConfirmationError::Rpc(format!(
                "GET {} returned {}",
                url, status
            ))),
        }
    }
}

#[async_trait]
impl ConfirmationWaiter for AptosRestClient {
    async fn wait_for_transaction(&self, hash: &str) -> Result<(), ConfirmationError> {
        confirmation::wait_until_committed(self, hash, &self.confirmation).await
    }
}
