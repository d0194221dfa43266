//! Error types for the Aptos transaction submitter

use thiserror::Error;

/// Marker the wallet/node reports when the sender has never been funded
const ACCOUNT_NOT_FOUND: &str = "Account not found";

/// Main error type for the submitter
#[derive(Error, Debug)]
pub enum SubmitterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Metrics error: {0}")]
    Metrics(String),
}

/// Result type for submitter operations
pub type SubmitterResult<T> = Result<T, SubmitterError>;

/// Failure reported by the wallet while signing or submitting
///
/// Wallets surface rejections as free-form text, so the message is the
/// only thing we can inspect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct WalletError {
    pub message: String,
}

impl WalletError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Sender account does not exist on chain yet (never received APT)
    pub fn is_account_not_found(&self) -> bool {
        self.message.contains(ACCOUNT_NOT_FOUND)
    }
}

/// Failure while waiting for a submitted transaction to be committed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    #[error("Invalid transaction hash: {hash:?}")]
    InvalidHash { hash: String },

    #[error("Timeout waiting for transaction {hash} after {waited_secs}s")]
    Timeout { hash: String, waited_secs: u64 },

    #[error("Transaction {hash} failed on chain: {vm_status}")]
    Reverted { hash: String, vm_status: String },

    #[error("Node request failed: {0}")]
    Rpc(String),

    #[error("Node rejected request: {0}")]
    Rejected(String),
}

impl ConfirmationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ConfirmationError::Timeout { .. })
    }

    /// Check if waiting again could still succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ConfirmationError::Timeout { .. } | ConfirmationError::Rpc(_)
        )
    }
}
