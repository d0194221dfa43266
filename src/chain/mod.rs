//! Chain module - node access and transaction confirmation
//!
//! This module provides:
//! - A REST client for an Aptos full node
//! - Polling until a submitted transaction is committed
//! - The confirmation capability consumed by the submitter

pub mod confirmation;
pub mod provider;

pub use confirmation::{classify_transaction, validate_hash, wait_until_committed, TransactionStatus};
pub use provider::{AptosRestClient, LedgerInfo};

use crate::error::ConfirmationError;

use async_trait::async_trait;
use serde_json::Value;

/// Waits until a submitted transaction reaches a terminal state on chain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfirmationWaiter: Send + Sync {
    async fn wait_for_transaction(&self, hash: &str) -> Result<(), ConfirmationError>;
}

/// Looks up a transaction by hash; `None` while the node has not seen it
#[async_trait]
pub trait TransactionLookup: Send + Sync {
    async fn transaction_by_hash(&self, hash: &str) -> Result<Option<Value>, ConfirmationError>;
}
