//! Wallet signing capability
//!
//! The wallet owns keys, approval prompts and the actual submission to a
//! node. The submitter only needs the resulting transaction hash.

use crate::error::WalletError;
use crate::payload::{SubmissionOptions, TransactionPayload};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Response of a successful sign-and-submit call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// Hash of the submitted transaction; some wallets omit it
    #[serde(default)]
    pub hash: Option<String>,
}

impl PendingTransaction {
    pub fn new(hash: impl Into<String>) -> Self {
        Self {
            hash: Some(hash.into()),
        }
    }
}

/// Signs a payload and submits it to the network
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletSigner: Send + Sync {
    async fn sign_and_submit(
        &self,
        payload: TransactionPayload,
        options: Option<SubmissionOptions>,
    ) -> Result<PendingTransaction, WalletError>;
}
