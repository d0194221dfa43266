//! Transaction confirmation polling
//!
//! Aptos reaches finality when a transaction is committed, so there is no
//! block-depth counting. A hash is polled until the node returns something
//! other than `pending_transaction`:
//! - 404 / unknown: not propagated yet, keep polling
//! - `pending_transaction`: in mempool, keep polling
//! - any committed type: done, optionally checking the `success` flag
//!
//! Transient node errors (5xx, connection failures) are retried until the
//! deadline; client errors end the wait immediately.

use super::TransactionLookup;
use crate::config::ConfirmationConfig;
use crate::error::ConfirmationError;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Length of an Aptos transaction hash in bytes
const HASH_LEN: usize = 32;

/// Where a transaction is in its lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionStatus {
    Pending,
    Committed { success: bool, vm_status: String },
}

/// Check that a hash is `0x`-prefixed hex of the right length
pub fn validate_hash(hash: &str) -> Result<(), ConfirmationError> {
    let invalid = || ConfirmationError::InvalidHash {
        hash: hash.to_string(),
    };

    let digits = hash.strip_prefix("0x").ok_or_else(invalid)?;
    let bytes = hex::decode(digits).map_err(|_| invalid())?;
    if bytes.len() != HASH_LEN {
        return Err(invalid());
    }
    Ok(())
}

/// Classify a transaction returned by `/transactions/by_hash`
pub fn classify_transaction(tx: &Value) -> Result<TransactionStatus, ConfirmationError> {
    let kind = tx
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| ConfirmationError::Rpc("transaction response has no type".to_string()))?;

    if kind == "pending_transaction" {
        return Ok(TransactionStatus::Pending);
    }

    // Genesis and checkpoint transactions carry no success flag
    let success = tx.get("success").and_then(Value::as_bool).unwrap_or(true);
    let vm_status = tx
        .get("vm_status")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(TransactionStatus::Committed { success, vm_status })
}

/// Poll `lookup` until the transaction is committed or the timeout passes
pub async fn wait_until_committed<L>(
    lookup: &L,
    hash: &str,
    config: &ConfirmationConfig,
) -> Result<(), ConfirmationError>
where
    L: TransactionLookup + ?Sized,
{
    validate_hash(hash)?;

    let timeout = config.timeout();
    let started = Instant::now();

    loop {
        match lookup.transaction_by_hash(hash).await {
            Ok(Some(tx)) => match classify_transaction(&tx)? {
                TransactionStatus::Pending => {
                    debug!("Transaction {} still pending", hash);
                }
                TransactionStatus::Committed { success, vm_status } => {
                    if config.check_success && !success {
                        warn!("Transaction {} committed with failure: {}", hash, vm_status);
                        return Err(ConfirmationError::Reverted {
                            hash: hash.to_string(),
                            vm_status,
                        });
                    }
                    info!(
                        "Transaction {} committed after {:?}",
                        hash,
                        started.elapsed()
                    );
                    return Ok(());
                }
            },
            Ok(None) => {
                debug!("Transaction {} not yet visible to node", hash);
            }
            Err(e) if e.is_retryable() => {
                warn!("Lookup of transaction {} failed, retrying: {}", hash, e);
            }
            Err(e) => return Err(e),
        }

        if started.elapsed() >= timeout {
            return Err(ConfirmationError::Timeout {
                hash: hash.to_string(),
                waited_secs: timeout.as_secs(),
            });
        }

        tokio::time::sleep(config.poll_interval()).await;
    }
}
