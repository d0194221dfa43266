//! Aptos transaction submitter
//!
//! Wraps wallet submission of Aptos transactions with payload
//! normalization, confirmation tracking and user notifications, and can
//! disable all writes in read-only mode.

pub mod chain;
pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod notify;
pub mod payload;
pub mod tx;
pub mod wallet;

pub use chain::{AptosRestClient, ConfirmationWaiter};
pub use config::Settings;
pub use context::AptosContext;
pub use error::{ConfirmationError, SubmitterError, SubmitterResult, WalletError};
pub use notify::{ChannelNotifier, Notification, NotificationLevel, Notifier, TracingNotifier};
pub use payload::{EntryArgument, SubmissionOptions, TransactionPayload};
pub use tx::{SkipReason, SubmissionOutcome, TransactionSubmitter};
pub use wallet::{PendingTransaction, WalletSigner};

/// Install the global tracing subscriber
///
/// Honors `RUST_LOG`; safe to call more than once.
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,aptos_tx_submitter=debug,reqwest=warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .try_init();
}
