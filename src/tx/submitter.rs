//! Transaction submitter: read-only gate, payload normalization, wallet
//! submission and confirmation with user notifications

use crate::chain::ConfirmationWaiter;
use crate::config::SubmitterConfig;
use crate::error::WalletError;
use crate::metrics;
use crate::notify::Notifier;
use crate::payload::{normalize_payload, SubmissionOptions, TransactionPayload};
use crate::wallet::WalletSigner;

use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

pub const ACCOUNT_NOT_FOUND_MESSAGE: &str = "You need APT balance!";
pub const CONFIRMED_MESSAGE: &str = "Transaction confirmed";
pub const FAILED_MESSAGE: &str = "Transaction failed";
pub const NOT_SUBMITTED_MESSAGE: &str = "Transaction was not submitted";

/// Why a submission ended before confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    ReadOnly,
    SubmissionFailed(WalletError),
}

impl SkipReason {
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::ReadOnly => "read_only",
            SkipReason::SubmissionFailed(_) => "submission_failed",
        }
    }
}

/// Result of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Confirmed,
    Failed,
    Skipped(SkipReason),
}

impl SubmissionOutcome {
    /// `Some(true)` if confirmed, `Some(false)` if failed, `None` if skipped
    pub fn as_confirmed(&self) -> Option<bool> {
        match self {
            SubmissionOutcome::Confirmed => Some(true),
            SubmissionOutcome::Failed => Some(false),
            SubmissionOutcome::Skipped(_) => None,
        }
    }
}

/// Submits transactions through a wallet and reports the outcome to the user
pub struct TransactionSubmitter {
    wallet: Arc<dyn WalletSigner>,
    waiter: Arc<dyn ConfirmationWaiter>,
    notifier: Arc<dyn Notifier>,
    config: SubmitterConfig,
}

impl TransactionSubmitter {
    pub fn new(
        wallet: Arc<dyn WalletSigner>,
        waiter: Arc<dyn ConfirmationWaiter>,
        notifier: Arc<dyn Notifier>,
        config: SubmitterConfig,
    ) -> Self {
        if config.read_only {
            info!("Transaction submitter running in read-only mode");
        }

        Self {
            wallet,
            waiter,
            notifier,
            config,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.config.read_only
    }

    /// Sign, submit and wait for a transaction
    ///
    /// Emits at most one notification. Never returns an error; every
    /// failure is turned into a [`SubmissionOutcome`].
    pub async fn sign_and_submit_transaction(
        &self,
        payload: TransactionPayload,
        options: Option<SubmissionOptions>,
    ) -> SubmissionOutcome {
        if self.config.read_only {
            debug!("Rejecting {} in read-only mode", payload.kind());
            self.notifier.error(&self.config.read_only_message);
            metrics::record_tx_skipped(SkipReason::ReadOnly.label());
            return SubmissionOutcome::Skipped(SkipReason::ReadOnly);
        }

        let payload = normalize_payload(payload);
        let payload_type = payload.kind();
        let function = payload.function().unwrap_or(payload_type).to_string();

        let pending = match self.wallet.sign_and_submit(payload, options).await {
            Ok(pending) => pending,
            Err(e) => return self.handle_submission_error(&function, e),
        };

        let hash = pending.hash.unwrap_or_default();
        metrics::record_tx_submitted(payload_type);
        info!("Submitted {} as {}", function, hash);

        let started = Instant::now();
        match self.waiter.wait_for_transaction(&hash).await {
            Ok(()) => {
                metrics::record_tx_confirmed(payload_type, started.elapsed().as_secs_f64());
                self.notifier.success(CONFIRMED_MESSAGE);
                SubmissionOutcome::Confirmed
            }
            Err(e) => {
                metrics::record_tx_failed(payload_type, started.elapsed().as_secs_f64());
                self.notifier.error(FAILED_MESSAGE);
                error!("Transaction {} ({}) failed: {}", hash, function, e);
                SubmissionOutcome::Failed
            }
        }
    }

    fn handle_submission_error(&self, function: &str, e: WalletError) -> SubmissionOutcome {
        warn!("Wallet did not submit {}: {}", function, e);

        if e.is_account_not_found() {
            self.notifier.error(ACCOUNT_NOT_FOUND_MESSAGE);
        } else if self.config.notify_submission_errors {
            self.notifier.error(NOT_SUBMITTED_MESSAGE);
        }

        let reason = SkipReason::SubmissionFailed(e);
        metrics::record_tx_skipped(reason.label());
        SubmissionOutcome::Skipped(reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockConfirmationWaiter;
    use crate::error::ConfirmationError;
    use crate::notify::{Notification, NotificationLevel};
    use crate::payload::{EntryArgument, ScriptBytecode, ScriptPayload};
    use crate::wallet::{MockWalletSigner, PendingTransaction};
    use mockall::predicate::eq;
    use std::io;
    use std::sync::Mutex;

    const RECIPIENT: &str = "0x9f0d5c3a4a7b11e1b7c0f2fbd6f1f57e8cdbde1a2e1f0c3b5e8d7a6c4b3a2910";

    /// Notifier that keeps everything it was asked to show
    #[derive(Default)]
    struct RecordingNotifier {
        seen: Mutex<Vec<Notification>>,
    }

    impl RecordingNotifier {
        fn seen(&self) -> Vec<Notification> {
            self.seen.lock().unwrap().clone()
        }

        fn push(&self, level: NotificationLevel, message: &str) {
            self.seen.lock().unwrap().push(Notification {
                level,
                message: message.to_string(),
            });
        }
    }

    impl Notifier for RecordingNotifier {
        fn success(&self, message: &str) {
            self.push(NotificationLevel::Success, message);
        }

        fn error(&self, message: &str) {
            self.push(NotificationLevel::Error, message);
        }
    }

    /// Log sink shared between a test and its scoped subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn error_note(message: &str) -> Notification {
        Notification {
            level: NotificationLevel::Error,
            message: message.to_string(),
        }
    }

    fn transfer_payload() -> TransactionPayload {
        TransactionPayload::entry_function(
            "0x1::coin::transfer",
            vec!["0x1::aptos_coin::AptosCoin".to_string()],
            vec![RECIPIENT.into(), EntryArgument::large(100_000_000)],
        )
    }

    fn submitter(
        wallet: MockWalletSigner,
        waiter: MockConfirmationWaiter,
        config: SubmitterConfig,
    ) -> (TransactionSubmitter, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let submitter =
            TransactionSubmitter::new(Arc::new(wallet), Arc::new(waiter), notifier.clone(), config);
        (submitter, notifier)
    }

    #[tokio::test]
    async fn test_read_only_skips_wallet() {
        let mut wallet = MockWalletSigner::new();
        wallet.expect_sign_and_submit().never();
        let mut waiter = MockConfirmationWaiter::new();
        waiter.expect_wait_for_transaction().never();

        let config = SubmitterConfig {
            read_only: true,
            read_only_message: "Read-only until the migration finishes".to_string(),
            ..Default::default()
        };
        let (submitter, notifier) = submitter(wallet, waiter, config);

        let outcome = submitter
            .sign_and_submit_transaction(transfer_payload(), None)
            .await;

        assert!(submitter.is_read_only());
        assert_eq!(outcome, SubmissionOutcome::Skipped(SkipReason::ReadOnly));
        assert_eq!(outcome.as_confirmed(), None);
        assert_eq!(
            notifier.seen(),
            vec![error_note("Read-only until the migration finishes")]
        );
    }

    #[tokio::test]
    async fn test_wallet_receives_normalized_payload_and_options() {
        let expected = TransactionPayload::entry_function(
            "0x1::coin::transfer",
            vec!["0x1::aptos_coin::AptosCoin".to_string()],
            vec![RECIPIENT.into(), EntryArgument::from("100000000")],
        );
        let options = SubmissionOptions {
            max_gas_amount: Some(5_000),
            gas_unit_price: Some(100),
            expiration_timestamp_secs: None,
        };
        let expected_options = options.clone();

        let mut wallet = MockWalletSigner::new();
        wallet
            .expect_sign_and_submit()
            .withf(move |payload, options| {
                payload == &expected && options.as_ref() == Some(&expected_options)
            })
            .times(1)
            .returning(|_, _| Ok(PendingTransaction::new("0xabc")));
        let mut waiter = MockConfirmationWaiter::new();
        waiter
            .expect_wait_for_transaction()
            .times(1)
            .returning(|_| Ok(()));

        let (submitter, _) = submitter(wallet, waiter, SubmitterConfig::default());

        let outcome = submitter
            .sign_and_submit_transaction(transfer_payload(), Some(options))
            .await;
        assert_eq!(outcome, SubmissionOutcome::Confirmed);
    }

    #[tokio::test]
    async fn test_script_payload_passed_through() {
        let script = TransactionPayload::ScriptPayload(ScriptPayload {
            code: ScriptBytecode {
                bytecode: "0xa11ceb0b0600000006".to_string(),
            },
            type_arguments: vec![],
            arguments: vec![serde_json::json!("18446744073709551615")],
        });
        let expected = script.clone();

        let mut wallet = MockWalletSigner::new();
        wallet
            .expect_sign_and_submit()
            .withf(move |payload, _| payload == &expected)
            .times(1)
            .returning(|_, _| Ok(PendingTransaction::new("0xdef")));
        let mut waiter = MockConfirmationWaiter::new();
        waiter
            .expect_wait_for_transaction()
            .with(eq("0xdef"))
            .times(1)
            .returning(|_| Ok(()));

        let (submitter, _) = submitter(wallet, waiter, SubmitterConfig::default());

        let outcome = submitter.sign_and_submit_transaction(script, None).await;
        assert_eq!(outcome.as_confirmed(), Some(true));
    }

    #[tokio::test]
    async fn test_account_not_found_asks_for_balance() {
        let mut wallet = MockWalletSigner::new();
        wallet.expect_sign_and_submit().times(1).returning(|_, _| {
            Err(WalletError::new(
                "Account not found by Address(0x9f0d) and Ledger version(6170428521)",
            ))
        });
        let mut waiter = MockConfirmationWaiter::new();
        waiter.expect_wait_for_transaction().never();

        let (submitter, notifier) = submitter(wallet, waiter, SubmitterConfig::default());

        let outcome = submitter
            .sign_and_submit_transaction(transfer_payload(), None)
            .await;

        assert!(matches!(
            outcome,
            SubmissionOutcome::Skipped(SkipReason::SubmissionFailed(_))
        ));
        assert_eq!(outcome.as_confirmed(), None);
        assert_eq!(notifier.seen(), vec![error_note(ACCOUNT_NOT_FOUND_MESSAGE)]);
    }

    #[tokio::test]
    async fn test_other_wallet_errors_are_silent_by_default() {
        let mut wallet = MockWalletSigner::new();
        wallet
            .expect_sign_and_submit()
            .times(1)
            .returning(|_, _| Err(WalletError::new("User has rejected the request")));
        let mut waiter = MockConfirmationWaiter::new();
        waiter.expect_wait_for_transaction().never();

        let (submitter, notifier) = submitter(wallet, waiter, SubmitterConfig::default());

        let outcome = submitter
            .sign_and_submit_transaction(transfer_payload(), None)
            .await;

        assert_eq!(
            outcome,
            SubmissionOutcome::Skipped(SkipReason::SubmissionFailed(WalletError::new(
                "User has rejected the request"
            )))
        );
        assert!(notifier.seen().is_empty());
    }

    #[tokio::test]
    async fn test_other_wallet_errors_notified_when_enabled() {
        let mut wallet = MockWalletSigner::new();
        wallet
            .expect_sign_and_submit()
            .times(1)
            .returning(|_, _| Err(WalletError::new("Network error")));
        let mut waiter = MockConfirmationWaiter::new();
        waiter.expect_wait_for_transaction().never();

        let config = SubmitterConfig {
            notify_submission_errors: true,
            ..Default::default()
        };
        let (submitter, notifier) = submitter(wallet, waiter, config);

        let outcome = submitter
            .sign_and_submit_transaction(transfer_payload(), None)
            .await;

        assert_eq!(outcome.as_confirmed(), None);
        assert_eq!(notifier.seen(), vec![error_note(NOT_SUBMITTED_MESSAGE)]);
    }

    #[tokio::test]
    async fn test_confirmed_transaction_notifies_success() {
        let mut wallet = MockWalletSigner::new();
        wallet
            .expect_sign_and_submit()
            .times(1)
            .returning(|_, _| Ok(PendingTransaction::new("0xabc")));
        let mut waiter = MockConfirmationWaiter::new();
        waiter
            .expect_wait_for_transaction()
            .with(eq("0xabc"))
            .times(1)
            .returning(|_| Ok(()));

        let (submitter, notifier) = submitter(wallet, waiter, SubmitterConfig::default());

        let outcome = submitter
            .sign_and_submit_transaction(transfer_payload(), None)
            .await;

        assert_eq!(outcome.as_confirmed(), Some(true));
        assert_eq!(
            notifier.seen(),
            vec![Notification {
                level: NotificationLevel::Success,
                message: CONFIRMED_MESSAGE.to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_confirmation_timeout_reports_failure() {
        let mut wallet = MockWalletSigner::new();
        wallet
            .expect_sign_and_submit()
            .times(1)
            .returning(|_, _| Ok(PendingTransaction::new("0xabc")));
        let mut waiter = MockConfirmationWaiter::new();
        waiter
            .expect_wait_for_transaction()
            .with(eq("0xabc"))
            .times(1)
            .returning(|hash| {
                Err(ConfirmationError::Timeout {
                    hash: hash.to_string(),
                    waited_secs: 20,
                })
            });

        let (submitter, notifier) = submitter(wallet, waiter, SubmitterConfig::default());

        let outcome = submitter
            .sign_and_submit_transaction(transfer_payload(), None)
            .await;

        assert_eq!(outcome, SubmissionOutcome::Failed);
        assert_eq!(outcome.as_confirmed(), Some(false));
        assert_eq!(notifier.seen(), vec![error_note(FAILED_MESSAGE)]);
    }

    #[tokio::test]
    async fn test_missing_hash_falls_back_to_empty() {
        let mut wallet = MockWalletSigner::new();
        wallet
            .expect_sign_and_submit()
            .times(1)
            .returning(|_, _| Ok(PendingTransaction::default()));
        let mut waiter = MockConfirmationWaiter::new();
        waiter
            .expect_wait_for_transaction()
            .with(eq(""))
            .times(1)
            .returning(|hash| {
                Err(ConfirmationError::InvalidHash {
                    hash: hash.to_string(),
                })
            });

        let (submitter, notifier) = submitter(wallet, waiter, SubmitterConfig::default());

        let outcome = submitter
            .sign_and_submit_transaction(transfer_payload(), None)
            .await;

        assert_eq!(outcome, SubmissionOutcome::Failed);
        assert_eq!(notifier.seen(), vec![error_note(FAILED_MESSAGE)]);
    }

    #[tokio::test]
    async fn test_confirmation_failure_is_logged() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut wallet = MockWalletSigner::new();
        wallet
            .expect_sign_and_submit()
            .times(1)
            .returning(|_, _| Ok(PendingTransaction::new("0xabc")));
        let mut waiter = MockConfirmationWaiter::new();
        waiter
            .expect_wait_for_transaction()
            .times(1)
            .returning(|hash| {
                Err(ConfirmationError::Timeout {
                    hash: hash.to_string(),
                    waited_secs: 20,
                })
            });

        let (submitter, _) = submitter(wallet, waiter, SubmitterConfig::default());

        let outcome = submitter
            .sign_and_submit_transaction(transfer_payload(), None)
            .await;
        assert_eq!(outcome, SubmissionOutcome::Failed);

        let output = logs.contents();
        let failure_line = output
            .lines()
            .find(|line| line.contains("ERROR"))
            .expect("confirmation failure should be logged at error level");
        assert!(failure_line.contains("0xabc"));
        assert!(failure_line.contains("0x1::coin::transfer"));
        assert!(failure_line.contains("Timeout waiting for transaction 0xabc after 20s"));
    }
}
