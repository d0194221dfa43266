//! Shared Aptos handles for the rest of the application
//!
//! Bundles the node client and a submitter wired from [`Settings`], so UI
//! code receives one value instead of looking collaborators up itself.

use crate::chain::AptosRestClient;
use crate::config::{NetworkName, Settings};
use crate::error::SubmitterResult;
use crate::notify::Notifier;
use crate::payload::{SubmissionOptions, TransactionPayload};
use crate::tx::{SubmissionOutcome, TransactionSubmitter};
use crate::wallet::WalletSigner;

use std::sync::Arc;
use tracing::info;

pub struct AptosContext {
    network: NetworkName,
    client: Arc<AptosRestClient>,
    submitter: TransactionSubmitter,
}

impl AptosContext {
    /// Connect to the configured node and wire a submitter around `wallet`
    pub fn new(
        settings: &Settings,
        wallet: Arc<dyn WalletSigner>,
        notifier: Arc<dyn Notifier>,
    ) -> SubmitterResult<Self> {
        let client = Arc::new(AptosRestClient::new(
            settings.node_url(),
            settings.confirmation.clone(),
        )?);

        let submitter = TransactionSubmitter::new(
            wallet,
            client.clone(),
            notifier,
            settings.submitter.clone(),
        );

        info!(
            "Aptos context ready for {:?} via {}",
            settings.network.name,
            client.node_url()
        );

        Ok(Self {
            network: settings.network.name,
            client,
            submitter,
        })
    }

    pub fn network(&self) -> NetworkName {
        self.network
    }

    /// Node client for read access; unaffected by read-only mode
    pub fn client(&self) -> Arc<AptosRestClient> {
        self.client.clone()
    }

    pub fn submitter(&self) -> &TransactionSubmitter {
        &self.submitter
    }

    pub async fn sign_and_submit_transaction(
        &self,
        payload: TransactionPayload,
        options: Option<SubmissionOptions>,
    ) -> SubmissionOutcome {
        self.submitter
            .sign_and_submit_transaction(payload, options)
            .await
    }
}
