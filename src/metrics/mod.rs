//! Prometheus metrics for monitoring
//!
//! Exposes metrics for:
//! - Submission outcomes
//! - Wallet rejections
//! - Confirmation latency

use crate::error::{SubmitterError, SubmitterResult};

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

lazy_static! {
    pub static ref TX_SUBMITTED: CounterVec = register_counter_vec!(
        "aptos_submitter_transactions_submitted_total",
        "Transactions accepted by the wallet",
        &["payload_type"]
    ).unwrap();

    pub static ref TX_CONFIRMED: CounterVec = register_counter_vec!(
        "aptos_submitter_transactions_confirmed_total",
        "Transactions committed on chain",
        &["payload_type"]
    ).unwrap();

    pub static ref TX_FAILED: CounterVec = register_counter_vec!(
        "aptos_submitter_transactions_failed_total",
        "Transactions that did not confirm",
        &["payload_type"]
    ).unwrap();

    pub static ref TX_SKIPPED: CounterVec = register_counter_vec!(
        "aptos_submitter_transactions_skipped_total",
        "Submissions that never reached confirmation",
        &["reason"]
    ).unwrap();

    pub static ref CONFIRMATION_LATENCY: HistogramVec = register_histogram_vec!(
        "aptos_submitter_confirmation_latency_seconds",
        "Time from wallet submission to on-chain outcome",
        &["payload_type"],
        vec![0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 60.0]
    ).unwrap();
}

/// Render all registered metrics in the Prometheus text format
pub fn gather_metrics() -> SubmitterResult<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| SubmitterError::Metrics(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| SubmitterError::Metrics(e.to_string()))
}

// Helper functions to record metrics

pub fn record_tx_submitted(payload_type: &str) {
    TX_SUBMITTED.with_label_values(&[payload_type]).inc();
}

pub fn record_tx_confirmed(payload_type: &str, latency_secs: f64) {
    TX_CONFIRMED.with_label_values(&[payload_type]).inc();
    CONFIRMATION_LATENCY
        .with_label_values(&[payload_type])
        .observe(latency_secs);
}

pub fn record_tx_failed(payload_type: &str, latency_secs: f64) {
    TX_FAILED.with_label_values(&[payload_type]).inc();
    CONFIRMATION_LATENCY
        .with_label_values(&[payload_type])
        .observe(latency_secs);
}

pub fn record_tx_skipped(reason: &str) {
    TX_SKIPPED.with_label_values(&[reason]).inc();
}
