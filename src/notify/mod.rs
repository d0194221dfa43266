//! User-facing notifications
//!
//! Notifications are fire-and-forget: the submitter never observes whether
//! one was displayed.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info};

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// Message destined for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

/// Shows short messages to the user
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that only writes to the log
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn success(&self, message: &str) {
        info!(target: "notification", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "notification", "{}", message);
    }
}

/// Forwards notifications to a UI task over a channel
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    /// Create a notifier and the receiving end for the UI
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, level: NotificationLevel, message: &str) {
        // Receiver gone means nobody is displaying anything anymore
        let _ = self.tx.send(Notification {
            level,
            message: message.to_string(),
        });
    }
}

impl Notifier for ChannelNotifier {
    fn success(&self, message: &str) {
        self.send(NotificationLevel::Success, message);
    }

    fn error(&self, message: &str) {
        self.send(NotificationLevel::Error, message);
    }
}
