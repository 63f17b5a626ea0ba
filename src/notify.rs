//! Outbound user notifications.
//!
//! The core only decides what to show; rendering belongs to whoever holds the
//! receiving end of the channel.
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// A collaborator that surfaces a message to the user.
pub trait Notifier {
    fn notify(&self, severity: Severity, message: &str);
}

/// A `Notifier` that forwards notifications over an unbounded channel.
#[derive(Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new(tx: mpsc::UnboundedSender<Notification>) -> Self {
        Self { tx }
    }

    /// Creates a notifier along with the receiver its notifications arrive on.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        let notification = Notification {
            severity,
            message: message.to_string(),
        };
        if self.tx.send(notification).is_err() {
            debug!("Notification receiver dropped, discarding notification");
        }
    }
}
