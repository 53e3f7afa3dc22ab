use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::domain::port::Notifier;
use crate::domain::types::{Notification, NotificationLevel};

/// Writes notifications to the tracing subscriber. Used by headless callers and the CLI.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        let operation = n.operation.as_str();
        match n.level {
            NotificationLevel::Success => info!(operation, "{}", n.message),
            NotificationLevel::Warning => warn!(operation, "{}", n.message),
            NotificationLevel::Error => error!(operation, "{}", n.message),
        }
    }
}

/// Forwards notifications to a UI loop over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, n: Notification) {
        if self.tx.send(n).is_err() {
            tracing::debug!("notification dropped: receiver closed");
        }
    }
}
