//! Side-channel notifications surfaced to the UI
//!
//! Mutation failures and confirmations are transient, per-action messages
//! (toast popups, in a typical UI). The store and session push them onto an
//! unbounded channel; the presentation layer drains it.

use tokio::sync::mpsc;

/// A transient notification for the UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A mutation was confirmed by the backend
    Success(String),
    /// Informational confirmation (deletions)
    Info(String),
    /// A mutation or auth call failed
    Error(String),
    /// A board fetch failed fatally; the UI should route to its not-found page
    FatalNotFound,
}

/// Sending half of the notification side-channel
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl Notifier {
    /// Create a notifier and the receiver the UI drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Push a notice; dropped silently if the UI has gone away
    pub fn push(&self, notice: Notice) {
        let _ = self.tx.send(notice);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.push(Notice::Success(message.into()));
    }

    pub fn info(&self, message: impl Into<String>) {
        self.push(Notice::Info(message.into()));
    }

    pub fn error(&self, message: impl Into<String>) {
        self.push(Notice::Error(message.into()));
    }

    pub fn fatal_not_found(&self) {
        self.push(Notice::FatalNotFound);
    }
}
