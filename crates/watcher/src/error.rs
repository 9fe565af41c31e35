//! Error types for watch sessions.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::SessionState;

/// Result type for watcher operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors from watcher operations.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Cannot watch {}: {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: String },

    #[error("File system notifier failed: {0}")]
    Notifier(#[from] notify::Error),

    #[error("Malformed {kind} notification: {details}")]
    MalformedNotification { kind: String, details: String },

    #[error("Cannot {operation} a session that is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    #[error("Failed to write event: {0}")]
    Sink(#[from] std::io::Error),

    #[error("Notification channel closed unexpectedly")]
    ChannelClosed,
}

impl WatchError {
    pub(crate) fn invalid_path(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        WatchError::InvalidPath {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn malformed(kind: impl std::fmt::Debug, details: impl Into<String>) -> Self {
        WatchError::MalformedNotification {
            kind: format!("{kind:?}"),
            details: details.into(),
        }
    }
}
