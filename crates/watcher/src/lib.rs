//! Keyword-filtered file system watching
//!
//! This crate turns raw platform notifications into a filtered event stream:
//! - Keyword matching (case-insensitive substring, empty set matches all)
//! - Normalization of create/delete/modify/move notifications
//! - Per-kind filtering (moves match on either endpoint)
//! - A lifecycle-managed recursive watch session

pub mod error;
pub mod filter;
pub mod keywords;
pub mod normalize;
pub mod platform;
pub mod session;
pub mod sink;

pub use error::{Result, WatchError};
pub use filter::{should_emit, EventFilter};
pub use keywords::KeywordSet;
pub use normalize::{normalize, RawNotification};
pub use session::{SessionHandle, SessionState, StopReason, WatchSession};
pub use sink::{EventSink, LineSink};

use std::fmt;
use std::path::PathBuf;

/// Normalized file system event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEvent {
    /// Type of change
    pub kind: EventKind,
    /// Path that changed (source path for moves)
    pub path: PathBuf,
    /// Destination path, present only for moves
    pub dest_path: Option<PathBuf>,
}

impl WatchEvent {
    /// Event for a single-path change
    pub fn new(kind: EventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            dest_path: None,
        }
    }

    /// Event for a move from `src` to `dest`
    pub fn moved(src: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            kind: EventKind::Move,
            path: src.into(),
            dest_path: Some(dest.into()),
        }
    }
}

impl fmt::Display for WatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.dest_path {
            Some(dest) => write!(
                f,
                "[{}] {} -> {}",
                self.kind,
                self.path.display(),
                dest.display()
            ),
            None => write!(f, "[{}] {}", self.kind, self.path.display()),
        }
    }
}

/// Type of file system event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// File or directory created
    Create,
    /// File or directory deleted
    Delete,
    /// File modified
    Modify,
    /// File or directory moved/renamed
    Move,
}

impl EventKind {
    /// Upper-case label used in output lines
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Create => "CREATE",
            EventKind::Delete => "DELETE",
            EventKind::Modify => "MODIFY",
            EventKind::Move => "MOVE",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
