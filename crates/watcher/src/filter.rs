//! Keyword filtering of normalized events

use crate::keywords::KeywordSet;
use crate::normalize::{normalize, RawNotification};
use crate::{EventKind, WatchEvent};

/// Decide whether an event should reach the output sink
///
/// Single-path kinds match on `path`. Moves are emitted when either the
/// source or the destination matches, so files moved into or out of a
/// keyword's scope are always reported.
pub fn should_emit(event: &WatchEvent, keywords: &KeywordSet) -> bool {
    match event.kind {
        EventKind::Create | EventKind::Delete | EventKind::Modify => {
            keywords.matches_path(&event.path)
        }
        EventKind::Move => {
            keywords.matches_path(&event.path)
                || event
                    .dest_path
                    .as_deref()
                    .is_some_and(|dest| keywords.matches_path(dest))
        }
    }
}

/// Normalize-then-filter stage bound to one keyword set
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    keywords: KeywordSet,
}

impl EventFilter {
    pub fn new(keywords: KeywordSet) -> Self {
        Self { keywords }
    }

    /// Run a raw notification through normalization and filtering
    ///
    /// Returns the event to forward, or `None` when it was discarded.
    pub fn process(&self, raw: RawNotification) -> Option<WatchEvent> {
        let event = normalize(raw)?;
        if should_emit(&event, &self.keywords) {
            Some(event)
        } else {
            tracing::trace!(event = %event, "Filtered out by keywords");
            None
        }
    }
}
