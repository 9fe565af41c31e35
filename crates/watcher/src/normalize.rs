//! Raw notification normalization
//!
//! Converts platform-neutral raw notifications into [`WatchEvent`]s.
//! Directory modifications are dropped here; every other notification
//! maps one-to-one onto an event.

use std::path::PathBuf;

use crate::{EventKind, WatchEvent};

/// Unprocessed change notification from the platform notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawNotification {
    Created(PathBuf),
    Deleted(PathBuf),
    Modified { path: PathBuf, is_directory: bool },
    Moved { src: PathBuf, dest: PathBuf },
}

/// Normalize a raw notification
///
/// Returns `None` for directory modifications, which are not surfaced.
pub fn normalize(raw: RawNotification) -> Option<WatchEvent> {
    match raw {
        RawNotification::Created(path) => Some(WatchEvent::new(EventKind::Create, path)),
        RawNotification::Deleted(path) => Some(WatchEvent::new(EventKind::Delete, path)),
        RawNotification::Modified { is_directory: true, .. } => None,
        RawNotification::Modified { path, .. } => Some(WatchEvent::new(EventKind::Modify, path)),
        RawNotification::Moved { src, dest } => Some(WatchEvent::moved(src, dest)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_path_kinds() {
        let event = normalize(RawNotification::Created("/w/a.txt".into())).unwrap();
        assert_eq!(event, WatchEvent::new(EventKind::Create, "/w/a.txt"));
        assert!(event.dest_path.is_none());

        let event = normalize(RawNotification::Deleted("/w/a.txt".into())).unwrap();
        assert_eq!(event.kind, EventKind::Delete);

        let event = normalize(RawNotification::Modified {
            path: "/w/a.txt".into(),
            is_directory: false,
        })
        .unwrap();
        assert_eq!(event, WatchEvent::new(EventKind::Modify, "/w/a.txt"));
    }

    #[test]
    fn test_directory_modify_suppressed() {
        let raw = RawNotification::Modified {
            path: "/w/subdir".into(),
            is_directory: true,
        };
        assert_eq!(normalize(raw), None);
    }

    #[test]
    fn test_directory_create_and_delete_kept() {
        // Only Modify checks the directory flag
        assert!(normalize(RawNotification::Created("/w/subdir".into())).is_some());
        assert!(normalize(RawNotification::Deleted("/w/subdir".into())).is_some());
    }

    #[test]
    fn test_move_keeps_both_paths() {
        let event = normalize(RawNotification::Moved {
            src: "/a/x.txt".into(),
            dest: "/b/x.txt".into(),
        })
        .unwrap();
        assert_eq!(event.kind, EventKind::Move);
        assert_eq!(event.path, PathBuf::from("/a/x.txt"));
        assert_eq!(event.dest_path, Some(PathBuf::from("/b/x.txt")));
    }
}
