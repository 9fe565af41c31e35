//! Translation of `notify` events into raw notifications
//!
//! Backends disagree on how renames are reported:
//! - inotify emits `From`, `To`, then `Both` sharing one tracker cookie
//! - Windows emits `From` then `To` without a tracker
//! - FSEvents emits `Name(Any)` for each side of the rename
//!
//! The translator folds all of these into `Moved`, `Created` or `Deleted`.
//!
//! Backends also report absolute (sometimes canonical) paths. [`RootMap`]
//! rewrites them back under the root exactly as the user gave it, so
//! keywords never match against ancestors of the watched directory.

use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind};
use tracing::{debug, trace};

use crate::error::{Result, WatchError};
use crate::normalize::RawNotification;

/// Maps notifier paths back under the user-supplied root
#[derive(Debug, Clone)]
pub struct RootMap {
    root: PathBuf,
    prefixes: Vec<PathBuf>,
}

impl RootMap {
    /// `root` as given (possibly relative), `canonical` as resolved
    pub fn new(root: &Path, canonical: &Path) -> io::Result<Self> {
        let absolute = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };

        let mut prefixes = vec![absolute];
        if !prefixes.iter().any(|p| p == canonical) {
            prefixes.push(canonical.to_path_buf());
        }

        Ok(Self {
            root: root.to_path_buf(),
            prefixes,
        })
    }

    /// Rewrite `path` under the given root; unrelated paths pass through
    pub fn map(&self, path: PathBuf) -> PathBuf {
        for prefix in &self.prefixes {
            if let Ok(rel) = path.strip_prefix(prefix) {
                if rel.as_os_str().is_empty() {
                    return self.root.clone();
                }
                return self.root.join(rel);
            }
        }
        path
    }
}

/// Rename source waiting for its destination
#[derive(Debug)]
struct PendingRename {
    path: PathBuf,
    tracker: Option<usize>,
    since: Instant,
}

/// Stateful `notify::Event` to [`RawNotification`] translator
///
/// Holds rename sources until their destination arrives. A source that
/// stays unpaired past the rename window left the watched tree and is
/// reported as a deletion.
#[derive(Debug)]
pub struct Translator {
    pending: VecDeque<PendingRename>,
    window: Duration,
    root_map: Option<RootMap>,
}

impl Default for Translator {
    fn default() -> Self {
        Self::new()
    }
}

impl Translator {
    /// How long a rename source may wait for its destination
    pub const RENAME_WINDOW: Duration = Duration::from_millis(500);

    pub fn new() -> Self {
        Self::with_window(Self::RENAME_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            pending: VecDeque::new(),
            window,
            root_map: None,
        }
    }

    /// Report paths under the root as the user gave it
    pub fn with_root_map(mut self, root_map: RootMap) -> Self {
        self.root_map = Some(root_map);
        self
    }

    /// Translate one event
    ///
    /// Expired rename sources are flushed first so output order follows
    /// arrival order. A malformed event fails before anything is flushed,
    /// leaving expired sources for the next call.
    pub fn translate(&mut self, event: Event, now: Instant) -> Result<Vec<RawNotification>> {
        if is_change(&event.kind) && event.paths.is_empty() {
            return Err(WatchError::malformed(event.kind, "no path"));
        }
        if event.kind == EventKind::Modify(ModifyKind::Name(RenameMode::Both))
            && event.paths.len() != 2
        {
            return Err(WatchError::malformed(
                event.kind,
                format!("expected 2 paths, got {}", event.paths.len()),
            ));
        }

        let mut out = self.flush_expired(now);
        let tracker = event.attrs.tracker();
        let paths: Vec<PathBuf> = match &self.root_map {
            Some(root_map) => event.paths.into_iter().map(|p| root_map.map(p)).collect(),
            None => event.paths,
        };

        match event.kind {
            EventKind::Create(_) => {
                out.extend(paths.into_iter().map(RawNotification::Created));
            }
            EventKind::Remove(_) => {
                out.extend(paths.into_iter().map(RawNotification::Deleted));
            }
            EventKind::Modify(ModifyKind::Name(mode)) => {
                self.translate_rename(mode, paths, tracker, now, &mut out)?;
            }
            EventKind::Modify(_) => {
                out.extend(paths.into_iter().map(|path| {
                    let is_directory = path.is_dir();
                    RawNotification::Modified { path, is_directory }
                }));
            }
            kind => {
                trace!(?kind, "Ignoring non-change notification");
            }
        }

        Ok(out)
    }

    fn translate_rename(
        &mut self,
        mode: RenameMode,
        paths: Vec<PathBuf>,
        tracker: Option<usize>,
        now: Instant,
        out: &mut Vec<RawNotification>,
    ) -> Result<()> {
        match mode {
            RenameMode::Both => {
                let [src, dest]: [PathBuf; 2] = paths.try_into().map_err(|paths: Vec<PathBuf>| {
                    WatchError::malformed(
                        mode,
                        format!("expected 2 paths, got {}", paths.len()),
                    )
                })?;
                self.take_pending(tracker, &src);
                out.push(RawNotification::Moved { src, dest });
            }
            RenameMode::From => {
                for path in paths {
                    self.pending.push_back(PendingRename {
                        path,
                        tracker,
                        since: now,
                    });
                }
            }
            RenameMode::To => {
                for dest in paths {
                    match tracker {
                        // The paired `Both` carries the move
                        Some(t) if self.pending.iter().any(|p| p.tracker == Some(t)) => {
                            trace!(path = %dest.display(), "Rename destination deferred to paired event");
                        }
                        Some(_) => out.push(RawNotification::Created(dest)),
                        None => match self.pop_untracked() {
                            Some(src) => out.push(RawNotification::Moved { src, dest }),
                            None => out.push(RawNotification::Created(dest)),
                        },
                    }
                }
            }
            RenameMode::Any | RenameMode::Other => {
                for path in paths {
                    if path.exists() {
                        out.push(RawNotification::Created(path));
                    } else {
                        out.push(RawNotification::Deleted(path));
                    }
                }
            }
        }
        Ok(())
    }

    /// Report rename sources older than the window as deletions
    pub fn flush_expired(&mut self, now: Instant) -> Vec<RawNotification> {
        let mut out = Vec::new();
        while let Some(front) = self.pending.front() {
            if now.saturating_duration_since(front.since) < self.window {
                break;
            }
            if let Some(expired) = self.pending.pop_front() {
                debug!(path = %expired.path.display(), "Rename source left the watched tree");
                out.push(RawNotification::Deleted(expired.path));
            }
        }
        out
    }

    /// When the oldest pending rename source expires
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.front().map(|p| p.since + self.window)
    }

    fn take_pending(&mut self, tracker: Option<usize>, src: &Path) {
        let idx = self
            .pending
            .iter()
            .position(|p| tracker.is_some() && p.tracker == tracker)
            .or_else(|| self.pending.iter().position(|p| p.path.as_path() == src));
        if let Some(idx) = idx {
            self.pending.remove(idx);
        }
    }

    fn pop_untracked(&mut self) -> Option<PathBuf> {
        let idx = self.pending.iter().position(|p| p.tracker.is_none())?;
        self.pending.remove(idx).map(|p| p.path)
    }
}

fn is_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(_)
    )
}
