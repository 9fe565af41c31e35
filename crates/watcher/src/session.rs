//! Watch session lifecycle
//!
//! A session owns one recursive `notify` subscription. Lifecycle:
//! `Idle -> Running -> Stopping -> Stopped`. `run` blocks the caller,
//! pumping notifications through translate, normalize and filter into a
//! sink, until an interrupt, a `stop()` from another thread, or a fatal
//! error.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crossbeam_channel::{Receiver, Sender};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Result, WatchError};
use crate::filter::EventFilter;
use crate::keywords::KeywordSet;
use crate::normalize::RawNotification;
use crate::platform::{RootMap, Translator};
use crate::sink::EventSink;

/// Lifecycle state of a [`WatchSession`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Running => "running",
            SessionState::Stopping => "stopping",
            SessionState::Stopped => "stopped",
        };
        f.write_str(name)
    }
}

/// Why [`WatchSession::run`] returned without error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// An interrupt arrived through a [`SessionHandle`]
    Interrupted,
    /// `stop()` was called while the session was running
    Stopped,
}

#[derive(Debug, Clone, Copy)]
enum Wake {
    Interrupt,
    Stop,
}

/// Cloneable interrupt hook for a session
///
/// Safe to call from a signal handler task; repeated calls are harmless.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    wake: Sender<Wake>,
}

impl SessionHandle {
    /// Ask the running session to stop and return from `run`
    pub fn interrupt(&self) {
        let _ = self.wake.try_send(Wake::Interrupt);
    }
}

/// Notification receiver and filter, consumed by `run`
struct Pipeline {
    events: Receiver<notify::Result<Event>>,
    filter: EventFilter,
    root_map: Option<RootMap>,
}

struct Inner {
    state: SessionState,
    root: Option<PathBuf>,
    watcher: Option<RecommendedWatcher>,
    pipeline: Option<Pipeline>,
}

/// Recursive, keyword-filtered directory watch
pub struct WatchSession {
    inner: Mutex<Inner>,
    wake_tx: Sender<Wake>,
    wake_rx: Receiver<Wake>,
}

impl Default for WatchSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for WatchSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("WatchSession")
            .field("state", &inner.state)
            .field("root", &inner.root)
            .finish()
    }
}

impl WatchSession {
    /// Create an idle session
    pub fn new() -> Self {
        let (wake_tx, wake_rx) = crossbeam_channel::bounded(1);
        Self {
            inner: Mutex::new(Inner {
                state: SessionState::Idle,
                root: None,
                watcher: None,
                pipeline: None,
            }),
            wake_tx,
            wake_rx,
        }
    }

    pub fn state(&self) -> SessionState {
        self.inner.lock().state
    }

    /// Resolved root being watched, once started
    pub fn root(&self) -> Option<PathBuf> {
        self.inner.lock().root.clone()
    }

    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            wake: self.wake_tx.clone(),
        }
    }

    /// Subscribe to `root` recursively and move to Running
    ///
    /// The root must be an existing, readable directory. All errors are
    /// reported here, before any notification is processed. Events are
    /// matched and reported under `root` as given; the returned path is
    /// the resolved root, for display.
    pub fn start(&self, root: &Path, keywords: KeywordSet) -> Result<PathBuf> {
        let mut inner = self.inner.lock();
        if inner.state != SessionState::Idle {
            return Err(WatchError::InvalidState {
                operation: "start",
                state: inner.state,
            });
        }

        let canonical = validate_root(root)?;
        let root_map =
            RootMap::new(root, &canonical).map_err(|e| WatchError::invalid_path(root, e))?;

        let (tx, rx) = crossbeam_channel::unbounded();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // Receiver gone means the session is shutting down
            let _ = tx.send(res);
        })?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        // Interrupts sent before the session existed do not apply to it
        while self.wake_rx.try_recv().is_ok() {}

        info!(root = %canonical.display(), keywords = %keywords, "Watch session started");

        inner.state = SessionState::Running;
        inner.root = Some(canonical.clone());
        inner.watcher = Some(watcher);
        inner.pipeline = Some(Pipeline {
            events: rx,
            filter: EventFilter::new(keywords),
            root_map: Some(root_map),
        });

        Ok(canonical)
    }

    /// Move to Running fed by a caller-owned channel instead of `notify`
    #[cfg(test)]
    fn start_with_channel(&self, keywords: KeywordSet) -> Sender<notify::Result<Event>> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut inner = self.inner.lock();
        inner.state = SessionState::Running;
        inner.pipeline = Some(Pipeline {
            events: rx,
            filter: EventFilter::new(keywords),
            root_map: None,
        });
        tx
    }

    /// Unsubscribe and move to Stopped
    ///
    /// Idempotent: stopping a stopped (or stopping) session is a no-op.
    /// No event reaches a sink after this returns.
    pub fn stop(&self) {
        let watcher = {
            let mut inner = self.inner.lock();
            match inner.state {
                SessionState::Stopping | SessionState::Stopped => return,
                SessionState::Idle => {
                    inner.state = SessionState::Stopped;
                    return;
                }
                SessionState::Running => {
                    inner.state = SessionState::Stopping;
                    inner.watcher.take()
                }
            }
        };

        // Dropping the watcher unsubscribes from the platform notifier
        drop(watcher);
        let _ = self.wake_tx.try_send(Wake::Stop);

        let mut inner = self.inner.lock();
        inner.state = SessionState::Stopped;
        inner.pipeline = None;
        info!("Watch session stopped");
    }

    /// Block while Running, forwarding filtered events to `sink`
    ///
    /// Returns after an interrupt or an external `stop()`. Notifier and
    /// sink failures stop the session first and are then returned.
    pub fn run<S: EventSink + ?Sized>(&self, sink: &mut S) -> Result<StopReason> {
        let pipeline = {
            let mut inner = self.inner.lock();
            match inner.state {
                SessionState::Running => inner.pipeline.take(),
                SessionState::Stopping | SessionState::Stopped => {
                    return Ok(StopReason::Stopped);
                }
                SessionState::Idle => None,
            }
        };
        let Some(pipeline) = pipeline else {
            return Err(WatchError::InvalidState {
                operation: "run",
                state: self.state(),
            });
        };

        let result = self.pump(&pipeline, sink);
        self.stop();
        result
    }

    fn pump<S: EventSink + ?Sized>(&self, pipeline: &Pipeline, sink: &mut S) -> Result<StopReason> {
        let mut translator = match &pipeline.root_map {
            Some(root_map) => Translator::new().with_root_map(root_map.clone()),
            None => Translator::new(),
        };

        loop {
            let deadline = match translator.next_deadline() {
                Some(at) => crossbeam_channel::at(at),
                None => crossbeam_channel::never(),
            };

            crossbeam_channel::select! {
                recv(self.wake_rx) -> wake => {
                    return Ok(match wake {
                        Ok(Wake::Interrupt) => StopReason::Interrupted,
                        _ => StopReason::Stopped,
                    });
                }
                recv(pipeline.events) -> msg => match msg {
                    Ok(Ok(event)) => {
                        debug!(kind = ?event.kind, paths = ?event.paths, "Raw notification");
                        let raws = translator.translate(event, Instant::now())?;
                        if !self.forward(raws, &pipeline.filter, sink)? {
                            return Ok(StopReason::Stopped);
                        }
                    }
                    Ok(Err(e)) => {
                        warn!("Notifier error: {e}");
                        return Err(WatchError::Notifier(e));
                    }
                    Err(_) => {
                        if self.state() == SessionState::Running {
                            return Err(WatchError::ChannelClosed);
                        }
                        return Ok(StopReason::Stopped);
                    }
                },
                recv(deadline) -> _ => {
                    let raws = translator.flush_expired(Instant::now());
                    if !self.forward(raws, &pipeline.filter, sink)? {
                        return Ok(StopReason::Stopped);
                    }
                }
            }
        }
    }

    /// Emit surviving events; returns false once the session left Running
    fn forward<S: EventSink + ?Sized>(
        &self,
        raws: Vec<RawNotification>,
        filter: &EventFilter,
        sink: &mut S,
    ) -> Result<bool> {
        for raw in raws {
            let Some(event) = filter.process(raw) else {
                continue;
            };

            // Holding the lock keeps stop() from completing mid-emit
            let inner = self.inner.lock();
            if inner.state != SessionState::Running {
                return Ok(false);
            }
            sink.emit(&event)?;
        }
        Ok(true)
    }
}

fn validate_root(root: &Path) -> Result<PathBuf> {
    let canonical =
        std::fs::canonicalize(root).map_err(|e| WatchError::invalid_path(root, e))?;
    if !canonical.is_dir() {
        return Err(WatchError::invalid_path(canonical, "not a directory"));
    }
    std::fs::read_dir(&canonical).map_err(|e| WatchError::invalid_path(&canonical, e))?;
    Ok(canonical)
}
