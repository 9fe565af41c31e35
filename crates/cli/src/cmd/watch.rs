//! Watch a directory tree and print matching events

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;
use watcher::{KeywordSet, LineSink, SessionHandle, WatchSession};

use crate::banner;

/// Run a watch session until interrupted
///
/// Startup errors (invalid root, notifier setup) are returned before the
/// banner is printed. Notifier failures while running stop the session and
/// are returned as errors; an interrupt returns `Ok`.
pub async fn run(path: &Path, keywords: &[String]) -> Result<()> {
    let session = Arc::new(WatchSession::new());
    let root = session
        .start(path, KeywordSet::new(keywords))
        .with_context(|| format!("Failed to start watching {}", path.display()))?;

    let shutdown = listen_for_shutdown(session.handle())?;

    banner::print(&root, keywords).context("Failed to write banner")?;

    let runner = {
        let session = session.clone();
        tokio::task::spawn_blocking(move || {
            let mut sink = LineSink::stdout();
            session.run(&mut sink)
        })
    };

    let outcome = runner.await.context("Watch task panicked")?;
    shutdown.abort();

    match outcome {
        Ok(reason) => {
            info!(?reason, "Watch session ended");
            eprintln!("Stopped.");
            Ok(())
        }
        Err(e) => Err(e).context("Watch session failed"),
    }
}

/// Forward SIGINT/SIGTERM to the session as an interrupt
///
/// Handlers are installed before returning, so a signal that arrives once
/// the banner is visible is never lost.
#[cfg(unix)]
fn listen_for_shutdown(handle: SessionHandle) -> Result<JoinHandle<()>> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt =
        signal(SignalKind::interrupt()).context("Failed to install SIGINT handler")?;
    let mut terminate =
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?;

    Ok(tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.recv() => info!("Received SIGINT"),
            _ = terminate.recv() => info!("Received SIGTERM"),
        }
        handle.interrupt();
    }))
}

#[cfg(not(unix))]
fn listen_for_shutdown(handle: SessionHandle) -> Result<JoinHandle<()>> {
    Ok(tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C");
                handle.interrupt();
            }
            Err(e) => tracing::warn!("Failed to listen for Ctrl+C: {e}"),
        }
    }))
}
