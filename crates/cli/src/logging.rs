//! Logging setup
//!
//! Diagnostics go to stderr through a non-blocking writer so a slow
//! terminal never stalls event processing. Verbosity comes only from `-v`.

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;

/// Map `-v` count to a max log level (default: warn)
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global subscriber
///
/// Keep the returned guard alive for the life of the process; dropping it
/// flushes buffered log lines.
pub fn init(verbosity: u8) -> WorkerGuard {
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_max_level(level_for(verbosity))
        .with_writer(writer)
        .with_target(false)
        .init();

    guard
}
