//! CLI command execution helpers
//!
//! Wraps the `keywatch` binary built by cargo for this test run. One-shot
//! invocations go through [`KeywatchCommand`]; long-running watches are
//! driven through [`WatchProcess`], which streams stdout line by line.

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

/// Path of the binary under test
pub fn keywatch_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_keywatch"))
}

/// CLI command builder
pub struct KeywatchCommand {
    args: Vec<String>,
}

impl KeywatchCommand {
    pub fn new() -> Self {
        Self { args: Vec::new() }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Execute to completion
    pub fn execute(&self) -> Result<CommandResult> {
        let output = Command::new(keywatch_binary())
            .args(&self.args)
            .output()
            .context("Failed to execute command")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Execute and spawn a watcher process that keeps running
    pub fn spawn(&self) -> Result<WatchProcess> {
        let mut child = Command::new(keywatch_binary())
            .args(&self.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn command")?;

        let stdout = child.stdout.take().context("stdout not captured")?;
        let (tx, lines) = mpsc::channel();
        thread::spawn(move || {
            for line in BufReader::new(stdout).lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });

        Ok(WatchProcess { child, lines })
    }
}

/// Command execution result
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }
}

/// Running `keywatch` process with streamed stdout
pub struct WatchProcess {
    child: Child,
    lines: Receiver<String>,
}

impl WatchProcess {
    /// Collect stdout lines until one satisfies `done`
    pub fn wait_for_line(
        &self,
        timeout: Duration,
        done: impl Fn(&str) -> bool,
    ) -> Result<Vec<String>> {
        let deadline = Instant::now() + timeout;
        let mut seen = Vec::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.lines.recv_timeout(remaining) {
                Ok(line) => {
                    let finished = done(&line);
                    seen.push(line);
                    if finished {
                        return Ok(seen);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    anyhow::bail!("Timed out waiting for output, saw {seen:?}")
                }
                Err(RecvTimeoutError::Disconnected) => {
                    anyhow::bail!("Process closed stdout, saw {seen:?}")
                }
            }
        }
    }

    /// Send SIGINT and wait for exit
    #[cfg(unix)]
    pub fn interrupt(mut self) -> Result<CommandResult> {
        use nix::sys::signal::{kill, Signal};
        use nix::unistd::Pid;
        use std::io::Read;

        kill(Pid::from_raw(self.child.id() as i32), Signal::SIGINT)
            .context("Failed to send SIGINT")?;

        let status = self.child.wait().context("Failed to wait for process")?;

        let mut stderr = String::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            pipe.read_to_string(&mut stderr)?;
        }
        let stdout: Vec<String> = self.lines.try_iter().collect();

        Ok(CommandResult {
            stdout: stdout.join("\n"),
            stderr,
            exit_code: status.code().unwrap_or(-1),
        })
    }
}

impl Drop for WatchProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Macro for convenient command construction
///
/// Usage:
/// ```ignore
/// keywatch!("--path", dir).execute()?;
/// ```
#[macro_export]
macro_rules! keywatch {
    ($($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::KeywatchCommand::new();
        cmd.args(&[$($arg),*]);
        cmd
    }};
}
