//! Keywatch CLI library
//!
//! Argument parsing, logging setup and the watch command, split out of
//! `main.rs` so they can be tested.

pub mod args;
pub mod banner;
pub mod cmd;
pub mod logging;

pub use args::Cli;
