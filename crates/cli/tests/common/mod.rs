//! Common utilities for integration tests

#![allow(dead_code, unused_imports)]

#[macro_use]
pub mod cli;

pub use cli::{CommandResult, KeywatchCommand, WatchProcess};
