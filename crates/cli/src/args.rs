//! Command line arguments

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Keywatch - report file system changes matching keywords
#[derive(Parser, Debug)]
#[command(name = "keywatch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to watch (recursively)
    #[arg(short = 'p', long, value_name = "DIR")]
    pub path: PathBuf,

    /// Only report paths containing this substring, case-insensitive (repeatable)
    #[arg(short = 'k', long = "keyword", value_name = "SUBSTRING")]
    pub keywords: Vec<String>,

    /// Log verbosity on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
