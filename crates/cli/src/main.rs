//! Keywatch CLI - keywatch command

use anyhow::Result;
use clap::Parser;
use cli_lib::{cmd, logging, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the banner and event lines
    let _log_guard = logging::init(cli.verbose);

    cmd::watch::run(&cli.path, &cli.keywords).await
}
