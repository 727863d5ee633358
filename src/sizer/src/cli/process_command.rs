use anyhow::Context;
use clap::Parser;

use super::commands::{Cli, Command};
use super::handlers;

/// Process the command line. Sync so the runtime is only built for commands
/// that need one.
pub fn process_command() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Version => {
            println!("sizer {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Command::Estimate {
            input,
            output,
            offline,
        } => tokio::runtime::Runtime::new()
            .context("failed to start async runtime")?
            .block_on(handlers::estimate(&input, &output, offline)),
    }
}
