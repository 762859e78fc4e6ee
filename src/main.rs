mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();
    match cli.command.take() {
        Some(Commands::Check { config, debug }) => cli::check(config, debug),
        None => cli::run(cli).await,
    }
}
