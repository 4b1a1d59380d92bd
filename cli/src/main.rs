pub mod cli;
mod commands;

use clap::Parser;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    common::logger::init_logger("mmscreen");

    match args.command {
        Command::Screen { config } => commands::run_screen(&config).await,
        Command::Notify { config } => commands::run_notify(&config).await,
    }
}
