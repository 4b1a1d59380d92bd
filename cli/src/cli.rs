use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(name = "mmscreen", version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the producer: screen symbols and append events to the log
    Screen {
        /// Path to the screener YAML config
        #[clap(long, default_value = "config.yaml")]
        config: PathBuf,
    },
    /// Run the consumer: tail the log, print alerts, serve commands
    Notify {
        /// Path to the notifier YAML config
        #[clap(long, default_value = "config.notify.yaml")]
        config: PathBuf,
    },
}
