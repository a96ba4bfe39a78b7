//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use mg::sync::SyncOperation;

use crate::commands;

/// mg - Keep a registry of git repositories cloned and up to date
#[derive(Parser, Debug)]
#[command(name = "mg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(
        long,
        global = true,
        value_name = "WHEN",
        default_value = "auto",
        value_parser = ["auto", "always", "never"]
    )]
    color: String,

    /// Set log level (off, error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(
        long,
        global = true,
        value_name = "LEVEL",
        default_value = "info",
        value_parser = ["off", "error", "warn", "info", "debug", "trace"]
    )]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add the repository containing PATH to the registry
    Register(commands::register::RegisterArgs),

    /// Remove the repository at PATH from the registry
    Unregister(commands::unregister::UnregisterArgs),

    /// Merge another mgconfig document into the registry
    Import(commands::import::ImportArgs),

    /// Clone every registered repository that is missing locally
    Clone(commands::sync::SyncArgs),

    /// Fast-forward every registered repository
    Pull(commands::sync::SyncArgs),

    /// Print the registered repository paths
    List(commands::list::ListArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        match self.command {
            Commands::Register(args) => commands::register::execute(args, &self.color),
            Commands::Unregister(args) => commands::unregister::execute(args, &self.color),
            Commands::Import(args) => commands::import::execute(args),
            Commands::Clone(args) => {
                commands::sync::execute(args, SyncOperation::Clone, &self.color)
            }
            Commands::Pull(args) => commands::sync::execute(args, SyncOperation::Pull, &self.color),
            Commands::List(args) => commands::list::execute(args),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}

/// Sends log records to stderr so stdout only carries command output.
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    // Ignored if a logger is already installed
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .try_init();
}
