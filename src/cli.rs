// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::default_config_path;

/// Command-line arguments for `unibuild`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "unibuild",
    version,
    about = "Inspect and edit the completion markers of dependency-graph tasks.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `unibuild.toml` in the current working directory.
    #[arg(
        long,
        value_name = "PATH",
        default_value_os_t = default_config_path(),
        global = true
    )]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `UNIBUILD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL", global = true)]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Print the marker path of a task.
    Path(MarkerArgs),
    /// Report whether a task counts as already processed.
    Status {
        #[command(flatten)]
        marker: MarkerArgs,

        /// Treat markers older than this many seconds as stale.
        #[arg(long, value_name = "SECS")]
        expiration: Option<u64>,
    },
    /// Record a task as successfully processed.
    Mark(MarkerArgs),
    /// Forget a task's success so it runs again.
    Clear(MarkerArgs),
}

/// Identifies one marker: a task name plus an optional context.
#[derive(Debug, Clone, Args)]
pub struct MarkerArgs {
    /// Task name, exactly as the task reports it.
    pub task: String,

    /// Context (project) the task runs in.
    #[arg(long, value_name = "NAME")]
    pub context: Option<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
