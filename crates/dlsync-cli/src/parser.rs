//! Main CLI parser and top-level argument handling.

use std::path::PathBuf;

use clap::Parser;

use crate::commands::Commands;

/// Command-line interface for the download queue.
///
/// Global options describe how to reach the backend; the subcommand says
/// what to do with the queue.
#[derive(Parser)]
#[command(name = "dlsync")]
#[command(about = "Drive a download queue backend from the terminal")]
#[command(version)]
pub struct Cli {
    /// Backend executable to spawn
    #[arg(
        long,
        env = "DLSYNC_BACKEND",
        default_value = "dlsync-backend",
        global = true
    )]
    pub backend: PathBuf,

    /// Extra argument passed to the backend (repeatable)
    #[arg(
        long = "backend-arg",
        value_name = "ARG",
        allow_hyphen_values = true,
        global = true
    )]
    pub backend_args: Vec<String>,

    /// Settings file to use instead of the platform data dir
    #[arg(long, env = "DLSYNC_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Default log filter when `RUST_LOG` is unset.
    #[must_use]
    pub const fn log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}
