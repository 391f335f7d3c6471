//! `dlsync` command-line front end.
//!
//! Spawns a download backend through the sidecar transport, wires a
//! `DownloadQueueClient` over it and runs one command against the queue.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary target only
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod handlers;
pub mod parser;
pub mod presentation;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use parser::Cli;
