//! Command handlers.
//!
//! Each handler takes the composed [`CliContext`](crate::CliContext),
//! calls the download queue client and prints the outcome.

pub mod add;
pub mod bulk;
pub mod control;
pub mod disk;
pub mod history;
pub mod list;
pub mod settings;
pub mod watch;
