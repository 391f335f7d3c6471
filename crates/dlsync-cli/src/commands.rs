//! Subcommands of the `dlsync` binary.

use clap::Subcommand;

/// Available queue operations.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every task in the queue
    List,

    /// Queue a new download
    Add {
        /// Source URL
        url: String,
        /// Destination directory
        #[arg(short, long)]
        dest: String,
        /// File name to save as
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Pause a task
    Pause {
        /// Task ID
        id: String,
    },

    /// Resume a paused task
    Resume {
        /// Task ID
        id: String,
    },

    /// Cancel a task
    Cancel {
        /// Task ID
        id: String,
    },

    /// Remove a task from the queue
    Remove {
        /// Task ID
        id: String,
    },

    /// Pause every queued or running task
    PauseAll,

    /// Resume every paused task
    ResumeAll,

    /// Cancel every unfinished task
    CancelAll,

    /// Drop finished tasks from the queue
    ClearFinished,

    /// Requeue every failed task
    RetryFailed,

    /// Set the global speed limit in bytes per second (0 = unlimited)
    SpeedLimit { bytes_per_sec: u64 },

    /// Set how many downloads may run at once
    MaxConcurrent {
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        max: u32,
    },

    /// Show finished downloads
    History {
        /// Only show records matching this text
        #[arg(short, long)]
        search: Option<String>,
        /// Delete history instead of showing it
        #[arg(long, conflicts_with = "search")]
        clear: bool,
        /// With --clear, only delete records older than this many days
        #[arg(long, requires = "clear")]
        older_than: Option<u32>,
    },

    /// Show free space at a path
    Disk {
        path: String,
        /// Also check whether this many bytes would fit
        #[arg(long)]
        required: Option<u64>,
    },

    /// Follow the queue live until Ctrl-C
    Watch,
}
