//! Terminal rendering helpers shared by the handlers.

mod tables;
mod task_display;

pub use tables::{format_optional, print_separator, truncate_string};
pub use task_display::{progress_cell, queue_summary, state_label};
