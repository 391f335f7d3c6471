//! Sidecar process transport for dlsync.
//!
//! [`SidecarBackend`] spawns the native download backend as a child process
//! and talks to it over line-delimited JSON on stdin/stdout. It implements
//! both [`InvokePort`](dlsync_core::ports::InvokePort) and
//! [`EventSourcePort`](dlsync_core::ports::EventSourcePort), so a single
//! instance feeds a `CommandAdapter` and an `EventBridge`.
//!
//! # Wire format
//!
//! ```text
//! → {"id":1,"method":"download_list","params":{}}
//! ← {"id":1,"result":[...]}
//! ← {"id":2,"error":{"code":404,"message":"Task not found: t1"}}
//! ← {"event":"download-task-added","data":{"task_id":"t1"}}
//! ```

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the integration tests only
#[cfg(test)]
use dlsync_client as _;
#[cfg(test)]
use futures_util as _;

mod backend;
mod error;
pub mod protocol;

pub use backend::{SidecarBackend, SidecarConfig};
pub use error::SidecarError;
