//! Child-process backend speaking line-delimited JSON on stdio.
//!
//! Four background tasks serve one process:
//! - a writer draining queued request lines into stdin
//! - a reader resolving pending requests and queueing events from stdout
//! - a dispatcher awaiting event handlers one event at a time
//! - a stderr forwarder logging backend output through `tracing`
//!
//! Events are dispatched off the reader task because handlers usually call
//! back into [`InvokePort::invoke`], whose response the reader must still be
//! free to deliver.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use async_trait::async_trait;
use dlsync_core::ports::{EventHandler, EventSourcePort, InvokePort, ListenError, Subscription};
use dlsync_core::{BackendError, BackendResult};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, trace, warn};

use crate::error::SidecarError;
use crate::protocol::{Frame, Request};

type Pending = HashMap<u64, oneshot::Sender<BackendResult<Value>>>;
type Listeners = HashMap<String, Vec<(u64, EventHandler)>>;

/// How to launch the backend executable.
#[derive(Debug, Clone)]
pub struct SidecarConfig {
    /// Path to, or name of, the backend executable.
    pub program: PathBuf,
    /// Extra command-line arguments.
    pub args: Vec<String>,
}

impl SidecarConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

#[derive(Default)]
struct Shared {
    pending: Mutex<Pending>,
    listeners: Mutex<Listeners>,
    alive: AtomicBool,
    next_request: AtomicU64,
    next_listener: AtomicU64,
}

impl Shared {
    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn listeners(&self) -> MutexGuard<'_, Listeners> {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self, id: u64, outcome: BackendResult<Value>) {
        match self.pending().remove(&id) {
            Some(tx) => {
                // Receiver gone means the caller stopped waiting
                let _ = tx.send(outcome);
            }
            None => debug!(id, "Response for unknown request"),
        }
    }

    fn handlers_for(&self, channel: &str) -> Vec<EventHandler> {
        self.listeners()
            .get(channel)
            .map(|handlers| handlers.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default()
    }

    fn remove_listener(&self, channel: &str, id: u64) {
        let mut listeners = self.listeners();
        if let Some(handlers) = listeners.get_mut(channel) {
            handlers.retain(|(handler_id, _)| *handler_id != id);
            if handlers.is_empty() {
                listeners.remove(channel);
            }
        }
    }

    /// Mark the process gone and fail everything still waiting on it.
    fn close(&self, reason: &str) {
        if self.alive.swap(false, Ordering::SeqCst) {
            info!(reason, "Backend process closed");
        }
        let drained: Vec<_> = self.pending().drain().collect();
        for (_, tx) in drained {
            let _ = tx.send(Err(BackendError::transport(reason)));
        }
    }
}

/// Backend running as a child process.
///
/// The child is killed when the backend is dropped.
pub struct SidecarBackend {
    shared: Arc<Shared>,
    outgoing: mpsc::UnboundedSender<String>,
    child: tokio::sync::Mutex<Child>,
}

impl SidecarBackend {
    /// Spawn the backend and start its I/O tasks.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn spawn(config: SidecarConfig) -> Result<Self, SidecarError> {
        let mut cmd = Command::new(&config.program);
        cmd.args(&config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|source| SidecarError::Spawn {
            program: config.program.display().to_string(),
            source,
        })?;

        let stdin = take_pipe(child.stdin.take(), "stdin")?;
        let stdout = take_pipe(child.stdout.take(), "stdout")?;
        let stderr = take_pipe(child.stderr.take(), "stderr")?;

        let shared = Arc::new(Shared::default());
        shared.alive.store(true, Ordering::SeqCst);

        let (outgoing, requests) = mpsc::unbounded_channel();
        let (events_tx, events) = mpsc::unbounded_channel();

        tokio::spawn(write_requests(stdin, requests, Arc::clone(&shared)));
        tokio::spawn(read_frames(stdout, Arc::clone(&shared), events_tx));
        tokio::spawn(dispatch_events(events, Arc::clone(&shared)));
        tokio::spawn(forward_stderr(stderr));

        info!(
            program = %config.program.display(),
            pid = ?child.id(),
            "Spawned download backend"
        );

        Ok(Self {
            shared,
            outgoing,
            child: tokio::sync::Mutex::new(child),
        })
    }

    /// Kill the child and fail any request still in flight.
    pub async fn shutdown(&self) -> Result<(), SidecarError> {
        let mut child = self.child.lock().await;
        let result = match child.try_wait() {
            Ok(Some(_)) => Ok(()),
            _ => child.kill().await.map_err(SidecarError::Shutdown),
        };
        self.shared.close("backend shut down");
        result
    }

    /// Number of requests awaiting a response.
    #[must_use]
    pub fn pending_requests(&self) -> usize {
        self.shared.pending().len()
    }
}

#[async_trait]
impl InvokePort for SidecarBackend {
    fn is_available(&self) -> bool {
        self.shared.alive.load(Ordering::SeqCst)
    }

    async fn invoke(&self, command: &str, args: Value) -> BackendResult<Value> {
        if !self.is_available() {
            return Err(BackendError::transport("backend process is not running"));
        }

        let id = self.shared.next_request.fetch_add(1, Ordering::Relaxed) + 1;
        let line = Request {
            id,
            method: command,
            params: &args,
        }
        .encode()
        .map_err(|e| BackendError::transport(format!("failed to encode request: {e}")))?;

        let (tx, rx) = oneshot::channel();
        self.shared.pending().insert(id, tx);

        // close() flips the flag before draining, so a request registered
        // after the drain is caught here
        if !self.is_available() {
            self.shared.pending().remove(&id);
            return Err(BackendError::transport("backend process is not running"));
        }

        trace!(id, command, "Sending request");
        if self.outgoing.send(line).is_err() {
            self.shared.pending().remove(&id);
            return Err(BackendError::transport("request channel closed"));
        }

        rx.await
            .unwrap_or_else(|_| Err(BackendError::transport("backend closed before responding")))
    }
}

#[async_trait]
impl EventSourcePort for SidecarBackend {
    async fn listen(
        &self,
        channel: &'static str,
        handler: EventHandler,
    ) -> Result<Subscription, ListenError> {
        if !self.is_available() {
            return Err(ListenError::new(channel, "backend process is not running"));
        }

        let id = self.shared.next_listener.fetch_add(1, Ordering::Relaxed);
        self.shared
            .listeners()
            .entry(channel.to_string())
            .or_default()
            .push((id, handler));

        let weak: Weak<Shared> = Arc::downgrade(&self.shared);
        Ok(Subscription::new(channel, move || {
            if let Some(shared) = weak.upgrade() {
                shared.remove_listener(channel, id);
            }
        }))
    }
}

fn take_pipe<T>(pipe: Option<T>, name: &'static str) -> Result<T, SidecarError> {
    pipe.ok_or(SidecarError::MissingPipe(name))
}

async fn write_requests(
    mut stdin: ChildStdin,
    mut requests: mpsc::UnboundedReceiver<String>,
    shared: Arc<Shared>,
) {
    while let Some(line) = requests.recv().await {
        let written = async {
            stdin.write_all(line.as_bytes()).await?;
            stdin.write_all(b"\n").await?;
            stdin.flush().await
        }
        .await;

        if let Err(e) = written {
            warn!(error = %e, "Failed to write to backend stdin");
            shared.close("backend stdin closed");
            break;
        }
    }
    debug!("stdin writer task exiting");
}

async fn read_frames(
    stdout: ChildStdout,
    shared: Arc<Shared>,
    events: mpsc::UnboundedSender<(String, Value)>,
) {
    let mut lines = BufReader::new(stdout).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => handle_line(&line, &shared, &events),
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read backend stdout");
                break;
            }
        }
    }
    shared.close("backend process exited");
    debug!("stdout reader task exiting");
}

fn handle_line(line: &str, shared: &Shared, events: &mpsc::UnboundedSender<(String, Value)>) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    match Frame::decode(line) {
        Ok(Frame::Response {
            id,
            error: Some(err),
            ..
        }) => {
            trace!(id, code = err.code, "Backend rejected request");
            shared.resolve(id, Err(BackendError::rejected(err.message)));
        }
        Ok(Frame::Response {
            id,
            result,
            error: None,
        }) => {
            trace!(id, "Backend answered request");
            shared.resolve(id, Ok(result));
        }
        Ok(Frame::Event { event, data }) => {
            trace!(channel = %event, "Backend event");
            let _ = events.send((event, data));
        }
        Err(e) => warn!(error = %e, line, "Ignoring malformed backend frame"),
    }
}

async fn dispatch_events(
    mut events: mpsc::UnboundedReceiver<(String, Value)>,
    shared: Arc<Shared>,
) {
    while let Some((channel, payload)) = events.recv().await {
        let handlers = shared.handlers_for(&channel);
        if handlers.is_empty() {
            trace!(channel = %channel, "No listeners for event");
            continue;
        }
        for handler in &handlers {
            handler(payload.clone()).await;
        }
    }
    debug!("event dispatcher task exiting");
}

async fn forward_stderr(stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(text)) = lines.next_line().await {
        debug!(target: "dlsync_sidecar::backend_stderr", "{text}");
    }
    debug!("stderr reader task exiting");
}
