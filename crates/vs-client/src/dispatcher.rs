//! Serialized request dispatcher
//!
//! Device firmware does not cope with concurrent sessions, so every command in
//! the process goes through a single worker task. Producers enqueue a
//! [`PendingRequest`] and await its private one-shot reply.
//!
//! ```text
//! ┌──────────────┐
//! │ HTTP handler │──┐
//! └──────────────┘  │                      ┌─────────────┐       ┌────────┐
//!                   ├─► PendingRequest ──► │ Dispatcher  │ ────► │ Device │
//! ┌──────────────┐  │      (FIFO)          │ (one worker)│ ◄──── │        │
//! │ HTTP handler │──┘                      └──────┬──────┘       └────────┘
//! └──────────────┘                                │
//!        ▲                                        │
//!        └──────────── oneshot reply ─────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vs_core::{CommandResult, DeviceResponse};

use crate::error::{DispatchError, Result};
use crate::transport::DeviceTransport;

/// Default queue capacity before producers wait
pub const DEFAULT_QUEUE_CAPACITY: usize = 64;
/// Default time a caller waits for its reply, queueing included
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(60);

/// Dispatcher tuning
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Maximum queued requests before `submit` waits for room
    pub queue_capacity: usize,
    /// How long `submit` waits for a reply; `None` waits forever
    pub reply_timeout: Option<Duration>,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            reply_timeout: Some(DEFAULT_REPLY_TIMEOUT),
        }
    }
}

/// A command waiting for its turn on the wire
pub struct PendingRequest {
    /// Device address (`host` or `host:port`)
    pub address: String,
    /// Encoded command string
    pub command: String,
    /// Single-use reply slot
    pub reply_tx: oneshot::Sender<CommandResult>,
}

impl PendingRequest {
    /// Create a request and the receiver for its reply
    pub fn new(
        address: impl Into<String>,
        command: impl Into<String>,
    ) -> (Self, oneshot::Receiver<CommandResult>) {
        let (reply_tx, reply_rx) = oneshot::channel();
        let request = Self {
            address: address.into(),
            command: command.into(),
            reply_tx,
        };
        (request, reply_rx)
    }
}

impl std::fmt::Debug for PendingRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingRequest")
            .field("address", &self.address)
            .field("command", &self.command)
            .field("caller_waiting", &!self.reply_tx.is_closed())
            .finish()
    }
}

/// Cloneable producer side of the dispatcher queue
#[derive(Debug, Clone)]
pub struct DispatcherHandle {
    queue_tx: mpsc::Sender<PendingRequest>,
    reply_timeout: Option<Duration>,
}

impl DispatcherHandle {
    /// Queue `command` for `address` and wait for the device's answer.
    ///
    /// Dropping the returned future abandons the reply only; a command that
    /// is already queued or in flight still runs to completion.
    ///
    /// The reply timeout covers time spent queued as well. A
    /// [`DispatchError::Timeout`] does not cancel the command: it may still
    /// reach the device after the caller has given up.
    pub async fn submit(
        &self,
        address: impl Into<String>,
        command: impl Into<String>,
    ) -> Result<DeviceResponse> {
        let (request, reply_rx) = PendingRequest::new(address, command);

        let exchange = async {
            if self.queue_tx.send(request).await.is_err() {
                return Err(DispatchError::Closed);
            }

            match reply_rx.await {
                Ok(result) => result.map_err(DispatchError::from),
                Err(_) => Err(DispatchError::Abandoned),
            }
        };

        match self.reply_timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| DispatchError::Timeout)?,
            None => exchange.await,
        }
    }

    /// Number of requests waiting in the queue
    pub fn queued(&self) -> usize {
        self.queue_tx.max_capacity() - self.queue_tx.capacity()
    }

    /// True once the worker has stopped
    pub fn is_closed(&self) -> bool {
        self.queue_tx.is_closed()
    }
}

/// The single consumer of the request queue
pub struct Dispatcher {
    queue_rx: mpsc::Receiver<PendingRequest>,
    transport: Arc<dyn DeviceTransport>,
}

impl Dispatcher {
    /// Create a dispatcher and its producer handle without starting it
    pub fn new(
        transport: Arc<dyn DeviceTransport>,
        config: DispatcherConfig,
    ) -> (Self, DispatcherHandle) {
        let (queue_tx, queue_rx) = mpsc::channel(config.queue_capacity.max(1));
        let dispatcher = Self {
            queue_rx,
            transport,
        };
        let handle = DispatcherHandle {
            queue_tx,
            reply_timeout: config.reply_timeout,
        };
        (dispatcher, handle)
    }

    /// Create a dispatcher and run it on a background task
    pub fn spawn(
        transport: Arc<dyn DeviceTransport>,
        config: DispatcherConfig,
    ) -> (DispatcherHandle, JoinHandle<()>) {
        let (dispatcher, handle) = Self::new(transport, config);
        let worker = tokio::spawn(dispatcher.run());
        (handle, worker)
    }

    /// Drain the queue until every handle has been dropped.
    ///
    /// Each dequeued request gets exactly one result. Delivery never blocks:
    /// if the caller is gone the result is discarded.
    pub async fn run(mut self) {
        info!("Request dispatcher started");

        while let Some(request) = self.queue_rx.recv().await {
            let PendingRequest {
                address,
                command,
                reply_tx,
            } = request;

            let result = self.transport.send(&address, &command).await;

            if let Err(e) = &result {
                warn!(%address, kind = e.kind(), "Device request failed");
            }

            if reply_tx.send(result).is_err() {
                debug!(%address, "Caller abandoned request, discarding result");
            }
        }

        info!("Request dispatcher stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use vs_core::CommandError;

    /// Echoes the address and command back, counting calls
    struct EchoTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DeviceTransport for EchoTransport {
        async fn send(&self, address: &str, command: &str) -> CommandResult {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if address == "bad" {
                return Err(CommandError::Transport("connection refused".to_string()));
            }
            let mut fields = HashMap::new();
            fields.insert("ADDRESS".to_string(), address.to_string());
            fields.insert("COMMAND".to_string(), command.to_string());
            Ok(DeviceResponse::new(fields))
        }
    }

    fn echo() -> Arc<EchoTransport> {
        Arc::new(EchoTransport {
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_submit_roundtrip() {
        let transport = echo();
        let (handle, _worker) = Dispatcher::spawn(transport.clone(), DispatcherConfig::default());

        let response = handle.submit("10.0.0.1", "CMD=START&CMD=END").await.unwrap();
        assert_eq!(response.get("ADDRESS"), Some("10.0.0.1"));
        assert_eq!(response.get("COMMAND"), Some("CMD=START&CMD=END"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_delivered_and_worker_survives() {
        let transport = echo();
        let (handle, _worker) = Dispatcher::spawn(transport.clone(), DispatcherConfig::default());

        let err = handle.submit("bad", "X=1").await.unwrap_err();
        assert_eq!(
            err,
            DispatchError::Command(CommandError::Transport("connection refused".to_string()))
        );

        let ok = handle.submit("good", "X=1").await.unwrap();
        assert_eq!(ok.get("ADDRESS"), Some("good"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_submit_after_worker_stops() {
        let (dispatcher, handle) = Dispatcher::new(echo(), DispatcherConfig::default());
        drop(dispatcher);

        assert!(handle.is_closed());
        let err = handle.submit("10.0.0.1", "X=1").await.unwrap_err();
        assert_eq!(err, DispatchError::Closed);
    }

    #[tokio::test]
    async fn test_worker_exits_when_handles_dropped() {
        let (handle, worker) = Dispatcher::spawn(echo(), DispatcherConfig::default());
        drop(handle);

        tokio::time::timeout(Duration::from_secs(1), worker)
            .await
            .expect("worker should stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_queued_counts_pending_requests() {
        let (_dispatcher, handle) = Dispatcher::new(echo(), DispatcherConfig::default());
        assert_eq!(handle.queued(), 0);

        let (request, _reply_rx) = PendingRequest::new("10.0.0.1", "X=1");
        handle.queue_tx.send(request).await.unwrap();
        assert_eq!(handle.queued(), 1);
    }

    #[tokio::test]
    async fn test_reply_timeout_when_worker_never_runs() {
        let config = DispatcherConfig {
            queue_capacity: 4,
            reply_timeout: Some(Duration::from_millis(50)),
        };
        // Keep the dispatcher alive but never run it
        let (_dispatcher, handle) = Dispatcher::new(echo(), config);

        let err = handle.submit("10.0.0.1", "X=1").await.unwrap_err();
        assert_eq!(err, DispatchError::Timeout);
    }
}
