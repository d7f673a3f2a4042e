//! Test utilities for vs-client
//!
//! [`FakeDevice`] serves the device command endpoint on an ephemeral port and
//! records every command it receives. [`TruncatingDevice`] sends response
//! headers and then hangs up mid-body. [`TestServer`] serves any axum router,
//! which is handy for driving the control API end to end.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::Router;
use parking_lot::Mutex;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::transport::WAPI_PATH;

/// A command received by a [`FakeDevice`]
#[derive(Debug, Clone)]
pub struct ReceivedCommand {
    pub body: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub started: Instant,
    pub finished: Instant,
}

#[derive(Default)]
struct DeviceState {
    /// Response body per exact request body
    responses: HashMap<String, String>,
    fallback: String,
    delay: Duration,
    received: Vec<ReceivedCommand>,
    in_flight: usize,
    max_in_flight: usize,
}

/// A fake encoder/decoder answering on `/cgi-bin/wapi.cgi`
pub struct FakeDevice {
    pub addr: SocketAddr,
    state: Arc<Mutex<DeviceState>>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl FakeDevice {
    /// Start a device that answers every command with `API.STATUS=SUCCESS`
    pub async fn start() -> std::io::Result<Self> {
        Self::start_with_fallback("API.STATUS=SUCCESS").await
    }

    /// Start a device that answers unknown commands with `fallback`
    pub async fn start_with_fallback(fallback: impl Into<String>) -> std::io::Result<Self> {
        let state = Arc::new(Mutex::new(DeviceState {
            fallback: fallback.into(),
            ..Default::default()
        }));

        let router = Router::new()
            .route(WAPI_PATH, post(handle_command))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            state,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Address to hand to the transport (`127.0.0.1:<port>`)
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Answer `command` with `body`
    pub fn respond_to(&self, command: impl Into<String>, body: impl Into<String>) {
        self.state.lock().responses.insert(command.into(), body.into());
    }

    /// Delay every response by `delay`
    pub fn set_delay(&self, delay: Duration) {
        self.state.lock().delay = delay;
    }

    /// Commands received so far, in arrival order
    pub fn received(&self) -> Vec<ReceivedCommand> {
        self.state.lock().received.clone()
    }

    /// Highest number of commands handled at the same time
    pub fn max_in_flight(&self) -> usize {
        self.state.lock().max_in_flight
    }
}

impl Drop for FakeDevice {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn handle_command(
    State(state): State<Arc<Mutex<DeviceState>>>,
    headers: HeaderMap,
    body: String,
) -> String {
    let started = Instant::now();
    let (delay, response) = {
        let mut state = state.lock();
        let in_flight = state.in_flight + 1;
        state.in_flight = in_flight;
        if in_flight > state.max_in_flight {
            state.max_in_flight = in_flight;
        }
        let response = state
            .responses
            .get(&body)
            .cloned()
            .unwrap_or_else(|| state.fallback.clone());
        (state.delay, response)
    };

    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };

    let mut state = state.lock();
    state.in_flight -= 1;
    state.received.push(ReceivedCommand {
        body,
        authorization: header("authorization"),
        content_type: header("content-type"),
        started,
        finished: Instant::now(),
    });

    response
}

/// Response that promises 100 body bytes and delivers 11
const TRUNCATED_RESPONSE: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nAPI.STATUS=";

/// A broken device: it reads the whole command, answers with a status line
/// and headers, then closes the connection before the body is complete
pub struct TruncatingDevice {
    pub addr: SocketAddr,
    handle: tokio::task::JoinHandle<()>,
}

impl TruncatingDevice {
    pub async fn start() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let _ = truncate_response(stream).await;
                });
            }
        });

        Ok(Self { addr, handle })
    }

    /// Address to hand to the transport (`127.0.0.1:<port>`)
    pub fn address(&self) -> String {
        self.addr.to_string()
    }
}

impl Drop for TruncatingDevice {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn truncate_response(mut stream: TcpStream) -> std::io::Result<()> {
    // Drain the full request first so closing sends FIN rather than RST
    let mut request = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];
    loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(());
        }
        request.extend_from_slice(&chunk[..n]);

        if let Some(head_len) = header_end(&request) {
            if request.len() >= head_len + content_length(&request[..head_len]) {
                break;
            }
        }
    }

    stream.write_all(TRUNCATED_RESPONSE).await?;
    stream.shutdown().await
}

/// Length of the request head including the blank line
fn header_end(request: &[u8]) -> Option<usize> {
    request
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| pos + 4)
}

fn content_length(head: &[u8]) -> usize {
    String::from_utf8_lossy(head)
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            if name.trim().eq_ignore_ascii_case("content-length") {
                value.trim().parse().ok()
            } else {
                None
            }
        })
        .unwrap_or(0)
}

/// A test server for an arbitrary router that shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve `router` on an ephemeral local port
    pub async fn start(router: Router) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Base URL of the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
