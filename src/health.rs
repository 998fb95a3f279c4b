//! Simple HTTP health and metrics server (synchronous)
//!
//! `/health` answers while the process runs; `/ready` follows the latest
//! periodic store ping; `/metrics` serves the Prometheus text format.

use crate::config::MetricsConfig;
use crate::metrics::Metrics;
use crate::store::Store;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Response produced for one health request
#[derive(Debug, Clone, PartialEq, Eq)]
struct HealthResponse {
    status: u16,
    content_type: &'static str,
    body: String,
}

impl HealthResponse {
    fn new(status: u16, content_type: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    fn status_text(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            405 => "Method Not Allowed",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

/// Health server state
pub struct HealthServer {
    metrics: Arc<Metrics>,
    ready: AtomicBool,
    running: AtomicBool,
}

impl HealthServer {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self {
            metrics,
            ready: AtomicBool::new(false),
            running: AtomicBool::new(true),
        }
    }

    /// Mark whether the store is reachable
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Ping the store once and update readiness; returns the new state
    pub async fn check_store(&self, store: &dyn Store) -> bool {
        let ready = match store.ping().await {
            Ok(()) => true,
            Err(e) => {
                if self.is_ready() {
                    warn!("Store stopped answering ping: {}", e);
                }
                false
            }
        };

        if ready && !self.is_ready() {
            info!("Store is reachable");
        }
        self.set_ready(ready);
        ready
    }

    /// Re-check the store every `interval` until cancelled
    pub async fn watch_store(
        &self,
        store: Arc<dyn Store>,
        interval: Duration,
        cancel_token: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => break,
                _ = ticker.tick() => {
                    self.check_store(store.as_ref()).await;
                }
            }
        }
    }

    /// Start the health server (blocking, run in separate thread)
    pub fn run(self: Arc<Self>, config: &MetricsConfig) -> std::io::Result<()> {
        let listener = TcpListener::bind(&config.listen_addr)?;
        listener.set_nonblocking(true)?;
        info!("Health server listening on {}", config.listen_addr);

        while self.running.load(Ordering::SeqCst) {
            match listener.accept() {
                Ok((stream, _)) => {
                    if let Err(e) = self.handle_connection(stream) {
                        error!("Health connection error: {}", e);
                    }
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    std::thread::sleep(std::time::Duration::from_millis(100));
                }
                Err(e) => {
                    error!("Health server accept error: {}", e);
                }
            }
        }

        info!("Health server stopped");
        Ok(())
    }

    fn handle_connection(&self, mut stream: TcpStream) -> std::io::Result<()> {
        stream.set_nonblocking(false)?;

        let mut request_line = String::new();
        BufReader::new(&stream).read_line(&mut request_line)?;

        let response = self.respond(&request_line);
        let raw = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            response.status,
            response.status_text(),
            response.content_type,
            response.body.len(),
            response.body
        );

        stream.write_all(raw.as_bytes())?;
        stream.flush()
    }

    /// Route a request line such as `GET /ready HTTP/1.1`
    fn respond(&self, request_line: &str) -> HealthResponse {
        let mut parts = request_line.split_whitespace();
        let (Some(method), Some(path)) = (parts.next(), parts.next()) else {
            return HealthResponse::new(400, "text/plain", "Bad Request");
        };

        if method != "GET" {
            return HealthResponse::new(405, "text/plain", "Method Not Allowed");
        }

        match path {
            "/health" | "/healthz" => {
                HealthResponse::new(200, "application/json", r#"{"status":"healthy"}"#)
            }
            "/ready" | "/readyz" if self.is_ready() => {
                HealthResponse::new(200, "application/json", r#"{"status":"ready"}"#)
            }
            "/ready" | "/readyz" => {
                HealthResponse::new(503, "application/json", r#"{"status":"store unavailable"}"#)
            }
            "/metrics" => HealthResponse::new(200, "text/plain; version=0.0.4", self.metrics.gather()),
            _ => HealthResponse::new(404, "text/plain", "Not Found"),
        }
    }
}
