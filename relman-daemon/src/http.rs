//! Minimal HTTP surface: liveness and the stored release listing.
//!
//! One request per connection; the response always closes it.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::broadcast;

use relman_store::SnapshotStore;

use crate::error::{io_err, DaemonError};
use crate::health::HealthTracker;

/// Request heads longer than this are rejected.
const MAX_HEAD_BYTES: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Healthz,
    Releases,
    NotFound,
}

impl Route {
    /// Map a request line's method and target to a route. Query strings are
    /// ignored.
    pub fn resolve(method: &str, target: &str) -> Self {
        let path = target.split('?').next().unwrap_or_default();
        match (method, path) {
            ("GET", "/healthz") => Route::Healthz,
            ("GET", "/releases") => Route::Releases,
            _ => Route::NotFound,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn text(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.into(),
        }
    }

    fn json(body: String) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body,
        }
    }

    fn reason(&self) -> &'static str {
        match self.status {
            200 => "OK",
            400 => "Bad Request",
            404 => "Not Found",
            _ => "Internal Server Error",
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.reason(),
            self.content_type,
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}

/// Read-only handles the surface answers from.
#[derive(Clone)]
pub struct HttpState {
    pub health: Arc<HealthTracker>,
    pub store: SnapshotStore,
}

pub async fn respond(route: Route, state: &HttpState) -> HttpResponse {
    match route {
        Route::Healthz if state.health.is_healthy() => HttpResponse::text(200, "ok"),
        Route::Healthz => HttpResponse::text(500, "unhealthy"),
        Route::Releases => {
            let store = state.store.clone();
            let listed = tokio::task::spawn_blocking(move || store.list_keys())
                .await
                .map_err(|err| err.to_string())
                .and_then(|result| result.map_err(|err| err.to_string()));
            match listed {
                Ok(keys) => {
                    let keys: Vec<String> = keys.into_iter().collect();
                    match serde_json::to_string(&keys) {
                        Ok(body) => HttpResponse::json(body),
                        Err(err) => HttpResponse::text(500, err.to_string()),
                    }
                }
                Err(err) => HttpResponse::text(500, err),
            }
        }
        Route::NotFound => HttpResponse::text(404, "not found"),
    }
}

/// Accept connections until shutdown.
pub async fn serve(
    listener: TcpListener,
    state: HttpState,
    mut shutdown_rx: broadcast::Receiver<()>,
) -> Result<(), DaemonError> {
    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => break,
            accepted = listener.accept() => {
                let (stream, peer) = match accepted {
                    Ok(accepted) => accepted,
                    Err(err) => {
                        tracing::warn!(error = %err, "http accept failed");
                        continue;
                    }
                };
                let state = state.clone();
                tokio::spawn(async move {
                    if let Err(err) = handle_client(stream, &state).await {
                        tracing::debug!(peer = %peer, error = %err, "http client error");
                    }
                });
            }
        }
    }
    Ok(())
}

async fn handle_client(stream: TcpStream, state: &HttpState) -> Result<(), DaemonError> {
    let (reader, mut writer) = stream.into_split();
    // One byte past the cap so an oversized head is detectable.
    let mut reader = BufReader::new(reader.take(MAX_HEAD_BYTES as u64 + 1));

    let mut request_line = String::new();
    reader
        .read_line(&mut request_line)
        .await
        .map_err(|e| io_err("http request", e))?;

    // Drain headers; bodies are not supported.
    let mut head_bytes = request_line.len();
    loop {
        let mut line = String::new();
        let n = reader
            .read_line(&mut line)
            .await
            .map_err(|e| io_err("http request", e))?;
        head_bytes += n;
        if n == 0 || line == "\r\n" || line == "\n" || head_bytes > MAX_HEAD_BYTES {
            break;
        }
    }

    let mut parts = request_line.split_whitespace();
    let response = match (parts.next(), parts.next()) {
        (Some(_), Some(_)) if head_bytes > MAX_HEAD_BYTES => {
            HttpResponse::text(400, "request head too large")
        }
        (Some(method), Some(target)) => {
            let route = Route::resolve(method, target);
            tracing::debug!(method = %method, target = %target, ?route, "http request");
            respond(route, state).await
        }
        _ => HttpResponse::text(400, "bad request"),
    };

    writer
        .write_all(&response.to_bytes())
        .await
        .map_err(|e| io_err("http response", e))?;
    writer
        .shutdown()
        .await
        .map_err(|e| io_err("http response", e))?;
    Ok(())
}
