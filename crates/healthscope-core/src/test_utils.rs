//! Test utilities for healthscope-core
//!
//! Provides a mock gate endpoint with one route per response shape the
//! launch probe has to classify.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::sync::oneshot;

/// Delay used by the `/slow` route
pub const SLOW_RESPONSE_DELAY: Duration = Duration::from_secs(3);

/// Headers of every request the mock server received
#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<HeaderMap>>>,
}

/// Mock gate endpoint for testing
///
/// Routes:
/// - `/empty` - 200 with an empty body (`Content-Length: 0`)
/// - `/offer` - 200 with an HTML body
/// - `/redirect` - 301 to `/offer`
/// - `/missing` - 404
/// - `/error` - 500
/// - `/slow` - 200 with a body after [`SLOW_RESPONSE_DELAY`]
pub struct MockGateServer {
    addr: SocketAddr,
    recorded: Recorded,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockGateServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        let recorded = Recorded::default();
        let app = Router::new()
            .route("/empty", get(handle_empty))
            .route("/offer", get(handle_offer))
            .route("/redirect", get(handle_redirect))
            .route("/missing", get(handle_missing))
            .route("/error", get(handle_error))
            .route("/slow", get(handle_slow))
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            recorded,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Full URL for one of the routes, e.g. `endpoint("/offer")`
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.url(), path)
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.recorded.requests.lock().unwrap().len()
    }

    /// Value of `name` on the most recent request
    pub fn last_header(&self, name: &str) -> Option<String> {
        self.recorded
            .requests
            .lock()
            .unwrap()
            .last()
            .and_then(|h| h.get(name))
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockGateServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn record(state: &Recorded, headers: HeaderMap) {
    state.requests.lock().unwrap().push(headers);
}

async fn handle_empty(State(state): State<Recorded>, headers: HeaderMap) -> StatusCode {
    record(&state, headers);
    StatusCode::OK
}

async fn handle_offer(State(state): State<Recorded>, headers: HeaderMap) -> Response {
    record(&state, headers);
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html")],
        "<html><body>offer</body></html>",
    )
        .into_response()
}

async fn handle_redirect(State(state): State<Recorded>, headers: HeaderMap) -> Response {
    record(&state, headers);
    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, "/offer")]).into_response()
}

async fn handle_missing(State(state): State<Recorded>, headers: HeaderMap) -> Response {
    record(&state, headers);
    (StatusCode::NOT_FOUND, "not found").into_response()
}

async fn handle_error(State(state): State<Recorded>, headers: HeaderMap) -> Response {
    record(&state, headers);
    (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response()
}

async fn handle_slow(State(state): State<Recorded>, headers: HeaderMap) -> Response {
    record(&state, headers);
    tokio::time::sleep(SLOW_RESPONSE_DELAY).await;
    (StatusCode::OK, "late offer").into_response()
}
