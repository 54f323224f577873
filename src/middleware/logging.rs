//! Logging middleware
//!
//! Records one line per request with its outcome and latency, on top of the
//! spans `TraceLayer` opens.

use std::time::{Duration, Instant};

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};

/// Requests slower than this are flagged
const SLOW_REQUEST: Duration = Duration::from_secs(1);

pub async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(req).await;

    let elapsed = started.elapsed();
    let status = response.status();
    let duration_ms = elapsed.as_millis() as u64;

    match classify(status) {
        Outcome::ServerError => error!(method = %method, path = %path, status = status.as_u16(), duration_ms, "Request failed"),
        Outcome::ClientError => warn!(method = %method, path = %path, status = status.as_u16(), duration_ms, "Request rejected"),
        Outcome::Success => info!(method = %method, path = %path, status = status.as_u16(), duration_ms, "Request completed"),
    }

    if elapsed > SLOW_REQUEST {
        warn!(method = %method, path = %path, duration_ms, "Slow request detected");
    }

    response
}

#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Success,
    ClientError,
    ServerError,
}

fn classify(status: StatusCode) -> Outcome {
    if status.is_server_error() {
        Outcome::ServerError
    } else if status.is_client_error() {
        Outcome::ClientError
    } else {
        Outcome::Success
    }
}
