//! Request timing and logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;

/// Processing time header name. Value is in seconds.
pub(crate) const PROCESS_TIME_HEADER: &str = "x-process-time";

/// Log every request and add its processing time to the response.
pub(crate) async fn timing_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let mut response = next.run(request).await;

    let elapsed = start.elapsed().as_secs_f64();
    if let Ok(value) = HeaderValue::from_str(&format!("{elapsed:.6}")) {
        response.headers_mut().insert(PROCESS_TIME_HEADER, value);
    }

    let status = response.status();
    let duration_ms = format!("{:.3}", elapsed * 1000.0);
    if status.is_server_error() {
        tracing::error!(method = %method, path = %path, status = %status, duration_ms = %duration_ms, "Server error");
    } else if status.is_client_error() {
        tracing::warn!(method = %method, path = %path, status = %status, duration_ms = %duration_ms, "Client error");
    } else {
        tracing::info!(method = %method, path = %path, status = %status, duration_ms = %duration_ms, "Request completed");
    }

    response
}
