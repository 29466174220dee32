//! Request logging middleware

use std::time::{Duration, Instant};

use axum::{extract::Request, middleware::Next, response::Response};

/// Requests slower than this are logged as warnings
const SLOW_REQUEST: Duration = Duration::from_millis(500);

/// Request logging middleware
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    tracing::debug!("Request: {} {}", method, uri);

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();

    if duration > SLOW_REQUEST {
        tracing::warn!("Slow request: {} {} took {:?}", method, uri, duration);
    }

    tracing::info!(
        "Response: {} {} - {} in {}ms",
        method,
        uri,
        response.status(),
        duration.as_millis()
    );

    response
}
