//! Route table for the diagnosis API.

use axum::Router;
use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use axum::routing::{get, post};

use crate::endpoints;
use crate::state::AppState;

/// Build the API router.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/symptoms", get(endpoints::symptoms::list))
        .route("/predict", post(endpoints::predict::predict))
        .route("/ask_bot", post(endpoints::chat::ask))
        .with_state(state)
        .layer(axum::middleware::from_fn(log_access))
}

/// Log method, path, status and latency for every request.
async fn log_access(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = std::time::Instant::now();

    let response = next.run(req).await;

    tracing::info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    response
}
