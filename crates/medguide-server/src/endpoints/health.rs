use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub features: usize,
    pub classes: usize,
    pub started_at: String,
}

/// `GET /health`: liveness plus the loaded model's shape.
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        features: state.pipeline.schema().len(),
        classes: state.pipeline.classes().len(),
        started_at: state.started_at.to_rfc3339(),
    })
}
