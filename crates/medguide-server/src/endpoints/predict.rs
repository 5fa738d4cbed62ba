//! `POST /predict`: symptom list in, diagnosis out.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use medguide_core::{Candidate, PredictRequest, PredictResponse};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PredictParams {
    /// Also return the `top` most likely diagnoses.
    pub top: Option<usize>,
}

pub async fn predict(
    State(state): State<AppState>,
    query: Result<Query<PredictParams>, QueryRejection>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, ApiError> {
    let Query(params) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let (prediction, candidates) = match params.top {
        Some(k) if k > 0 => {
            let (best, ranked) = state.pipeline.predict_ranked(&req.symptoms, k)?;
            let candidates = ranked
                .into_iter()
                .map(|p| Candidate {
                    label: p.label,
                    probability: p.confidence,
                })
                .collect();
            (best, Some(candidates))
        }
        _ => (state.pipeline.predict(&req.symptoms)?, None),
    };

    Ok(Json(PredictResponse {
        prediction: prediction.label,
        confidence: prediction.confidence,
        candidates,
    }))
}
