//! `POST /ask_bot`: forward a question to the chat provider.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use medguide_core::{AskRequest, AskResponse};

use crate::error::ApiError;
use crate::state::AppState;

const EMPTY_QUESTION_REPLY: &str = "Please write a question.";
const MAX_QUESTION_CHARS: usize = 4000;

pub async fn ask(
    State(state): State<AppState>,
    body: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let Json(req) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let question = req.question.trim();
    if question.is_empty() {
        return Ok(Json(AskResponse {
            answer: EMPTY_QUESTION_REPLY.to_string(),
        }));
    }
    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Question too long (max {MAX_QUESTION_CHARS} chars)"
        )));
    }

    let chat = state.chat.as_ref().ok_or(ApiError::ChatDisabled)?;
    let answer = chat.ask(question).await?;
    Ok(Json(AskResponse { answer }))
}
