//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::generation::pipeline::{spawn_session, SessionOutcome};
use crate::models::answers::AnswerSet;
use crate::quiz::flow::validate_answer_set;
use crate::quiz::questions::QUESTIONS;
use crate::state::AppState;

/// Request body for a quiz answered outside the session API.
#[derive(Debug, Deserialize)]
pub struct CompleteQuizRequest {
    pub user_id: String,
    pub answers: AnswerSet,
}

/// POST /api/v1/quiz/complete
///
/// Runs generation for a finished answer set and records the session in history.
/// Always returns results; `source` on each says whether they came from the fallback.
pub async fn handle_complete_quiz(
    State(state): State<AppState>,
    Json(request): Json<CompleteQuizRequest>,
) -> Result<Json<SessionOutcome>, AppError> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }
    validate_answer_set(QUESTIONS, &request.answers)?;

    let outcome = spawn_session(
        state.orchestrator.clone(),
        state.history.clone(),
        request.user_id,
        request.answers,
    )
    .await?;

    Ok(Json(outcome))
}
