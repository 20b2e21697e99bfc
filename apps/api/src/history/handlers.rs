use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::models::history::{HistorySummary, QuizHistoryEntry};
use crate::models::routine::Routine;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HistoryResponse {
    pub history: Vec<QuizHistoryEntry>,
}

#[derive(Serialize)]
pub struct SummariesResponse {
    pub summaries: Vec<HistorySummary>,
}

#[derive(Serialize)]
pub struct ActiveRoutineResponse {
    pub routine: Option<Routine>,
}

/// GET /api/v1/history/:user_id
pub async fn handle_get_history(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<HistoryResponse> {
    Json(HistoryResponse {
        history: state.history.get(&user_id).await,
    })
}

/// GET /api/v1/history/:user_id/summaries
pub async fn handle_get_summaries(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<SummariesResponse> {
    Json(SummariesResponse {
        summaries: state.history.summaries(&user_id).await,
    })
}

/// GET /api/v1/history/:user_id/entries/:entry_id
pub async fn handle_get_entry(
    State(state): State<AppState>,
    Path((user_id, entry_id)): Path<(String, String)>,
) -> Result<Json<QuizHistoryEntry>, AppError> {
    state
        .history
        .get_entry(&user_id, &entry_id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("History entry {entry_id} not found")))
}

/// POST /api/v1/history/:user_id/entries/:entry_id/activate
///
/// Reuses a past session's routine as the active routine.
pub async fn handle_activate_entry(
    State(state): State<AppState>,
    Path((user_id, entry_id)): Path<(String, String)>,
) -> Result<Json<ActiveRoutineResponse>, AppError> {
    let entry = state
        .history
        .get_entry(&user_id, &entry_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("History entry {entry_id} not found")))?;

    state
        .history
        .set_active_routine(&user_id, &entry.routine)
        .await?;

    Ok(Json(ActiveRoutineResponse {
        routine: Some(entry.routine),
    }))
}

/// GET /api/v1/routine
pub async fn handle_get_routine(State(state): State<AppState>) -> Json<ActiveRoutineResponse> {
    Json(ActiveRoutineResponse {
        routine: state.history.active_routine().await,
    })
}

/// DELETE /api/v1/routine
pub async fn handle_reset_routine(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.history.clear_active_routine().await?;
    Ok(StatusCode::NO_CONTENT)
}
