//! Axum route handlers for the Quiz API.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::pipeline::{spawn_session, SessionOutcome};
use crate::quiz::flow::{FlowError, FlowEvent, FlowSnapshot, QuizFlow};
use crate::quiz::questions::{Question, QUESTIONS};
use crate::quiz::QuizSession;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartQuizRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct StartQuizResponse {
    pub session_id: Uuid,
    pub snapshot: FlowSnapshot,
}

#[derive(Debug, Deserialize)]
pub struct SelectOptionRequest {
    pub option: String,
}

/// Result of one flow step. `outcome` is present only when the step completed the quiz.
#[derive(Debug, Serialize)]
pub struct FlowStepResponse {
    pub event: FlowEvent,
    pub snapshot: FlowSnapshot,
    pub outcome: Option<SessionOutcome>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/quiz/questions
pub async fn handle_list_questions() -> Json<&'static [Question]> {
    Json(QUESTIONS)
}

/// POST /api/v1/quiz/sessions
pub async fn handle_start_quiz(
    State(state): State<AppState>,
    Json(request): Json<StartQuizRequest>,
) -> Result<Json<StartQuizResponse>, AppError> {
    if request.user_id.trim().is_empty() {
        return Err(AppError::Validation("user_id cannot be empty".to_string()));
    }

    let flow = QuizFlow::new(QUESTIONS)?;
    let snapshot = flow.snapshot();
    let session_id = state.quiz_sessions.insert(QuizSession {
        user_id: request.user_id,
        flow,
    });

    Ok(Json(StartQuizResponse {
        session_id,
        snapshot,
    }))
}

/// GET /api/v1/quiz/sessions/:id
pub async fn handle_get_quiz(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<FlowSnapshot>, AppError> {
    state
        .quiz_sessions
        .with_session(session_id, |session| session.flow.snapshot())
        .map(Json)
        .ok_or_else(|| session_not_found(session_id))
}

/// POST /api/v1/quiz/sessions/:id/select
pub async fn handle_select(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<SelectOptionRequest>,
) -> Result<Json<FlowStepResponse>, AppError> {
    step(&state, session_id, |flow| flow.select_option(&request.option)).await
}

/// POST /api/v1/quiz/sessions/:id/advance
pub async fn handle_advance(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<FlowStepResponse>, AppError> {
    step(&state, session_id, QuizFlow::advance).await
}

/// POST /api/v1/quiz/sessions/:id/back
pub async fn handle_back(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<FlowStepResponse>, AppError> {
    step(&state, session_id, QuizFlow::go_back).await
}

/// Applies one flow operation. A completing step closes the quiz session and
/// runs generation before responding.
async fn step(
    state: &AppState,
    session_id: Uuid,
    op: impl FnOnce(&mut QuizFlow) -> Result<FlowEvent, FlowError>,
) -> Result<Json<FlowStepResponse>, AppError> {
    let (event, snapshot, user_id) = state
        .quiz_sessions
        .with_session(session_id, |session| {
            op(&mut session.flow)
                .map(|event| (event, session.flow.snapshot(), session.user_id.clone()))
        })
        .ok_or_else(|| session_not_found(session_id))??;

    let outcome = match &event {
        FlowEvent::Completed { answers } => {
            state.quiz_sessions.remove(session_id);
            let outcome = spawn_session(
                state.orchestrator.clone(),
                state.history.clone(),
                user_id,
                answers.clone(),
            )
            .await?;
            Some(outcome)
        }
        _ => None,
    };

    Ok(Json(FlowStepResponse {
        event,
        snapshot,
        outcome,
    }))
}

fn session_not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("Quiz session {session_id} not found"))
}
