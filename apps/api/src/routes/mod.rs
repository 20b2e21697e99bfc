pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::history::handlers as history;
use crate::quiz::handlers as quiz;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Quiz flow
        .route("/api/v1/quiz/questions", get(quiz::handle_list_questions))
        .route("/api/v1/quiz/sessions", post(quiz::handle_start_quiz))
        .route("/api/v1/quiz/sessions/:id", get(quiz::handle_get_quiz))
        .route("/api/v1/quiz/sessions/:id/select", post(quiz::handle_select))
        .route("/api/v1/quiz/sessions/:id/advance", post(quiz::handle_advance))
        .route("/api/v1/quiz/sessions/:id/back", post(quiz::handle_back))
        // Generation for answer sets collected elsewhere
        .route("/api/v1/quiz/complete", post(generation::handle_complete_quiz))
        // History
        .route("/api/v1/history/:user_id", get(history::handle_get_history))
        .route(
            "/api/v1/history/:user_id/summaries",
            get(history::handle_get_summaries),
        )
        .route(
            "/api/v1/history/:user_id/entries/:entry_id",
            get(history::handle_get_entry),
        )
        .route(
            "/api/v1/history/:user_id/entries/:entry_id/activate",
            post(history::handle_activate_entry),
        )
        // Active routine
        .route(
            "/api/v1/routine",
            get(history::handle_get_routine).delete(history::handle_reset_routine),
        )
        .with_state(state)
}
