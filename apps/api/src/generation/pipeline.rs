//! Session pipeline: answers in, routine + recommendations out, history recorded on join.
//!
//! Flow: begin session → attach answers → run both generation branches concurrently →
//!       each branch offers its result to the join → the completing offer records history.

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info};

use crate::generation::orchestrator::{Generated, GenerationOrchestrator};
use crate::history::HistoryStore;
use crate::models::answers::AnswerSet;
use crate::models::recommendation::RecommendationItem;
use crate::models::routine::Routine;

#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub recommendations: Generated<Vec<RecommendationItem>>,
    pub routine: Generated<Routine>,
    /// Id of the history entry this session produced, if it was recorded.
    pub history_entry_id: Option<String>,
}

/// Runs one quiz session for `user_id`. Starting another session for the same
/// user before this one resolves causes this one's results to be left out of history.
pub async fn run_session(
    orchestrator: &GenerationOrchestrator,
    history: &HistoryStore,
    user_id: &str,
    answers: AnswerSet,
) -> SessionOutcome {
    let ticket = history.begin_session(user_id);
    info!(
        "Starting session {} for user {user_id} with {} answers",
        ticket.session_id,
        answers.len()
    );
    history.attach_answers(&ticket, answers.clone()).await;

    let recommendations_branch = async {
        let generated = orchestrator.generate_recommendations(&answers).await;
        let recorded = history
            .offer_recommendations(&ticket, generated.value.clone())
            .await;
        (generated, recorded)
    };

    let routine_branch = async {
        let generated = orchestrator.generate_routine(&answers).await;
        let recorded = history.offer_routine(&ticket, generated.value.clone()).await;
        (generated, recorded)
    };

    let ((recommendations, recorded_a), (routine, recorded_b)) =
        tokio::join!(recommendations_branch, routine_branch);

    let history_entry_id = recorded_a.or(recorded_b).map(|entry| entry.id);
    if history_entry_id.is_none() && !history.is_current(&ticket) {
        debug!(
            "Session {} for user {user_id} was superseded; results not recorded",
            ticket.session_id
        );
    }

    SessionOutcome {
        recommendations,
        routine,
        history_entry_id,
    }
}

/// Runs `run_session` on its own task. Generation and history recording finish
/// even when the caller stops waiting, e.g. after a client disconnect.
pub async fn spawn_session(
    orchestrator: Arc<GenerationOrchestrator>,
    history: Arc<HistoryStore>,
    user_id: String,
    answers: AnswerSet,
) -> anyhow::Result<SessionOutcome> {
    tokio::spawn(async move { run_session(&orchestrator, &history, &user_id, answers).await })
        .await
        .context("session task failed")
}
