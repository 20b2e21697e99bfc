use std::sync::Arc;
use std::time::Duration;

use crate::generation::orchestrator::GenerationOrchestrator;
use crate::history::routine_slot::RoutineSlot;
use crate::history::store::KvStore;
use crate::history::HistoryStore;
use crate::llm_client::TextGenerator;
use crate::quiz::QuizSessions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<GenerationOrchestrator>,
    pub history: Arc<HistoryStore>,
    pub quiz_sessions: QuizSessions,
}

impl AppState {
    /// Wires the orchestrator and history store around one key-value store, so
    /// both see the same active-routine slot.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        store: Arc<dyn KvStore>,
        generation_timeout: Duration,
    ) -> Self {
        let routine_slot = RoutineSlot::new(store.clone());
        Self {
            orchestrator: Arc::new(GenerationOrchestrator::new(
                generator,
                routine_slot.clone(),
                generation_timeout,
            )),
            history: Arc::new(HistoryStore::new(store, routine_slot)),
            quiz_sessions: QuizSessions::new(),
        }
    }
}
