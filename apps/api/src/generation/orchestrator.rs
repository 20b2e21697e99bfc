//! Generation Orchestrator: turns an answer set into recommendations and a routine.
//!
//! Each target runs independently:
//!   render prompt → call generator (with timeout) → parse → on any failure, fallback.
//! Neither target's outcome affects the other's prompt or fallback. Failures are
//! recovered here and only surface as `ResultSource::Fallback`.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::generation::fallback::{fallback_recommendations, fallback_routine};
use crate::generation::parser::{parse_recommendations, parse_routine};
use crate::generation::prompts::{
    build_recommendations_prompt, build_routine_prompt, system_prompt, RECOMMENDATIONS_SYSTEM,
    ROUTINE_SYSTEM,
};
use crate::history::routine_slot::RoutineSlot;
use crate::llm_client::{LlmError, TextGenerator};
use crate::models::answers::AnswerSet;
use crate::models::recommendation::RecommendationItem;
use crate::models::routine::Routine;

/// Where a result came from. Diagnostic only; both are valid results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Collaborator,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct Generated<T> {
    pub value: T,
    pub source: ResultSource,
}

impl<T> Generated<T> {
    fn collaborator(value: T) -> Self {
        Self {
            value,
            source: ResultSource::Collaborator,
        }
    }

    fn fallback(value: T) -> Self {
        Self {
            value,
            source: ResultSource::Fallback,
        }
    }
}

pub struct GenerationOrchestrator {
    generator: Arc<dyn TextGenerator>,
    routine_slot: RoutineSlot,
    timeout: Duration,
}

impl GenerationOrchestrator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        routine_slot: RoutineSlot,
        timeout: Duration,
    ) -> Self {
        Self {
            generator,
            routine_slot,
            timeout,
        }
    }

    /// Calls the generator, treating an elapsed timeout as a collaborator error.
    async fn request(&self, prompt: &str, system: &str) -> Result<String, LlmError> {
        tokio::time::timeout(self.timeout, self.generator.generate(prompt, system))
            .await
            .map_err(|_| LlmError::Timeout(self.timeout))?
    }

    pub async fn generate_recommendations(
        &self,
        answers: &AnswerSet,
    ) -> Generated<Vec<RecommendationItem>> {
        let prompt = build_recommendations_prompt(answers);
        let system = system_prompt(RECOMMENDATIONS_SYSTEM);

        let text = match self.request(&prompt, &system).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Recommendation generation failed, using fallback: {e}");
                return Generated::fallback(fallback_recommendations(answers));
            }
        };

        match parse_recommendations(&text) {
            Ok(items) => {
                info!("Generated {} recommendations", items.len());
                Generated::collaborator(items)
            }
            Err(e) => {
                warn!("Recommendation response rejected, using fallback: {e}");
                Generated::fallback(fallback_recommendations(answers))
            }
        }
    }

    /// Generates a routine and caches it as the active routine, whatever its source.
    pub async fn generate_routine(&self, answers: &AnswerSet) -> Generated<Routine> {
        let prompt = build_routine_prompt(answers);
        let system = system_prompt(ROUTINE_SYSTEM);

        let generated = match self.request(&prompt, &system).await {
            Ok(text) => match parse_routine(&text) {
                Ok(routine) => {
                    info!(
                        "Generated routine with {} morning / {} evening steps",
                        routine.morning_routine.len(),
                        routine.evening_routine.len()
                    );
                    Generated::collaborator(routine)
                }
                Err(e) => {
                    warn!("Routine response rejected, using fallback: {e}");
                    Generated::fallback(fallback_routine(answers))
                }
            },
            Err(e) => {
                warn!("Routine generation failed, using fallback: {e}");
                Generated::fallback(fallback_routine(answers))
            }
        };

        if let Err(e) = self.routine_slot.set(&generated.value).await {
            warn!("Failed to cache active routine: {e}");
        }

        generated
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::history::store::MemoryKvStore;
    use crate::models::answers::AnswerValue;

    fn build(generator: ScriptedGenerator) -> (GenerationOrchestrator, RoutineSlot) {
        let slot = RoutineSlot::new(Arc::new(MemoryKvStore::new()));
        (
            GenerationOrchestrator::new(Arc::new(generator), slot.clone(), Duration::from_secs(5)),
            slot,
        )
    }

    fn oily() -> AnswerSet {
        let mut answers = AnswerSet::new();
        answers.insert("skinType".into(), AnswerValue::Single("Oily".into()));
        answers.insert("budget".into(), AnswerValue::Single("Under $25".into()));
        answers
    }

    #[tokio::test]
    async fn test_valid_responses_are_used() {
        let (orchestrator, _) = build(
            ScriptedGenerator::default()
                .with_recommendations(VALID_RECOMMENDATIONS)
                .with_routine(VALID_ROUTINE),
        );

        let recommendations = orchestrator.generate_recommendations(&oily()).await;
        assert_eq!(recommendations.source, ResultSource::Collaborator);
        assert_eq!(recommendations.value.len(), 5);
        assert_eq!(recommendations.value[0].brand, "La Roche-Posay");

        let routine = orchestrator.generate_routine(&oily()).await;
        assert_eq!(routine.source, ResultSource::Collaborator);
        assert_eq!(routine.value.morning_routine.len(), 2);
    }

    #[tokio::test]
    async fn test_collaborator_failure_falls_back() {
        let (orchestrator, _) = build(ScriptedGenerator::failing());

        let recommendations = orchestrator.generate_recommendations(&oily()).await;
        assert_eq!(recommendations.source, ResultSource::Fallback);
        assert_eq!(recommendations.value, fallback_recommendations(&oily()));

        let routine = orchestrator.generate_routine(&oily()).await;
        assert_eq!(routine.source, ResultSource::Fallback);
        assert_eq!(routine.value, fallback_routine(&oily()));
    }

    #[tokio::test]
    async fn test_unparseable_response_falls_back() {
        let (orchestrator, _) = build(
            ScriptedGenerator::default()
                .with_recommendations("I'm sorry, I can't help with that.")
                .with_routine(r#"{"summary": "missing steps"}"#),
        );

        let recommendations = orchestrator.generate_recommendations(&oily()).await;
        assert_eq!(recommendations.source, ResultSource::Fallback);
        assert_eq!(recommendations.value.len(), 5);

        let routine = orchestrator.generate_routine(&oily()).await;
        assert_eq!(routine.source, ResultSource::Fallback);
        assert_eq!(routine.value.morning_routine.len(), 4);
    }

    #[tokio::test]
    async fn test_targets_fail_independently() {
        let (orchestrator, _) =
            build(ScriptedGenerator::default().with_routine(VALID_ROUTINE));

        let recommendations = orchestrator.generate_recommendations(&oily()).await;
        let routine = orchestrator.generate_routine(&oily()).await;
        assert_eq!(recommendations.source, ResultSource::Fallback);
        assert_eq!(routine.source, ResultSource::Collaborator);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_collaborator_times_out_to_fallback() {
        let generator = ScriptedGenerator::default()
            .with_recommendations(VALID_RECOMMENDATIONS)
            .with_delay(Duration::from_secs(30));
        let (orchestrator, _) = build(generator);

        let recommendations = orchestrator.generate_recommendations(&oily()).await;
        assert_eq!(recommendations.source, ResultSource::Fallback);
    }

    #[tokio::test]
    async fn test_routine_is_cached_from_either_source() {
        let (orchestrator, slot) = build(ScriptedGenerator::failing());
        let routine = orchestrator.generate_routine(&oily()).await;
        assert_eq!(slot.get().await, Some(routine.value));

        let (orchestrator, slot) =
            build(ScriptedGenerator::default().with_routine(VALID_ROUTINE));
        let routine = orchestrator.generate_routine(&oily()).await;
        assert_eq!(routine.source, ResultSource::Collaborator);
        assert_eq!(slot.get().await, Some(routine.value));
    }

    #[test]
    fn test_source_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ResultSource::Fallback).unwrap(),
            "fallback"
        );
        assert_eq!(
            serde_json::to_value(ResultSource::Collaborator).unwrap(),
            "collaborator"
        );
    }
}
