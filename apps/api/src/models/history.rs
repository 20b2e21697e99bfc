use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::answers::{answer_or, AnswerSet};
use crate::models::recommendation::RecommendationItem;
use crate::models::routine::Routine;

/// One completed quiz session. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizHistoryEntry {
    pub id: String,
    pub answers: AnswerSet,
    pub routine: Routine,
    pub recommendations: Vec<RecommendationItem>,
    pub completed_at: DateTime<Utc>,
    pub user_id: String,
}

/// Compact read model for the history list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySummary {
    pub id: String,
    pub completed_at: DateTime<Utc>,
    pub skin_type: String,
    pub skin_concerns: String,
    pub makeup_experience: String,
    pub daily_routine: String,
    pub budget: String,
    pub product_count: usize,
    pub morning_steps: usize,
    pub evening_steps: usize,
}

const NOT_SPECIFIED: &str = "Not specified";

impl From<&QuizHistoryEntry> for HistorySummary {
    fn from(entry: &QuizHistoryEntry) -> Self {
        let answers = &entry.answers;
        HistorySummary {
            id: entry.id.clone(),
            completed_at: entry.completed_at,
            skin_type: answer_or(answers, "skinType", NOT_SPECIFIED),
            skin_concerns: answer_or(answers, "skinConcerns", NOT_SPECIFIED),
            makeup_experience: answer_or(answers, "makeupExperience", NOT_SPECIFIED),
            daily_routine: answer_or(answers, "dailyRoutine", NOT_SPECIFIED),
            budget: answer_or(answers, "budget", NOT_SPECIFIED),
            product_count: entry.recommendations.len(),
            morning_steps: entry.routine.morning_routine.len(),
            evening_steps: entry.routine.evening_routine.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answers::AnswerValue;
    use crate::models::routine::DietaryPlan;

    fn entry(answers: AnswerSet) -> QuizHistoryEntry {
        QuizHistoryEntry {
            id: "entry-1".to_string(),
            answers,
            routine: Routine {
                summary: String::new(),
                morning_routine: vec![],
                evening_routine: vec![],
                dietary_plan: DietaryPlan::default(),
            },
            recommendations: vec![],
            completed_at: Utc::now(),
            user_id: "user-1".to_string(),
        }
    }

    #[test]
    fn test_entry_round_trips_with_camel_case_fields() {
        let json = serde_json::to_value(entry(AnswerSet::new())).unwrap();
        assert!(json.get("completedAt").is_some());
        assert_eq!(json["userId"], "user-1");
        let back: QuizHistoryEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back.id, "entry-1");
    }

    #[test]
    fn test_summary_fills_missing_answers_with_not_specified() {
        let mut answers = AnswerSet::new();
        answers.insert("skinType".into(), AnswerValue::Single("Combination".into()));
        answers.insert(
            "skinConcerns".into(),
            AnswerValue::Multi(vec!["Enlarged Pores".into(), "Dullness & Uneven Texture".into()]),
        );

        let summary = HistorySummary::from(&entry(answers));
        assert_eq!(summary.skin_type, "Combination");
        assert_eq!(
            summary.skin_concerns,
            "Enlarged Pores, Dullness & Uneven Texture"
        );
        assert_eq!(summary.budget, "Not specified");
        assert_eq!(summary.makeup_experience, "Not specified");
    }
}
