// All prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::models::answers::AnswerSet;

/// System prompt for product recommendations: enforces a JSON array.
pub const RECOMMENDATIONS_SYSTEM: &str = "You are a beauty expert recommending products \
    from a customer's quiz answers. Your entire response is a single JSON array.";

/// Recommendations prompt template. Replace `{grounding_instruction}` and `{answers}`.
pub const RECOMMENDATIONS_PROMPT_TEMPLATE: &str = r#"Based on the quiz answers below, recommend exactly 5 beauty products.

{grounding_instruction}

IMPORTANT: Respond ONLY with a valid JSON array. No other text before or after.

Quiz Answers:
{answers}

Format your response as a JSON array with this exact structure:
[
  {
    "brand": "Brand Name",
    "product": "Product Name",
    "description": "Brief description explaining why this product suits their needs",
    "category": "Skincare"
  }
]

"category" must be exactly one of "Skincare", "Makeup" or "Haircare".
Provide 5 realistic products that match their skin type, concerns, budget, and preferences."#;

/// System prompt for routine generation: enforces a JSON object.
pub const ROUTINE_SYSTEM: &str = "You are a skincare expert building a personalized \
    skincare routine and dietary plan. Your entire response is a single JSON object.";

/// Routine prompt template. Replace `{grounding_instruction}` and `{answers}`.
pub const ROUTINE_PROMPT_TEMPLATE: &str = r#"Based on the quiz answers below, create a personalized skincare routine and dietary plan.

{grounding_instruction}

IMPORTANT: Respond ONLY with a valid JSON object. No other text before or after.

Quiz Answers:
{answers}

Format your response as a JSON object with this exact structure:
{
  "summary": "Brief personalized summary of their skin needs and routine focus",
  "morningRoutine": [
    {
      "type": "Cleanser/Serum/Moisturizer/Sunscreen",
      "product": "Specific product recommendation",
      "description": "Why this product suits their needs"
    }
  ],
  "eveningRoutine": [
    {
      "type": "Cleanser/Treatment/Moisturizer",
      "product": "Specific product recommendation",
      "description": "Why this product suits their needs"
    }
  ],
  "dietaryPlan": {
    "title": "Diet plan name based on their skin goals",
    "description": "Brief description of the dietary approach",
    "foods": [
      {
        "name": "Food name",
        "benefit": "How it helps their skin"
      }
    ],
    "tips": [
      {
        "title": "Tip title",
        "description": "Specific advice for their skin type"
      }
    ]
  }
}

Create a routine with 3-4 morning steps and 3-4 evening steps. Include 5-6 food recommendations and 3-4 tips."#;

/// One `key: value` line per answer; multi-select values are comma-joined.
pub fn render_answers(answers: &AnswerSet) -> String {
    answers
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_recommendations_prompt(answers: &AnswerSet) -> String {
    RECOMMENDATIONS_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{answers}", &render_answers(answers))
}

pub fn build_routine_prompt(answers: &AnswerSet) -> String {
    ROUTINE_PROMPT_TEMPLATE
        .replace("{grounding_instruction}", GROUNDING_INSTRUCTION)
        .replace("{answers}", &render_answers(answers))
}

/// Role prompt followed by the shared JSON-only rules.
pub fn system_prompt(role: &str) -> String {
    format!("{role} {JSON_ONLY_SYSTEM}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answers::AnswerValue;

    fn answers() -> AnswerSet {
        let mut answers = AnswerSet::new();
        answers.insert("skinType".into(), AnswerValue::Single("Dry".into()));
        answers.insert(
            "skinConcerns".into(),
            AnswerValue::Multi(vec!["Redness & Rosacea".into(), "Enlarged Pores".into()]),
        );
        answers
    }

    #[test]
    fn test_render_answers_one_line_per_question() {
        assert_eq!(
            render_answers(&answers()),
            "skinConcerns: Redness & Rosacea, Enlarged Pores\nskinType: Dry"
        );
    }

    #[test]
    fn test_prompts_embed_answers_and_leave_no_placeholders() {
        for prompt in [
            build_recommendations_prompt(&answers()),
            build_routine_prompt(&answers()),
        ] {
            assert!(prompt.contains("skinType: Dry"));
            assert!(!prompt.contains("{answers}"));
            assert!(!prompt.contains("{grounding_instruction}"));
        }
    }

    #[test]
    fn test_prompt_rendering_is_deterministic() {
        assert_eq!(
            build_routine_prompt(&answers()),
            build_routine_prompt(&answers())
        );
    }

    #[test]
    fn test_system_prompt_appends_json_rules() {
        let system = system_prompt(RECOMMENDATIONS_SYSTEM);
        assert!(system.starts_with(RECOMMENDATIONS_SYSTEM));
        assert!(system.ends_with(JSON_ONLY_SYSTEM));
    }
}
