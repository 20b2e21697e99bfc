//! Fallback Synthesizer: deterministic recommendations and routine built from a
//! fixed template, used whenever generation or parsing fails.
//!
//! Total over every answer set: the only inputs are `skinType` (default "Normal")
//! and `budget` (default "Under $25"), so an empty answer set still yields a full result.

use crate::models::answers::{answer_or, AnswerSet};
use crate::models::recommendation::{Category, RecommendationItem};
use crate::models::routine::{DietTip, DietaryPlan, FoodItem, Routine, RoutineStep};

pub const DEFAULT_SKIN_TYPE: &str = "Normal";
pub const DEFAULT_BUDGET: &str = "Under $25";

const FOODS: [(&str, &str); 6] = [
    (
        "Blueberries",
        "Rich in antioxidants that protect against free radical damage",
    ),
    (
        "Salmon",
        "Omega-3 fatty acids reduce inflammation and support skin barrier",
    ),
    (
        "Avocado",
        "Healthy fats and Vitamin E for skin moisture and protection",
    ),
    (
        "Sweet Potatoes",
        "Beta-carotene converts to Vitamin A for skin cell renewal",
    ),
    ("Green Tea", "Polyphenols provide anti-inflammatory benefits"),
    (
        "Walnuts",
        "Zinc and Vitamin E support skin healing and protection",
    ),
];

const TIPS: [(&str, &str); 4] = [
    (
        "Stay Hydrated",
        "Drink 8-10 glasses of water daily for optimal skin hydration",
    ),
    (
        "Limit Sugar",
        "Reduce processed sugars to prevent inflammation and breakouts",
    ),
    (
        "Eat the Rainbow",
        "Include colorful fruits and vegetables for diverse nutrients",
    ),
    (
        "Healthy Fats",
        "Include omega-3 rich foods to support your skin barrier function",
    ),
];

fn skin_type(answers: &AnswerSet) -> String {
    answer_or(answers, "skinType", DEFAULT_SKIN_TYPE)
}

fn step(step_type: &str, product: impl Into<String>, description: impl Into<String>) -> RoutineStep {
    RoutineStep {
        step_type: step_type.to_string(),
        product: product.into(),
        description: description.into(),
    }
}

fn item(
    brand: &str,
    product: impl Into<String>,
    description: impl Into<String>,
    category: Category,
) -> RecommendationItem {
    RecommendationItem {
        brand: brand.to_string(),
        product: product.into(),
        description: description.into(),
        category,
    }
}

/// Five template products parameterized by skin type and budget.
pub fn fallback_recommendations(answers: &AnswerSet) -> Vec<RecommendationItem> {
    let skin_type = skin_type(answers);
    let skin_lower = skin_type.to_lowercase();
    let budget = answer_or(answers, "budget", DEFAULT_BUDGET);

    vec![
        item(
            "CeraVe",
            format!("{skin_type} Skin Cleanser"),
            format!("Perfect gentle cleanser for {skin_lower} skin type, suitable for daily use."),
            Category::Skincare,
        ),
        item(
            "The Ordinary",
            "Niacinamide 10% + Zinc 1%",
            "Helps reduce appearance of blemishes and congestion, great for most skin types.",
            Category::Skincare,
        ),
        item(
            "Maybelline",
            "Fit Me Foundation",
            format!("Affordable foundation option within your {budget} budget range."),
            Category::Makeup,
        ),
        item(
            "Neutrogena",
            "Hydrating Moisturizer",
            "Lightweight daily moisturizer suitable for your skincare routine.",
            Category::Skincare,
        ),
        item(
            "L'Oréal",
            "Mascara Voluminous",
            "Classic mascara for everyday wear, beginner-friendly application.",
            Category::Makeup,
        ),
    ]
}

/// Four morning steps, three evening steps, six foods and four tips.
pub fn fallback_routine(answers: &AnswerSet) -> Routine {
    let skin_type = skin_type(answers);
    let skin_lower = skin_type.to_lowercase();
    let cleanser = format!("CeraVe {skin_type} Skin Cleanser");

    Routine {
        summary: format!(
            "Based on your {skin_lower} skin type, we've created a gentle routine focused on \
             maintaining healthy skin balance and addressing your specific concerns."
        ),
        morning_routine: vec![
            step(
                "Cleanser",
                cleanser.clone(),
                format!(
                    "Gentle cleanser perfect for {skin_lower} skin, removes impurities without \
                     stripping natural oils."
                ),
            ),
            step(
                "Serum",
                "The Ordinary Hyaluronic Acid 2% + B5",
                "Hydrating serum that plumps skin and provides long-lasting moisture.",
            ),
            step(
                "Moisturizer",
                "Neutrogena Hydro Boost",
                "Lightweight gel moisturizer with hyaluronic acid for all-day hydration.",
            ),
            step(
                "Sunscreen",
                "EltaMD UV Clear SPF 46",
                "Broad-spectrum protection that won't clog pores or leave white residue.",
            ),
        ],
        evening_routine: vec![
            step(
                "Cleanser",
                cleanser,
                "Same gentle cleanser to remove makeup and daily buildup.",
            ),
            step(
                "Treatment",
                "The Ordinary Niacinamide 10% + Zinc 1%",
                "Reduces appearance of blemishes and regulates oil production.",
            ),
            step(
                "Moisturizer",
                "Olay Regenerist Night Recovery Cream",
                "Rich night cream that repairs and regenerates skin overnight.",
            ),
        ],
        dietary_plan: DietaryPlan {
            title: "Glow-Boosting Diet Plan".to_string(),
            description:
                "Foods rich in antioxidants and nutrients to support healthy, radiant skin."
                    .to_string(),
            foods: FOODS
                .iter()
                .map(|(name, benefit)| FoodItem {
                    name: name.to_string(),
                    benefit: benefit.to_string(),
                })
                .collect(),
            tips: TIPS
                .iter()
                .map(|(title, description)| DietTip {
                    title: title.to_string(),
                    description: description.to_string(),
                })
                .collect(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::answers::AnswerValue;

    fn oily_answers() -> AnswerSet {
        let mut answers = AnswerSet::new();
        answers.insert("skinType".into(), AnswerValue::Single("Oily".into()));
        answers.insert("budget".into(), AnswerValue::Single("$50-$100".into()));
        answers
    }

    #[test]
    fn test_empty_answers_produce_full_shapes() {
        let answers = AnswerSet::new();
        let routine = fallback_routine(&answers);
        assert_eq!(routine.morning_routine.len(), 4);
        assert_eq!(routine.evening_routine.len(), 3);
        assert_eq!(routine.dietary_plan.foods.len(), 6);
        assert_eq!(routine.dietary_plan.tips.len(), 4);
        assert_eq!(fallback_recommendations(&answers).len(), 5);
    }

    #[test]
    fn test_empty_answers_use_neutral_defaults() {
        let answers = AnswerSet::new();
        let recommendations = fallback_recommendations(&answers);
        assert_eq!(recommendations[0].product, "Normal Skin Cleanser");
        assert!(recommendations[2].description.contains("Under $25"));
        assert!(fallback_routine(&answers).summary.contains("normal skin type"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let answers = oily_answers();
        let first = serde_json::to_string(&(
            fallback_routine(&answers),
            fallback_recommendations(&answers),
        ))
        .unwrap();
        let second = serde_json::to_string(&(
            fallback_routine(&answers),
            fallback_recommendations(&answers),
        ))
        .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_templates_reference_skin_type_and_budget() {
        let answers = oily_answers();
        let routine = fallback_routine(&answers);
        assert_eq!(routine.morning_routine[0].product, "CeraVe Oily Skin Cleanser");
        assert_eq!(routine.evening_routine[0].product, "CeraVe Oily Skin Cleanser");
        assert!(routine.summary.contains("oily skin type"));

        let recommendations = fallback_recommendations(&answers);
        assert_eq!(recommendations[0].product, "Oily Skin Cleanser");
        assert!(recommendations[2].description.contains("$50-$100"));
        assert_eq!(recommendations[2].category, Category::Makeup);
    }

    #[test]
    fn test_unrelated_answers_do_not_change_output() {
        let mut answers = oily_answers();
        let before = fallback_recommendations(&answers);
        answers.insert(
            "skinConcerns".into(),
            AnswerValue::Multi(vec!["Fine Lines & Wrinkles".into()]),
        );
        assert_eq!(fallback_recommendations(&answers), before);
    }
}
