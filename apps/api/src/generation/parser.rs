//! Response Parser: turns untrusted generation output into typed values.
//!
//! Pipeline: trim → strip code-fence markers → slice the outermost bracket span →
//! decode JSON → shape-validate into the target type. Any failure yields a single
//! `ParseFailure`; a partially valid response is never returned.
//!
//! Bracket slicing is first-open to last-close and does NOT balance nested brackets.
//! Prose containing a stray `]` after the payload, or two separate JSON values,
//! therefore produces a span that fails to decode. That is a known limitation; the
//! caller falls back.
//!
//! Defaulting rules applied during shape validation:
//!
//! | Target                 | Field                          | Missing / null     |
//! |------------------------|--------------------------------|--------------------|
//! | RecommendationItem     | brand, product                 | reject             |
//! | RecommendationItem     | description                    | ""                 |
//! | RecommendationItem     | category                       | "" (Unspecified)   |
//! | RecommendationItem     | category (unknown label)       | reject             |
//! | Routine                | morningRoutine, eveningRoutine | reject             |
//! | Routine                | summary                        | ""                 |
//! | Routine                | dietaryPlan (and its fields)   | empty              |
//! | RoutineStep            | type, product                  | reject             |
//! | RoutineStep            | description                    | ""                 |

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::models::recommendation::RecommendationItem;
use crate::models::routine::Routine;

const FENCE: &str = "```";

#[derive(Debug, Error)]
pub enum ParseFailure {
    #[error("no JSON {0} found in response")]
    NoJsonSpan(Shape),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("response has the wrong shape: {0}")]
    Shape(String),
}

/// The JSON value a response is expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Array,
    Object,
}

impl Shape {
    fn delimiters(self) -> (char, char) {
        match self {
            Shape::Array => ('[', ']'),
            Shape::Object => ('{', '}'),
        }
    }
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Array => f.write_str("array"),
            Shape::Object => f.write_str("object"),
        }
    }
}

/// Parses a recommendations response: a JSON array of product objects.
pub fn parse_recommendations(raw: &str) -> Result<Vec<RecommendationItem>, ParseFailure> {
    let items: Vec<RecommendationItem> = parse_shaped(raw, Shape::Array)?;
    if items.is_empty() {
        return Err(ParseFailure::Shape(
            "recommendation array is empty".to_string(),
        ));
    }
    Ok(items)
}

/// Parses a routine response: a JSON object with morning and evening steps.
pub fn parse_routine(raw: &str) -> Result<Routine, ParseFailure> {
    parse_shaped(raw, Shape::Object)
}

fn parse_shaped<T: DeserializeOwned>(raw: &str, shape: Shape) -> Result<T, ParseFailure> {
    let cleaned = strip_code_fences(raw.trim());
    let span = outermost_span(&cleaned, shape).ok_or(ParseFailure::NoJsonSpan(shape))?;
    let value: Value = serde_json::from_str(span).map_err(ParseFailure::InvalidJson)?;

    let shape_matches = match shape {
        Shape::Array => value.is_array(),
        Shape::Object => value.is_object(),
    };
    if !shape_matches {
        return Err(ParseFailure::Shape(format!("expected a JSON {shape}")));
    }

    serde_json::from_value(value).map_err(|e| ParseFailure::Shape(e.to_string()))
}

/// Removes triple-backtick markers, with or without a language tag, keeping
/// the fenced content.
pub fn strip_code_fences(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find(FENCE) {
        out.push_str(&rest[..pos]);
        rest = &rest[pos + FENCE.len()..];

        // A language tag only counts when it runs to the end of the line.
        let tag_len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(rest.len());
        let after_tag = &rest[tag_len..];
        if after_tag.starts_with('\n') || after_tag.starts_with("\r\n") {
            rest = after_tag;
        }
        rest = rest
            .strip_prefix("\r\n")
            .or_else(|| rest.strip_prefix('\n'))
            .unwrap_or(rest);
    }

    out.push_str(rest);
    out
}

/// First opening delimiter to last closing delimiter, verbatim.
fn outermost_span(text: &str, shape: Shape) -> Option<&str> {
    let (open, close) = shape.delimiters();
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::recommendation::Category;

    #[test]
    fn test_fenced_array_with_prose_parses() {
        let raw = "Here you go:\n```json\n[{\"brand\":\"A\",\"product\":\"B\",\"description\":\"C\",\"category\":\"Skincare\"}]\n```";
        let items = parse_recommendations(raw).unwrap();
        assert_eq!(
            items,
            vec![RecommendationItem {
                brand: "A".to_string(),
                product: "B".to_string(),
                description: "C".to_string(),
                category: Category::Skincare,
            }]
        );
    }

    #[test]
    fn test_text_without_json_is_a_failure() {
        let result = parse_recommendations("no json here");
        assert!(matches!(result, Err(ParseFailure::NoJsonSpan(Shape::Array))));

        let result = parse_routine("no json here");
        assert!(matches!(result, Err(ParseFailure::NoJsonSpan(Shape::Object))));
    }

    #[test]
    fn test_reversed_brackets_are_not_a_span() {
        assert!(matches!(
            parse_recommendations("] nothing ["),
            Err(ParseFailure::NoJsonSpan(_))
        ));
    }

    #[test]
    fn test_truncated_json_is_a_failure() {
        let raw = r#"[{"brand": "A", "product": "B"}, {"brand": "C", "#;
        assert!(matches!(
            parse_recommendations(raw),
            Err(ParseFailure::NoJsonSpan(Shape::Array))
        ));

        let raw = r#"[{"brand": "A", "product": "B"}, {"brand": "C"]"#;
        assert!(matches!(
            parse_recommendations(raw),
            Err(ParseFailure::InvalidJson(_))
        ));
    }

    #[test]
    fn test_trailing_bracket_in_prose_breaks_span() {
        let raw = r#"[{"brand": "A", "product": "B"}] see note [1]"#;
        assert!(matches!(
            parse_recommendations(raw),
            Err(ParseFailure::InvalidJson(_))
        ));
    }

    #[test]
    fn test_one_malformed_item_rejects_whole_response() {
        let raw = r#"[
            {"brand": "A", "product": "B", "description": "ok", "category": "Makeup"},
            {"brand": "C", "description": "missing product", "category": "Makeup"}
        ]"#;
        assert!(matches!(
            parse_recommendations(raw),
            Err(ParseFailure::Shape(_))
        ));
    }

    #[test]
    fn test_unknown_category_rejects_whole_response() {
        let raw = r#"[{"brand": "A", "product": "B", "description": "C", "category": "Fragrance"}]"#;
        assert!(matches!(
            parse_recommendations(raw),
            Err(ParseFailure::Shape(_))
        ));
    }

    #[test]
    fn test_missing_description_and_category_are_coerced() {
        let raw = r#"[{"brand": "A", "product": "B"}]"#;
        let items = parse_recommendations(raw).unwrap();
        assert_eq!(items[0].description, "");
        assert_eq!(items[0].category, Category::Unspecified);
    }

    #[test]
    fn test_null_description_is_coerced() {
        let raw = r#"[{"brand":"A","product":"B","description":null,"category":"Skincare"}]"#;
        let items = parse_recommendations(raw).unwrap();
        assert_eq!(items[0].description, "");
        assert_eq!(items[0].category, Category::Skincare);
    }

    #[test]
    fn test_null_brand_rejects_whole_response() {
        let raw = r#"[{"brand":null,"product":"B"}]"#;
        assert!(matches!(
            parse_recommendations(raw),
            Err(ParseFailure::Shape(_))
        ));
    }

    #[test]
    fn test_fewer_than_five_items_are_tolerated() {
        let raw = r#"[{"brand": "A", "product": "B"}, {"brand": "C", "product": "D"}]"#;
        assert_eq!(parse_recommendations(raw).unwrap().len(), 2);
    }

    #[test]
    fn test_empty_array_is_a_failure() {
        assert!(matches!(
            parse_recommendations("[]"),
            Err(ParseFailure::Shape(_))
        ));
    }

    #[test]
    fn test_routine_requires_both_step_lists() {
        let raw = r#"{"summary": "x", "morningRoutine": []}"#;
        assert!(matches!(parse_routine(raw), Err(ParseFailure::Shape(_))));

        let raw = r#"{"morningRoutine": {}, "eveningRoutine": []}"#;
        assert!(matches!(parse_routine(raw), Err(ParseFailure::Shape(_))));
    }

    #[test]
    fn test_null_optional_routine_sections_are_coerced() {
        let raw = r#"{"summary":null,"morningRoutine":[],"eveningRoutine":[],"dietaryPlan":null}"#;
        let routine = parse_routine(raw).unwrap();
        assert_eq!(routine.summary, "");
        assert!(routine.dietary_plan.foods.is_empty());

        let raw = r#"{"morningRoutine":[{"type":"Serum","product":"C","description":null}],"eveningRoutine":[],"dietaryPlan":{"title":null,"foods":[{"name":"Kale","benefit":null}],"tips":[{"title":"Water","description":null}]}}"#;
        let routine = parse_routine(raw).unwrap();
        assert_eq!(routine.morning_routine[0].description, "");
        assert_eq!(routine.dietary_plan.title, "");
        assert_eq!(routine.dietary_plan.foods[0].benefit, "");
        assert_eq!(routine.dietary_plan.tips[0].description, "");
    }

    #[test]
    fn test_routine_in_plain_fence_parses() {
        let raw = "```\n{\"summary\": \"Calm\", \"morningRoutine\": [{\"type\": \"Cleanser\", \"product\": \"Gel\"}], \"eveningRoutine\": [], \"dietaryPlan\": {\"title\": \"Omega\", \"foods\": [{\"name\": \"Salmon\", \"benefit\": \"Omega-3\"}]}}\n```";
        let routine = parse_routine(raw).unwrap();
        assert_eq!(routine.summary, "Calm");
        assert_eq!(routine.morning_routine[0].step_type, "Cleanser");
        assert_eq!(routine.morning_routine[0].description, "");
        assert_eq!(routine.dietary_plan.foods[0].name, "Salmon");
        assert!(routine.dietary_plan.tips.is_empty());
    }

    #[test]
    fn test_nested_objects_use_outermost_braces() {
        let raw = r#"Sure! {"morningRoutine": [], "eveningRoutine": [], "dietaryPlan": {"title": "t"}} Enjoy."#;
        assert_eq!(parse_routine(raw).unwrap().dietary_plan.title, "t");
    }

    #[test]
    fn test_strip_code_fences_variants() {
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]\n");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}\n");
        assert_eq!(strip_code_fences("```[1]```"), "[1]");
        assert_eq!(strip_code_fences("no fences"), "no fences");
        // Text glued to a closing fence is not mistaken for a language tag.
        assert_eq!(strip_code_fences("[1]```Thanks"), "[1]Thanks");
    }
}
