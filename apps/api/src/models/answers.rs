use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A recorded response to one question.
///
/// Serialized untagged so a stored answer set reads `{"skinType": "Oily",
/// "skinConcerns": ["Acne & Blemishes"]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Single(String),
    Multi(Vec<String>),
}

impl AnswerValue {
    pub fn is_empty(&self) -> bool {
        match self {
            AnswerValue::Single(value) => value.trim().is_empty(),
            AnswerValue::Multi(values) => values.is_empty(),
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Single(value) => f.write_str(value),
            AnswerValue::Multi(values) => f.write_str(&values.join(", ")),
        }
    }
}

/// Question id → answer. Ordered map so prompts render deterministically.
pub type AnswerSet = BTreeMap<String, AnswerValue>;

/// Returns the display text for `key`, or `default` when the answer is missing or blank.
pub fn answer_or(answers: &AnswerSet, key: &str, default: &str) -> String {
    match answers.get(key) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default.to_string(),
    }
}
