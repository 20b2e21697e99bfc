use serde::{Deserialize, Deserializer, Serialize};

use crate::models::null_as_default;

/// Product category. LLM output is matched case-insensitively; a missing or
/// empty category is tolerated as `Unspecified`, anything else is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Category {
    Skincare,
    Makeup,
    Haircare,
    #[default]
    #[serde(rename = "")]
    Unspecified,
}

impl Category {
    pub fn from_label(label: &str) -> Option<Category> {
        match label.trim().to_ascii_lowercase().as_str() {
            "skincare" => Some(Category::Skincare),
            "makeup" => Some(Category::Makeup),
            "haircare" => Some(Category::Haircare),
            "" => Some(Category::Unspecified),
            _ => None,
        }
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Category::from_label(&label).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "unknown category '{label}' (expected Skincare, Makeup or Haircare)"
            ))
        })
    }
}

/// One recommended product. A session carries five of these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub brand: String,
    pub product: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default)]
    pub category: Category,
}
