use serde::{Deserialize, Serialize};

use crate::models::null_as_default;

/// One step of a morning or evening routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineStep {
    #[serde(rename = "type")]
    pub step_type: String,
    pub product: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub benefit: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DietTip {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DietaryPlan {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub foods: Vec<FoodItem>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tips: Vec<DietTip>,
}

/// Skincare routine plus dietary plan. `morningRoutine` and `eveningRoutine`
/// are the only fields a generated routine must carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    pub morning_routine: Vec<RoutineStep>,
    pub evening_routine: Vec<RoutineStep>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub dietary_plan: DietaryPlan,
}
