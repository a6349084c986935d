//! Nutrition analysis wire types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// MEAL TYPE
// ============================================================================

/// Which meal a scanned food belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
    #[default]
    Snack,
}

impl MealType {
    pub const ALL: [MealType; 4] = [
        MealType::Breakfast,
        MealType::Lunch,
        MealType::Dinner,
        MealType::Snack,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealType::Breakfast => "breakfast",
            MealType::Lunch => "lunch",
            MealType::Dinner => "dinner",
            MealType::Snack => "snack",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MealType::Breakfast => "Breakfast",
            MealType::Lunch => "Lunch",
            MealType::Dinner => "Dinner",
            MealType::Snack => "Snack",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MealType::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown meal type '{}'", s))
    }
}

// ============================================================================
// TAGS
// ============================================================================

/// Descriptive tag a user attaches to a scanned food
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Healthy,
    Spicy,
    Sweet,
    Salty,
    Fatty,
}

impl Tag {
    pub const ALL: [Tag; 5] = [Tag::Healthy, Tag::Spicy, Tag::Sweet, Tag::Salty, Tag::Fatty];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Healthy => "healthy",
            Tag::Spicy => "spicy",
            Tag::Sweet => "sweet",
            Tag::Salty => "salty",
            Tag::Fatty => "fatty",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tag::Healthy => "Healthy",
            Tag::Spicy => "Spicy",
            Tag::Sweet => "Sweet",
            Tag::Salty => "Salty",
            Tag::Fatty => "Fatty",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown tag '{}'", s))
    }
}

// ============================================================================
// ANALYSIS
// ============================================================================

/// Body of `POST /nutrition/analyze`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeLabelRequest {
    pub user_uuid: String,
    pub food_name: String,
    pub meal_type: MealType,
    pub tags: Vec<Tag>,
    pub image_url: String,
}

/// Normalised outcome of a `/nutrition/*` call.
///
/// When `success` is false, `message` is always populated.
#[derive(Debug, Clone, PartialEq)]
pub struct NutritionResult {
    pub success: bool,
    pub data: Option<serde_json::Value>,
    pub message: Option<String>,
}

impl NutritionResult {
    pub fn ok(data: Option<serde_json::Value>) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}
