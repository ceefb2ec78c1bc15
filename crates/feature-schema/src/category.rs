//! Assessment Categories

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Assessment category, selecting both the rule set and the feature layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Heart disease risk
    Heart,
    /// Diabetes risk
    Diabetes,
    /// Stress / mental health risk
    Stress,
    /// Fitness / lifestyle assessment
    Fitness,
}

impl Category {
    /// All categories in menu order
    pub const ALL: [Category; 4] = [
        Category::Heart,
        Category::Diabetes,
        Category::Stress,
        Category::Fitness,
    ];

    /// Get string token
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Heart => "heart",
            Category::Diabetes => "diabetes",
            Category::Stress => "stress",
            Category::Fitness => "fitness",
        }
    }

    /// Dashboard menu title
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Heart => "Heart Disease",
            Category::Diabetes => "Diabetes",
            Category::Stress => "Stress / Mental Health",
            Category::Fitness => "Fitness / Lifestyle",
        }
    }

    /// Number of positional features expected for this category
    pub fn feature_count(&self) -> usize {
        crate::schema::schema(*self).len()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        match token.as_str() {
            "heart" | "heart disease" | "heart_disease" => Ok(Category::Heart),
            "diabetes" => Ok(Category::Diabetes),
            "stress" | "stress / mental health" | "mental_health" => Ok(Category::Stress),
            "fitness" | "fitness / lifestyle" | "lifestyle" => Ok(Category::Fitness),
            _ => Err(SchemaError::UnknownCategory(s.to_string())),
        }
    }
}
