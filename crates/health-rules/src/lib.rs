//! Rule-Based Health Scoring
//!
//! Provides threshold heuristics per assessment category for use when a
//! trained model is unavailable or fails.

mod engine;
mod rules;

pub use engine::{AssessmentResult, HealthRuleEngine};
pub use feature_schema::Category;
pub use rules::{rule_set, Condition, Rule, RuleSet};

use thiserror::Error;

/// Errors during rule evaluation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Invalid assessment category: {0}")]
    InvalidCategory(String),
    #[error("Feature count mismatch for {category}: expected {expected}, got {actual}")]
    FeatureCountMismatch {
        category: Category,
        expected: usize,
        actual: usize,
    },
}
