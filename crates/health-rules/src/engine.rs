//! Rule Engine Implementation

use crate::rules::{rule_set, RuleSet};
use crate::RuleError;
use feature_schema::Category;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Outcome of a rule-based assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// True when at least one rule fired
    pub risk_flag: bool,
    /// Minimum cap among fired rules, or the category default (0-100)
    pub score: u8,
    /// Category-specific summary phrase
    pub assessment: String,
    /// One entry per fired rule in evaluation order, or a single positive note
    pub recommendations: Vec<String>,
}

/// Stateless evaluator over the static rule tables
#[derive(Debug, Default, Clone, Copy)]
pub struct HealthRuleEngine;

impl HealthRuleEngine {
    /// Create a new engine
    pub fn new() -> Self {
        Self
    }

    /// Evaluate a positional feature vector against a category's rules
    pub fn evaluate(
        &self,
        category: Category,
        features: &[f64],
    ) -> Result<AssessmentResult, RuleError> {
        let set = rule_set(category);
        let expected = category.feature_count();
        if features.len() != expected {
            return Err(RuleError::FeatureCountMismatch {
                category,
                expected,
                actual: features.len(),
            });
        }

        let result = Self::apply(set, features);
        let fired = if result.risk_flag {
            result.recommendations.len()
        } else {
            0
        };
        debug!(
            "Rule evaluation for {}: risk={}, score={}, fired={}",
            category, result.risk_flag, result.score, fired
        );
        Ok(result)
    }

    /// Evaluate with the category given as a string token
    pub fn evaluate_named(
        &self,
        category: &str,
        features: &[f64],
    ) -> Result<AssessmentResult, RuleError> {
        let category = category
            .parse::<Category>()
            .map_err(|_| RuleError::InvalidCategory(category.to_string()))?;
        self.evaluate(category, features)
    }

    fn apply(set: &RuleSet, features: &[f64]) -> AssessmentResult {
        let mut score = set.default_score;
        let mut recommendations = Vec::new();

        for rule in set.rules {
            let value = features[rule.index];
            if rule.condition.matches(value) {
                trace!("Rule fired: {} = {} ({:?})", rule.feature, value, rule.condition);
                score = score.min(rule.score_cap);
                recommendations.push(rule.recommendation.to_string());
            }
        }

        let risk_flag = !recommendations.is_empty();
        if !risk_flag {
            recommendations.push(set.healthy_recommendation.to_string());
        }

        AssessmentResult {
            risk_flag,
            score,
            assessment: if risk_flag {
                set.high_risk_assessment
            } else {
                set.low_risk_assessment
            }
            .to_string(),
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Condition;
    use proptest::prelude::*;

    /// Vector where every rule of the category fires
    fn all_firing(category: Category) -> Vec<f64> {
        let mut values = vec![0.0; category.feature_count()];
        for rule in rule_set(category).rules {
            values[rule.index] = match rule.condition {
                Condition::GreaterThan(t) => t + 1.0,
                Condition::LessThan(t) => t - 1.0,
                Condition::Equals(t) => t,
            };
        }
        values
    }

    /// Vector where no rule of the category fires
    fn none_firing(category: Category) -> Vec<f64> {
        let mut values = vec![0.0; category.feature_count()];
        for rule in rule_set(category).rules {
            values[rule.index] = match rule.condition {
                Condition::GreaterThan(t) => t,
                Condition::LessThan(t) => t,
                Condition::Equals(t) => t + 1.0,
            };
        }
        values
    }

    #[test]
    fn test_heart_all_rules_fire() {
        let engine = HealthRuleEngine::new();
        let features = [60.0, 1.0, 0.0, 150.0, 250.0, 1.0, 0.0, 100.0, 0.0, 1.0, 0.0, 0.0, 2.0];

        let result = engine.evaluate(Category::Heart, &features).unwrap();
        assert!(result.risk_flag);
        assert_eq!(result.score, 60);
        assert_eq!(result.recommendations.len(), 5);
        assert_eq!(result.assessment, "High risk of heart disease");
    }

    #[test]
    fn test_heart_low_risk() {
        let engine = HealthRuleEngine::new();
        let features = [30.0, 0.0, 0.0, 110.0, 180.0, 0.0, 0.0, 160.0, 0.0, 0.5, 0.0, 0.0, 1.0];

        let result = engine.evaluate(Category::Heart, &features).unwrap();
        assert!(!result.risk_flag);
        assert_eq!(result.score, 95);
        assert_eq!(result.recommendations.len(), 1);
        assert_eq!(result.assessment, "Low risk of heart disease");
    }

    #[test]
    fn test_diabetes_partial() {
        let engine = HealthRuleEngine::new();
        let features = [1.0, 150.0, 135.0, 20.0, 90.0, 32.0, 0.5, 40.0];

        let result = engine.evaluate(Category::Diabetes, &features).unwrap();
        assert!(result.risk_flag);
        assert_eq!(result.score, 65);
        assert_eq!(
            result.recommendations,
            vec![
                rule_set(Category::Diabetes).rules[0].recommendation,
                rule_set(Category::Diabetes).rules[1].recommendation,
                rule_set(Category::Diabetes).rules[3].recommendation,
            ]
        );
    }

    #[test]
    fn test_fitness_all_rules_fire() {
        let engine = HealthRuleEngine::new();

        let result = engine.evaluate(Category::Fitness, &[3000.0, 1200.0, 5.0, 700.0]).unwrap();
        assert!(result.risk_flag);
        assert_eq!(result.score, 65);
        assert_eq!(result.recommendations.len(), 4);
        assert_eq!(result.assessment, "Sedentary lifestyle");
    }

    #[test]
    fn test_stress_default_score() {
        let engine = HealthRuleEngine::new();

        let result = engine.evaluate(Category::Stress, &[25.0, 0.0, 0.0, 50.0, 1.0]).unwrap();
        assert!(!result.risk_flag);
        assert_eq!(result.score, 90);
        assert_eq!(result.recommendations.len(), 1);
    }

    #[test]
    fn test_no_rule_fires_any_category() {
        let engine = HealthRuleEngine::new();
        for category in Category::ALL {
            let set = rule_set(category);
            let result = engine.evaluate(category, &none_firing(category)).unwrap();
            assert!(!result.risk_flag, "{}", category);
            assert_eq!(result.score, set.default_score);
            assert_eq!(result.recommendations, vec![set.healthy_recommendation.to_string()]);
            assert_eq!(result.assessment, set.low_risk_assessment);
        }
    }

    #[test]
    fn test_every_rule_fires_any_category() {
        let engine = HealthRuleEngine::new();
        for category in Category::ALL {
            let set = rule_set(category);
            let result = engine.evaluate(category, &all_firing(category)).unwrap();
            let min_cap = set.rules.iter().map(|r| r.score_cap).min().unwrap();
            let expected: Vec<String> = set
                .rules
                .iter()
                .map(|r| r.recommendation.to_string())
                .collect();

            assert!(result.risk_flag);
            assert_eq!(result.score, min_cap);
            assert_eq!(result.recommendations, expected);
        }
    }

    #[test]
    fn test_wrong_length_rejected() {
        let engine = HealthRuleEngine::new();
        for category in Category::ALL {
            let count = category.feature_count();
            for len in [0, count - 1, count + 1] {
                let err = engine.evaluate(category, &vec![0.0; len]).unwrap_err();
                assert_eq!(
                    err,
                    RuleError::FeatureCountMismatch {
                        category,
                        expected: count,
                        actual: len,
                    }
                );
            }
        }
    }

    #[test]
    fn test_invalid_category_token() {
        let engine = HealthRuleEngine::new();
        let err = engine.evaluate_named("liver", &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, RuleError::InvalidCategory("liver".to_string()));

        let result = engine.evaluate_named("fitness", &[3000.0, 1200.0, 5.0, 700.0]).unwrap();
        assert_eq!(result.score, 65);
    }

    proptest! {
        #[test]
        fn prop_evaluation_is_deterministic(
            values in prop::collection::vec(-1000.0f64..60000.0, 13)
        ) {
            let engine = HealthRuleEngine::new();
            let first = engine.evaluate(Category::Heart, &values).unwrap();
            let second = engine.evaluate(Category::Heart, &values).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_score_and_recommendations_consistent(
            values in prop::collection::vec(0.0f64..10000.0, 4)
        ) {
            let engine = HealthRuleEngine::new();
            let set = rule_set(Category::Fitness);
            let result = engine.evaluate(Category::Fitness, &values).unwrap();
            let fired: Vec<_> = set
                .rules
                .iter()
                .filter(|r| r.condition.matches(values[r.index]))
                .collect();

            prop_assert!(result.score <= 100);
            prop_assert_eq!(result.risk_flag, !fired.is_empty());
            prop_assert_eq!(result.recommendations.len(), fired.len().max(1));
            let expected_score = fired
                .iter()
                .map(|r| r.score_cap)
                .min()
                .unwrap_or(set.default_score);
            prop_assert_eq!(result.score, expected_score);
        }
    }
}
