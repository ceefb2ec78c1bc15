//! Assessment service: trained model first, rules as fallback

use crate::error::ApiError;
use feature_schema::{Category, FeatureVector};
use health_rules::{AssessmentResult, HealthRuleEngine};
use model_runtime::{ModelRegistry, ModelVerdict};
use serde::{Deserialize, Serialize};
use storage::{AssessmentRecord, ModelSummary};
use tracing::{debug, warn};
use uuid::Uuid;

/// Whether and how the trained model is consulted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringPolicy {
    /// Never consult a model
    RulesOnly,
    /// Consult the model; rules alone when it is missing or fails
    #[default]
    ModelThenRules,
    /// A model failure fails the request
    ModelOnly,
}

/// Which component produced the headline verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultSource {
    Model,
    Rules,
}

impl ResultSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultSource::Model => "model",
            ResultSource::Rules => "rules",
        }
    }
}

/// Combined outcome of one assessment
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentOutcome {
    /// History id, set once recorded
    pub id: Option<Uuid>,
    pub category: Category,
    pub features: Vec<f64>,
    /// Rule-based result, always present
    pub result: AssessmentResult,
    /// Model verdict when a model was consulted successfully
    pub model: Option<ModelVerdict>,
    pub source: ResultSource,
    /// The model was wanted but unavailable
    pub used_fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_error: Option<String>,
}

impl AssessmentOutcome {
    /// History record for this outcome
    pub fn to_record(&self, vector: &FeatureVector) -> AssessmentRecord {
        let record = AssessmentRecord::new(vector, &self.result).with_fallback(self.used_fallback);
        match &self.model {
            Some(verdict) => record.with_model(ModelSummary {
                label: verdict.label.to_string(),
                probability: verdict.probability,
                at_risk: verdict.at_risk,
            }),
            None => record,
        }
    }
}

/// Runs the rule engine and, per policy, the category's trained model
pub struct AssessmentService {
    engine: HealthRuleEngine,
    registry: ModelRegistry,
    policy: ScoringPolicy,
}

impl AssessmentService {
    pub fn new(registry: ModelRegistry, policy: ScoringPolicy) -> Self {
        Self {
            engine: HealthRuleEngine::new(),
            registry,
            policy,
        }
    }

    pub fn policy(&self) -> ScoringPolicy {
        self.policy
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Assess one vector
    pub fn assess(&self, vector: &FeatureVector) -> Result<AssessmentOutcome, ApiError> {
        let category = vector.category;
        let result = self.engine.evaluate(category, vector.as_slice())?;

        let (model, used_fallback, model_error) = match self.policy {
            ScoringPolicy::RulesOnly => (None, false, None),
            policy => match self.registry.predict(category, vector.as_slice()) {
                Ok(verdict) => (Some(verdict), false, None),
                Err(e) if policy == ScoringPolicy::ModelOnly => {
                    return Err(ApiError::ModelUnavailable(e.to_string()));
                }
                Err(e) => {
                    warn!("{} model unavailable, using rules: {}", category, e);
                    metrics::counter!("model_fallbacks_total", "category" => category.as_str())
                        .increment(1);
                    (None, true, Some(e.to_string()))
                }
            },
        };

        let source = if model.is_some() {
            ResultSource::Model
        } else {
            ResultSource::Rules
        };
        metrics::counter!(
            "assessments_total",
            "category" => category.as_str(),
            "source" => source.as_str()
        )
        .increment(1);
        debug!("{} assessed via {}: score={}", category, source.as_str(), result.score);

        Ok(AssessmentOutcome {
            id: None,
            category,
            features: vector.values.clone(),
            result,
            model,
            source,
            used_fallback,
            model_error,
        })
    }
}
