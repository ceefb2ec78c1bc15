//! Predictor Abstraction and Invocation

use crate::artifact::StandardScaler;
use crate::InferenceError;
use feature_schema::Category;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Probability at or above which a probability output counts as class 1
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Raw output of a classifier
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModelOutput {
    /// Probability of the positive class
    Probability(f64),
    /// Predicted class only
    Label(i64),
}

/// Opaque trained model: `predict(vector) -> label/probability`
pub trait Predictor: Send + Sync {
    /// Short name of the model family, for logs and status
    fn kind(&self) -> &'static str;

    /// Number of features the model accepts, when known
    fn input_width(&self) -> Option<usize>;

    /// Run the model on one vector
    fn predict(&self, features: &[f64]) -> Result<ModelOutput, InferenceError>;
}

/// Normalized prediction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    /// Probability of class 1 (the label itself for label-only models)
    pub probability: f64,
    /// Predicted class
    pub label: i64,
}

impl From<ModelOutput> for ModelPrediction {
    fn from(output: ModelOutput) -> Self {
        match output {
            ModelOutput::Probability(probability) => Self {
                probability,
                label: i64::from(probability >= DECISION_THRESHOLD),
            },
            ModelOutput::Label(label) => Self {
                probability: label as f64,
                label,
            },
        }
    }
}

/// Classifier plus optional scaler loaded for one category
pub struct LoadedModel {
    /// Category the model was trained for
    pub category: Category,
    /// Artifact path
    pub source: PathBuf,
    classifier: Box<dyn Predictor>,
    scaler: Option<StandardScaler>,
}

impl LoadedModel {
    /// Assemble from parts
    pub fn new(
        category: Category,
        source: PathBuf,
        classifier: Box<dyn Predictor>,
        scaler: Option<StandardScaler>,
    ) -> Self {
        Self {
            category,
            source,
            classifier,
            scaler,
        }
    }

    /// Model family
    pub fn kind(&self) -> &'static str {
        self.classifier.kind()
    }

    /// Whether a scaler is attached
    pub fn has_scaler(&self) -> bool {
        self.scaler.is_some()
    }

    /// Check the input width, scale, and run the classifier.
    ///
    /// A scaler that cannot transform the vector is skipped; a classifier whose
    /// width differs from the vector is an error.
    pub fn predict(&self, features: &[f64]) -> Result<ModelPrediction, InferenceError> {
        if let Some(expected) = self.classifier.input_width() {
            if expected != features.len() {
                return Err(InferenceError::InvalidInputShape {
                    expected,
                    actual: features.len(),
                });
            }
        }

        let scaled = match &self.scaler {
            Some(scaler) => match scaler.transform(features) {
                Ok(scaled) => scaled,
                Err(e) => {
                    warn!("Skipping {} scaler: {}", self.category, e);
                    features.to_vec()
                }
            },
            None => features.to_vec(),
        };

        let output = self.classifier.predict(&scaled)?;
        debug!("{} model output: {:?}", self.category, output);
        Ok(output.into())
    }
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel")
            .field("category", &self.category)
            .field("source", &self.source)
            .field("kind", &self.classifier.kind())
            .field("scaler", &self.scaler.is_some())
            .finish()
    }
}
