//! JSON Model Artifacts

use crate::predictor::{ModelOutput, Predictor};
use crate::InferenceError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, InferenceError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))
}

/// Classifier exported as JSON parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JsonModel {
    /// Logistic regression producing a class-1 probability
    Logistic { weights: Vec<f64>, intercept: f64 },
    /// Single-feature cut producing only a label
    Threshold {
        feature: usize,
        threshold: f64,
        #[serde(default)]
        width: Option<usize>,
    },
}

impl JsonModel {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let model: Self = read_json(path)?;
        if let JsonModel::Threshold { feature, width: Some(width), .. } = &model {
            if feature >= width {
                return Err(InferenceError::ModelLoadError(format!(
                    "{}: feature index {} outside width {}",
                    path.display(),
                    feature,
                    width
                )));
            }
        }
        info!("Loaded JSON model from {}", path.display());
        Ok(model)
    }
}

impl Predictor for JsonModel {
    fn kind(&self) -> &'static str {
        match self {
            JsonModel::Logistic { .. } => "logistic",
            JsonModel::Threshold { .. } => "threshold",
        }
    }

    fn input_width(&self) -> Option<usize> {
        match self {
            JsonModel::Logistic { weights, .. } => Some(weights.len()),
            JsonModel::Threshold { width, .. } => *width,
        }
    }

    fn predict(&self, features: &[f64]) -> Result<ModelOutput, InferenceError> {
        match self {
            JsonModel::Logistic { weights, intercept } => {
                let z: f64 =
                    weights.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + intercept;
                Ok(ModelOutput::Probability(1.0 / (1.0 + (-z).exp())))
            }
            JsonModel::Threshold { feature, threshold, .. } => {
                let value = features.get(*feature).ok_or(InferenceError::InvalidInputShape {
                    expected: feature + 1,
                    actual: features.len(),
                })?;
                Ok(ModelOutput::Label(i64::from(*value > *threshold)))
            }
        }
    }
}

/// Standardizing scaler: `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Load from a JSON file
    pub fn load(path: &Path) -> Result<Self, InferenceError> {
        let scaler: Self = read_json(path)?;
        if scaler.mean.len() != scaler.scale.len() {
            return Err(InferenceError::ModelLoadError(format!(
                "{}: mean has {} entries but scale has {}",
                path.display(),
                scaler.mean.len(),
                scaler.scale.len()
            )));
        }
        info!("Loaded scaler from {}", path.display());
        Ok(scaler)
    }

    /// Number of features the scaler was fitted on
    pub fn width(&self) -> usize {
        self.mean.len()
    }

    /// Scale a vector. Zero scales are treated as one.
    pub fn transform(&self, features: &[f64]) -> Result<Vec<f64>, InferenceError> {
        if features.len() != self.width() {
            return Err(InferenceError::InvalidInputShape {
                expected: self.width(),
                actual: features.len(),
            });
        }
        Ok(features
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(x, (mean, scale))| {
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (x - mean) / scale
            })
            .collect())
    }
}
