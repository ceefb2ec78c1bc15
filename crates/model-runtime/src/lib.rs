//! Model Runtime
//!
//! Locates serialized classifiers on disk, checks input compatibility, and
//! turns raw model outputs into category-specific verdicts. Models are opaque
//! `predict(vector)` capabilities trained elsewhere.

mod artifact;
mod locator;
mod onnx;
mod predictor;
mod registry;
mod verdict;

pub use artifact::{JsonModel, StandardScaler};
pub use locator::{ModelLocator, DEFAULT_SEARCH_DIRS};
pub use onnx::OnnxModel;
pub use predictor::{LoadedModel, ModelOutput, ModelPrediction, Predictor};
pub use registry::{ModelRegistry, ModelStatus};
pub use verdict::ModelVerdict;

use thiserror::Error;

/// Errors during model loading and inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("No model artifact found for {0}")]
    ModelNotFound(String),
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input shape: expected {expected} features, got {actual}")]
    InvalidInputShape { expected: usize, actual: usize },
}
