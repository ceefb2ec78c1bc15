//! ONNX Classifier using tract

use crate::predictor::{ModelOutput, Predictor};
use crate::InferenceError;
use std::path::Path;
use tracing::info;
use tract_onnx::prelude::*;

type OnnxPlan = TypedRunnableModel<TypedModel>;

/// ONNX classifier with a fixed `[1, width]` f32 input
pub struct OnnxModel {
    plan: OnnxPlan,
    width: usize,
}

impl OnnxModel {
    /// Load and optimize a model for single-row inference
    pub fn load(path: &Path, width: usize) -> Result<Self, InferenceError> {
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, width]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| InferenceError::ModelLoadError(format!("{}: {}", path.display(), e)))?;

        info!("Loaded ONNX model from {} (width={})", path.display(), width);
        Ok(Self { plan, width })
    }

    /// Interpret model outputs: a float pair is class probabilities, a single
    /// float in [0, 1] is a probability, an integer is a label.
    fn interpret(outputs: &[TValue]) -> Option<ModelOutput> {
        for output in outputs {
            if let Ok(view) = output.to_array_view::<f32>() {
                let values: Vec<f32> = view.iter().copied().collect();
                match values.as_slice() {
                    [_, positive] => return Some(ModelOutput::Probability(f64::from(*positive))),
                    [score] if (0.0..=1.0).contains(score) => {
                        return Some(ModelOutput::Probability(f64::from(*score)))
                    }
                    [score] => return Some(ModelOutput::Label(score.round() as i64)),
                    _ => {}
                }
            }
        }

        outputs
            .first()
            .and_then(|output| output.to_array_view::<i64>().ok())
            .and_then(|view| view.iter().next().copied())
            .map(ModelOutput::Label)
    }
}

impl Predictor for OnnxModel {
    fn kind(&self) -> &'static str {
        "onnx"
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.width)
    }

    fn predict(&self, features: &[f64]) -> Result<ModelOutput, InferenceError> {
        let data: Vec<f32> = features.iter().map(|v| *v as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, self.width), data)
            .map_err(|_| InferenceError::InvalidInputShape {
                expected: self.width,
                actual: features.len(),
            })?
            .into();

        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        Self::interpret(&outputs)
            .ok_or_else(|| InferenceError::InferenceFailed("unrecognized model output".to_string()))
    }
}
