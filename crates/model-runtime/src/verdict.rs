//! Category-Specific Interpretation of Predictions

use crate::predictor::ModelPrediction;
use feature_schema::Category;
use serde::Serialize;

/// Model prediction rendered for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelVerdict {
    pub category: Category,
    /// Display label, e.g. "Diabetic"
    pub label: &'static str,
    /// Advice shown with the label
    pub message: &'static str,
    /// Whether the predicted class is the unhealthy one
    pub at_risk: bool,
    /// Class-1 probability clamped to [0, 1]
    pub probability: f64,
    /// Raw predicted class
    pub predicted_class: i64,
}

impl ModelVerdict {
    /// Interpret a prediction for a category
    pub fn new(category: Category, prediction: ModelPrediction) -> Self {
        let positive = prediction.label == 1;
        let (label, message) = match (category, positive) {
            (Category::Heart, true) => ("High Risk", "High Risk: Please consult a cardiologist."),
            (Category::Heart, false) => ("Low Risk", "Low Risk: Keep up a healthy lifestyle."),
            (Category::Diabetes, true) => {
                ("Diabetic", "Diabetic: Follow medical guidance and diet control.")
            }
            (Category::Diabetes, false) => {
                ("Non-Diabetic", "Non-Diabetic: Maintain healthy habits.")
            }
            (Category::Stress, true) => (
                "High Stress Risk",
                "High Stress Risk: Prioritize mental wellness and seek support.",
            ),
            (Category::Stress, false) => (
                "Low Stress Risk",
                "Low Stress Risk: Keep maintaining emotional balance.",
            ),
            (Category::Fitness, true) => {
                ("Active Lifestyle", "Active Lifestyle: Keep up the great habits!")
            }
            (Category::Fitness, false) => (
                "Sedentary Lifestyle",
                "Sedentary: Increase daily movement and reduce screen time.",
            ),
        };

        // Class 1 of the fitness model means active
        let at_risk = match category {
            Category::Fitness => !positive,
            _ => positive,
        };

        Self {
            category,
            label,
            message,
            at_risk,
            probability: prediction.probability.clamp(0.0, 1.0),
            predicted_class: prediction.label,
        }
    }

    /// Probability as a whole percentage, truncated
    pub fn percent(&self) -> u8 {
        (self.probability * 100.0) as u8
    }
}
