//! Positional Feature Layouts

use crate::category::Category;
use serde::Serialize;

/// One positional feature of a category's vector, with its form bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    /// Field name used in named input
    pub name: &'static str,
    /// Human-readable label
    pub label: &'static str,
    /// Lowest accepted value
    pub min: f64,
    /// Highest accepted value
    pub max: f64,
    /// Value used when the field is not supplied
    pub default: f64,
}

const fn field(
    name: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
    default: f64,
) -> FieldSpec {
    FieldSpec {
        name,
        label,
        min,
        max,
        default,
    }
}

const HEART: [FieldSpec; 13] = [
    field("age", "Age", 20.0, 100.0, 50.0),
    field("sex", "Sex (0=Female, 1=Male)", 0.0, 1.0, 0.0),
    field("chest_pain_type", "Chest Pain Type (0-3)", 0.0, 3.0, 0.0),
    field("resting_bp", "Resting Blood Pressure (mm Hg)", 80.0, 200.0, 120.0),
    field("cholesterol", "Cholesterol (mg/dL)", 100.0, 600.0, 200.0),
    field("fasting_blood_sugar", "Fasting Blood Sugar > 120", 0.0, 1.0, 0.0),
    field("resting_ecg", "Resting ECG (0-2)", 0.0, 2.0, 0.0),
    field("max_heart_rate", "Max Heart Rate", 60.0, 220.0, 150.0),
    field("exercise_angina", "Exercise Induced Angina", 0.0, 1.0, 0.0),
    field("st_depression", "ST Depression (Oldpeak)", 0.0, 6.0, 1.0),
    field("st_slope", "Slope (0-2)", 0.0, 2.0, 0.0),
    field("major_vessels", "Major Vessels (0-4)", 0.0, 4.0, 0.0),
    field("thal", "Thalassemia (0-3)", 0.0, 3.0, 2.0),
];

const DIABETES: [FieldSpec; 8] = [
    field("pregnancies", "Pregnancies", 0.0, 20.0, 1.0),
    field("glucose", "Glucose Level", 50.0, 300.0, 120.0),
    field("blood_pressure", "Blood Pressure", 40.0, 200.0, 80.0),
    field("skin_thickness", "Skin Thickness", 0.0, 99.0, 20.0),
    field("insulin", "Insulin", 0.0, 900.0, 80.0),
    field("bmi", "BMI", 10.0, 60.0, 25.0),
    field("pedigree_function", "Diabetes Pedigree Function", 0.0, 3.0, 0.5),
    field("age", "Age", 20.0, 100.0, 40.0),
];

const STRESS: [FieldSpec; 5] = [
    field("age", "Age", 15.0, 70.0, 25.0),
    field("gender", "Gender (0=Male, 1=Female)", 0.0, 1.0, 0.0),
    field("family_history", "Family History of Mental Illness", 0.0, 1.0, 0.0),
    field("company_size", "No. of Employees (approx.)", 1.0, 1000.0, 50.0),
    field("benefits_provided", "Employer Benefits Provided", 0.0, 1.0, 0.0),
];

const FITNESS: [FieldSpec; 4] = [
    field("steps", "Avg. Steps per Day", 0.0, 50000.0, 8000.0),
    field("calories_burned", "Avg. Calories Burned", 100.0, 6000.0, 2500.0),
    field("sleep_hours", "Sleep Duration (hours)", 2.0, 12.0, 7.0),
    field("sedentary_minutes", "Sedentary Minutes", 0.0, 1000.0, 300.0),
];

/// Positional layout for a category
pub fn schema(category: Category) -> &'static [FieldSpec] {
    match category {
        Category::Heart => &HEART,
        Category::Diabetes => &DIABETES,
        Category::Stress => &STRESS,
        Category::Fitness => &FITNESS,
    }
}
