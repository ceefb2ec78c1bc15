//! Threshold Rule Tables

use feature_schema::Category;
use serde::Serialize;

/// Comparison applied to a single feature
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Condition {
    GreaterThan(f64),
    LessThan(f64),
    Equals(f64),
}

impl Condition {
    /// Whether the condition holds for a value. NaN never matches.
    pub fn matches(&self, value: f64) -> bool {
        match *self {
            Condition::GreaterThan(threshold) => value > threshold,
            Condition::LessThan(threshold) => value < threshold,
            Condition::Equals(target) => value == target,
        }
    }
}

/// A single threshold rule
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Rule {
    /// Feature name, for logging
    pub feature: &'static str,
    /// Position of the feature in the vector
    pub index: usize,
    /// Firing condition
    pub condition: Condition,
    /// Highest score allowed once this rule fires
    pub score_cap: u8,
    /// Advice emitted when this rule fires
    pub recommendation: &'static str,
}

/// Full rule table of one category
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuleSet {
    pub category: Category,
    /// Score reported when no rule fires
    pub default_score: u8,
    pub high_risk_assessment: &'static str,
    pub low_risk_assessment: &'static str,
    /// Sole recommendation when no rule fires
    pub healthy_recommendation: &'static str,
    /// Rules in evaluation order
    pub rules: &'static [Rule],
}

const fn rule(
    feature: &'static str,
    index: usize,
    condition: Condition,
    score_cap: u8,
    recommendation: &'static str,
) -> Rule {
    Rule {
        feature,
        index,
        condition,
        score_cap,
        recommendation,
    }
}

static HEART: RuleSet = RuleSet {
    category: Category::Heart,
    default_score: 95,
    high_risk_assessment: "High risk of heart disease",
    low_risk_assessment: "Low risk of heart disease",
    healthy_recommendation:
        "Your heart health indicators look good. Keep up regular exercise and a balanced diet.",
    rules: &[
        rule(
            "age",
            0,
            Condition::GreaterThan(55.0),
            70,
            "Age is a risk factor: schedule regular cardiac checkups.",
        ),
        rule(
            "resting_bp",
            3,
            Condition::GreaterThan(140.0),
            60,
            "Resting blood pressure is high: reduce sodium intake and monitor your blood pressure.",
        ),
        rule(
            "cholesterol",
            4,
            Condition::GreaterThan(240.0),
            65,
            "Cholesterol is elevated: cut saturated fats and add more fiber to your diet.",
        ),
        rule(
            "max_heart_rate",
            7,
            Condition::LessThan(120.0),
            65,
            "Maximum heart rate is low: build up regular cardio exercise gradually.",
        ),
        rule(
            "fasting_blood_sugar",
            5,
            Condition::Equals(1.0),
            60,
            "Fasting blood sugar is elevated: get screened for prediabetes.",
        ),
    ],
};

static DIABETES: RuleSet = RuleSet {
    category: Category::Diabetes,
    default_score: 95,
    high_risk_assessment: "High risk of diabetes",
    low_risk_assessment: "Low risk of diabetes",
    healthy_recommendation: "Your metabolic indicators look healthy. Maintain your current habits.",
    rules: &[
        rule(
            "glucose",
            1,
            Condition::GreaterThan(140.0),
            70,
            "Glucose is high: limit sugar and refined carbohydrates.",
        ),
        rule(
            "bmi",
            5,
            Condition::GreaterThan(30.0),
            65,
            "BMI is above 30: work on weight management through diet and activity.",
        ),
        rule(
            "insulin",
            4,
            Condition::GreaterThan(200.0),
            60,
            "Insulin level is high: consider a referral to an endocrinologist.",
        ),
        rule(
            "blood_pressure",
            2,
            Condition::GreaterThan(130.0),
            75,
            "Blood pressure is elevated: reduce salt intake.",
        ),
    ],
};

static STRESS: RuleSet = RuleSet {
    category: Category::Stress,
    default_score: 90,
    high_risk_assessment: "High stress risk",
    low_risk_assessment: "Low stress risk",
    healthy_recommendation:
        "You seem to be managing stress well. Keep maintaining your emotional balance.",
    rules: &[
        rule(
            "family_history",
            2,
            Condition::Equals(1.0),
            70,
            "Family history of mental illness: practice relaxation techniques such as meditation.",
        ),
        rule(
            "benefits_provided",
            4,
            Condition::Equals(0.0),
            65,
            "No employer mental health benefits: make time for self-care and seek support early.",
        ),
        rule(
            "company_size",
            3,
            Condition::GreaterThan(200.0),
            75,
            "Large workplace: protect your work-life balance with clear boundaries.",
        ),
    ],
};

static FITNESS: RuleSet = RuleSet {
    category: Category::Fitness,
    default_score: 95,
    high_risk_assessment: "Sedentary lifestyle",
    low_risk_assessment: "Active lifestyle",
    healthy_recommendation: "Great job staying active! Keep up the healthy habits.",
    rules: &[
        rule(
            "steps",
            0,
            Condition::LessThan(5000.0),
            70,
            "Daily steps are low: aim to walk more throughout the day.",
        ),
        rule(
            "sleep_hours",
            2,
            Condition::LessThan(6.0),
            65,
            "Sleep is short: aim for 7-9 hours per night.",
        ),
        rule(
            "sedentary_minutes",
            3,
            Condition::GreaterThan(600.0),
            65,
            "Long sedentary periods: take a short movement break every hour.",
        ),
        rule(
            "calories_burned",
            1,
            Condition::LessThan(1500.0),
            75,
            "Calories burned are low: add higher-intensity workouts.",
        ),
    ],
};

/// Rule table for a category
pub fn rule_set(category: Category) -> &'static RuleSet {
    match category {
        Category::Heart => &HEART,
        Category::Diabetes => &DIABETES,
        Category::Stress => &STRESS,
        Category::Fitness => &FITNESS,
    }
}
