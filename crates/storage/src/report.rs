//! Plain-Text and JSON Reports

use crate::repository::AssessmentRecord;
use crate::StorageError;
use feature_schema::schema;
use serde::Serialize;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: chrono::DateTime<chrono::Utc>,
    assessments: &'a [AssessmentRecord],
}

/// Render a human-readable report of the given records
pub fn render_report(records: &[AssessmentRecord]) -> String {
    let mut lines = vec![
        "Health Assessment Report".to_string(),
        format!("Generated: {}", chrono::Utc::now().format(TIMESTAMP_FORMAT)),
    ];

    if records.is_empty() {
        lines.push(String::new());
        lines.push("No assessments recorded.".to_string());
    }

    for record in records {
        lines.push(String::new());
        lines.extend(record_section(record));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn record_section(record: &AssessmentRecord) -> Vec<String> {
    let mut lines = vec![
        format!("== {} ==", record.category.display_name()),
        format!("Recorded: {}", record.recorded_at.format(TIMESTAMP_FORMAT)),
        format!("Assessment: {} (score {}/100)", record.assessment, record.score),
    ];

    if let Some(model) = &record.model {
        lines.push(format!("Model: {} ({:.0}%)", model.label, model.probability * 100.0));
    } else if record.used_fallback {
        lines.push("Model: unavailable, rule-based result shown".to_string());
    }

    lines.push("Inputs:".to_string());
    lines.extend(
        schema(record.category)
            .iter()
            .zip(&record.features)
            .map(|(field, value)| format!("  {}: {}", field.label, value)),
    );

    lines.push("Recommendations:".to_string());
    lines.extend(
        record
            .recommendations
            .iter()
            .enumerate()
            .map(|(i, rec)| format!("  {}. {}", i + 1, rec)),
    );
    lines
}

/// Render the records as a JSON document
pub fn render_json_report(records: &[AssessmentRecord]) -> Result<String, StorageError> {
    let report = JsonReport {
        generated_at: chrono::Utc::now(),
        assessments: records,
    };
    serde_json::to_string_pretty(&report)
        .map_err(|e| StorageError::SerializationError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::ModelSummary;
    use feature_schema::{Category, FeatureVector};
    use health_rules::HealthRuleEngine;

    fn fitness_record() -> AssessmentRecord {
        let vector =
            FeatureVector::new(Category::Fitness, vec![3000.0, 1200.0, 5.0, 700.0]).unwrap();
        let result = HealthRuleEngine::new()
            .evaluate(Category::Fitness, vector.as_slice())
            .unwrap();
        AssessmentRecord::new(&vector, &result)
    }

    #[test]
    fn test_empty_report() {
        let report = render_report(&[]);
        assert!(report.contains("No assessments recorded."));
    }

    #[test]
    fn test_report_sections() {
        let report = render_report(&[fitness_record()]);
        assert!(report.contains("== Fitness / Lifestyle =="));
        assert!(report.contains("Assessment: Sedentary lifestyle (score 65/100)"));
        assert!(report.contains("  Avg. Steps per Day: 3000"));
        assert!(report.contains("  4. "));
    }

    #[test]
    fn test_report_model_line() {
        let record = fitness_record().with_model(ModelSummary {
            label: "Sedentary Lifestyle".to_string(),
            probability: 0.12,
            at_risk: true,
        });
        let report = render_report(&[record]);
        assert!(report.contains("Model: Sedentary Lifestyle (12%)"));

        let fallback = render_report(&[fitness_record().with_fallback(true)]);
        assert!(fallback.contains("rule-based result shown"));
    }

    #[test]
    fn test_json_report() {
        let json = render_json_report(&[fitness_record()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["assessments"][0]["category"], "fitness");
        assert_eq!(value["assessments"][0]["score"], 65);
    }
}
