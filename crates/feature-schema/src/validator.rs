//! Entry-Bound Validator

use crate::error::ValidationError;
use crate::schema::{schema, FieldSpec};
use crate::vector::FeatureVector;
use serde::Serialize;
use tracing::debug;

/// Result of validation
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    /// Whether all values are valid
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of fields validated
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }
}

/// Range checker for assembled feature vectors
#[derive(Debug, Default, Clone, Copy)]
pub struct Validator;

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a single value against a field's bounds
    pub fn validate_field(&self, spec: &FieldSpec, value: f64) -> Result<(), ValidationError> {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite { field: spec.name });
        }
        if value < spec.min || value > spec.max {
            Err(ValidationError::OutOfRange {
                field: spec.name,
                value,
                min: spec.min,
                max: spec.max,
            })
        } else {
            Ok(())
        }
    }

    /// Validate every field, collecting all violations
    pub fn validate(&self, vector: &FeatureVector) -> ValidationResult {
        let layout = schema(vector.category);
        let errors: Vec<_> = layout
            .iter()
            .zip(&vector.values)
            .filter_map(|(spec, value)| self.validate_field(spec, *value).err())
            .collect();

        let checked = layout.len().min(vector.values.len());
        if errors.is_empty() {
            ValidationResult::valid(checked)
        } else {
            debug!("{} vector failed validation: {} errors", vector.category, errors.len());
            ValidationResult::invalid(errors, checked)
        }
    }

    /// Validate, stopping at the first violation
    pub fn validate_strict(&self, vector: &FeatureVector) -> Result<(), ValidationError> {
        schema(vector.category)
            .iter()
            .zip(&vector.values)
            .try_for_each(|(spec, value)| self.validate_field(spec, *value))
    }
}
