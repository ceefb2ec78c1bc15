//! Feature Vector Assembly

use crate::category::Category;
use crate::error::SchemaError;
use crate::schema::schema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Gender recorded in a saved profile
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    #[default]
    PreferNotToSay,
    Male,
    Female,
}

/// Saved user profile used to pre-fill form fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Age in years
    #[serde(default)]
    pub age: Option<f64>,
    /// Self-reported gender
    #[serde(default)]
    pub gender: Gender,
}

/// Positional feature vector tagged with its category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Category whose layout the values follow
    pub category: Category,
    /// Values in schema order
    pub values: Vec<f64>,
}

impl FeatureVector {
    /// Wrap positional values, checking the length against the category layout
    pub fn new(category: Category, values: Vec<f64>) -> Result<Self, SchemaError> {
        let expected = category.feature_count();
        if values.len() != expected {
            return Err(SchemaError::FeatureCount {
                category: category.as_str(),
                expected,
                actual: values.len(),
            });
        }
        Ok(Self { category, values })
    }

    /// Vector with every field at its form default
    pub fn defaults(category: Category) -> Self {
        Self {
            category,
            values: schema(category).iter().map(|f| f.default).collect(),
        }
    }

    /// Assemble a vector from named fields.
    ///
    /// Missing fields fall back to the profile age (for `age`) and then to the
    /// schema default.
    pub fn from_named(
        category: Category,
        fields: &BTreeMap<String, f64>,
        profile: Option<&Profile>,
    ) -> Result<Self, SchemaError> {
        let layout = schema(category);

        let unknown = fields
            .keys()
            .find(|k| !layout.iter().any(|f| f.name == k.as_str()));
        if let Some(unknown) = unknown {
            return Err(SchemaError::UnknownField {
                category: category.as_str(),
                field: unknown.clone(),
            });
        }

        let profile_age = profile.and_then(|p| p.age);
        let values = layout
            .iter()
            .map(|spec| match fields.get(spec.name) {
                Some(value) => *value,
                None if spec.name == "age" => profile_age.unwrap_or(spec.default),
                None => spec.default,
            })
            .collect::<Vec<_>>();

        debug!(
            "Assembled {} vector from {} named fields",
            category,
            fields.len()
        );

        Ok(Self { category, values })
    }

    /// Look up a value by field name
    pub fn get(&self, name: &str) -> Option<f64> {
        schema(self.category)
            .iter()
            .position(|f| f.name == name)
            .and_then(|idx| self.values.get(idx).copied())
    }

    /// Values as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
