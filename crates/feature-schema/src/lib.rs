//! Feature Schemas and Validation
//!
//! Defines the four assessment categories, the positional layout of each
//! category's feature vector, and range checking against the entry bounds
//! of the dashboard forms.

mod category;
mod error;
mod schema;
mod validator;
mod vector;

pub use category::Category;
pub use error::{SchemaError, ValidationError};
pub use schema::{schema, FieldSpec};
pub use validator::{ValidationResult, Validator};
pub use vector::{FeatureVector, Gender, Profile};
