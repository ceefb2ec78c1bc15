//! Repository Implementation

use crate::StorageError;
use chrono::{DateTime, Utc};
use feature_schema::{Category, FeatureVector};
use health_rules::AssessmentResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

/// Model output kept alongside a rule assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub label: String,
    pub probability: f64,
    pub at_risk: bool,
}

/// One recorded assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub category: Category,
    pub features: Vec<f64>,
    pub risk_flag: bool,
    pub score: u8,
    pub assessment: String,
    pub recommendations: Vec<String>,
    pub model: Option<ModelSummary>,
    pub used_fallback: bool,
}

impl AssessmentRecord {
    /// Record a rule result for a vector
    pub fn new(vector: &FeatureVector, result: &AssessmentResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            category: vector.category,
            features: vector.values.clone(),
            risk_flag: result.risk_flag,
            score: result.score,
            assessment: result.assessment.clone(),
            recommendations: result.recommendations.clone(),
            model: None,
            used_fallback: false,
        }
    }

    /// Attach the model output
    pub fn with_model(mut self, model: ModelSummary) -> Self {
        self.model = Some(model);
        self
    }

    /// Mark that the model was wanted but unavailable
    pub fn with_fallback(mut self, used_fallback: bool) -> Self {
        self.used_fallback = used_fallback;
        self
    }
}

/// In-memory assessment history, oldest first
pub struct Repository {
    records: Mutex<VecDeque<AssessmentRecord>>,
    /// Max records kept
    max_records: usize,
}

impl Repository {
    /// Create a new in-memory repository
    pub fn new(max_records: usize) -> Self {
        info!("Creating in-memory assessment history (max {} records)", max_records);
        Self {
            records: Mutex::new(VecDeque::with_capacity(max_records.min(1024))),
            max_records: max_records.max(1),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, VecDeque<AssessmentRecord>>, StorageError> {
        self.records
            .lock()
            .map_err(|e| StorageError::LockError(e.to_string()))
    }

    /// Append a record, evicting the oldest beyond the retention limit
    pub fn insert(&self, record: AssessmentRecord) -> Result<Uuid, StorageError> {
        let mut records = self.lock()?;

        while records.len() >= self.max_records {
            records.pop_front();
        }

        let id = record.id;
        records.push_back(record);
        debug!("Inserted assessment {}", id);
        Ok(id)
    }

    /// Fetch a record by id
    pub fn get(&self, id: Uuid) -> Result<AssessmentRecord, StorageError> {
        self.lock()?
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    /// Newest-first records with an optional category filter
    pub fn list(
        &self,
        category: Option<Category>,
        limit: usize,
    ) -> Result<Vec<AssessmentRecord>, StorageError> {
        let records = self.lock()?;

        Ok(records
            .iter()
            .rev()
            .filter(|r| category.map_or(true, |c| r.category == c))
            .take(limit)
            .cloned()
            .collect())
    }

    /// Most recent record of each category, in category order
    pub fn latest_per_category(&self) -> Result<Vec<AssessmentRecord>, StorageError> {
        let records = self.lock()?;
        let mut latest = BTreeMap::new();
        for record in records.iter() {
            latest.insert(record.category, record);
        }
        Ok(latest.into_values().cloned().collect())
    }

    /// Total record count
    pub fn count(&self) -> Result<usize, StorageError> {
        Ok(self.lock()?.len())
    }

    /// Clear all records
    pub fn clear(&self) -> Result<usize, StorageError> {
        let mut records = self.lock()?;
        let removed = records.len();
        records.clear();
        info!("Cleared {} assessments", removed);
        Ok(removed)
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new(10_000)
    }
}
