//! Cached Model Registry

use crate::artifact::{JsonModel, StandardScaler};
use crate::locator::ModelLocator;
use crate::onnx::OnnxModel;
use crate::predictor::{LoadedModel, Predictor};
use crate::verdict::ModelVerdict;
use crate::InferenceError;
use feature_schema::Category;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Load state of one category's model
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelStatus {
    Loaded {
        path: PathBuf,
        kind: &'static str,
        scaler: bool,
    },
    Missing,
    Failed {
        reason: String,
    },
    /// Not probed yet
    Unknown,
}

#[derive(Clone)]
enum Slot {
    Loaded(Arc<LoadedModel>),
    Missing,
    Failed(String),
}

/// Loads each category's model on first use and caches the outcome
pub struct ModelRegistry {
    locator: ModelLocator,
    cache: Mutex<HashMap<Category, Slot>>,
}

impl ModelRegistry {
    /// Create a registry over a locator
    pub fn new(locator: ModelLocator) -> Self {
        info!(
            "Creating model registry over {} search directories",
            locator.search_dirs().len()
        );
        Self {
            locator,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Register an already-built model, replacing any cached entry
    pub fn insert(&self, model: LoadedModel) -> Result<(), InferenceError> {
        let category = model.category;
        self.lock()?.insert(category, Slot::Loaded(Arc::new(model)));
        info!("Registered {} model", category);
        Ok(())
    }

    /// Get the model for a category, loading it on first use
    pub fn get(&self, category: Category) -> Result<Arc<LoadedModel>, InferenceError> {
        let cached = self.lock()?.get(&category).cloned();
        let slot = match cached {
            Some(slot) => slot,
            None => {
                // Load without holding the cache lock
                let loaded = self.load(category);
                self.lock()?.entry(category).or_insert(loaded).clone()
            }
        };

        match slot {
            Slot::Loaded(model) => Ok(model),
            Slot::Missing => Err(InferenceError::ModelNotFound(category.to_string())),
            Slot::Failed(reason) => Err(InferenceError::ModelLoadError(reason)),
        }
    }

    /// Probe every category up front, returning how many models loaded
    pub fn preload(&self) -> usize {
        Category::ALL
            .iter()
            .filter(|category| self.get(**category).is_ok())
            .count()
    }

    /// Predict with the category's model and interpret the result
    pub fn predict(
        &self,
        category: Category,
        features: &[f64],
    ) -> Result<ModelVerdict, InferenceError> {
        let start = Instant::now();
        let model = self.get(category)?;
        let prediction = model.predict(features)?;
        debug!(
            "{} inference completed in {}us",
            category,
            start.elapsed().as_micros()
        );
        Ok(ModelVerdict::new(category, prediction))
    }

    /// Current load state of every category
    pub fn status(&self) -> Result<Vec<(Category, ModelStatus)>, InferenceError> {
        let cache = self.lock()?;

        Ok(Category::ALL
            .iter()
            .map(|category| {
                let status = match cache.get(category) {
                    Some(Slot::Loaded(model)) => ModelStatus::Loaded {
                        path: model.source.clone(),
                        kind: model.kind(),
                        scaler: model.has_scaler(),
                    },
                    Some(Slot::Missing) => ModelStatus::Missing,
                    Some(Slot::Failed(reason)) => ModelStatus::Failed {
                        reason: reason.clone(),
                    },
                    None => ModelStatus::Unknown,
                };
                (*category, status)
            })
            .collect())
    }

    /// Drop all cached models so artifacts are probed again
    pub fn reload(&self) -> Result<(), InferenceError> {
        self.lock()?.clear();
        info!("Model cache cleared");
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<Category, Slot>>, InferenceError> {
        self.cache
            .lock()
            .map_err(|e| InferenceError::InferenceFailed(format!("Lock error: {}", e)))
    }

    fn load(&self, category: Category) -> Slot {
        let stem = format!("{}_model", category);
        let Some(path) = self.locator.locate_any(&stem, &["onnx", "json"]) else {
            warn!("No {} model found; rule-based scoring only", category);
            return Slot::Missing;
        };

        let classifier: Result<Box<dyn Predictor>, InferenceError> =
            match ModelLocator::extension(&path).as_deref() {
                Some("onnx") => OnnxModel::load(&path, category.feature_count())
                    .map(|m| Box::new(m) as Box<dyn Predictor>),
                _ => JsonModel::load(&path).map(|m| Box::new(m) as Box<dyn Predictor>),
            };

        let classifier = match classifier {
            Ok(classifier) => classifier,
            Err(e) => {
                error!("Failed to load {} model: {}", category, e);
                return Slot::Failed(e.to_string());
            }
        };

        let scaler = self
            .locator
            .locate(&format!("{}_scaler.json", category))
            .and_then(|path| match StandardScaler::load(&path) {
                Ok(scaler) => Some(scaler),
                Err(e) => {
                    warn!("Ignoring {} scaler: {}", category, e);
                    None
                }
            });

        Slot::Loaded(Arc::new(LoadedModel::new(category, path, classifier, scaler)))
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new(ModelLocator::default())
    }
}
