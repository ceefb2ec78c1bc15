//! Application configuration

use crate::service::ScoringPolicy;
use config::{Config, ConfigError, Environment, File};
use model_runtime::DEFAULT_SEARCH_DIRS;
use serde::{Deserialize, Serialize};

/// Default config file, extension resolved by the config crate
pub const DEFAULT_CONFIG_PATH: &str = "config/health";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub models: ModelsConfig,
    pub history: HistoryConfig,
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Model lookup and scoring policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    /// Directories probed for `<category>_model.{onnx,json}`, in order
    pub search_dirs: Vec<String>,
    pub policy: ScoringPolicy,
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            search_dirs: DEFAULT_SEARCH_DIRS.iter().map(|d| d.to_string()).collect(),
            policy: ScoringPolicy::default(),
        }
    }
}

/// Assessment history retention
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_records: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self { max_records: 10_000 }
    }
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load from `HEALTH_CONFIG` (or the default path) plus `HEALTH__*` variables
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("HEALTH_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load from a specific file; a missing file leaves the defaults in place
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Self::load_with(path, Self::environment())
    }

    /// `HEALTH__SECTION__KEY` overrides; `models.search_dirs` splits on commas
    fn environment() -> Environment {
        Environment::with_prefix("HEALTH")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("models.search_dirs")
    }

    fn load_with(path: &str, environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()
    }
}
