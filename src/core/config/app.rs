//! Application configuration: predictor, web host and the top-level file format.
//!
//! Every section deserializes with defaults for missing fields, so a JSON
//! config file only needs to name what it changes:
//!
//! ```rust
//! use rice_disease_classifier::core::config::AppConfig;
//!
//! let config: AppConfig = serde_json::from_str(r#"{
//!     "model_path": "models/rice_disease_model.onnx",
//!     "server": { "port": 8080 }
//! }"#).unwrap();
//! assert_eq!(config.server.port, 8080);
//! assert_eq!(config.predictor.input_size, 224);
//! ```

use super::errors::{ConfigError, ConfigValidator};
use super::onnx::OrtSessionConfig;
use crate::core::constants::{DEFAULT_INPUT_SIZE, DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT};
use crate::core::errors::PredictResult;
use crate::domain::Vocabulary;
use crate::processors::{ResizeFilter, TensorLayout};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Preprocessing and label settings for the predictor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Side length the image is resized to before inference.
    pub input_size: u32,
    /// Resampling filter for the resize.
    pub resize_filter: ResizeFilter,
    /// Layout of the batched input tensor.
    pub layout: TensorLayout,
    /// Labels in model output order. `None` uses the rice disease labels.
    pub labels: Option<Vec<String>>,
    /// Advisory per label. `None` uses the rice disease advisories.
    pub advisories: Option<HashMap<String, String>>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_INPUT_SIZE,
            resize_filter: ResizeFilter::default(),
            layout: TensorLayout::default(),
            labels: None,
            advisories: None,
        }
    }
}

impl PredictorConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model input side length.
    pub fn with_input_size(mut self, size: u32) -> Self {
        self.input_size = size;
        self
    }

    /// Sets the tensor layout.
    pub fn with_layout(mut self, layout: TensorLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Sets the resize filter.
    pub fn with_resize_filter(mut self, filter: ResizeFilter) -> Self {
        self.resize_filter = filter;
        self
    }

    /// Replaces the label vocabulary.
    pub fn with_labels(mut self, labels: Vec<String>, advisories: HashMap<String, String>) -> Self {
        self.labels = Some(labels);
        self.advisories = Some(advisories);
        self
    }

    /// Builds the label vocabulary this configuration describes.
    pub fn vocabulary(&self) -> Result<Vocabulary, ConfigError> {
        match (&self.labels, &self.advisories) {
            (None, None) => Ok(Vocabulary::rice_disease()),
            (labels, advisories) => {
                let labels = labels.clone().unwrap_or_else(|| {
                    Vocabulary::rice_disease().labels().to_vec()
                });
                Vocabulary::new(labels, advisories.clone().unwrap_or_default())
            }
        }
    }
}

impl ConfigValidator for PredictorConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.validate_image_dimensions(self.input_size, self.input_size)?;
        self.vocabulary().map(|_| ())
    }
}

/// Settings for the HTTP host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Largest accepted request body in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServerConfig {
    /// The `host:port` string to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ConfigValidator for ServerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::InvalidConfig {
                message: "host must not be empty".to_string(),
            });
        }
        self.validate_positive_usize(self.max_upload_bytes, "max_upload_bytes")
    }
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the ONNX model file.
    pub model_path: Option<PathBuf>,
    /// Display name of the model. Defaults to the model file stem.
    pub model_name: Option<String>,
    /// Predictor settings.
    pub predictor: PredictorConfig,
    /// ONNX Runtime session settings.
    pub ort_session: OrtSessionConfig,
    /// Web host settings.
    pub server: ServerConfig,
}

impl AppConfig {
    /// Loads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> PredictResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Returns the model path or a configuration error if none was given.
    pub fn require_model_path(&self) -> Result<&Path, ConfigError> {
        self.model_path
            .as_deref()
            .ok_or_else(|| ConfigError::InvalidConfig {
                message: "a model path is required (--model-path or \"model_path\")".to_string(),
            })
    }
}

impl ConfigValidator for AppConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let model_path = self.require_model_path()?;
        self.validate_model_path(model_path)?;
        self.predictor.validate()?;
        self.ort_session.validate()?;
        self.server.validate()
    }
}
