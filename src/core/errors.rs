//! Error types for the prediction pipeline.
//!
//! This module defines the errors that can occur while loading a model,
//! decoding an uploaded image, running inference, or reading configuration.
//! Helper constructors attach the context that makes a failure traceable
//! back to the model or stage that produced it.
//!
//! # Usage
//!
//! ```rust
//! use rice_disease_classifier::core::errors::PredictError;
//!
//! let error = PredictError::config_error("model path must not be empty");
//! assert!(error.to_string().contains("model path"));
//!
//! let error = PredictError::invalid_input("image has zero width");
//! assert!(matches!(error, PredictError::InvalidInput { .. }));
//! ```

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Convenient result alias for prediction operations.
pub type PredictResult<T> = Result<T, PredictError>;

/// A plain message wrapped as an error source.
///
/// Used where a failure is detected locally and there is no underlying
/// library error to chain.
#[derive(Debug, Clone)]
pub struct SimpleError {
    message: String,
}

impl SimpleError {
    /// Creates a new error carrying `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for SimpleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SimpleError {}

/// Errors raised by the classifier, the predictor and the hosting layers.
#[derive(Error, Debug)]
pub enum PredictError {
    /// The uploaded bytes or file could not be decoded as an image.
    #[error("image load: {0}")]
    ImageLoad(#[source] image::ImageError),

    /// The model file could not be turned into an inference session.
    #[error("failed to load model '{}': {reason}", .path.display())]
    ModelLoad {
        /// Path of the model file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
        /// Optional hint for the operator.
        suggestion: Option<String>,
        /// The underlying engine error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The forward pass failed.
    #[error("inference with model '{model_name}' failed: {context}")]
    Inference {
        /// Name of the model that was running.
        model_name: String,
        /// Additional context about the failure.
        context: String,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The model produced output that does not line up with the label vocabulary.
    #[error("model inconsistent: {message}")]
    ModelInconsistent {
        /// A message describing the mismatch.
        message: String,
    },

    /// Error indicating invalid input.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// A message describing the invalid input.
        message: String,
    },

    /// Error indicating a configuration problem.
    #[error("configuration: {message}")]
    ConfigError {
        /// A message describing the configuration error.
        message: String,
    },

    /// Error from the ONNX Runtime session.
    #[error(transparent)]
    Session(#[from] ort::Error),

    /// Error from tensor operations.
    #[error("tensor operation")]
    Tensor(#[from] ndarray::ShapeError),

    /// IO error.
    #[error("io")]
    Io(#[from] std::io::Error),

    /// Malformed JSON configuration.
    #[error("json")]
    Json(#[from] serde_json::Error),
}

impl PredictError {
    /// Creates a model loading error.
    ///
    /// # Arguments
    ///
    /// * `path` - Path of the model that failed to load.
    /// * `reason` - Short description of the failure.
    /// * `suggestion` - Optional remediation hint.
    /// * `source` - Optional underlying error.
    pub fn model_load_error(
        path: &Path,
        reason: &str,
        suggestion: Option<&str>,
        source: Option<impl std::error::Error + Send + Sync + 'static>,
    ) -> Self {
        Self::ModelLoad {
            path: path.to_path_buf(),
            reason: reason.to_string(),
            suggestion: suggestion.map(str::to_string),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Creates an inference error for `model_name`.
    pub fn inference_error(
        model_name: &str,
        context: &str,
        error: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Inference {
            model_name: model_name.to_string(),
            context: context.to_string(),
            source: Box::new(error),
        }
    }

    /// Creates a model inconsistency error.
    pub fn model_inconsistent(message: impl Into<String>) -> Self {
        Self::ModelInconsistent {
            message: message.into(),
        }
    }

    /// Creates an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Returns true when the error was caused by what the caller sent rather
    /// than by the model or the host.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ImageLoad(_) | Self::InvalidInput { .. })
    }
}
