//! Configuration error types and validation traits.

use std::path::Path;
use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error indicating that a model path does not exist.
    #[error("model path does not exist: {}", .path.display())]
    ModelPathNotFound { path: std::path::PathBuf },

    /// Error indicating that a configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error indicating that the label vocabulary is unusable.
    #[error("invalid vocabulary: {message}")]
    InvalidVocabulary { message: String },
}

impl From<ConfigError> for crate::core::errors::PredictError {
    fn from(err: ConfigError) -> Self {
        Self::ConfigError {
            message: err.to_string(),
        }
    }
}

/// A trait for validating configuration parameters.
///
/// Implementors only provide [`ConfigValidator::validate`]; the helper
/// methods cover the checks shared by every configuration section.
pub trait ConfigValidator {
    /// Validates the configuration.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Validates a model path.
    ///
    /// This method checks that the model path exists and is a file.
    fn validate_model_path(&self, path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            Err(ConfigError::ModelPathNotFound {
                path: path.to_path_buf(),
            })
        } else if !path.is_file() {
            Err(ConfigError::InvalidConfig {
                message: format!("Model path is not a file: {}", path.display()),
            })
        } else {
            Ok(())
        }
    }

    /// Validates image dimensions.
    ///
    /// This method checks that image dimensions are positive.
    fn validate_image_dimensions(&self, width: u32, height: u32) -> Result<(), ConfigError> {
        if width == 0 || height == 0 {
            Err(ConfigError::InvalidConfig {
                message: "Image dimensions must be positive".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validates that a count is greater than zero.
    fn validate_positive_usize(&self, value: usize, field: &str) -> Result<(), ConfigError> {
        if value == 0 {
            Err(ConfigError::InvalidConfig {
                message: format!("{field} must be greater than 0"),
            })
        } else {
            Ok(())
        }
    }
}
