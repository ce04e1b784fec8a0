//! The core module of the classifier.
//!
//! This module contains the fundamental components, including:
//! - Tensor type aliases
//! - Configuration management
//! - Constants such as the rice disease labels and advisories
//! - Error handling
//! - Inference engine integration

pub mod batch;
pub mod config;
pub mod constants;
pub mod errors;
pub mod inference;

pub use crate::utils::{decode_image, init_tracing, load_image};
pub use batch::{Tensor2D, Tensor4D};
pub use config::{AppConfig, ConfigError, ConfigValidator, PredictorConfig, ServerConfig};
pub use constants::*;
pub use errors::{PredictError, PredictResult};
pub use inference::{Classifier, OrtClassifier};
