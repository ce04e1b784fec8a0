//! Configuration types and validation.

pub mod app;
pub mod errors;
pub mod onnx;

pub use app::{AppConfig, PredictorConfig, ServerConfig};
pub use errors::{ConfigError, ConfigValidator};
pub use onnx::{OrtExecutionProvider, OrtGraphOptimizationLevel, OrtSessionConfig};
