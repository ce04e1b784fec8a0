//! ONNX Runtime configuration types and utilities.

use super::errors::{ConfigError, ConfigValidator};
use serde::{Deserialize, Serialize};

/// Graph optimization levels for ONNX Runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum OrtGraphOptimizationLevel {
    /// Disable all optimizations.
    DisableAll,
    /// Enable basic optimizations.
    #[default]
    Level1,
    /// Enable extended optimizations.
    Level2,
    /// Enable all optimizations.
    Level3,
}

/// Execution providers for ONNX Runtime.
///
/// Providers are tried in the order they are listed; ONNX Runtime falls back
/// to the CPU for operators a provider cannot run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum OrtExecutionProvider {
    /// CPU execution provider (always available)
    #[default]
    CPU,
    /// NVIDIA CUDA execution provider, requires the `cuda` feature
    CUDA {
        /// CUDA device ID (default: 0)
        device_id: Option<i32>,
    },
}

impl OrtExecutionProvider {
    /// Parses a device string such as `cpu`, `cuda` or `cuda:1`.
    pub fn parse_device(device: &str) -> Result<Vec<Self>, ConfigError> {
        let device = device.trim().to_lowercase();
        if device == "cpu" {
            return Ok(vec![Self::CPU]);
        }
        let device_id = if device == "cuda" {
            0
        } else if let Some(id) = device.strip_prefix("cuda:") {
            id.parse::<i32>().map_err(|_| ConfigError::InvalidConfig {
                message: format!("Invalid CUDA device id in '{device}'"),
            })?
        } else {
            return Err(ConfigError::InvalidConfig {
                message: format!("Unsupported device: {device}. Supported devices: cpu, cuda, cuda:N"),
            });
        };
        Ok(vec![
            Self::CUDA {
                device_id: Some(device_id),
            },
            Self::CPU,
        ])
    }
}

/// Configuration for ONNX Runtime sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrtSessionConfig {
    /// Number of threads used to parallelize execution within nodes
    pub intra_threads: Option<usize>,
    /// Number of threads used to parallelize execution across nodes
    pub inter_threads: Option<usize>,
    /// Graph optimization level
    pub optimization_level: Option<OrtGraphOptimizationLevel>,
    /// Execution providers in order of preference
    pub execution_providers: Option<Vec<OrtExecutionProvider>>,
}

impl OrtSessionConfig {
    /// Creates a new OrtSessionConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of intra-op threads.
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = Some(threads);
        self
    }

    /// Sets the number of inter-op threads.
    pub fn with_inter_threads(mut self, threads: usize) -> Self {
        self.inter_threads = Some(threads);
        self
    }

    /// Sets the graph optimization level.
    pub fn with_optimization_level(mut self, level: OrtGraphOptimizationLevel) -> Self {
        self.optimization_level = Some(level);
        self
    }

    /// Sets the execution providers.
    pub fn with_execution_providers(mut self, providers: Vec<OrtExecutionProvider>) -> Self {
        self.execution_providers = Some(providers);
        self
    }

    /// Gets the execution providers, defaulting to the CPU.
    pub fn get_execution_providers(&self) -> Vec<OrtExecutionProvider> {
        self.execution_providers
            .clone()
            .unwrap_or_else(|| vec![OrtExecutionProvider::CPU])
    }
}

impl ConfigValidator for OrtSessionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(intra) = self.intra_threads {
            self.validate_positive_usize(intra, "intra_threads")?;
        }
        if let Some(inter) = self.inter_threads {
            self.validate_positive_usize(inter, "inter_threads")?;
        }
        if let Some(providers) = &self.execution_providers
            && providers.is_empty()
        {
            return Err(ConfigError::InvalidConfig {
                message: "execution_providers must not be empty when set".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ort_session_config_builder() {
        let config = OrtSessionConfig::new()
            .with_intra_threads(4)
            .with_inter_threads(2)
            .with_optimization_level(OrtGraphOptimizationLevel::Level3);

        assert_eq!(config.intra_threads, Some(4));
        assert_eq!(config.inter_threads, Some(2));
        assert_eq!(
            config.optimization_level,
            Some(OrtGraphOptimizationLevel::Level3)
        );
        assert_eq!(
            config.get_execution_providers(),
            vec![OrtExecutionProvider::CPU]
        );
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(OrtSessionConfig::new().with_intra_threads(0).validate().is_err());
        assert!(OrtSessionConfig::new().validate().is_ok());
    }

    #[test]
    fn test_parse_device() {
        assert_eq!(
            OrtExecutionProvider::parse_device("CPU").unwrap(),
            vec![OrtExecutionProvider::CPU]
        );
        assert_eq!(
            OrtExecutionProvider::parse_device("cuda:1").unwrap(),
            vec![
                OrtExecutionProvider::CUDA { device_id: Some(1) },
                OrtExecutionProvider::CPU
            ]
        );
        assert!(OrtExecutionProvider::parse_device("cuda:x").is_err());
        assert!(OrtExecutionProvider::parse_device("tpu").is_err());
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: OrtSessionConfig =
            serde_json::from_str(r#"{"intra_threads": 2, "execution_providers": ["CPU"]}"#)
                .unwrap();
        assert_eq!(config.intra_threads, Some(2));
        assert!(config.inter_threads.is_none());
    }
}
