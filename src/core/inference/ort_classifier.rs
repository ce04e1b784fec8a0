//! ONNX Runtime backed classifier.

use super::Classifier;
use crate::core::batch::{Tensor2D, Tensor4D};
use crate::core::config::{OrtExecutionProvider, OrtGraphOptimizationLevel, OrtSessionConfig};
use crate::core::errors::{PredictError, PredictResult, SimpleError};
use ndarray::ArrayView2;
use ort::execution_providers::ExecutionProviderDispatch;
use ort::logging::LogLevel;
use ort::session::Session;
use ort::session::builder::{GraphOptimizationLevel, SessionBuilder};
use ort::value::{TensorRef, ValueType};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A classifier running an ONNX model through ONNX Runtime.
///
/// The session is created once and reused for every request. `Session::run`
/// needs exclusive access, so calls are serialized through a mutex.
pub struct OrtClassifier {
    session: Mutex<Session>,
    input_name: String,
    output_name: String,
    model_path: PathBuf,
    model_name: String,
}

impl std::fmt::Debug for OrtClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrtClassifier")
            .field("input_name", &self.input_name)
            .field("output_name", &self.output_name)
            .field("model_path", &self.model_path)
            .field("model_name", &self.model_name)
            .finish()
    }
}

impl OrtClassifier {
    /// Loads a model with default ONNX Runtime settings.
    pub fn new(model_path: impl AsRef<Path>) -> PredictResult<Self> {
        Self::from_config(&OrtSessionConfig::default(), model_path, None)
    }

    /// Loads a model, applying the given session configuration.
    ///
    /// Input and output tensor names are taken from the model itself. The
    /// model name defaults to the file stem.
    pub fn from_config(
        config: &OrtSessionConfig,
        model_path: impl AsRef<Path>,
        model_name: Option<&str>,
    ) -> PredictResult<Self> {
        let path = model_path.as_ref();
        // Keep ONNX Runtime quiet unless something actually fails.
        let builder = Session::builder()?.with_log_level(LogLevel::Error)?;
        let builder = Self::apply_ort_config(builder, config)?;
        let session = builder.commit_from_file(path).map_err(|e| {
            PredictError::model_load_error(
                path,
                "failed to create ONNX session",
                Some("verify the model file exists and was exported to ONNX"),
                Some(e),
            )
        })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| {
                PredictError::model_load_error(
                    path,
                    "model declares no inputs",
                    None,
                    None::<SimpleError>,
                )
            })?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| {
                PredictError::model_load_error(
                    path,
                    "model declares no outputs",
                    None,
                    None::<SimpleError>,
                )
            })?;

        let model_name = model_name
            .map(str::to_string)
            .or_else(|| {
                path.file_stem()
                    .and_then(|s| s.to_str())
                    .map(|s| s.to_string())
            })
            .unwrap_or_else(|| "unknown_model".to_string());

        tracing::info!(
            model = %model_name,
            path = %path.display(),
            input = %input_name,
            output = %output_name,
            "loaded ONNX model"
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            output_name,
            model_path: path.to_path_buf(),
            model_name,
        })
    }

    fn apply_ort_config(
        mut builder: SessionBuilder,
        cfg: &OrtSessionConfig,
    ) -> Result<SessionBuilder, ort::Error> {
        if let Some(intra) = cfg.intra_threads {
            builder = builder.with_intra_threads(intra)?;
        }
        if let Some(inter) = cfg.inter_threads {
            builder = builder.with_inter_threads(inter)?;
        }
        if let Some(level) = cfg.optimization_level {
            let mapped = match level {
                OrtGraphOptimizationLevel::DisableAll => GraphOptimizationLevel::Disable,
                OrtGraphOptimizationLevel::Level1 => GraphOptimizationLevel::Level1,
                OrtGraphOptimizationLevel::Level2 => GraphOptimizationLevel::Level2,
                OrtGraphOptimizationLevel::Level3 => GraphOptimizationLevel::Level3,
            };
            builder = builder.with_optimization_level(mapped)?;
        }
        if let Some(eps) = &cfg.execution_providers {
            let providers = Self::build_execution_providers(eps);
            if !providers.is_empty() {
                builder = builder.with_execution_providers(providers)?;
            }
        }
        Ok(builder)
    }

    fn build_execution_providers(eps: &[OrtExecutionProvider]) -> Vec<ExecutionProviderDispatch> {
        let mut providers = Vec::new();
        for ep in eps {
            match ep {
                OrtExecutionProvider::CPU => {
                    providers.push(ort::execution_providers::CPUExecutionProvider::default().build());
                }
                #[cfg(feature = "cuda")]
                OrtExecutionProvider::CUDA { device_id } => {
                    let mut cuda = ort::execution_providers::CUDAExecutionProvider::default();
                    if let Some(id) = device_id {
                        cuda = cuda.with_device_id(*id);
                    }
                    providers.push(cuda.build());
                }
                #[cfg(not(feature = "cuda"))]
                OrtExecutionProvider::CUDA { .. } => {
                    tracing::warn!(
                        "CUDA requested but the cuda feature is not enabled. Falling back to CPU."
                    );
                }
            }
        }
        providers
    }

    /// Returns the model path associated with this classifier.
    pub fn model_path(&self) -> &Path {
        &self.model_path
    }

    /// Attempts to read the declared shape of the model input.
    ///
    /// Dynamic dimensions are returned as `-1`.
    pub fn primary_input_shape(&self) -> Option<Vec<i64>> {
        let session = self.session.lock().ok()?;
        let input = session.inputs.first()?;
        match &input.input_type {
            ValueType::Tensor { shape, .. } => Some(shape.iter().copied().collect()),
            _ => None,
        }
    }
}

impl Classifier for OrtClassifier {
    fn infer(&self, batch: &Tensor4D) -> PredictResult<Tensor2D> {
        let input_shape = batch.shape().to_vec();
        let batch_size = input_shape[0];

        let input_tensor = TensorRef::from_array_view(batch.view()).map_err(|e| {
            PredictError::inference_error(
                &self.model_name,
                &format!("failed to convert input tensor with shape {input_shape:?}"),
                e,
            )
        })?;

        let mut session = self.session.lock().map_err(|_| {
            PredictError::inference_error(
                &self.model_name,
                "failed to acquire session lock",
                SimpleError::new("session lock poisoned"),
            )
        })?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(|e| {
                PredictError::inference_error(
                    &self.model_name,
                    &format!(
                        "forward pass failed with input '{}' {:?} -> output '{}'",
                        self.input_name, input_shape, self.output_name
                    ),
                    e,
                )
            })?;

        let (output_shape, output_data) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| {
                PredictError::inference_error(
                    &self.model_name,
                    &format!("failed to extract output tensor '{}' as f32", self.output_name),
                    e,
                )
            })?;

        if output_shape.len() != 2 || output_shape[0] as usize != batch_size {
            return Err(PredictError::model_inconsistent(format!(
                "model '{}' returned output shape {:?}, expected [{}, classes]",
                self.model_name,
                output_shape.to_vec(),
                batch_size
            )));
        }
        let num_classes = output_shape[1] as usize;
        let scores = ArrayView2::from_shape((batch_size, num_classes), output_data)?;

        tracing::trace!(model = %self.model_name, ?input_shape, num_classes, "inference complete");
        Ok(scores.to_owned())
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}
