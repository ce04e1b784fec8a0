//! The classifier seam and its ONNX Runtime implementation.
//!
//! The predictor only ever talks to [`Classifier`]: one synchronous call that
//! maps a preprocessed batch to one score row per image. [`OrtClassifier`] is
//! the production implementation; tests inject deterministic fakes.

pub mod ort_classifier;

pub use ort_classifier::OrtClassifier;

use crate::core::batch::{Tensor2D, Tensor4D};
use crate::core::errors::PredictResult;
use std::fmt::Debug;

/// An opaque model mapping an image batch to class scores.
///
/// Implementations are loaded once and shared read-only between requests,
/// hence the `Send + Sync` bound.
pub trait Classifier: Send + Sync + Debug {
    /// Runs one forward pass.
    ///
    /// # Arguments
    ///
    /// * `batch` - Preprocessed images, batch dimension first.
    ///
    /// # Returns
    ///
    /// A `[batch, classes]` score tensor.
    fn infer(&self, batch: &Tensor4D) -> PredictResult<Tensor2D>;

    /// Name of the model, used in logs and error messages.
    fn name(&self) -> &str;
}
