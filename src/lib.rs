//! # Rice Disease Classifier
//!
//! Classifies rice leaf photographs into one of four diseases with an ONNX
//! image model and renders a short markdown report with a treatment hint.
//!
//! ## Features
//!
//! - Load the model once and share it across requests
//! - Exact resize to the model input with raw 0-255 pixel values
//! - Labeled scores plus a ranked markdown report
//! - Upload page and JSON prediction endpoint built on axum
//! - ONNX Runtime integration with optional CUDA execution
//!
//! ## Modules
//!
//! * [`core`] - Configuration, error handling, constants and the inference seam
//! * [`domain`] - Label vocabulary and prediction types
//! * [`predictor`] - The rice disease predictor
//! * [`processors`] - Preprocessing and report rendering
//! * [`server`] - The HTTP host
//! * [`utils`] - Image loading and logging setup
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rice_disease_classifier::prelude::*;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let classifier = OrtClassifier::new("models/rice_disease_model.onnx")?;
//! let predictor = DiseasePredictorBuilder::new().build(Arc::new(classifier))?;
//!
//! let image = load_image(Path::new("leaf.jpg"))?;
//! let (scores, report) = predictor.classify(Some(&image))?.into_parts();
//! println!("{report}");
//! if let Some(scores) = scores {
//!     println!("{}", serde_json::to_string(&scores)?);
//! }
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod core;
pub mod domain;
pub mod predictor;
pub mod processors;
pub mod server;
pub mod utils;

/// Prelude module for convenient imports.
///
/// ```rust
/// use rice_disease_classifier::prelude::*;
/// ```
pub mod prelude {
    pub use crate::core::config::{AppConfig, PredictorConfig};
    pub use crate::core::inference::{Classifier, OrtClassifier};
    pub use crate::core::{PredictError, PredictResult};
    pub use crate::domain::{LabeledScores, Prediction, Vocabulary};
    pub use crate::predictor::{Classification, DiseasePredictor, DiseasePredictorBuilder};
    pub use crate::utils::{decode_image, load_image};
}
