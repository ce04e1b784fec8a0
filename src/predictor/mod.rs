//! Predictors that turn an uploaded image into a labeled result.
//!
//! A predictor owns the preprocessing and label vocabulary and borrows a
//! shared [`Classifier`](crate::core::inference::Classifier) for inference.

pub mod disease_classifier;

pub use disease_classifier::{Classification, DiseasePredictor, DiseasePredictorBuilder};
