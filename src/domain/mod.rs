//! Domain types: the label vocabulary and prediction results.

pub mod prediction;
pub mod vocabulary;

pub use prediction::{LabeledScores, Prediction, TopPrediction};
pub use vocabulary::Vocabulary;
