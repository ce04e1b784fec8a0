//! Image preprocessing and report rendering.
//!
//! # Modules
//!
//! * `preprocess` - RGB conversion, exact resize and tensor conversion
//! * `report` - Markdown rendering of a prediction
//! * `types` - Layout and filter options shared with the configuration

pub mod preprocess;
pub mod report;
pub mod types;

pub use preprocess::ImagePreprocessor;
pub use types::{ResizeFilter, TensorLayout};
