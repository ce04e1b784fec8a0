//! Types used in image preprocessing.

use image::imageops::FilterType;
use serde::{Deserialize, Serialize};

/// Memory layout of the batched image tensor handed to the classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TensorLayout {
    /// Batch, Height, Width, Channel order (common in TensorFlow/Keras exports)
    #[default]
    NHWC,
    /// Batch, Channel, Height, Width order (common in PyTorch exports)
    NCHW,
}

impl TensorLayout {
    /// Returns the tensor shape for a single image of `size x size` pixels.
    pub fn batch_shape(self, size: usize, channels: usize) -> [usize; 4] {
        match self {
            TensorLayout::NHWC => [1, size, size, channels],
            TensorLayout::NCHW => [1, channels, size, size],
        }
    }
}

/// Resampling filter used when resizing to the model input size.
///
/// Mirrors [`image::imageops::FilterType`] so the choice can live in a
/// serialized configuration file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeFilter {
    /// Nearest neighbour
    Nearest,
    /// Linear
    Triangle,
    /// Cubic (bicubic)
    #[default]
    CatmullRom,
    /// Gaussian
    Gaussian,
    /// Lanczos with window 3
    Lanczos3,
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
