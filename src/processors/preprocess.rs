//! Image preprocessing for the classifier.
//!
//! The shipped model embeds its own rescaling layer, so pixels are handed
//! over as raw `0.0..=255.0` floats. Dividing by 255 here would not raise an
//! error; it would silently shift every prediction.

use super::types::{ResizeFilter, TensorLayout};
use crate::core::batch::Tensor4D;
use crate::core::constants::{DEFAULT_INPUT_SIZE, INPUT_CHANNELS};
use crate::core::errors::{PredictError, PredictResult};
use image::{DynamicImage, RgbImage, imageops, imageops::FilterType};
use ndarray::Array4;

/// Converts an arbitrary image into a single-image batch tensor.
#[derive(Debug, Clone)]
pub struct ImagePreprocessor {
    input_size: u32,
    filter: FilterType,
    layout: TensorLayout,
}

impl Default for ImagePreprocessor {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_SIZE, ResizeFilter::default(), TensorLayout::default())
    }
}

impl ImagePreprocessor {
    /// Creates a preprocessor producing `input_size x input_size` tensors.
    pub fn new(input_size: u32, filter: ResizeFilter, layout: TensorLayout) -> Self {
        Self {
            input_size,
            filter: filter.into(),
            layout,
        }
    }

    /// Side length of the produced tensor.
    pub fn input_size(&self) -> u32 {
        self.input_size
    }

    /// Layout of the produced tensor.
    pub fn layout(&self) -> TensorLayout {
        self.layout
    }

    /// Converts to RGB and resizes exactly to the model input size.
    ///
    /// Alpha and palette information are discarded. The aspect ratio is not
    /// preserved.
    pub fn resize(&self, image: &DynamicImage) -> PredictResult<RgbImage> {
        if image.width() == 0 || image.height() == 0 {
            return Err(PredictError::invalid_input(format!(
                "image has zero size ({}x{})",
                image.width(),
                image.height()
            )));
        }

        let rgb = image.to_rgb8();
        if rgb.width() == self.input_size && rgb.height() == self.input_size {
            return Ok(rgb);
        }
        Ok(imageops::resize(
            &rgb,
            self.input_size,
            self.input_size,
            self.filter,
        ))
    }

    /// Produces the batch tensor for one image.
    ///
    /// The shape is `[1, size, size, 3]` for NHWC or `[1, 3, size, size]` for
    /// NCHW; values keep the 0-255 intensity range.
    pub fn preprocess(&self, image: &DynamicImage) -> PredictResult<Tensor4D> {
        let resized = self.resize(image)?;
        let size = self.input_size as usize;
        let shape = self.layout.batch_shape(size, INPUT_CHANNELS);

        let tensor = match self.layout {
            TensorLayout::NHWC => {
                let data: Vec<f32> = resized.into_raw().into_iter().map(f32::from).collect();
                Array4::from_shape_vec((shape[0], shape[1], shape[2], shape[3]), data)?
            }
            TensorLayout::NCHW => {
                Array4::from_shape_fn((shape[0], shape[1], shape[2], shape[3]), |(_, c, y, x)| {
                    f32::from(resized.get_pixel(x as u32, y as u32)[c])
                })
            }
        };

        tracing::debug!(
            source_width = image.width(),
            source_height = image.height(),
            shape = ?tensor.shape(),
            "preprocessed image"
        );
        Ok(tensor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    #[test]
    fn test_nhwc_shape_and_raw_range() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([0, 255, 0])));
        let tensor = ImagePreprocessor::default().preprocess(&image).unwrap();

        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert_eq!(tensor[[0, 10, 10, 0]], 0.0);
        assert_eq!(tensor[[0, 10, 10, 1]], 255.0);
        assert_eq!(tensor[[0, 223, 223, 2]], 0.0);
        assert!(tensor.iter().all(|v| (0.0..=255.0).contains(v)));
    }

    #[test]
    fn test_nchw_layout() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 32, Rgb([10, 20, 30])));
        let preprocessor = ImagePreprocessor::new(16, ResizeFilter::Nearest, TensorLayout::NCHW);
        let tensor = preprocessor.preprocess(&image).unwrap();

        assert_eq!(tensor.shape(), &[1, 3, 16, 16]);
        assert_eq!(tensor[[0, 0, 5, 5]], 10.0);
        assert_eq!(tensor[[0, 1, 5, 5]], 20.0);
        assert_eq!(tensor[[0, 2, 5, 5]], 30.0);
    }

    #[test]
    fn test_alpha_is_discarded() {
        let image =
            DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 0])));
        let preprocessor = ImagePreprocessor::new(8, ResizeFilter::Nearest, TensorLayout::NHWC);
        let tensor = preprocessor.preprocess(&image).unwrap();

        assert_eq!(tensor.shape(), &[1, 8, 8, 3]);
        assert_eq!(tensor[[0, 0, 0, 0]], 200.0);
        assert_eq!(tensor[[0, 0, 0, 1]], 100.0);
        assert_eq!(tensor[[0, 0, 0, 2]], 50.0);
    }

    #[test]
    fn test_grayscale_is_expanded_to_three_channels() {
        let image = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(20, 40, image::Luma([77])));
        let tensor = ImagePreprocessor::default().preprocess(&image).unwrap();

        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert_eq!(tensor[[0, 100, 100, 0]], 77.0);
        assert_eq!(tensor[[0, 100, 100, 2]], 77.0);
    }

    #[test]
    fn test_resize_is_deterministic() {
        let mut source = RgbImage::new(97, 61);
        for (x, y, pixel) in source.enumerate_pixels_mut() {
            *pixel = Rgb([(x * 2) as u8, (y * 3) as u8, ((x + y) % 256) as u8]);
        }
        let image = DynamicImage::ImageRgb8(source);
        let preprocessor = ImagePreprocessor::default();

        assert_eq!(
            preprocessor.preprocess(&image).unwrap(),
            preprocessor.preprocess(&image).unwrap()
        );
    }

    #[test]
    fn test_zero_sized_image_rejected() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(0, 10));
        let err = ImagePreprocessor::default().preprocess(&image).unwrap_err();
        assert!(err.is_client_error());
    }
}
