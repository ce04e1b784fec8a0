//! Tensor types exchanged between the preprocessor, the classifier and the predictor.

/// A 2-dimensional tensor, `[batch, classes]` for classifier output.
pub type Tensor2D = ndarray::Array2<f32>;

/// A 4-dimensional tensor, the batched image input of the classifier.
pub type Tensor4D = ndarray::Array4<f32>;
