//! Rice leaf disease predictor.
//!
//! Ties the preprocessing, the shared classifier and the report renderer
//! together. One call handles one image and keeps no state between calls.

use crate::core::config::{ConfigValidator, PredictorConfig};
use crate::core::constants::NO_IMAGE_PROMPT;
use crate::core::errors::{PredictError, PredictResult};
use crate::core::inference::Classifier;
use crate::domain::{LabeledScores, Prediction, Vocabulary};
use crate::processors::{ImagePreprocessor, report};
use image::DynamicImage;
use std::sync::Arc;

/// Outcome of [`DiseasePredictor::classify`]: the scores for the ranked bar
/// display and the markdown report.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Classification {
    /// Score per label, or `None` when no image was supplied.
    pub scores: Option<LabeledScores>,
    /// Detailed analysis, or the upload prompt when no image was supplied.
    pub report: String,
}

impl Classification {
    /// The result returned when no image was supplied.
    pub fn no_image() -> Self {
        Self {
            scores: None,
            report: NO_IMAGE_PROMPT.to_string(),
        }
    }

    /// Splits into `(scores, report)`.
    pub fn into_parts(self) -> (Option<LabeledScores>, String) {
        (self.scores, self.report)
    }
}

/// Classifies rice leaf images with a shared, read-only classifier.
#[derive(Debug, Clone)]
pub struct DiseasePredictor {
    classifier: Arc<dyn Classifier>,
    preprocessor: ImagePreprocessor,
    vocabulary: Vocabulary,
}

impl DiseasePredictor {
    /// Creates a predictor with default preprocessing and the rice disease vocabulary.
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            preprocessor: ImagePreprocessor::default(),
            vocabulary: Vocabulary::rice_disease(),
        }
    }

    /// The label vocabulary in model output order.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The preprocessing applied before inference.
    pub fn preprocessor(&self) -> &ImagePreprocessor {
        &self.preprocessor
    }

    /// Name of the underlying model.
    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    /// Runs preprocessing and inference and selects the top label.
    ///
    /// # Errors
    ///
    /// Propagates preprocessing and inference failures. Returns
    /// [`PredictError::ModelInconsistent`] when the classifier output does
    /// not have exactly one score per vocabulary label.
    pub fn predict(&self, image: &DynamicImage) -> PredictResult<Prediction> {
        let batch = self.preprocessor.preprocess(image)?;
        let output = self.classifier.infer(&batch)?;

        let (rows, cols) = output.dim();
        if rows != 1 || cols != self.vocabulary.len() {
            return Err(PredictError::model_inconsistent(format!(
                "model '{}' produced {rows}x{cols} scores, expected 1x{} for labels {:?}",
                self.classifier.name(),
                self.vocabulary.len(),
                self.vocabulary.labels()
            )));
        }

        let scores = output.row(0).to_vec();
        let prediction = Prediction::from_scores(self.vocabulary.labels(), &scores)
            .ok_or_else(|| PredictError::model_inconsistent("vocabulary has no labels"))?;

        tracing::debug!(
            model = self.classifier.name(),
            top = %prediction.top.label,
            score = prediction.top.score,
            total = prediction.scores.total(),
            "prediction complete"
        );
        Ok(prediction)
    }

    /// Classifies an optional image and renders the report.
    ///
    /// Without an image no inference happens and the upload prompt is
    /// returned instead of an error.
    pub fn classify(&self, image: Option<&DynamicImage>) -> PredictResult<Classification> {
        let Some(image) = image else {
            tracing::debug!("classification requested without an image");
            return Ok(Classification::no_image());
        };

        let prediction = self.predict(image)?;
        let report = report::render(&prediction, &self.vocabulary);
        Ok(Classification {
            scores: Some(prediction.scores),
            report,
        })
    }
}

/// Builder for [`DiseasePredictor`].
#[derive(Debug, Default)]
pub struct DiseasePredictorBuilder {
    config: PredictorConfig,
}

impl DiseasePredictorBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole predictor configuration.
    pub fn config(mut self, config: PredictorConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the model input side length.
    pub fn input_size(mut self, size: u32) -> Self {
        self.config.input_size = size;
        self
    }

    /// Sets the tensor layout.
    pub fn layout(mut self, layout: crate::processors::TensorLayout) -> Self {
        self.config.layout = layout;
        self
    }

    /// Validates the configuration and builds the predictor around `classifier`.
    pub fn build(self, classifier: Arc<dyn Classifier>) -> PredictResult<DiseasePredictor> {
        self.config.validate()?;
        let vocabulary = self.config.vocabulary()?;
        let preprocessor = ImagePreprocessor::new(
            self.config.input_size,
            self.config.resize_filter,
            self.config.layout,
        );
        tracing::info!(
            model = classifier.name(),
            input_size = self.config.input_size,
            layout = ?self.config.layout,
            labels = vocabulary.len(),
            "predictor ready"
        );
        Ok(DiseasePredictor {
            classifier,
            preprocessor,
            vocabulary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::batch::{Tensor2D, Tensor4D};
    use crate::core::errors::SimpleError;
    use image::{Rgb, RgbImage};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Returns fixed scores and records what it was called with.
    #[derive(Debug)]
    struct FixedClassifier {
        scores: Vec<f32>,
        calls: AtomicUsize,
        last_shape: Mutex<Option<Vec<usize>>>,
    }

    impl FixedClassifier {
        fn new(scores: &[f32]) -> Arc<Self> {
            Arc::new(Self {
                scores: scores.to_vec(),
                calls: AtomicUsize::new(0),
                last_shape: Mutex::new(None),
            })
        }
    }

    impl Classifier for FixedClassifier {
        fn infer(&self, batch: &Tensor4D) -> PredictResult<Tensor2D> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_shape.lock().unwrap() = Some(batch.shape().to_vec());
            Ok(Tensor2D::from_shape_vec((1, self.scores.len()), self.scores.clone())?)
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    /// Softmax over the mean intensity of each channel plus a constant.
    #[derive(Debug)]
    struct ChannelSoftmax;

    impl Classifier for ChannelSoftmax {
        fn infer(&self, batch: &Tensor4D) -> PredictResult<Tensor2D> {
            let pixels = (batch.shape()[1] * batch.shape()[2]) as f32;
            let mut logits = vec![1.0f32];
            for c in 0..3 {
                let sum: f32 = batch.slice(ndarray::s![0, .., .., c]).sum();
                logits.push(sum / pixels / 64.0);
            }
            let max = logits.iter().cloned().fold(f32::MIN, f32::max);
            let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
            let total: f32 = exps.iter().sum();
            let probs: Vec<f32> = exps.iter().map(|e| e / total).collect();
            Ok(Tensor2D::from_shape_vec((1, 4), probs)?)
        }

        fn name(&self) -> &str {
            "channel-softmax"
        }
    }

    #[derive(Debug)]
    struct FailingClassifier;

    impl Classifier for FailingClassifier {
        fn infer(&self, _batch: &Tensor4D) -> PredictResult<Tensor2D> {
            Err(PredictError::inference_error(
                "failing",
                "forward pass",
                SimpleError::new("accelerator lost"),
            ))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn green_image() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(300, 300, Rgb([0, 255, 0])))
    }

    #[test]
    fn test_no_image_returns_prompt_without_inference() {
        let classifier = FixedClassifier::new(&[0.1, 0.2, 0.3, 0.4]);
        let predictor = DiseasePredictor::new(classifier.clone());

        let (scores, report) = predictor.classify(None).unwrap().into_parts();
        assert!(scores.is_none());
        assert_eq!(report, "Please upload an image first!");
        assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_classifier_receives_single_nhwc_batch() {
        let classifier = FixedClassifier::new(&[0.1, 0.2, 0.3, 0.4]);
        let predictor = DiseasePredictor::new(classifier.clone());
        predictor.classify(Some(&green_image())).unwrap();

        assert_eq!(classifier.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            classifier.last_shape.lock().unwrap().clone(),
            Some(vec![1, 224, 224, 3])
        );
    }

    #[test]
    fn test_scores_keys_are_exactly_the_labels() {
        let predictor = DiseasePredictor::new(FixedClassifier::new(&[0.1, 0.6, 0.2, 0.1]));
        let result = predictor.classify(Some(&green_image())).unwrap();
        let scores = result.scores.unwrap();

        assert_eq!(
            scores.labels().collect::<Vec<_>>(),
            vec!["Bacterialblight", "Blast", "Brownspot", "Tungro"]
        );
        assert_eq!(scores.get("Blast"), Some(0.6));
    }

    #[test]
    fn test_report_top_matches_max_score() {
        let predictor = DiseasePredictor::new(FixedClassifier::new(&[0.1, 0.2, 0.05, 0.65]));
        let result = predictor.classify(Some(&green_image())).unwrap();

        assert!(
            result
                .report
                .starts_with("## 🎯 Top Prediction: Tungro (65.0%)")
        );
        assert!(
            result
                .report
                .contains("**Treatment:** 🦠 Viral disease - Control leafhopper vectors")
        );
        assert_eq!(
            result
                .report
                .lines()
                .filter(|l| l.starts_with("- **"))
                .count(),
            4
        );
    }

    #[test]
    fn test_solid_green_image_with_softmax_model() {
        let predictor = DiseasePredictor::new(Arc::new(ChannelSoftmax));
        let result = predictor.classify(Some(&green_image())).unwrap();
        let scores = result.scores.unwrap();

        assert_eq!(scores.len(), 4);
        assert!((scores.total() - 1.0).abs() < 1e-4);
        // The green channel dominates.
        assert_eq!(scores.top().unwrap().label, "Brownspot");

        let headline = result.report.lines().next().unwrap();
        let percent: f32 = headline
            .rsplit('(')
            .next()
            .and_then(|s| s.strip_suffix("%)"))
            .and_then(|s| s.parse().ok())
            .unwrap();
        assert!((0.0..=100.0).contains(&percent));
        assert!(
            ["Bacterialblight", "Blast", "Brownspot", "Tungro"]
                .iter()
                .any(|l| headline.contains(l))
        );
    }

    #[test]
    fn test_classify_is_idempotent() {
        let predictor = DiseasePredictor::new(Arc::new(ChannelSoftmax));
        let image = green_image();
        assert_eq!(
            predictor.classify(Some(&image)).unwrap(),
            predictor.classify(Some(&image)).unwrap()
        );
    }

    #[test]
    fn test_output_width_mismatch_is_an_error() {
        let predictor = DiseasePredictor::new(FixedClassifier::new(&[0.5, 0.5, 0.0]));
        let err = predictor.classify(Some(&green_image())).unwrap_err();
        assert!(matches!(err, PredictError::ModelInconsistent { .. }));
    }

    #[test]
    fn test_extra_output_rows_are_an_error() {
        #[derive(Debug)]
        struct TwoRows;

        impl Classifier for TwoRows {
            fn infer(&self, _batch: &Tensor4D) -> PredictResult<Tensor2D> {
                Ok(Tensor2D::from_shape_vec(
                    (2, 4),
                    vec![0.1, 0.2, 0.3, 0.4, 0.4, 0.3, 0.2, 0.1],
                )?)
            }

            fn name(&self) -> &str {
                "two-rows"
            }
        }

        let predictor = DiseasePredictor::new(Arc::new(TwoRows));
        let err = predictor.classify(Some(&green_image())).unwrap_err();
        assert!(matches!(err, PredictError::ModelInconsistent { .. }));
        assert!(err.to_string().contains("2x4"));
    }

    #[test]
    fn test_inference_failure_propagates() {
        let predictor = DiseasePredictor::new(Arc::new(FailingClassifier));
        let err = predictor.classify(Some(&green_image())).unwrap_err();
        assert!(matches!(err, PredictError::Inference { .. }));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_builder_applies_config() {
        let config = PredictorConfig::new()
            .with_input_size(32)
            .with_layout(crate::processors::TensorLayout::NCHW)
            .with_labels(
                vec!["Healthy".to_string(), "Blast".to_string()],
                Default::default(),
            );
        let classifier = FixedClassifier::new(&[0.3, 0.7]);
        let predictor = DiseasePredictorBuilder::new()
            .config(config)
            .build(classifier.clone())
            .unwrap();

        let prediction = predictor.predict(&green_image()).unwrap();
        assert_eq!(prediction.top.label, "Blast");
        assert_eq!(
            classifier.last_shape.lock().unwrap().clone(),
            Some(vec![1, 3, 32, 32])
        );
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = DiseasePredictorBuilder::new()
            .input_size(0)
            .build(FixedClassifier::new(&[0.25; 4]));
        assert!(matches!(result, Err(PredictError::ConfigError { .. })));
    }
}
