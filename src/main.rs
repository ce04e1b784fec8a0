//! Rice disease classifier command line.
//!
//! Usage:
//! ```
//! rice-disease-classifier serve --model-path models/rice_disease_model.onnx
//! rice-disease-classifier predict --model-path models/rice_disease_model.onnx leaf.jpg
//! ```
//!
//! Set `RUST_LOG=info` to see what the server is doing.

use clap::{Args, Parser, Subcommand};
use rice_disease_classifier::core::config::{
    AppConfig, ConfigValidator, OrtExecutionProvider,
};
use rice_disease_classifier::core::constants::{DEFAULT_INPUT_SIZE, INPUT_CHANNELS};
use rice_disease_classifier::core::inference::OrtClassifier;
use rice_disease_classifier::predictor::{
    Classification, DiseasePredictor, DiseasePredictorBuilder,
};
use rice_disease_classifier::processors::TensorLayout;
use rice_disease_classifier::server::{self, AppState};
use rice_disease_classifier::utils::{init_tracing, load_image};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Command-line arguments
#[derive(Parser)]
#[command(name = "rice-disease-classifier", version)]
#[command(about = "Rice leaf disease classification with an ONNX model")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the web host with the upload page
    Serve {
        #[command(flatten)]
        model: ModelArgs,

        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Classify image files and print the report for each
    Predict {
        #[command(flatten)]
        model: ModelArgs,

        /// Image file paths to process
        #[arg(required = true)]
        images: Vec<PathBuf>,

        /// Print JSON instead of markdown
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct ModelArgs {
    /// Path to the model file
    #[arg(short, long)]
    model_path: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Execution device: cpu, cuda or cuda:N
    #[arg(long)]
    device: Option<String>,
}

impl ModelArgs {
    /// Loads the configuration file, if any, and applies command-line overrides.
    fn load_config(&self) -> Result<AppConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => AppConfig::from_json_file(path)?,
            None => AppConfig::default(),
        };
        if let Some(path) = &self.model_path {
            config.model_path = Some(path.clone());
        }
        if let Some(device) = &self.device {
            config.ort_session.execution_providers =
                Some(OrtExecutionProvider::parse_device(device)?);
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { model, host, port } => {
            let mut config = model.load_config()?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let predictor = build_predictor(&config)?;
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()?;
            runtime.block_on(server::serve(&config.server, AppState::new(predictor)))?;
        }
        Command::Predict {
            model,
            images,
            json,
        } => {
            let config = model.load_config()?;
            config.validate()?;
            let predictor = build_predictor(&config)?;

            let mut failures = 0usize;
            for path in &images {
                let result = load_image(path).and_then(|image| predictor.classify(Some(&image)));
                match result {
                    Ok(classification) if json => {
                        let line = JsonLine {
                            image: path.display().to_string(),
                            classification: &classification,
                        };
                        println!("{}", serde_json::to_string(&line)?);
                    }
                    Ok(classification) => {
                        println!("# {}\n\n{}", path.display(), classification.report);
                    }
                    Err(e) => {
                        error!("Failed to classify {}: {}", path.display(), e);
                        failures += 1;
                    }
                }
            }
            if failures > 0 {
                return Err(format!("{failures} of {} images failed", images.len()).into());
            }
        }
    }
    Ok(())
}

/// One line of `predict --json` output.
#[derive(Serialize)]
struct JsonLine<'a> {
    image: String,
    #[serde(flatten)]
    classification: &'a Classification,
}

/// Loads the model once and wraps it in a predictor.
fn build_predictor(config: &AppConfig) -> Result<DiseasePredictor, Box<dyn std::error::Error>> {
    let model_path = config.require_model_path()?;
    let classifier = OrtClassifier::from_config(
        &config.ort_session,
        model_path,
        config.model_name.as_deref(),
    )?;

    if let Some(shape) = classifier.primary_input_shape() {
        let size = i64::from(config.predictor.input_size);
        let channels = INPUT_CHANNELS as i64;
        let expected = match config.predictor.layout {
            TensorLayout::NHWC => [1, size, size, channels],
            TensorLayout::NCHW => [1, channels, size, size],
        };
        let matches = shape.len() == 4
            && shape
                .iter()
                .zip(expected.iter())
                .all(|(declared, wanted)| *declared < 0 || declared == wanted);
        if !matches {
            warn!(
                "Model declares input shape {:?} but preprocessing produces {:?}; \
                 check predictor.input_size (default {}) and predictor.layout",
                shape, expected, DEFAULT_INPUT_SIZE
            );
        }
    }

    let predictor = DiseasePredictorBuilder::new()
        .config(config.predictor.clone())
        .build(Arc::new(classifier))?;
    info!("Model '{}' ready", predictor.model_name());
    Ok(predictor)
}
