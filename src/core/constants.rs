//! Constants used throughout the prediction pipeline.
//!
//! This module defines the default model geometry, the shipped label
//! vocabulary and the fixed user-facing strings.

/// The default input side length of the classification model.
///
/// Images are resized to `DEFAULT_INPUT_SIZE x DEFAULT_INPUT_SIZE` before
/// inference, matching the resolution the model was trained at.
pub const DEFAULT_INPUT_SIZE: u32 = 224;

/// Number of color channels the model expects.
pub const INPUT_CHANNELS: usize = 3;

/// Prompt returned when a prediction is requested without an image.
pub const NO_IMAGE_PROMPT: &str = "Please upload an image first!";

/// Advisory used when a predicted label has no entry in the advisory table.
pub const GENERIC_ADVISORY: &str =
    "No specific treatment guidance available - consult a local agronomist";

/// Rice disease labels, in the order of the model's output vector.
pub const RICE_DISEASE_LABELS: [&str; 4] = ["Bacterialblight", "Blast", "Brownspot", "Tungro"];

/// Treatment advisories for [`RICE_DISEASE_LABELS`], as `(label, advisory)` pairs.
pub const RICE_DISEASE_ADVISORIES: [(&str, &str); 4] = [
    (
        "Bacterialblight",
        "🦠 Bacterial disease - Use copper-based fungicides",
    ),
    (
        "Blast",
        "💥 Fungal disease - Apply appropriate fungicides immediately",
    ),
    ("Brownspot", "🟤 Fungal infection - Improve air circulation"),
    ("Tungro", "🦠 Viral disease - Control leafhopper vectors"),
];

/// Default request body limit for uploads (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Default port of the web host.
pub const DEFAULT_PORT: u16 = 7860;
