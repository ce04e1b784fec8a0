//! Markdown report rendering.
//!
//! Rendering is kept apart from [`crate::predictor::DiseasePredictor::predict`] so
//! that the numbers and their presentation can be tested separately.

use crate::domain::{Prediction, Vocabulary};
use std::fmt::Write;

/// Formats a raw score as a percentage with one decimal place.
///
/// The multiplication is done in `f64` so that rounding at the `x.x5`
/// boundary matches a double-precision renderer.
///
/// ```rust
/// use rice_disease_classifier::processors::report::format_percent;
///
/// assert_eq!(format_percent(0.9876), "98.8%");
/// assert_eq!(format_percent(0.0), "0.0%");
/// ```
pub fn format_percent(score: f32) -> String {
    format!("{:.1}%", f64::from(score) * 100.0)
}

/// Renders the detailed analysis for a prediction.
///
/// The report has a headline with the top label and its confidence, the
/// treatment advisory for that label, and every label ranked by
/// non-increasing score.
pub fn render(prediction: &Prediction, vocabulary: &Vocabulary) -> String {
    let top = &prediction.top;
    let mut report = String::new();

    // Writing into a String cannot fail.
    let _ = write!(
        report,
        "## 🎯 Top Prediction: {} ({})\n\n",
        top.label,
        format_percent(top.score)
    );
    let _ = write!(
        report,
        "**Treatment:** {}\n\n",
        vocabulary.advisory(&top.label)
    );
    report.push_str("### All Predictions:\n");
    for (label, score) in prediction.scores.ranked() {
        let _ = writeln!(report, "- **{}**: {}", label, format_percent(score));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::GENERIC_ADVISORY;
    use std::collections::HashMap;

    fn prediction(scores: &[f32]) -> Prediction {
        Prediction::from_scores(Vocabulary::rice_disease().labels(), scores).unwrap()
    }

    #[test]
    fn test_render_full_report() {
        let report = render(
            &prediction(&[0.05, 0.9, 0.03, 0.02]),
            &Vocabulary::rice_disease(),
        );
        let expected = "## 🎯 Top Prediction: Blast (90.0%)\n\n\
                        **Treatment:** 💥 Fungal disease - Apply appropriate fungicides immediately\n\n\
                        ### All Predictions:\n\
                        - **Blast**: 90.0%\n\
                        - **Bacterialblight**: 5.0%\n\
                        - **Brownspot**: 3.0%\n\
                        - **Tungro**: 2.0%\n";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_ranked_entries_one_per_label() {
        let report = render(
            &prediction(&[0.4, 0.1, 0.2, 0.3]),
            &Vocabulary::rice_disease(),
        );
        let entries: Vec<&str> = report.lines().filter(|l| l.starts_with("- **")).collect();
        assert_eq!(entries.len(), 4);
        assert!(entries[0].contains("Bacterialblight"));
        assert!(entries[3].contains("Blast"));
    }

    #[test]
    fn test_render_uses_generic_advisory_for_unknown_label() {
        let vocabulary = Vocabulary::new(
            vec!["Healthy".to_string(), "Blast".to_string()],
            HashMap::new(),
        )
        .unwrap();
        let prediction = Prediction::from_scores(vocabulary.labels(), &[0.7, 0.3]).unwrap();
        let report = render(&prediction, &vocabulary);
        assert!(report.contains(&format!("**Treatment:** {GENERIC_ADVISORY}")));
    }

    #[test]
    fn test_format_percent_rounding() {
        assert_eq!(format_percent(1.0), "100.0%");
        assert_eq!(format_percent(0.12345), "12.3%");
        assert_eq!(format_percent(0.0004), "0.0%");
        assert_eq!(format_percent(0.0535), "5.4%");
        assert_eq!(format_percent(0.8775), "87.7%");
        assert_eq!(format_percent(0.9475), "94.7%");
    }
}
