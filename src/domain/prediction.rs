//! Prediction result types.
//!
//! [`LabeledScores`] is the label to score mapping built from one classifier
//! output row. [`Prediction`] adds the selected top label. Neither type knows
//! how it will be displayed; see [`crate::processors::report`] for that.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::cmp::Ordering;

/// Scores keyed by label, kept in canonical (model output) order.
///
/// Serializes as a JSON object whose keys appear in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledScores {
    entries: Vec<(String, f32)>,
}

impl LabeledScores {
    /// Pairs each label with the score at the same position.
    ///
    /// The caller guarantees `labels.len() == scores.len()`; extra entries on
    /// either side are dropped by the zip.
    pub fn from_positional(labels: &[String], scores: &[f32]) -> Self {
        debug_assert_eq!(labels.len(), scores.len());
        Self {
            entries: labels.iter().cloned().zip(scores.iter().copied()).collect(),
        }
    }

    /// Number of labeled scores.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no scores.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the score of `label`.
    pub fn get(&self, label: &str) -> Option<f32> {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, score)| *score)
    }

    /// Iterates `(label, score)` in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.entries.iter().map(|(l, s)| (l.as_str(), *s))
    }

    /// Labels in canonical order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(l, _)| l.as_str())
    }

    /// Sum of all scores.
    pub fn total(&self) -> f32 {
        self.entries.iter().map(|(_, s)| s).sum()
    }

    /// Selects the label with the highest score.
    ///
    /// Ties go to the label that comes first in canonical order. A NaN score
    /// never beats a number, so an all-NaN row selects the first label.
    pub fn top(&self) -> Option<TopPrediction> {
        let mut best: Option<&(String, f32)> = None;
        for entry in &self.entries {
            best = match best {
                None => Some(entry),
                Some(current) if score_order(entry.1, current.1) == Ordering::Greater => {
                    Some(entry)
                }
                keep => keep,
            };
        }
        best.map(|(label, score)| TopPrediction {
            label: label.clone(),
            score: *score,
        })
    }

    /// All entries sorted by non-increasing score.
    ///
    /// The sort is stable, so equal scores keep canonical order.
    pub fn ranked(&self) -> Vec<(&str, f32)> {
        let mut ranked: Vec<(&str, f32)> = self.iter().collect();
        ranked.sort_by(|a, b| score_order(b.1, a.1));
        ranked
    }
}

/// Orders scores with NaN below every number.
fn score_order(a: f32, b: f32) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

impl Serialize for LabeledScores {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (label, score) in &self.entries {
            map.serialize_entry(label, score)?;
        }
        map.end()
    }
}

/// The highest-scoring label of a prediction.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TopPrediction {
    /// The winning label.
    pub label: String,
    /// Its raw score.
    pub score: f32,
}

impl TopPrediction {
    /// The score as a percentage.
    pub fn confidence_percent(&self) -> f32 {
        self.score * 100.0
    }
}

/// Computed result of one classification, independent of presentation.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Prediction {
    /// Score for every label.
    pub scores: LabeledScores,
    /// The selected top label.
    pub top: TopPrediction,
}

impl Prediction {
    /// Builds a prediction from one output row.
    ///
    /// Returns `None` when `labels` is empty.
    pub fn from_scores(labels: &[String], scores: &[f32]) -> Option<Self> {
        let scores = LabeledScores::from_positional(labels, scores);
        let top = scores.top()?;
        Some(Self { scores, top })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> Vec<String> {
        ["Bacterialblight", "Blast", "Brownspot", "Tungro"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn test_top_selects_maximum() {
        let scores = LabeledScores::from_positional(&labels(), &[0.1, 0.2, 0.6, 0.1]);
        let top = scores.top().unwrap();
        assert_eq!(top.label, "Brownspot");
        assert!((top.confidence_percent() - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_tie_goes_to_first_canonical_label() {
        let scores = LabeledScores::from_positional(&labels(), &[0.1, 0.4, 0.1, 0.4]);
        assert_eq!(scores.top().unwrap().label, "Blast");

        let uniform = LabeledScores::from_positional(&labels(), &[0.25; 4]);
        assert_eq!(uniform.top().unwrap().label, "Bacterialblight");
    }

    #[test]
    fn test_nan_never_wins() {
        let scores = LabeledScores::from_positional(&labels(), &[f32::NAN, 0.3, f32::NAN, 0.2]);
        assert_eq!(scores.top().unwrap().label, "Blast");

        let all_nan = LabeledScores::from_positional(&labels(), &[f32::NAN; 4]);
        assert_eq!(all_nan.top().unwrap().label, "Bacterialblight");
    }

    #[test]
    fn test_ranked_is_non_increasing_and_stable() {
        let scores = LabeledScores::from_positional(&labels(), &[0.2, 0.1, 0.5, 0.2]);
        let ranked = scores.ranked();
        assert_eq!(
            ranked.iter().map(|(l, _)| *l).collect::<Vec<_>>(),
            vec!["Brownspot", "Bacterialblight", "Tungro", "Blast"]
        );
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_serializes_in_canonical_order() {
        let scores = LabeledScores::from_positional(&labels(), &[0.5, 0.25, 0.125, 0.125]);
        let json = serde_json::to_string(&scores).unwrap();
        assert_eq!(
            json,
            r#"{"Bacterialblight":0.5,"Blast":0.25,"Brownspot":0.125,"Tungro":0.125}"#
        );
    }

    #[test]
    fn test_empty_labels_yield_no_prediction() {
        assert!(Prediction::from_scores(&[], &[]).is_none());
    }
}
