//! The ordered label vocabulary and its advisory table.
//!
//! Index `i` of the classifier output belongs to label `i` of the
//! vocabulary. That correspondence is fixed when the model is trained and
//! cannot be checked at runtime, so the vocabulary only guards what it can:
//! non-empty, unique, non-blank labels.

use crate::core::config::ConfigError;
use crate::core::constants::{GENERIC_ADVISORY, RICE_DISEASE_ADVISORIES, RICE_DISEASE_LABELS};
use std::collections::HashMap;

/// Ordered class labels plus the treatment advisory for each.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    labels: Vec<String>,
    advisories: HashMap<String, String>,
}

impl Vocabulary {
    /// Creates a vocabulary from labels in model output order.
    ///
    /// Advisories for labels outside `labels` are kept but never looked up.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidVocabulary`] if `labels` is empty,
    /// contains a blank label, or contains a duplicate.
    pub fn new(
        labels: Vec<String>,
        advisories: HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        if labels.is_empty() {
            return Err(ConfigError::InvalidVocabulary {
                message: "at least one label is required".to_string(),
            });
        }
        for (i, label) in labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(ConfigError::InvalidVocabulary {
                    message: format!("label at index {i} is blank"),
                });
            }
            if labels[..i].contains(label) {
                return Err(ConfigError::InvalidVocabulary {
                    message: format!("duplicate label '{label}' at index {i}"),
                });
            }
        }
        Ok(Self { labels, advisories })
    }

    /// The rice leaf disease vocabulary the shipped model was trained with.
    pub fn rice_disease() -> Self {
        Self {
            labels: RICE_DISEASE_LABELS.iter().map(|l| l.to_string()).collect(),
            advisories: RICE_DISEASE_ADVISORIES
                .iter()
                .map(|(label, advisory)| (label.to_string(), advisory.to_string()))
                .collect(),
        }
    }

    /// Labels in model output order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of labels, which is also the expected classifier output width.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Always false for a constructed vocabulary.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Returns the canonical position of `label`.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Returns the advisory for `label`, or [`GENERIC_ADVISORY`] if the table has none.
    pub fn advisory(&self, label: &str) -> &str {
        match self.advisories.get(label) {
            Some(advisory) => advisory,
            None => {
                tracing::warn!(label, "no advisory registered, using generic advisory");
                GENERIC_ADVISORY
            }
        }
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::rice_disease()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rice_disease_vocabulary_order() {
        let vocab = Vocabulary::rice_disease();
        assert_eq!(
            vocab.labels(),
            &["Bacterialblight", "Blast", "Brownspot", "Tungro"]
        );
        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.position("Brownspot"), Some(2));
    }

    #[test]
    fn test_every_rice_label_has_advisory() {
        let vocab = Vocabulary::rice_disease();
        for label in vocab.labels() {
            assert_ne!(vocab.advisory(label), GENERIC_ADVISORY, "{label}");
        }
        assert_eq!(
            vocab.advisory("Blast"),
            "💥 Fungal disease - Apply appropriate fungicides immediately"
        );
    }

    #[test]
    fn test_missing_advisory_falls_back() {
        let vocab = Vocabulary::new(labels(&["Healthy", "Blast"]), HashMap::new()).unwrap();
        assert_eq!(vocab.advisory("Healthy"), GENERIC_ADVISORY);
    }

    #[test]
    fn test_invalid_vocabularies_rejected() {
        assert!(Vocabulary::new(vec![], HashMap::new()).is_err());
        assert!(Vocabulary::new(labels(&["Blast", " "]), HashMap::new()).is_err());

        let err = Vocabulary::new(labels(&["Blast", "Tungro", "Blast"]), HashMap::new())
            .unwrap_err();
        assert!(err.to_string().contains("duplicate label 'Blast'"));
    }
}
