//! Finding extractor over compiled concept pattern sets.
//!
//! The extractor scans a source field against every variant of a concept set.
//! A primary match gates the variant; supporting and negating matches are then
//! counted and fed to the confidence scorer. Each variant emits at most one
//! finding per call (identical-variant dedup; distinct variants are never
//! suppressed by one another, downstream reporting needs every technique).

use serde::{Deserialize, Serialize};

use crate::finding::Finding;
use crate::patterns::ConceptSet;
use crate::scoring::{DEFAULT_REVIEW_THRESHOLD, ScoreWeights, score};

/// Configuration for the finding extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Confidence weights for the scorer.
    #[serde(default)]
    pub weights: ScoreWeights,

    /// Findings below this confidence are flagged for manual review.
    pub review_threshold: f64,

    /// Characters of context captured on each side of a matched span.
    pub context_window: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            review_threshold: DEFAULT_REVIEW_THRESHOLD,
            context_window: 40,
        }
    }
}

/// Extractor producing typed findings from clinical free text.
#[derive(Debug, Clone, Default)]
pub struct FindingExtractor {
    config: ExtractionConfig,
}

impl FindingExtractor {
    /// Create an extractor from configuration.
    #[must_use]
    pub const fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Create an extractor with default weights and thresholds.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Extract findings for one concept from an optional source field.
    ///
    /// Missing or empty text is not an error: it yields no findings. Output
    /// is sorted by descending confidence; ties keep the pattern table's
    /// declaration order.
    #[must_use]
    pub fn extract<V: Copy>(
        &self,
        text: Option<&str>,
        set: &ConceptSet<V>,
        source_field: &str,
    ) -> Vec<Finding<V>> {
        let Some(text) = text else {
            return Vec::new();
        };
        if text.trim().is_empty() {
            return Vec::new();
        }

        let mut findings = Vec::new();

        for variant in set.variants() {
            let Some(span) = variant
                .primary
                .iter()
                .find_map(|re| re.find(text))
            else {
                continue;
            };

            let supporting = variant
                .supporting
                .iter()
                .filter(|re| re.is_match(text))
                .count();
            let negating = variant
                .negating
                .iter()
                .filter(|re| re.is_match(text))
                .count();

            let confidence = score(&self.config.weights, true, supporting, negating);
            if confidence <= 0.0 {
                continue;
            }

            findings.push(Finding {
                value: variant.value(),
                confidence,
                evidence: context_snippet(
                    text,
                    span.start(),
                    span.end(),
                    self.config.context_window,
                ),
                source_field: source_field.to_string(),
            });
        }

        findings.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        findings
    }
}

/// Slice the matched span with surrounding context, snapped to char
/// boundaries so multi-byte text never panics.
fn context_snippet(text: &str, start: usize, end: usize, window: usize) -> String {
    let mut lo = start.saturating_sub(window);
    while lo > 0 && !text.is_char_boundary(lo) {
        lo -= 1;
    }
    let mut hi = (end + window).min(text.len());
    while hi < text.len() && !text.is_char_boundary(hi) {
        hi += 1;
    }
    text[lo..hi].trim().to_string()
}
