//! Confidence arithmetic for pattern-based findings.
//!
//! A finding's confidence is a deterministic function of which pattern tiers
//! matched: a primary match sets the base, distinct supporting matches add a
//! capped bonus, and distinct negating matches subtract an uncapped penalty.
//! Negation is weighted more heavily than corroboration because it is an
//! explicit documentation signal ("no intubation performed").

use serde::{Deserialize, Serialize};

/// Weights used by [`score`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Base confidence granted by a primary pattern match.
    pub base: f64,

    /// Bonus per distinct supporting pattern match.
    pub supporting_step: f64,

    /// Cap on the total supporting bonus.
    pub supporting_cap: f64,

    /// Penalty per distinct negating pattern match (uncapped).
    pub negation_penalty: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            base: 0.5,
            supporting_step: 0.1,
            supporting_cap: 0.4,
            negation_penalty: 0.3,
        }
    }
}

/// Default threshold below which a finding is flagged for manual review.
pub const DEFAULT_REVIEW_THRESHOLD: f64 = 0.5;

/// Compute the confidence for a candidate finding.
///
/// Returns 0.0 when no primary pattern matched (no finding is emitted in
/// that case). The result is clamped to [0.0, 1.0].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn score(
    weights: &ScoreWeights,
    primary_matched: bool,
    supporting_matches: usize,
    negating_matches: usize,
) -> f64 {
    if !primary_matched {
        return 0.0;
    }

    let supporting = (supporting_matches as f64 * weights.supporting_step)
        .min(weights.supporting_cap);
    let negation = negating_matches as f64 * weights.negation_penalty;

    (weights.base + supporting - negation).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn no_primary_means_zero() {
        let w = ScoreWeights::default();
        assert!(close(score(&w, false, 4, 0), 0.0));
    }

    #[test]
    fn base_confidence_is_half() {
        let w = ScoreWeights::default();
        assert!(close(score(&w, true, 0, 0), 0.5));
    }

    #[test]
    fn supporting_bonus_is_capped() {
        let w = ScoreWeights::default();
        assert!(close(score(&w, true, 1, 0), 0.6));
        assert!(close(score(&w, true, 4, 0), 0.9));
        // Five or more supporting matches still add at most 0.4.
        assert!(close(score(&w, true, 9, 0), 0.9));
    }

    #[test]
    fn negation_is_uncapped_and_floored_at_zero() {
        let w = ScoreWeights::default();
        assert!(close(score(&w, true, 0, 1), 0.2));
        assert!(close(score(&w, true, 0, 2), 0.0));
        assert!(close(score(&w, true, 0, 5), 0.0));
    }

    #[test]
    fn negation_monotonically_decreases_confidence() {
        let w = ScoreWeights::default();
        for supporting in 0..6 {
            let mut previous = score(&w, true, supporting, 0);
            for negating in 1..6 {
                let current = score(&w, true, supporting, negating);
                assert!(current <= previous);
                previous = current;
            }
        }
    }

    #[test]
    fn result_never_exceeds_one() {
        let w = ScoreWeights {
            base: 0.9,
            supporting_step: 0.3,
            supporting_cap: 0.9,
            negation_penalty: 0.3,
        };
        assert!(close(score(&w, true, 3, 0), 1.0));
    }
}
