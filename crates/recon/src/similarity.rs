//! Deterministic 0–100 similarity between two institution names.
//!
//! Rules, first applicable wins (the shared-token bonus is additive):
//!
//! | Rule | Condition                                   | Score                 |
//! |------|---------------------------------------------|-----------------------|
//! | 1    | either normalized form empty                | 0                     |
//! | 2    | normalized forms equal                      | 100                   |
//! | 3    | one normalized form contains the other      | 90                    |
//! | 4    | otherwise                                   | `J*50 + O*0.5`        |
//! | 5    | ≥ 3 shared tokens (with rule 4)             | +20                   |
//!
//! `J` is the token-set Jaccard index, `O` the shared-token count over the
//! larger set as a percentage. The result is clamped to `[0, 100]`.

use serde::Serialize;

use crate::normalize::Normalizer;

pub const MAX_SCORE: f64 = 100.0;
pub const EXACT_SCORE: f64 = 100.0;
pub const CONTAINMENT_SCORE: f64 = 90.0;
pub const JACCARD_WEIGHT: f64 = 50.0;
pub const OVERLAP_WEIGHT: f64 = 0.5;
pub const SHARED_TOKEN_BONUS: f64 = 20.0;
pub const SHARED_TOKEN_BONUS_MIN: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub name_a: String,
    pub name_b: String,
    pub score: f64,
    pub threshold: f64,
    pub is_match: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    normalizer: Normalizer,
}

impl Scorer {
    pub fn new(normalizer: Normalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn score(&self, name_a: &str, name_b: &str) -> f64 {
        let norm_a = self.normalizer.normalize(name_a);
        let norm_b = self.normalizer.normalize(name_b);

        if norm_a.is_empty() || norm_b.is_empty() {
            return 0.0;
        }
        if norm_a == norm_b {
            return EXACT_SCORE;
        }
        if norm_a.contains(norm_b.as_str()) || norm_b.contains(norm_a.as_str()) {
            return CONTAINMENT_SCORE;
        }

        let tokens_a = self.normalizer.tokens(name_a);
        let tokens_b = self.normalizer.tokens(name_b);
        let shared = tokens_a.intersection(&tokens_b).count();
        let union = tokens_a.union(&tokens_b).count();
        let larger = tokens_a.len().max(tokens_b.len());

        let jaccard = shared as f64 / union as f64;
        let overlap_pct = shared as f64 / larger as f64 * 100.0;
        let mut similarity = jaccard * JACCARD_WEIGHT + overlap_pct * OVERLAP_WEIGHT;

        if shared >= SHARED_TOKEN_BONUS_MIN {
            similarity += SHARED_TOKEN_BONUS;
        }

        similarity.clamp(0.0, MAX_SCORE)
    }

    /// Score and compare against `threshold` (inclusive).
    pub fn matches(&self, name_a: &str, name_b: &str, threshold: f64) -> MatchResult {
        let score = self.score(name_a, name_b);
        MatchResult {
            name_a: name_a.to_string(),
            name_b: name_b.to_string(),
            score,
            threshold,
            is_match: score >= threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identical_names_score_100() {
        let s = Scorer::default();
        assert_eq!(s.score("University of Lagos", "University of Lagos"), 100.0);
        assert_eq!(s.score("University of Lagos", "the university of LAGOS."), 100.0);
    }

    #[test]
    fn punctuation_differences_are_ignored() {
        let s = Scorer::default();
        let score = s.score(
            "Federal University of Technology Akure",
            "Federal University of Technology, Akure",
        );
        assert!(score >= 90.0, "score was {score}");
    }

    #[test]
    fn containment_scores_90() {
        let s = Scorer::default();
        assert_eq!(s.score("Lagos State University", "Lagos State University of Science"), 90.0);
        assert_eq!(s.score("Lagos State University of Science", "Lagos State University"), 90.0);
    }

    #[test]
    fn abbreviation_is_not_a_token_match() {
        let s = Scorer::default();
        assert!(s.score("University of Lagos", "Unilag") < 100.0);
        assert_eq!(s.score("University of Lagos", "Unilag"), 0.0);
    }

    #[test]
    fn empty_normalized_form_scores_zero() {
        let s = Scorer::default();
        assert_eq!(s.score("", "University of Lagos"), 0.0);
        assert_eq!(s.score("University of Nigeria", "University of Nigeria"), 0.0);
        assert_eq!(s.score("   ", "   "), 0.0);
    }

    #[test]
    fn jaccard_overlap_blend() {
        let s = Scorer::default();
        // {federal, technology, akure} vs {federal, technology, minna}:
        // J = 2/4, O = 2/3 -> 25 + 33.33..
        let score = s.score(
            "Federal University of Technology Akure",
            "Federal University of Technology Minna",
        );
        let expected = 0.5 * 50.0 + (2.0 / 3.0 * 100.0) * 0.5;
        assert!((score - expected).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn shared_token_bonus_applies_at_three() {
        let s = Scorer::default();
        // {ahmadu, bello, zaria, kaduna} vs {ahmadu, bello, zaria, samaru}: 3 shared
        let score = s.score("Ahmadu Bello Zaria Kaduna", "Ahmadu Bello Zaria Samaru");
        let expected = (3.0 / 5.0) * 50.0 + (3.0 / 4.0 * 100.0) * 0.5 + 20.0;
        assert!((score - expected).abs() < 1e-9, "score was {score}");
    }

    #[test]
    fn score_is_clamped() {
        let s = Scorer::default();
        // Same token set, different order: J = 1, O = 100, +20 bonus -> clamped.
        assert_eq!(s.score("Delta State Oleh Campus", "Campus Oleh State Delta"), 100.0);
    }

    #[test]
    fn match_threshold_is_inclusive() {
        let s = Scorer::default();
        let at = s.matches("Lagos State University", "Lagos State University of Science", 90.0);
        assert!(at.is_match);
        assert_eq!(at.score, 90.0);
        let above = s.matches("Lagos State University", "Lagos State University of Science", 90.01);
        assert!(!above.is_match);
        assert_eq!(above.threshold, 90.01);
    }

    proptest! {
        #[test]
        fn score_is_symmetric_and_bounded(
            a in "[A-Za-z ,.'-]{0,40}",
            b in "[A-Za-z ,.'-]{0,40}",
        ) {
            let s = Scorer::default();
            let ab = s.score(&a, &b);
            let ba = s.score(&b, &a);
            prop_assert!((0.0..=100.0).contains(&ab));
            prop_assert_eq!(ab, ba);
        }
    }
}
