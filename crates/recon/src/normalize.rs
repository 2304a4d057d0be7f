//! Institution name normalization.
//!
//! Two derived forms are produced from a raw name:
//! - the *token form*: lowercase, punctuation-free, stopword-stripped words
//!   (used for scoring), and
//! - the *compact form*: the same words concatenated into a hostname label
//!   (used for domain-pattern generation).
//!
//! Both are pure functions of the input. The token form is idempotent.

use std::collections::BTreeSet;

use crate::lexicon::Lexicon;

/// Articles never left at the front of a token form.
const LEADING_ARTICLES: &[&str] = &["the", "a"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedName {
    pub original: String,
    pub tokens: BTreeSet<String>,
    pub compact: String,
}

#[derive(Debug, Clone)]
pub struct Normalizer {
    stopwords: BTreeSet<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::from_lexicon(&Lexicon::default())
    }
}

impl Normalizer {
    pub fn new(stopwords: BTreeSet<String>) -> Self {
        Self { stopwords }
    }

    pub fn from_lexicon(lexicon: &Lexicon) -> Self {
        Self::new(lexicon.stopwords.clone())
    }

    /// Token form as a single space-separated string, original word order kept.
    pub fn normalize(&self, name: &str) -> String {
        self.words(name).join(" ")
    }

    /// Token form as a set.
    pub fn tokens(&self, name: &str) -> BTreeSet<String> {
        self.words(name).into_iter().collect()
    }

    /// Compact form: stopword-stripped words concatenated, ASCII alphanumerics only.
    pub fn normalize_for_domain(&self, name: &str) -> String {
        self.words(name)
            .concat()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }

    pub fn analyze(&self, name: &str) -> NormalizedName {
        NormalizedName {
            original: name.to_string(),
            tokens: self.tokens(name),
            compact: self.normalize_for_domain(name),
        }
    }

    /// Lowercase, punctuation-free words with stopwords kept. Used as an
    /// identity fallback for names made only of stopwords.
    pub fn plain(&self, name: &str) -> String {
        strip_punctuation(name)
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn words(&self, name: &str) -> Vec<String> {
        let stripped = strip_punctuation(name);
        let mut words: Vec<&str> = stripped
            .split_whitespace()
            .filter(|w| !self.stopwords.contains(*w))
            .collect();

        // After filtering, so a stopword table without articles still
        // yields a form that starts with a content word.
        while words
            .first()
            .is_some_and(|w| LEADING_ARTICLES.contains(w))
        {
            words.remove(0);
        }

        words.into_iter().map(String::from).collect()
    }
}

// Punctuation is deleted, not replaced: "St. John's" -> "st johns".
fn strip_punctuation(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect()
}

/// Clean a name for display: drop a leading list number ("100 Central
/// College" -> "Central College") and collapse whitespace.
pub fn clean_display_name(name: &str) -> String {
    let trimmed = name.trim_start();
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    let rest = &trimmed[digits..];
    let body = if digits > 0 && rest.starts_with(char::is_whitespace) {
        rest
    } else {
        trimmed
    };
    body.split_whitespace().collect::<Vec<_>>().join(" ")
}
