//! Static lookup tables used by normalization, abbreviation and URL filtering.
//!
//! Tables are plain data owned by a [`Lexicon`] value. Components borrow or
//! clone what they need, so tests (and `[lexicon]` config overrides) can swap
//! in alternate tables without touching globals.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Words removed from names before comparison and domain generation.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "the", "a", "university", "polytechnic", "college", "institute", "school", "of", "and",
    "in", "nigeria", "nigerian",
];

/// Known full-name fragments and their customary short forms.
/// Order matters: the first fragment contained in a name wins.
pub const DEFAULT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("university of lagos", "unilag"),
    ("university of ibadan", "ui"),
    ("university of nigeria", "unn"),
    ("ahmadu bello university", "abu"),
    ("obafemi awolowo university", "oau"),
    ("university of benin", "uniben"),
    ("university of calabar", "unical"),
    ("university of port harcourt", "uniport"),
    ("university of maiduguri", "unimaid"),
    ("bayero university", "buk"),
    ("nnamdi azikiwe university", "unizik"),
    ("university of abuja", "uniabuja"),
    ("federal university of technology", "fut"),
];

/// Substrings that disqualify a candidate URL (aggregators, regulators, social).
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    "myschoolgist", "jamb", "nuc", "wikipedia", "facebook", "twitter", "linkedin",
];

/// A URL must contain at least one of these to be considered a website.
pub const DEFAULT_ACCEPTED_SUFFIXES: &[&str] = &[".edu.ng", ".com", ".org", ".net", ".gov.ng"];

/// TLD suffixes tried by the domain-pattern strategy, in probe order.
pub const DEFAULT_DOMAIN_SUFFIXES: &[&str] =
    &[".edu.ng", ".edu.ng.ng", ".com", ".com.ng", ".org", ".org.ng"];

/// 36 states plus the Federal Capital Territory.
pub const NIGERIAN_STATES: &[&str] = &[
    "Abia", "Adamawa", "Akwa Ibom", "Anambra", "Bauchi", "Bayelsa", "Benue", "Borno",
    "Cross River", "Delta", "Ebonyi", "Edo", "Ekiti", "Enugu", "FCT", "Gombe", "Imo", "Jigawa",
    "Kaduna", "Kano", "Katsina", "Kebbi", "Kogi", "Kwara", "Lagos", "Nasarawa", "Niger", "Ogun",
    "Ondo", "Osun", "Oyo", "Plateau", "Rivers", "Sokoto", "Taraba", "Yobe", "Zamfara",
];

/// One row of the abbreviation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abbreviation {
    pub name: String,
    pub abbreviation: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    pub stopwords: BTreeSet<String>,
    pub abbreviations: Vec<Abbreviation>,
    pub exclusions: Vec<String>,
    pub accepted_suffixes: Vec<String>,
    pub domain_suffixes: Vec<String>,
    pub states: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            stopwords: DEFAULT_STOPWORDS.iter().map(|s| s.to_string()).collect(),
            abbreviations: DEFAULT_ABBREVIATIONS
                .iter()
                .map(|(name, abbreviation)| Abbreviation {
                    name: name.to_string(),
                    abbreviation: abbreviation.to_string(),
                })
                .collect(),
            exclusions: to_owned(DEFAULT_EXCLUSIONS),
            accepted_suffixes: to_owned(DEFAULT_ACCEPTED_SUFFIXES),
            domain_suffixes: to_owned(DEFAULT_DOMAIN_SUFFIXES),
            states: to_owned(NIGERIAN_STATES),
        }
    }
}

impl Lexicon {
    /// Map free-text state names onto the canonical state list.
    ///
    /// Matching is case-insensitive and whitespace-tolerant. `Abuja` and
    /// `Federal Capital Territory` resolve to `FCT`.
    pub fn normalize_state(&self, raw: &str) -> Option<String> {
        let cleaned = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        let cleaned = cleaned
            .strip_suffix(" State")
            .or_else(|| cleaned.strip_suffix(" state"))
            .unwrap_or(&cleaned);
        if cleaned.is_empty() {
            return None;
        }
        if cleaned.eq_ignore_ascii_case("abuja")
            || cleaned.eq_ignore_ascii_case("federal capital territory")
        {
            return self.states.iter().find(|s| s.as_str() == "FCT").cloned();
        }
        self.states
            .iter()
            .find(|s| s.eq_ignore_ascii_case(cleaned))
            .cloned()
    }
}

fn to_owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
