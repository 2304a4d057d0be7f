use std::time::Duration;

use serde::Deserialize;

use crate::error::ReconError;
use crate::lexicon::{Abbreviation, Lexicon};

pub const DEFAULT_SEARCH_ENDPOINT: &str = "https://www.googleapis.com/customsearch/v1";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (compatible; EduRepoBot/1.0; +https://edurepo.ng/bot)";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Every section is optional; an empty document yields the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
    #[serde(default)]
    pub search: Option<SearchConfig>,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub lexicon: LexiconOverrides,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    #[serde(default = "default_min_threshold")]
    pub min_threshold: f64,
    /// Stricter threshold for the API-driven enhance run.
    #[serde(default = "default_enhance_threshold")]
    pub enhance_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_threshold: default_min_threshold(),
            enhance_threshold: default_enhance_threshold(),
        }
    }
}

fn default_min_threshold() -> f64 {
    60.0
}

fn default_enhance_threshold() -> f64 {
    70.0
}

// ---------------------------------------------------------------------------
// Discovery
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoveryConfig {
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    #[serde(default = "default_search_timeout_secs")]
    pub search_timeout_secs: u64,
    #[serde(default = "default_max_per_batch")]
    pub max_per_batch: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: default_request_delay_ms(),
            probe_timeout_secs: default_probe_timeout_secs(),
            search_timeout_secs: default_search_timeout_secs(),
            max_per_batch: default_max_per_batch(),
            user_agent: default_user_agent(),
        }
    }
}

impl DiscoveryConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn search_timeout(&self) -> Duration {
        Duration::from_secs(self.search_timeout_secs)
    }
}

fn default_request_delay_ms() -> u64 {
    1000
}

fn default_probe_timeout_secs() -> u64 {
    5
}

fn default_search_timeout_secs() -> u64 {
    10
}

fn default_max_per_batch() -> usize {
    50
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

// ---------------------------------------------------------------------------
// Search credentials
// ---------------------------------------------------------------------------

/// Presence of this table enables the search strategy.
#[derive(Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    pub api_key: String,
    pub engine_id: String,
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,
}

// Keep the key out of debug logs.
impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("api_key", &"<redacted>")
            .field("engine_id", &self.engine_id)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

fn default_search_endpoint() -> String {
    DEFAULT_SEARCH_ENDPOINT.to_string()
}

// ---------------------------------------------------------------------------
// Persistence API
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_import_batch_size")]
    pub import_batch_size: usize,
    #[serde(default = "default_api_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            import_batch_size: default_import_batch_size(),
            timeout_secs: default_api_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_import_batch_size() -> usize {
    100
}

fn default_api_timeout_secs() -> u64 {
    30
}

// ---------------------------------------------------------------------------
// Lexicon overrides
// ---------------------------------------------------------------------------

/// Each present key replaces the corresponding built-in table wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LexiconOverrides {
    #[serde(default)]
    pub stopwords: Option<Vec<String>>,
    #[serde(default)]
    pub abbreviations: Option<Vec<Abbreviation>>,
    #[serde(default)]
    pub exclusions: Option<Vec<String>>,
    #[serde(default)]
    pub accepted_suffixes: Option<Vec<String>>,
    #[serde(default)]
    pub domain_suffixes: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        for (key, value) in [
            ("matching.min_threshold", self.matching.min_threshold),
            ("matching.enhance_threshold", self.matching.enhance_threshold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ReconError::ConfigValidation(format!(
                    "{key} must be within [0, 100], got {value}"
                )));
            }
        }

        if self.discovery.max_per_batch == 0 {
            return Err(ReconError::ConfigValidation(
                "discovery.max_per_batch must be greater than 0".into(),
            ));
        }
        if self.discovery.probe_timeout_secs == 0 || self.discovery.search_timeout_secs == 0 {
            return Err(ReconError::ConfigValidation(
                "discovery timeouts must be greater than 0".into(),
            ));
        }

        if let Some(search) = &self.search {
            if search.api_key.trim().is_empty() || search.engine_id.trim().is_empty() {
                return Err(ReconError::ConfigValidation(
                    "search.api_key and search.engine_id must both be non-empty".into(),
                ));
            }
        }

        if self.api.import_batch_size == 0 {
            return Err(ReconError::ConfigValidation(
                "api.import_batch_size must be greater than 0".into(),
            ));
        }
        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(ReconError::ConfigValidation(format!(
                "api.base_url must be an http(s) URL, got '{}'",
                self.api.base_url
            )));
        }

        if let Some(abbrevs) = &self.lexicon.abbreviations {
            if let Some(bad) = abbrevs
                .iter()
                .find(|a| a.name.trim().is_empty() || a.abbreviation.trim().is_empty())
            {
                return Err(ReconError::ConfigValidation(format!(
                    "lexicon.abbreviations: empty entry {:?}",
                    bad
                )));
            }
        }

        Ok(())
    }

    /// Built-in tables with any `[lexicon]` overrides applied.
    pub fn lexicon(&self) -> Lexicon {
        let mut lexicon = Lexicon::default();
        let o = &self.lexicon;
        if let Some(stopwords) = &o.stopwords {
            lexicon.stopwords = stopwords.iter().map(|s| s.to_lowercase()).collect();
        }
        if let Some(abbreviations) = &o.abbreviations {
            lexicon.abbreviations = abbreviations
                .iter()
                .map(|a| Abbreviation {
                    name: a.name.to_lowercase(),
                    abbreviation: a.abbreviation.to_lowercase(),
                })
                .collect();
        }
        if let Some(exclusions) = &o.exclusions {
            lexicon.exclusions = exclusions.clone();
        }
        if let Some(suffixes) = &o.accepted_suffixes {
            lexicon.accepted_suffixes = suffixes.clone();
        }
        if let Some(suffixes) = &o.domain_suffixes {
            lexicon.domain_suffixes = suffixes.clone();
        }
        lexicon
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
