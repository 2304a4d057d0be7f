use crate::lexicon::Lexicon;

/// Accept/reject rules applied to every candidate website, whatever produced it.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    accepted_suffixes: Vec<String>,
    exclusions: Vec<String>,
}

impl Default for UrlFilter {
    fn default() -> Self {
        Self::from_lexicon(&Lexicon::default())
    }
}

impl UrlFilter {
    pub fn new(accepted_suffixes: Vec<String>, exclusions: Vec<String>) -> Self {
        Self {
            accepted_suffixes: accepted_suffixes.into_iter().map(|s| s.to_lowercase()).collect(),
            exclusions: exclusions.into_iter().map(|s| s.to_lowercase()).collect(),
        }
    }

    pub fn from_lexicon(lexicon: &Lexicon) -> Self {
        Self::new(lexicon.accepted_suffixes.clone(), lexicon.exclusions.clone())
    }

    pub fn is_valid(&self, url: &str) -> bool {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return false;
        }

        let lower = url.to_lowercase();
        if !self.accepted_suffixes.iter().any(|s| lower.contains(s.as_str())) {
            return false;
        }

        !self.exclusions.iter().any(|x| lower.contains(x.as_str()))
    }
}
