//! Website discovery chain.
//!
//! Strategies run in order and the first validated hit wins:
//!
//! 1. external search (only when a [`SearchService`] is attached),
//! 2. domain patterns built from the compact form and the abbreviation,
//! 3. a short direct check of the most common hostnames.
//!
//! Every candidate passes the [`UrlFilter`] before it is probed, and every
//! outbound call (search or probe) is preceded by one rate-limiter wait.
//! Network failures surface as "no result", never as errors.

use std::fmt;

use serde::Serialize;

use crate::abbrev::Abbreviator;
use crate::lexicon::Lexicon;
use crate::model::{TargetInstitution, WebsiteMap};
use crate::normalize::Normalizer;
use crate::rate_limit::RateLimiter;
use crate::url_filter::UrlFilter;

const HOST_PREFIXES: &[&str] = &["www.", ""];

/// Existence check for a candidate URL. Implementations must not panic or
/// propagate transport errors: anything other than a final 200 is `false`.
pub trait Prober {
    fn exists(&self, url: &str) -> bool;
}

/// Ranked web search. Only the first link is ever used.
pub trait SearchService {
    fn search(&self, query: &str) -> Result<Vec<String>, SearchError>;
}

#[derive(Debug)]
pub enum SearchError {
    Network(String),
    Http(u16),
    Parse(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "network error: {msg}"),
            Self::Http(code) => write!(f, "HTTP {code}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for SearchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryMethod {
    SearchApi,
    DomainPattern,
    DirectCheck,
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SearchApi => write!(f, "search_api"),
            Self::DomainPattern => write!(f, "domain_pattern"),
            Self::DirectCheck => write!(f, "direct_check"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebsiteCandidate {
    pub url: String,
    pub method: DiscoveryMethod,
    pub validated: bool,
}

// ---------------------------------------------------------------------------
// Batch output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResult {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<DiscoveryMethod>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryReport {
    pub attempted: usize,
    pub found: usize,
    pub not_found: usize,
    pub results: Vec<DiscoveryResult>,
}

impl DiscoveryReport {
    /// Discovered websites as a source map, in discovery order.
    pub fn websites(&self) -> WebsiteMap {
        self.results
            .iter()
            .filter_map(|r| r.website.as_ref().map(|w| (r.name.clone(), w.clone())))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

pub struct DiscoveryChain {
    normalizer: Normalizer,
    abbreviator: Abbreviator,
    filter: UrlFilter,
    domain_suffixes: Vec<String>,
    prober: Box<dyn Prober>,
    search: Option<Box<dyn SearchService>>,
    limiter: RateLimiter,
}

impl DiscoveryChain {
    pub fn new(lexicon: &Lexicon, prober: Box<dyn Prober>, limiter: RateLimiter) -> Self {
        Self {
            normalizer: Normalizer::from_lexicon(lexicon),
            abbreviator: Abbreviator::from_lexicon(lexicon),
            filter: UrlFilter::from_lexicon(lexicon),
            domain_suffixes: lexicon.domain_suffixes.clone(),
            prober,
            search: None,
            limiter,
        }
    }

    /// Attach a search service, enabling strategy 1.
    pub fn with_search(mut self, search: Box<dyn SearchService>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn search_enabled(&self) -> bool {
        self.search.is_some()
    }

    pub fn search_query(name: &str, kind: Option<&str>) -> String {
        match kind.map(str::trim).filter(|k| !k.is_empty()) {
            Some(kind) => format!("{name} official website {kind}"),
            None => format!("{name} official website"),
        }
    }

    pub fn find_website(&self, name: &str, kind: Option<&str>) -> Option<WebsiteCandidate> {
        if name.trim().is_empty() {
            return None;
        }
        self.via_search(name, kind)
            .or_else(|| self.via_patterns(name))
            .or_else(|| self.via_direct_check(name))
    }

    /// Strategy 1: first search result, if it passes the filter.
    pub fn via_search(&self, name: &str, kind: Option<&str>) -> Option<WebsiteCandidate> {
        let search = self.search.as_ref()?;
        let query = Self::search_query(name, kind);

        self.limiter.wait();
        let links = match search.search(&query) {
            Ok(links) => links,
            Err(e) => {
                log::debug!("search failed for '{query}': {e}");
                return None;
            }
        };

        let first = links.into_iter().next()?;
        if !self.filter.is_valid(&first) {
            log::debug!("search result rejected by filter: {first}");
            return None;
        }

        log::debug!("found website via search: {first}");
        Some(WebsiteCandidate {
            url: first,
            method: DiscoveryMethod::SearchApi,
            validated: true,
        })
    }

    /// Candidate list for strategy 2: compact-form patterns first, then
    /// abbreviation patterns when the abbreviation differs.
    pub fn pattern_candidates(&self, name: &str) -> Vec<String> {
        let compact = self.normalizer.normalize_for_domain(name);
        let mut labels = Vec::with_capacity(2);
        if !compact.is_empty() {
            labels.push(compact.clone());
        }
        if let Some(abbr) = self.abbreviator.abbreviate(name) {
            if abbr != compact {
                labels.push(abbr);
            }
        }

        let mut candidates = Vec::new();
        for label in &labels {
            for suffix in &self.domain_suffixes {
                for prefix in HOST_PREFIXES {
                    candidates.push(format!("https://{prefix}{label}{suffix}"));
                }
            }
        }
        candidates
    }

    pub fn via_patterns(&self, name: &str) -> Option<WebsiteCandidate> {
        let candidates = self.pattern_candidates(name);
        self.probe_first(&candidates, DiscoveryMethod::DomainPattern)
    }

    /// Candidate list for strategy 3.
    pub fn direct_candidates(&self, name: &str) -> Vec<String> {
        let compact = self.normalizer.normalize_for_domain(name);
        if compact.is_empty() {
            return Vec::new();
        }
        [
            format!("www.{compact}.edu.ng"),
            format!("{compact}.edu.ng"),
            format!("www.{compact}.com"),
            format!("{compact}.com"),
        ]
        .into_iter()
        .map(|host| format!("https://{host}"))
        .collect()
    }

    pub fn via_direct_check(&self, name: &str) -> Option<WebsiteCandidate> {
        let candidates = self.direct_candidates(name);
        self.probe_first(&candidates, DiscoveryMethod::DirectCheck)
    }

    fn probe_first(&self, candidates: &[String], method: DiscoveryMethod) -> Option<WebsiteCandidate> {
        for url in candidates {
            if !self.filter.is_valid(url) {
                log::debug!("candidate rejected by filter: {url}");
                continue;
            }
            self.limiter.wait();
            if self.prober.exists(url) {
                log::debug!("found website via {method}: {url}");
                return Some(WebsiteCandidate {
                    url: url.clone(),
                    method,
                    validated: true,
                });
            }
        }
        None
    }

    // ── Batch ───────────────────────────────────────────────────────

    /// Run discovery for up to `max` institutions that have no website yet.
    /// Waits one fixed delay between institutions.
    pub fn discover_unresolved(&self, targets: &[TargetInstitution], max: usize) -> DiscoveryReport {
        let mut report = DiscoveryReport::default();

        let unresolved = targets
            .iter()
            .filter(|t| !t.has_website() && !t.name.trim().is_empty())
            .take(max);

        for (i, target) in unresolved.enumerate() {
            if i > 0 {
                self.limiter.wait();
            }
            report.attempted += 1;
            log::info!("searching website for: {}", target.name);

            match self.find_website(&target.name, target.kind.as_deref()) {
                Some(candidate) => {
                    log::info!("found website for {}: {} ({})", target.name, candidate.url, candidate.method);
                    report.found += 1;
                    report.results.push(DiscoveryResult {
                        name: target.name.clone(),
                        website: Some(candidate.url),
                        method: Some(candidate.method),
                    });
                }
                None => {
                    log::warn!("no website found for {}", target.name);
                    report.not_found += 1;
                    report.results.push(DiscoveryResult {
                        name: target.name.clone(),
                        website: None,
                        method: None,
                    });
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rate_limit::ManualClock;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;
    use std::time::Duration;

    /// Prober answering from a fixed set of live URLs and logging every probe.
    #[derive(Clone, Default)]
    struct FakeProber {
        live: HashSet<String>,
        probed: Rc<RefCell<Vec<String>>>,
    }

    impl FakeProber {
        fn with_live(urls: &[&str]) -> Self {
            Self {
                live: urls.iter().map(|u| u.to_string()).collect(),
                probed: Rc::default(),
            }
        }

        fn probed(&self) -> Vec<String> {
            self.probed.borrow().clone()
        }
    }

    impl Prober for FakeProber {
        fn exists(&self, url: &str) -> bool {
            self.probed.borrow_mut().push(url.to_string());
            self.live.contains(url)
        }
    }

    struct FakeSearch {
        result: Result<Vec<String>, u16>,
        queries: Rc<RefCell<Vec<String>>>,
    }

    impl SearchService for FakeSearch {
        fn search(&self, query: &str) -> Result<Vec<String>, SearchError> {
            self.queries.borrow_mut().push(query.to_string());
            self.result.clone().map_err(SearchError::Http)
        }
    }

    fn chain(prober: FakeProber, clock: &ManualClock) -> DiscoveryChain {
        let limiter = RateLimiter::new(Duration::from_millis(100), Box::new(clock.clone()));
        DiscoveryChain::new(&Lexicon::default(), Box::new(prober), limiter)
    }

    #[test]
    fn compact_patterns_precede_abbreviation_patterns() {
        let c = chain(FakeProber::default(), &ManualClock::new());
        let candidates = c.pattern_candidates("Obafemi Awolowo University");

        assert_eq!(candidates.len(), 24);
        assert_eq!(candidates[0], "https://www.obafemiawolowo.edu.ng");
        assert_eq!(candidates[1], "https://obafemiawolowo.edu.ng");
        assert_eq!(candidates[2], "https://www.obafemiawolowo.edu.ng.ng");
        assert_eq!(candidates[11], "https://obafemiawolowo.org.ng");
        assert_eq!(candidates[12], "https://www.oau.edu.ng");

        let first_abbr = candidates.iter().position(|u| u.contains("//www.oau.")).unwrap();
        let compact = candidates
            .iter()
            .position(|u| u == "https://www.obafemiawolowo.edu.ng")
            .unwrap();
        assert!(compact < first_abbr);
    }

    #[test]
    fn abbreviation_equal_to_compact_is_not_repeated() {
        let lex = Lexicon {
            abbreviations: vec![crate::lexicon::Abbreviation {
                name: "covenant".into(),
                abbreviation: "covenant".into(),
            }],
            ..Lexicon::default()
        };
        let limiter = RateLimiter::new(Duration::ZERO, Box::new(ManualClock::new()));
        let c = DiscoveryChain::new(&lex, Box::new(FakeProber::default()), limiter);
        assert_eq!(c.pattern_candidates("Covenant University").len(), 12);
    }

    #[test]
    fn abbreviation_only_when_compact_is_empty() {
        let c = chain(FakeProber::default(), &ManualClock::new());
        let candidates = c.pattern_candidates("University of Nigeria");
        assert_eq!(candidates.len(), 12);
        assert_eq!(candidates[0], "https://www.unn.edu.ng");
        assert!(c.direct_candidates("University of Nigeria").is_empty());
    }

    #[test]
    fn direct_candidates_are_the_common_four() {
        let c = chain(FakeProber::default(), &ManualClock::new());
        assert_eq!(
            c.direct_candidates("Covenant University"),
            vec![
                "https://www.covenant.edu.ng",
                "https://covenant.edu.ng",
                "https://www.covenant.com",
                "https://covenant.com",
            ]
        );
    }

    #[test]
    fn pattern_strategy_returns_first_live_candidate() {
        let clock = ManualClock::new();
        let prober = FakeProber::with_live(&["https://www.oau.edu.ng", "https://oau.edu.ng"]);
        let c = chain(prober.clone(), &clock);

        let found = c.find_website("Obafemi Awolowo University", Some("university")).unwrap();
        assert_eq!(found.url, "https://www.oau.edu.ng");
        assert_eq!(found.method, DiscoveryMethod::DomainPattern);
        assert!(found.validated);

        // Twelve compact probes, then the first abbreviation probe hits.
        assert_eq!(prober.probed().len(), 13);
        assert_eq!(clock.sleep_count(), 13);
    }

    #[test]
    fn direct_check_runs_after_patterns_fail() {
        let prober = FakeProber::with_live(&[]);
        let c = chain(prober.clone(), &ManualClock::new());
        assert!(c.find_website("Covenant University", None).is_none());

        let probed = prober.probed();
        // "Covenant University" has no abbreviation: 12 patterns, then 4 direct checks.
        assert_eq!(probed.len(), 12 + 4);
        assert_eq!(probed[12], "https://www.covenant.edu.ng");
    }

    #[test]
    fn excluded_candidates_are_never_probed() {
        let prober = FakeProber::with_live(&["https://www.jambcentre.edu.ng"]);
        let clock = ManualClock::new();
        let c = chain(prober.clone(), &clock);

        assert!(c.find_website("Jamb Centre", None).is_none());
        assert!(prober.probed().is_empty());
        assert_eq!(clock.sleep_count(), 0);
    }

    #[test]
    fn search_hit_short_circuits() {
        let queries = Rc::new(RefCell::new(Vec::new()));
        let prober = FakeProber::default();
        let clock = ManualClock::new();
        let c = chain(prober.clone(), &clock).with_search(Box::new(FakeSearch {
            result: Ok(vec!["https://unilag.edu.ng/".into(), "https://other.edu.ng".into()]),
            queries: queries.clone(),
        }));

        let found = c.find_website("University of Lagos", Some("university")).unwrap();
        assert_eq!(found.url, "https://unilag.edu.ng/");
        assert_eq!(found.method, DiscoveryMethod::SearchApi);
        assert_eq!(queries.borrow().as_slice(), ["University of Lagos official website university"]);
        assert!(prober.probed().is_empty());
        assert_eq!(clock.sleep_count(), 1);
    }

    #[test]
    fn rejected_or_failed_search_falls_through() {
        let prober = FakeProber::with_live(&["https://www.unilag.edu.ng"]);
        let c = chain(prober.clone(), &ManualClock::new()).with_search(Box::new(FakeSearch {
            result: Ok(vec!["https://www.myschoolgist.com/unilag".into()]),
            queries: Rc::default(),
        }));
        let found = c.find_website("University of Lagos", None).unwrap();
        assert_eq!(found.method, DiscoveryMethod::DomainPattern);

        let c = chain(prober, &ManualClock::new()).with_search(Box::new(FakeSearch {
            result: Err(503),
            queries: Rc::default(),
        }));
        assert!(c.search_enabled());
        let found = c.find_website("University of Lagos", None).unwrap();
        assert_eq!(found.url, "https://www.unilag.edu.ng");
    }

    #[test]
    fn search_query_format() {
        assert_eq!(
            DiscoveryChain::search_query("Yaba College of Technology", Some("polytechnic")),
            "Yaba College of Technology official website polytechnic"
        );
        assert_eq!(
            DiscoveryChain::search_query("Yaba College of Technology", Some("  ")),
            "Yaba College of Technology official website"
        );
    }

    #[test]
    fn batch_is_capped_and_skips_resolved() {
        let clock = ManualClock::new();
        let prober = FakeProber::with_live(&["https://www.covenant.edu.ng"]);
        let c = chain(prober, &clock);

        let targets = vec![
            TargetInstitution::new("1", "Covenant University"),
            TargetInstitution::new("2", "Lagos State University").with_website("https://lasu.edu.ng"),
            TargetInstitution::new("3", "Babcock University"),
            TargetInstitution::new("4", "Redeemer's University"),
        ];
        let report = c.discover_unresolved(&targets, 2);

        assert_eq!(report.attempted, 2);
        assert_eq!(report.found, 1);
        assert_eq!(report.not_found, 1);
        assert_eq!(report.results[0].website.as_deref(), Some("https://www.covenant.edu.ng"));
        assert_eq!(report.results[1].name, "Babcock University");

        let websites = report.websites();
        assert_eq!(websites.len(), 1);
        assert_eq!(websites["Covenant University"], "https://www.covenant.edu.ng");

        // 1 probe for Covenant, 1 between-institution wait, 16 probes for Babcock.
        assert_eq!(clock.sleep_count(), 1 + 1 + 16);
    }
}
