//! Cross-source website reconciliation.
//!
//! Source listings are merged into one `{name: url}` map (later sources win
//! per key), then every target without a website is scored against every
//! merged entry. Only the single best candidate at or above the threshold is
//! kept; ties go to the entry seen first.

use chrono::{SecondsFormat, Utc};

use crate::canonical::CanonicalInstitution;
use crate::lexicon::Lexicon;
use crate::model::{
    ReconMeta, ReconReport, ReconSummary, TargetInstitution, WebsiteMap, WebsiteMatch,
};
use crate::normalize::Normalizer;
use crate::similarity::Scorer;
use crate::url_filter::UrlFilter;

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Merge listings in order. Entries with a blank name or a URL that fails the
/// filter are dropped before they can shadow an earlier valid entry.
pub fn merge_website_maps(maps: &[WebsiteMap], filter: &UrlFilter) -> WebsiteMap {
    let mut merged = WebsiteMap::new();
    for map in maps {
        for (name, url) in map {
            let name = name.trim();
            let url = url.trim();
            if name.is_empty() {
                continue;
            }
            if !filter.is_valid(url) {
                log::debug!("merge: dropping {name:?} -> {url:?}");
                continue;
            }
            merged.insert(name.to_string(), url.to_string());
        }
    }
    merged
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    scorer: Scorer,
    filter: UrlFilter,
    threshold: f64,
}

impl Reconciler {
    pub fn new(lexicon: &Lexicon, threshold: f64) -> Self {
        Self {
            scorer: Scorer::new(Normalizer::from_lexicon(lexicon)),
            filter: UrlFilter::from_lexicon(lexicon),
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn merge(&self, maps: &[WebsiteMap]) -> WebsiteMap {
        merge_website_maps(maps, &self.filter)
    }

    /// Highest-scoring entry at or above the threshold. A later entry must
    /// score strictly higher to replace the current best.
    pub fn best_match(&self, target: &TargetInstitution, merged: &WebsiteMap) -> Option<WebsiteMatch> {
        let mut best: Option<(&String, &String, f64)> = None;
        for (name, url) in merged {
            let result = self.scorer.matches(&target.name, name, self.threshold);
            if !result.is_match {
                continue;
            }
            if best.map_or(true, |(_, _, score)| result.score > score) {
                best = Some((name, url, result.score));
            }
        }

        best.map(|(name, url, score)| WebsiteMatch {
            institution_id: target.id.clone(),
            institution_name: target.name.clone(),
            website: url.clone(),
            matched_name: name.clone(),
            confidence: score,
        })
    }

    /// Match every target that lacks a website against the merged listings.
    pub fn reconcile(&self, targets: &[TargetInstitution], maps: &[WebsiteMap]) -> Vec<WebsiteMatch> {
        let merged = self.merge(maps);
        self.match_against(targets, &merged)
    }

    fn match_against(&self, targets: &[TargetInstitution], merged: &WebsiteMap) -> Vec<WebsiteMatch> {
        let mut matches = Vec::new();
        for target in targets.iter().filter(|t| !t.has_website()) {
            match self.best_match(target, merged) {
                Some(m) => {
                    log::info!(
                        "matched {:?} -> {} via {:?} ({:.1})",
                        m.institution_name,
                        m.website,
                        m.matched_name,
                        m.confidence
                    );
                    matches.push(m);
                }
                None => log::debug!("no candidate for {:?}", target.name),
            }
        }
        matches
    }

    /// Reconcile and wrap the result with run metadata and counts.
    pub fn run(&self, targets: &[TargetInstitution], maps: &[WebsiteMap]) -> ReconReport {
        let merged = self.merge(maps);
        let matches = self.match_against(targets, &merged);

        let skipped = targets.iter().filter(|t| t.has_website()).count();
        let summary = ReconSummary {
            targets: targets.len(),
            skipped_with_website: skipped,
            matched: matches.len(),
            unmatched: targets.len() - skipped - matches.len(),
            sources: maps.len(),
            merged_entries: merged.len(),
        };

        ReconReport {
            meta: ReconMeta {
                engine_version: ENGINE_VERSION.to_string(),
                run_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
                threshold: self.threshold,
            },
            summary,
            matches,
        }
    }

    /// Attach matched websites to consolidated records that have none.
    /// Returns how many records gained a website.
    pub fn annotate(&self, institutions: &mut [CanonicalInstitution], maps: &[WebsiteMap]) -> usize {
        let merged = self.merge(maps);
        let mut applied = 0;
        for inst in institutions.iter_mut().filter(|i| i.website.is_none()) {
            let target = TargetInstitution {
                id: inst.id.clone(),
                name: inst.name.clone(),
                kind: Some(inst.kind.to_string()),
                website: None,
            };
            if let Some(m) = self.best_match(&target, &merged) {
                if inst.apply_match(&m) {
                    log::info!("annotated {:?} -> {} ({:.1})", inst.name, m.website, m.confidence);
                    applied += 1;
                }
            }
        }
        applied
    }
}
