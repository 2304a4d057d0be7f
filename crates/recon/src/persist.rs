//! Persistence seam.
//!
//! The engine only needs to push `{id, website}` updates and count outcomes.
//! Failures are collected; nothing is retried.

use serde::{Deserialize, Serialize};

use crate::model::WebsiteMatch;

pub trait InstitutionStore {
    fn update_website(&self, institution_id: &str, website: &str) -> Result<(), String>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PersistReport {
    pub updated: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

impl PersistReport {
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Attempt every match once, in order.
pub fn persist_matches(store: &dyn InstitutionStore, matches: &[WebsiteMatch]) -> PersistReport {
    let mut report = PersistReport::default();
    for m in matches {
        match store.update_website(&m.institution_id, &m.website) {
            Ok(()) => {
                log::info!("updated {} ({}) -> {}", m.institution_name, m.institution_id, m.website);
                report.updated += 1;
            }
            Err(e) => {
                log::warn!("update failed for {} ({}): {e}", m.institution_name, m.institution_id);
                report.failed += 1;
                report.errors.push(format!("{}: {e}", m.institution_name));
            }
        }
    }
    report
}

/// Running totals for a batched bulk import.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportReport {
    #[serde(default)]
    pub created: usize,
    #[serde(default)]
    pub updated: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl ImportReport {
    pub fn absorb(&mut self, batch: ImportReport) {
        self.created += batch.created;
        self.updated += batch.updated;
        self.errors.extend(batch.errors);
    }

    pub fn record_failure(&mut self, message: String) {
        self.errors.push(message);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
