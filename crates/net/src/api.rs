//! Institutions persistence API client.
//!
//! Blocking reqwest client (no Tokio runtime required). Covers the three
//! calls the enhance and import runs need: list, patch website, bulk import.

use std::time::Duration;

use edurepo_recon::input::load_targets_json;
use edurepo_recon::{CanonicalInstitution, ImportReport, InstitutionStore, TargetInstitution};
use serde::Deserialize;

const LIST_LIMIT: u32 = 10_000;

/// Error type for API operations.
#[derive(Debug)]
pub enum ApiError {
    /// Connection refused, DNS failure, timeout
    Network(String),
    /// HTTP error with status code and body
    Http(u16, String),
    /// Response body did not match the expected shape
    Parse(String),
    /// Server rejected the request (400 / 422)
    Validation(String),
}

impl ApiError {
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Network(msg) => write!(f, "Network error: {}", msg),
            ApiError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            ApiError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ApiError::Validation(msg) => write!(f, "Rejected: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Deserialize)]
struct ImportResponse {
    results: ImportReport,
}

/// Institutions API client (blocking).
#[derive(Clone)]
pub struct InstitutionApi {
    http: reqwest::blocking::Client,
    base_url: String,
    batch_size: usize,
}

impl InstitutionApi {
    pub fn new(base_url: &str, timeout: Duration, batch_size: usize) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("edurepo/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            batch_size: batch_size.max(1),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// All institutions known to the service.
    pub fn list_institutions(&self) -> Result<Vec<TargetInstitution>, ApiError> {
        let url = format!("{}/api/institutions?limit={}", self.base_url, LIST_LIMIT);
        let resp = self.check(self.http.get(&url).send())?;
        let body = resp.text().map_err(|e| ApiError::Parse(e.to_string()))?;
        load_targets_json(&url, &body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub fn patch_website(&self, institution_id: &str, website: &str) -> Result<(), ApiError> {
        let url = format!("{}/api/institutions/{}", self.base_url, institution_id);
        let body = serde_json::json!({ "website": website });
        self.check(self.http.patch(&url).json(&body).send())?;
        Ok(())
    }

    /// Push canonical records in batches. A failed batch is recorded and the
    /// next batch still goes out.
    pub fn import(&self, institutions: &[CanonicalInstitution], source: &str) -> ImportReport {
        let url = format!("{}/api/scrape/import", self.base_url);
        let mut report = ImportReport::default();

        for (i, batch) in institutions.chunks(self.batch_size).enumerate() {
            let body = serde_json::json!({ "institutions": batch, "source": source });
            let result = self
                .check(self.http.post(&url).json(&body).send())
                .and_then(|resp| {
                    resp.json::<ImportResponse>()
                        .map_err(|e| ApiError::Parse(e.to_string()))
                });

            match result {
                Ok(resp) => {
                    log::info!(
                        "import batch {}: {} created, {} updated",
                        i + 1,
                        resp.results.created,
                        resp.results.updated
                    );
                    report.absorb(resp.results);
                }
                Err(e) => {
                    log::warn!("import batch {} failed: {e}", i + 1);
                    report.record_failure(format!("batch {} ({} records): {e}", i + 1, batch.len()));
                }
            }
        }

        report
    }

    // ── Internal helpers ────────────────────────────────────────────

    fn check(
        &self,
        sent: reqwest::Result<reqwest::blocking::Response>,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        let response = sent.map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().unwrap_or_default();
            if status == 422 || status == 400 {
                return Err(ApiError::Validation(body));
            }
            return Err(ApiError::Http(status, body));
        }

        Ok(response)
    }
}

impl InstitutionStore for InstitutionApi {
    fn update_website(&self, institution_id: &str, website: &str) -> Result<(), String> {
        self.patch_website(institution_id, website)
            .map_err(|e| e.to_string())
    }
}
