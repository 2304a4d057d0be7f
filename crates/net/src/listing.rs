//! Rate-limited fetching and remote listing sources.

use std::rc::Rc;
use std::time::Duration;

use edurepo_recon::input::{load_raw_records, load_website_map};
use edurepo_recon::{RateLimiter, RawNameRecord, ReconError, SourceAdapter, WebsiteMap};

/// Shared GET helper: one limiter wait before every request, fixed user
/// agent, fixed timeout. Non-2xx responses are errors.
pub struct PoliteFetcher {
    http: reqwest::blocking::Client,
    limiter: RateLimiter,
}

impl PoliteFetcher {
    pub fn new(limiter: RateLimiter, timeout: Duration, user_agent: &str) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .expect("failed to build HTTP client");
        Self { http, limiter }
    }

    pub fn fetch_text(&self, source: &str, url: &str) -> Result<String, ReconError> {
        self.limiter.wait();
        log::debug!("fetching {url}");

        let response = self.http.get(url).send().map_err(|e| ReconError::Source {
            source: source.into(),
            message: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReconError::Source {
                source: source.into(),
                message: format!("HTTP {} from {url}", status.as_u16()),
            });
        }

        response.text().map_err(|e| ReconError::Source {
            source: source.into(),
            message: e.to_string(),
        })
    }
}

/// A listing served over HTTP: a JSON `{name: url}` object or a plain-text
/// `Name - url` page for websites, and/or a JSON array of raw records.
pub struct RemoteListingSource {
    name: String,
    websites_url: Option<String>,
    records_url: Option<String>,
    fetcher: Rc<PoliteFetcher>,
}

impl RemoteListingSource {
    pub fn new(name: &str, websites_url: &str, fetcher: Rc<PoliteFetcher>) -> Self {
        Self {
            name: name.to_string(),
            websites_url: Some(websites_url.to_string()),
            records_url: None,
            fetcher,
        }
    }

    /// A source that only serves raw records.
    pub fn records(name: &str, records_url: &str, fetcher: Rc<PoliteFetcher>) -> Self {
        Self {
            name: name.to_string(),
            websites_url: None,
            records_url: Some(records_url.to_string()),
            fetcher,
        }
    }
}

impl SourceAdapter for RemoteListingSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn scrape_institution_websites(&self) -> Result<WebsiteMap, ReconError> {
        let Some(url) = &self.websites_url else {
            return Ok(WebsiteMap::new());
        };
        let body = self.fetcher.fetch_text(&self.name, url)?;
        load_website_map(&self.name, &body)
    }

    fn scrape_institutions(&self) -> Result<Vec<RawNameRecord>, ReconError> {
        let Some(url) = &self.records_url else {
            return Ok(Vec::new());
        };
        let body = self.fetcher.fetch_text(&self.name, url)?;
        load_raw_records(&self.name, &body)
    }
}
