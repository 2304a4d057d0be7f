//! Website existence checks.

use std::time::Duration;

use edurepo_recon::{Prober, RateLimiter};
use reqwest::redirect::Policy;
use reqwest::StatusCode;

const MAX_REDIRECTS: usize = 10;

/// HEAD probe with redirect-following. A non-200 HEAD is retried once as a
/// GET whose body is never read; transport errors mean "does not exist".
///
/// The caller paces the HEAD. The GET retry is a second request, so it waits
/// on the prober's own limiter when one is set.
pub struct HttpProber {
    http: reqwest::blocking::Client,
    limiter: Option<RateLimiter>,
}

impl HttpProber {
    pub fn new(timeout: Duration, user_agent: &str) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()
            .expect("failed to build HTTP client");
        Self { http, limiter: None }
    }

    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }
}

impl Prober for HttpProber {
    fn exists(&self, url: &str) -> bool {
        let status = match self.http.head(url).send() {
            Ok(resp) => resp.status(),
            Err(e) => {
                log::debug!("HEAD {url} failed: {e}");
                return false;
            }
        };
        if status == StatusCode::OK {
            return true;
        }

        log::debug!("HEAD {url} returned {status}, retrying with GET");
        if let Some(limiter) = &self.limiter {
            limiter.wait();
        }
        match self.http.get(url).send() {
            // Dropping the response closes the connection without reading the body.
            Ok(resp) => resp.status() == StatusCode::OK,
            Err(e) => {
                log::debug!("GET {url} failed: {e}");
                false
            }
        }
    }
}
