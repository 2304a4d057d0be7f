//! Google Custom Search client.

use std::time::Duration;

use edurepo_recon::config::SearchConfig;
use edurepo_recon::{SearchError, SearchService};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

/// Asks for a single result per query; only the top link is ever used.
pub struct CustomSearchClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    api_key: String,
    engine_id: String,
}

impl CustomSearchClient {
    pub fn new(config: &SearchConfig, timeout: Duration, user_agent: &str) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            engine_id: config.engine_id.clone(),
        }
    }
}

impl SearchService for CustomSearchClient {
    fn search(&self, query: &str) -> Result<Vec<String>, SearchError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("num", "1"),
            ])
            .send()
            .map_err(|e| SearchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http(status.as_u16()));
        }

        let body: SearchResponse = response
            .json()
            .map_err(|e| SearchError::Parse(e.to_string()))?;
        Ok(body.items.into_iter().map(|i| i.link).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> CustomSearchClient {
        let config = SearchConfig {
            api_key: "test-key".into(),
            engine_id: "test-cx".into(),
            endpoint: server.url("/customsearch/v1"),
        };
        CustomSearchClient::new(&config, Duration::from_secs(5), "edurepo-test")
    }

    #[test]
    fn sends_credentials_and_returns_links() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/customsearch/v1")
                .query_param("key", "test-key")
                .query_param("cx", "test-cx")
                .query_param("q", "Bayero University official website university")
                .query_param("num", "1");
            then.status(200).json_body(serde_json::json!({
                "kind": "customsearch#search",
                "items": [
                    { "title": "Bayero University Kano", "link": "https://buk.edu.ng/" },
                    { "title": "BUK - Wikipedia", "link": "https://en.wikipedia.org/wiki/BUK" }
                ]
            }));
        });

        let links = client(&server)
            .search("Bayero University official website university")
            .unwrap();
        mock.assert();
        assert_eq!(links, vec!["https://buk.edu.ng/", "https://en.wikipedia.org/wiki/BUK"]);
    }

    #[test]
    fn no_items_is_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/customsearch/v1");
            then.status(200).json_body(serde_json::json!({ "kind": "customsearch#search" }));
        });
        assert!(client(&server).search("nothing").unwrap().is_empty());
    }

    #[test]
    fn quota_error_is_http() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/customsearch/v1");
            then.status(429).json_body(serde_json::json!({ "error": { "code": 429 } }));
        });
        let err = client(&server).search("q").unwrap_err();
        assert!(matches!(err, SearchError::Http(429)));
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/customsearch/v1");
            then.status(200).body("<html>");
        });
        let err = client(&server).search("q").unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }
}
