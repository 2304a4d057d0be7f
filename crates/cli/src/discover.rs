//! `edurepo discover`: run the discovery chain for a single institution.

use std::time::Duration;

use edurepo_net::{CustomSearchClient, HttpProber};
use edurepo_recon::{DiscoveryChain, RateLimiter, ReconConfig};

use crate::util::emit_json;
use crate::CliError;

/// Live chain: HTTP prober, optional search, system-clock limiter.
pub fn build_chain(config: &ReconConfig, delay: Duration) -> DiscoveryChain {
    let d = &config.discovery;
    let prober = HttpProber::new(d.probe_timeout(), &d.user_agent)
        .with_limiter(RateLimiter::system(delay));
    let chain = DiscoveryChain::new(
        &config.lexicon(),
        Box::new(prober),
        RateLimiter::system(delay),
    );

    match &config.search {
        Some(search) => {
            log::debug!("search strategy enabled ({})", search.endpoint);
            chain.with_search(Box::new(CustomSearchClient::new(
                search,
                d.search_timeout(),
                &d.user_agent,
            )))
        }
        None => chain,
    }
}

pub fn request_delay(config: &ReconConfig, override_ms: Option<u64>) -> Duration {
    override_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.discovery.request_delay())
}

pub fn cmd_discover(
    config: &ReconConfig,
    name: &str,
    kind: Option<&str>,
    delay_ms: Option<u64>,
    json: bool,
) -> Result<(), CliError> {
    if name.trim().is_empty() {
        return Err(CliError::usage("institution name must not be empty"));
    }

    let chain = build_chain(config, request_delay(config, delay_ms));
    let found = chain.find_website(name, kind);

    if json {
        let value = serde_json::json!({
            "name": name,
            "website": found.as_ref().map(|c| c.url.as_str()),
            "method": found.as_ref().map(|c| c.method),
        });
        return emit_json(&value, None, true);
    }

    match found {
        Some(candidate) => println!("{}\t{}", candidate.url, candidate.method),
        None => eprintln!("no website found for {name}"),
    }
    Ok(())
}
