//! Shared helpers for reading inputs and emitting JSON.

use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use edurepo_net::{PoliteFetcher, RemoteListingSource};
use edurepo_recon::config::DiscoveryConfig;
use edurepo_recon::input::load_website_map;
use edurepo_recon::{RateLimiter, SourceAdapter, StaticSource};
use serde::Serialize;

use crate::CliError;

pub fn read_input(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::usage(format!("cannot read {}: {e}", path.display())))
}

/// Pretty JSON to `--output` and/or stdout.
pub fn emit_json<T: Serialize>(
    value: &T,
    output: Option<&Path>,
    stdout: bool,
) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(path) = output {
        std::fs::write(path, &json)
            .map_err(|e| CliError::general(format!("cannot write {}: {e}", path.display())))?;
        eprintln!("wrote {}", path.display());
    }
    if stdout {
        println!("{json}");
    }
    Ok(())
}

pub fn is_url(entry: &str) -> bool {
    entry.starts_with("http://") || entry.starts_with("https://")
}

/// Build one source per `--source`: URLs become remote listings sharing a
/// rate-limited fetcher, anything else is read from disk up front.
pub fn build_sources(
    entries: &[String],
    discovery: &DiscoveryConfig,
    delay: Duration,
) -> Result<Vec<Box<dyn SourceAdapter>>, CliError> {
    let mut sources: Vec<Box<dyn SourceAdapter>> = Vec::with_capacity(entries.len());
    let mut fetcher: Option<Rc<PoliteFetcher>> = None;

    for entry in entries {
        if is_url(entry) {
            let shared = fetcher
                .get_or_insert_with(|| {
                    Rc::new(PoliteFetcher::new(
                        RateLimiter::system(delay),
                        discovery.search_timeout(),
                        &discovery.user_agent,
                    ))
                })
                .clone();
            sources.push(Box::new(RemoteListingSource::new(entry, entry, shared)));
        } else {
            let map = load_website_map(entry, &read_input(Path::new(entry))?)
                .map_err(|e| CliError::usage(e.to_string()))?;
            sources.push(Box::new(StaticSource::new(entry, map)));
        }
    }
    Ok(sources)
}
