//! `edurepo enhance`: API-driven website enhancement run.
//!
//! Lists institutions from the API, matches the ones without a website
//! against listings (and optionally discovery), and with `--push` patches
//! each match back. Failed patches are counted, never retried.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use edurepo_net::InstitutionApi;
use edurepo_recon::source::collect_website_maps;
use edurepo_recon::{persist_matches, PersistReport, ReconConfig, ReconReport, Reconciler};
use serde::Serialize;

use crate::discover::{build_chain, request_delay};
use crate::reconcile::{checked_threshold, print_summary};
use crate::util::{build_sources, emit_json};
use crate::CliError;

#[derive(Args)]
pub struct EnhanceArgs {
    /// Institutions API base URL (default: api.base_url)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Website listing file or URL. Later sources win. Repeatable.
    #[arg(long = "source", value_name = "FILE|URL")]
    pub sources: Vec<String>,

    /// Run website discovery for institutions without a website (network)
    #[arg(long)]
    pub discover: bool,

    /// Cap on institutions sent to discovery (default: discovery.max_per_batch)
    #[arg(long)]
    pub max: Option<usize>,

    /// Match threshold (default: matching.enhance_threshold)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Delay before each request (default: discovery.request_delay_ms)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// PATCH each match back to the API
    #[arg(long)]
    pub push: bool,

    /// Write JSON report to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output JSON report to stdout
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct EnhanceReport {
    #[serde(flatten)]
    recon: ReconReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    persisted: Option<PersistReport>,
}

pub fn cmd_enhance(config: &ReconConfig, args: EnhanceArgs) -> Result<(), CliError> {
    let threshold = checked_threshold(args.threshold, config.matching.enhance_threshold)?;
    if args.sources.is_empty() && !args.discover {
        return Err(CliError::usage("nothing to match against")
            .with_hint("pass at least one --source, or --discover"));
    }

    let base_url = args.api_url.as_deref().unwrap_or(&config.api.base_url);
    let api = InstitutionApi::new(
        base_url,
        Duration::from_secs(config.api.timeout_secs),
        config.api.import_batch_size,
    );

    let targets = api
        .list_institutions()
        .map_err(|e| CliError::api(e, api.base_url()))?;
    log::info!("loaded {} institutions from {}", targets.len(), api.base_url());

    let delay = request_delay(config, args.delay_ms);
    let sources = build_sources(&args.sources, &config.discovery, delay)?;
    let mut maps = collect_website_maps(&sources);

    if args.discover {
        let max = args.max.unwrap_or(config.discovery.max_per_batch);
        let report = build_chain(config, delay).discover_unresolved(&targets, max);
        eprintln!(
            "discovery: {} attempted, {} found, {} not found",
            report.attempted, report.found, report.not_found
        );
        maps.push(report.websites());
    }

    let recon = Reconciler::new(&config.lexicon(), threshold).run(&targets, &maps);
    print_summary(&recon);

    let persisted = if args.push {
        let p = persist_matches(&api, &recon.matches);
        eprintln!("push: {} updated, {} failed", p.updated, p.failed);
        for e in &p.errors {
            eprintln!("  {e}");
        }
        Some(p)
    } else {
        None
    };

    let failed = persisted.as_ref().map_or(0, |p| p.failed);
    emit_json(
        &EnhanceReport { recon, persisted },
        args.output.as_deref(),
        args.json,
    )?;

    if failed > 0 {
        return Err(CliError::partial(format!("{failed} website update(s) failed")));
    }
    Ok(())
}
