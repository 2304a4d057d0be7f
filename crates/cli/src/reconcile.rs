//! `edurepo reconcile`: file-driven reconciliation.

use std::path::PathBuf;

use clap::Args;
use edurepo_recon::input::load_targets;
use edurepo_recon::source::collect_website_maps;
use edurepo_recon::{ReconConfig, ReconReport, Reconciler};

use crate::discover::{build_chain, request_delay};
use crate::util::{build_sources, emit_json, read_input};
use crate::CliError;

#[derive(Args)]
pub struct ReconcileArgs {
    /// Target institutions (JSON array, {"data": [...]} envelope, or CSV)
    #[arg(long)]
    pub targets: PathBuf,

    /// Website listing: JSON {name: url} or "Name - url" text file, or an
    /// http(s) URL serving either. Later sources win. Repeatable.
    #[arg(long = "source", value_name = "FILE|URL")]
    pub sources: Vec<String>,

    /// Run website discovery for unresolved targets and use the results as
    /// a final source (network)
    #[arg(long)]
    pub discover: bool,

    /// Cap on institutions sent to discovery (default: discovery.max_per_batch)
    #[arg(long)]
    pub max: Option<usize>,

    /// Match threshold (default: matching.min_threshold)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Delay before each request (default: discovery.request_delay_ms)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Write JSON report to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Output JSON report to stdout
    #[arg(long)]
    pub json: bool,
}

pub fn cmd_reconcile(config: &ReconConfig, args: ReconcileArgs) -> Result<(), CliError> {
    let threshold = checked_threshold(args.threshold, config.matching.min_threshold)?;
    if args.sources.is_empty() && !args.discover {
        return Err(CliError::usage("nothing to match against")
            .with_hint("pass at least one --source, or --discover"));
    }

    let targets_label = args.targets.display().to_string();
    let targets = load_targets(&targets_label, &read_input(&args.targets)?)
        .map_err(|e| CliError::usage(e.to_string()))?;

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

    let reconciler = Reconciler::new(&config.lexicon(), threshold);
    let report = reconciler.run(&targets, &maps);

    emit_json(&report, args.output.as_deref(), args.json)?;
    print_summary(&report);
    Ok(())
}

pub fn checked_threshold(flag: Option<f64>, default: f64) -> Result<f64, CliError> {
    let threshold = flag.unwrap_or(default);
    if !(0.0..=100.0).contains(&threshold) {
        return Err(CliError::usage(format!(
            "--threshold must be within [0, 100], got {threshold}"
        )));
    }
    Ok(threshold)
}

pub fn print_summary(report: &ReconReport) {
    let s = &report.summary;
    eprintln!(
        "reconcile: {} targets ({} already have a website) against {} merged entries from {} sources: {} matched, {} unmatched",
        s.targets, s.skipped_with_website, s.merged_entries, s.sources, s.matched, s.unmatched,
    );
}
