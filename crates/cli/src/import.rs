//! `edurepo import`: consolidate raw records and bulk-import them.

use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use clap::Args;
use edurepo_net::{InstitutionApi, PoliteFetcher, RemoteListingSource};
use edurepo_recon::input::load_raw_records;
use edurepo_recon::source::collect_website_maps;
use edurepo_recon::{
    Consolidator, RateLimiter, RawNameRecord, ReconConfig, Reconciler, SourceAdapter,
};

use crate::discover::request_delay;
use crate::reconcile::checked_threshold;
use crate::util::{build_sources, emit_json, is_url, read_input};
use crate::CliError;

#[derive(Args)]
pub struct ImportArgs {
    /// JSON array of raw institution records: a file, or an http(s) URL
    #[arg(value_name = "FILE|URL")]
    pub records: String,

    /// Institutions API base URL (default: api.base_url)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Source label sent with the import
    #[arg(long)]
    pub source_name: String,

    /// Website listing used to fill records without a website. Later
    /// sources win. Repeatable.
    #[arg(long = "source", value_name = "FILE|URL")]
    pub sources: Vec<String>,

    /// Match threshold for --source listings (default: matching.min_threshold)
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Delay before each remote request (default: discovery.request_delay_ms)
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// Print the consolidated records instead of importing them
    #[arg(long)]
    pub dry_run: bool,
}

pub fn cmd_import(config: &ReconConfig, args: ImportArgs) -> Result<(), CliError> {
    if args.source_name.trim().is_empty() {
        return Err(CliError::usage("--source-name must not be empty"));
    }
    let threshold = checked_threshold(args.threshold, config.matching.min_threshold)?;
    let delay = request_delay(config, args.delay_ms);

    let records = load_records(config, &args, delay)?;
    let mut institutions = Consolidator::new(&config.lexicon()).consolidate(&records);
    eprintln!(
        "consolidated {} records into {} institutions",
        records.len(),
        institutions.len()
    );

    if !args.sources.is_empty() {
        let sources = build_sources(&args.sources, &config.discovery, delay)?;
        let maps = collect_website_maps(&sources);
        let annotated =
            Reconciler::new(&config.lexicon(), threshold).annotate(&mut institutions, &maps);
        eprintln!("matched websites for {annotated} institutions");
    }

    if args.dry_run {
        return emit_json(&institutions, None, true);
    }

    let base_url = args.api_url.as_deref().unwrap_or(&config.api.base_url);
    let api = InstitutionApi::new(
        base_url,
        Duration::from_secs(config.api.timeout_secs),
        config.api.import_batch_size,
    );

    let report = api.import(&institutions, &args.source_name);
    eprintln!(
        "import: {} created, {} updated, {} errors",
        report.created,
        report.updated,
        report.errors.len()
    );
    for e in &report.errors {
        eprintln!("  {e}");
    }

    if !report.is_clean() {
        return Err(CliError::partial(format!(
            "{} import error(s) against {}",
            report.errors.len(),
            api.base_url()
        )));
    }
    Ok(())
}

fn load_records(
    config: &ReconConfig,
    args: &ImportArgs,
    delay: Duration,
) -> Result<Vec<RawNameRecord>, CliError> {
    if is_url(&args.records) {
        let d = &config.discovery;
        let fetcher =
            PoliteFetcher::new(RateLimiter::system(delay), d.search_timeout(), &d.user_agent);
        return RemoteListingSource::records(&args.source_name, &args.records, Rc::new(fetcher))
            .scrape_institutions()
            .map_err(|e| CliError::general(e.to_string()));
    }

    let path = Path::new(&args.records);
    load_raw_records(&args.source_name, &read_input(path)?)
        .map_err(|e| CliError::usage(format!("{}: {e}", args.records)))
}
