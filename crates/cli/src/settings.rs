//! Config loading and `edurepo config check`.

use std::path::Path;

use edurepo_recon::{ReconConfig, ReconError};

use crate::CliError;

/// Read and validate `--config`, or fall back to built-in defaults.
pub fn load(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    match path {
        None => Ok(ReconConfig::default()),
        Some(path) => parse_file(path),
    }
}

fn parse_file(path: &Path) -> Result<ReconConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::usage(format!("cannot read config {}: {e}", path.display())))?;

    ReconConfig::from_toml(&text).map_err(|e| {
        let err = CliError::config(format!("{}: {e}", path.display()));
        match e {
            ReconError::ConfigParse(_) => err.with_hint("check the TOML syntax and key names"),
            _ => err,
        }
    })
}

pub fn cmd_config_check(path: &Path) -> Result<(), CliError> {
    let config = parse_file(path)?;

    eprintln!("{}: ok", path.display());
    eprintln!(
        "  matching: min_threshold={} enhance_threshold={}",
        config.matching.min_threshold, config.matching.enhance_threshold
    );
    eprintln!(
        "  discovery: delay={}ms max_per_batch={} search={}",
        config.discovery.request_delay_ms,
        config.discovery.max_per_batch,
        if config.search.is_some() { "enabled" } else { "disabled" },
    );
    eprintln!(
        "  api: {} (batch {})",
        config.api.base_url, config.api.import_batch_size
    );
    Ok(())
}
