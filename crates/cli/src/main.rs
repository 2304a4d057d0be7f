// edurepo CLI - institution name reconciliation and website discovery

mod discover;
mod enhance;
mod exit_codes;
mod import;
mod names;
mod reconcile;
mod settings;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{
    EXIT_API_UNREACHABLE, EXIT_CONFIG_INVALID, EXIT_ERROR, EXIT_PERSIST_PARTIAL, EXIT_SUCCESS,
    EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "edurepo")]
#[command(about = "Reconcile Nigerian institution names and discover their websites")]
#[command(version, long_version = long_version())]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// TOML config file (built-in defaults when omitted)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the normalized, domain and abbreviated forms of names
    #[command(after_help = "\
Examples:
  edurepo normalize 'University of Lagos'
  edurepo normalize 'Obafemi Awolowo University' 'Yaba College of Technology' --json")]
    Normalize {
        /// Institution names
        #[arg(required = true)]
        names: Vec<String>,

        /// Output JSON to stdout instead of text
        #[arg(long)]
        json: bool,
    },

    /// Score the similarity of two names
    #[command(after_help = "\
Examples:
  edurepo score 'University of Lagos' 'Unilag'
  edurepo score 'Federal University of Technology Akure' 'Federal University of Technology, Akure' --json")]
    Score {
        name_a: String,
        name_b: String,

        /// Match threshold (default: matching.min_threshold)
        #[arg(long)]
        threshold: Option<f64>,

        #[arg(long)]
        json: bool,
    },

    /// Find the official website of one institution (network)
    #[command(after_help = "\
Examples:
  edurepo discover 'Bayero University'
  edurepo discover 'Kaduna Polytechnic' --type polytechnic --delay-ms 250")]
    Discover {
        name: String,

        /// Institution type, appended to the search query
        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<String>,

        /// Delay before each request (default: discovery.request_delay_ms)
        #[arg(long)]
        delay_ms: Option<u64>,

        #[arg(long)]
        json: bool,
    },

    /// Match target institutions against website listings
    #[command(after_help = "\
Examples:
  edurepo reconcile --targets institutions.json --source nuc.json --source myschool.txt
  edurepo reconcile --targets institutions.csv --source nuc.json --discover --max 20 --output report.json")]
    Reconcile(reconcile::ReconcileArgs),

    /// Enhance institutions held by the API with discovered websites
    #[command(after_help = "\
Examples:
  edurepo enhance --source https://example.org/listing.json --output report.json
  edurepo enhance --discover --max 50 --push")]
    Enhance(enhance::EnhanceArgs),

    /// Consolidate raw records and bulk-import them into the API
    #[command(after_help = "\
Examples:
  edurepo import records.json --source-name nuc --dry-run
  edurepo import records.json --source-name nuc --api-url http://localhost:3000
  edurepo import https://example.org/records.json --source-name jamb --source websites.txt --dry-run")]
    Import(import::ImportArgs),

    /// Config file commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Parse and validate a config file
    Check {
        file: PathBuf,
    },
}

fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        })
    });

    // try_init: the log bridge may already be installed in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (", env!("GIT_COMMIT_HASH"), ")",
        "\nengine:  edurepo-recon ", env!("CARGO_PKG_VERSION"),
        "\ntarget:  ", env!("TARGET"),
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Normalize { names, json } => settings::load(config_path)
            .and_then(|config| names::cmd_normalize(&config, &names, json)),
        Commands::Score { name_a, name_b, threshold, json } => settings::load(config_path)
            .and_then(|config| names::cmd_score(&config, &name_a, &name_b, threshold, json)),
        Commands::Discover { name, kind, delay_ms, json } => settings::load(config_path)
            .and_then(|config| {
                discover::cmd_discover(&config, &name, kind.as_deref(), delay_ms, json)
            }),
        Commands::Reconcile(args) => settings::load(config_path)
            .and_then(|config| reconcile::cmd_reconcile(&config, args)),
        Commands::Enhance(args) => settings::load(config_path)
            .and_then(|config| enhance::cmd_enhance(&config, args)),
        Commands::Import(args) => settings::load(config_path)
            .and_then(|config| import::cmd_import(&config, args)),
        Commands::Config(ConfigCommands::Check { file }) => settings::cmd_config_check(&file),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG_INVALID, message: msg.into(), hint: None }
    }

    pub fn partial(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PERSIST_PARTIAL, message: msg.into(), hint: None }
    }

    /// Map an API error: connection failures get their own exit code.
    pub fn api(err: edurepo_net::ApiError, base_url: &str) -> Self {
        if err.is_unreachable() {
            Self {
                code: EXIT_API_UNREACHABLE,
                message: format!("cannot reach institutions API at {base_url}: {err}"),
                hint: Some("is the API server running? set --api-url or [api] base_url".into()),
            }
        } else {
            Self::general(format!("institutions API: {err}"))
        }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
