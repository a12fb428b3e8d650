//! Bike-share trip explorer.
//!
//! Pipeline: raw strings → [`filter`] → [`trips::load`] → [`stats`] →
//! [`render`], with [`paginate`] paging raw rows of the same filtered set.
//! The interactive loop lives in [`session`]; the one-shot commands live
//! here.

pub mod catalog;
pub mod config;
pub mod filter;
pub mod paginate;
pub mod render;
pub mod session;
pub mod stats;
pub mod trips;

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, info};

use crate::catalog::DatasetCatalog;
use crate::config::{AppConfig, ConfigError};
use crate::filter::{Filter, ValidationError, build_filter, normalize_city, normalize_mode};
use crate::paginate::PaginationError;
use crate::session::{Session, TerminalPrompter};
use crate::stats::{StatisticsError, TimingRecorder, compute_report};
use crate::trips::LoadError;

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "bikeshare", version, about = "Explore bike-share trip data", long_about = None)]
pub struct Cli {
    /// Directory containing the city CSV files
    #[arg(long, global = true, env = "BIKESHARE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to ~/.config/bikeshare/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Interactive session (the default)
    Explore,
    /// Print statistics for one city and filter
    Stats {
        #[command(flatten)]
        query: QueryArgs,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print one page of raw rows of the filtered data
    Raw {
        #[command(flatten)]
        query: QueryArgs,
        /// First row to show (0-based)
        #[arg(long, default_value_t = 0)]
        offset: usize,
        #[arg(long)]
        json: bool,
    },
    /// List the configured cities and their data files
    Cities {
        #[arg(long)]
        json: bool,
    },
}

/// Raw filter input; validated by the same normalizers as the session.
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Chicago, New York or Washington
    #[arg(long)]
    pub city: String,
    /// month, day, both or none
    #[arg(long, default_value = "none")]
    pub filter: String,
    /// January..June (with --filter month|both)
    #[arg(long)]
    pub month: Option<String>,
    /// Monday..Sunday (with --filter day|both)
    #[arg(long)]
    pub day: Option<String>,
}

impl QueryArgs {
    pub fn to_filter(&self) -> Result<Filter, ValidationError> {
        let city = normalize_city(&self.city)?;
        let mode = normalize_mode(&self.filter)?;
        build_filter(city, mode, self.month.as_deref(), self.day.as_deref())
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Process-level error: exit code plus a message suitable for humans or,
/// under `--json`, for an error envelope.
#[derive(Debug, Clone)]
pub struct CliError {
    pub code: i32,
    pub kind: &'static str,
    pub message: String,
    pub hint: Option<String>,
    pub retryable: bool,
}

impl CliError {
    pub fn new(code: i32, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            kind,
            message: message.into(),
            hint: None,
            retryable: false,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.code,
                "kind": self.kind,
                "message": self.message,
                "hint": self.hint,
                "retryable": self.retryable,
            }
        })
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, "\nhint: {hint}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CliError {}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::new(2, "validation", err.to_string())
    }
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        let hint = match &err {
            LoadError::SourceUnavailable { .. } => {
                "check --data-dir / BIKESHARE_DATA_DIR and the [files] table in the config"
            }
            LoadError::MalformedRecord { .. } => "timestamps must look like 2017-01-01 09:07:57",
        };
        CliError::new(3, "load", err.to_string()).with_hint(hint)
    }
}

impl From<StatisticsError> for CliError {
    fn from(err: StatisticsError) -> Self {
        CliError::new(4, "no_data", err.to_string())
    }
}

impl From<PaginationError> for CliError {
    fn from(err: PaginationError) -> Self {
        CliError::new(4, "no_data", err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(5, "config", err.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::new(1, "io", err.to_string())
    }
}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(1, "internal", format!("{err:#}"))
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

pub struct ParsedCli {
    pub cli: Cli,
}

impl ParsedCli {
    /// Whether errors should be reported as JSON.
    pub fn wants_json(&self) -> bool {
        matches!(
            self.cli.command,
            Some(Commands::Stats { json: true, .. })
                | Some(Commands::Raw { json: true, .. })
                | Some(Commands::Cities { json: true })
        )
    }
}

/// Parse arguments. `--help`/`--version` come back as code-0 errors carrying
/// clap's rendered output.
pub fn parse_cli(raw_args: Vec<String>) -> Result<ParsedCli, CliError> {
    match Cli::try_parse_from(raw_args) {
        Ok(cli) => Ok(ParsedCli { cli }),
        Err(err) => {
            let code = if err.use_stderr() { 2 } else { 0 };
            Err(CliError::new(code, "usage", err.render().to_string()))
        }
    }
}

/// Install the stderr `fmt` subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;

    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_config(cli: &Cli) -> Result<AppConfig, ConfigError> {
    match &cli.config {
        Some(path) => {
            if !path.exists() {
                return Err(ConfigError::Validation(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            }
            AppConfig::load_from(path)
        }
        None => AppConfig::load(),
    }
}

pub fn run_with_parsed(parsed: ParsedCli) -> Result<(), CliError> {
    let cli = parsed.cli;
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    let catalog = config.catalog(cli.data_dir.as_deref());
    debug!(data_dir = %catalog.data_dir().display(), "catalog ready");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match cli.command.unwrap_or(Commands::Explore) {
        Commands::Explore => {
            let mut session = Session::new(&catalog, TerminalPrompter::new(), &mut out);
            session.run()?;
        }
        Commands::Stats { query, json } => run_stats(&catalog, &query, json, &mut out)?,
        Commands::Raw {
            query,
            offset,
            json,
        } => run_raw(&catalog, &query, offset, json, &mut out)?,
        Commands::Cities { json } => {
            let entries = catalog.entries();
            if json {
                writeln!(out, "{}", serde_json::json!({ "cities": entries }))?;
            } else {
                render::write_catalog(&mut out, &entries)?;
            }
        }
    }
    Ok(())
}

/// `bikeshare stats`: an empty filtered set prints a no-data result and
/// exits with code 4.
pub fn run_stats(
    catalog: &DatasetCatalog,
    query: &QueryArgs,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let started = Instant::now();
    let filter = query.to_filter()?;
    let set = trips::load(catalog, &filter)?;

    if set.is_empty() {
        if json {
            writeln!(out, "{}", render::no_data_json(&filter, set.source_rows()))?;
        } else {
            render::write_filter_banner(out, &filter)?;
            render::write_no_data(out, &filter)?;
        }
        return Err(CliError::new(4, "no_data", "no trips match the filter"));
    }

    let mut timings = TimingRecorder::new();
    let report = compute_report(&set, &mut timings)?;
    let elapsed_ms = started.elapsed().as_millis() as u64;
    info!(trips = set.len(), elapsed_ms, "statistics computed");

    if json {
        let payload =
            render::report_json(&report, &timings, set.len(), set.source_rows(), elapsed_ms);
        writeln!(out, "{payload}")?;
    } else {
        render::write_filter_banner(out, &filter)?;
        render::write_report(out, &report, Some(&timings))?;
    }
    Ok(())
}

/// `bikeshare raw`: one page at `offset`.
pub fn run_raw(
    catalog: &DatasetCatalog,
    query: &QueryArgs,
    offset: usize,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let filter = query.to_filter()?;
    let set = trips::load(catalog, &filter)?;
    let slice = paginate::page(&set, offset)?;
    if json {
        writeln!(out, "{}", render::rows_json(&slice))?;
    } else {
        render::write_rows(out, &slice)?;
    }
    Ok(())
}
