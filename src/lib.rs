//! bioformats-tidy: keeps the BioinFormats datasets consistent.
//!
//! The catalog is backed by three flat files: subject **areas**, file
//! **formats** and a **glossary** of terms. This crate validates them
//! against fixed schemas, detects duplicates and dangling cross-references,
//! sorts records into a stable order and writes a markdown report. Record
//! content is never changed; only the order of records is.
//!
//! # Modules
//!
//! - [`store`]: Loading, saving and backing up dataset files
//! - [`schema`]: The fixed schema of each dataset
//! - [`validation`]: Per-dataset validators and typed violations
//! - [`sort`]: Locale-aware record ordering
//! - [`organize`]: The load, validate, organize, report pipeline
//! - [`catalog`]: Read-only lookups over loaded datasets (library API only,
//!   not used by the CLI)
//! - [`log`]: The run-scoped logging context
//! - [`error`]: Error types for bioformats-tidy operations

pub mod catalog;
pub mod error;
pub mod log;
pub mod organize;
pub mod schema;
pub mod sort;
pub mod store;
pub mod validation;

use std::io::IsTerminal;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

pub use error::TidyError;
pub use log::RunLog;
pub use organize::{DataPaths, OrganizeOptions, RunSummary};
pub use schema::DatasetKind;

/// The bioformats-tidy CLI application.
#[derive(Parser)]
#[command(name = "bioformats-tidy")]
#[command(version, author, about)]
struct Cli {
    /// Validate and write the report without reordering any dataset.
    #[arg(long)]
    validate_only: bool,

    /// Reorder datasets even when validation finds errors.
    #[arg(long)]
    force: bool,

    /// Directory holding areas.json, formats.json and glossary.json.
    #[arg(long, env = "BIOFORMATS_DATA_DIR", default_value = "src/data")]
    data_dir: PathBuf,

    /// Areas file (overrides --data-dir; .yaml/.yml selects YAML).
    #[arg(long, value_name = "PATH")]
    areas: Option<PathBuf>,

    /// Formats file (overrides --data-dir; .yaml/.yml selects YAML).
    #[arg(long, value_name = "PATH")]
    formats: Option<PathBuf>,

    /// Glossary file (overrides --data-dir; .yaml/.yml selects YAML).
    #[arg(long, value_name = "PATH")]
    glossary: Option<PathBuf>,

    /// Where to write the markdown report.
    #[arg(long, env = "BIOFORMATS_REPORT", default_value = "validation-report.md")]
    report: PathBuf,

    /// Format of the run summary printed on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    /// Log debug detail (file sizes, per-stage progress).
    #[arg(short, long, conflicts_with = "quiet")]
    verbose: bool,

    /// Log warnings and errors only.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl Cli {
    fn data_paths(&self) -> DataPaths {
        let mut paths = DataPaths::in_dir(&self.data_dir, self.report.clone());
        if let Some(path) = &self.areas {
            paths.areas = path.clone();
        }
        if let Some(path) = &self.formats {
            paths.formats = path.clone();
        }
        if let Some(path) = &self.glossary {
            paths.glossary = path.clone();
        }
        paths
    }

    fn options(&self) -> OrganizeOptions {
        OrganizeOptions {
            validate_only: self.validate_only,
            force: self.force,
        }
    }

    fn log_level(&self) -> Level {
        if self.verbose {
            Level::DEBUG
        } else if self.quiet {
            Level::WARN
        } else {
            Level::INFO
        }
    }
}

/// Run the bioformats-tidy CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`. On
/// success it returns the process exit code: 0 when every dataset loaded
/// and validated cleanly, 1 otherwise.
pub fn run() -> Result<u8, TidyError> {
    let cli = Cli::parse();
    let log = RunLog::new(init_tracing(cli.log_level()));
    let summary = organize::run(&cli.data_paths(), cli.options(), &log)?;

    match cli.output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&summary).map_err(|source| TidyError::JsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                })?;
            println!("{}", json);
        }
        OutputFormat::Text => print_summary(&summary),
    }

    Ok(summary.exit_code())
}

/// Installs the fmt subscriber on stderr and returns the most verbose level
/// it lets through. `RUST_LOG` overrides the level chosen by `-v`/`-q`.
fn init_tracing(level: Level) -> Level {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    LevelFilter::current().into_level().unwrap_or(Level::ERROR)
}

fn print_summary(summary: &RunSummary) {
    for dataset in &summary.datasets {
        match dataset.validation() {
            Some(result) => print!("{}", result),
            None => println!("{}: not loaded", dataset.dataset),
        }
    }
    for backup in summary.backups() {
        println!("Backup: {}", backup.display());
    }
    println!("Report: {}", summary.report.display());
}
