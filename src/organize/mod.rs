//! The data organization pipeline.
//!
//! A run moves through fixed stages:
//!
//! ```text
//! Idle -> Loading -> Validating -> ReportOnly | OrganizePending
//!      -> Organizing? -> Reporting -> Done | Failed
//! ```
//!
//! A missing dataset file is fatal before anything is read. A dataset that
//! fails to parse is recorded and the run continues to the report with
//! whatever loaded. Organizing rewrites only datasets that are out of
//! order, taking a backup of each first; any failure there aborts the run.

pub mod report;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::error::TidyError;
use crate::log::RunLog;
use crate::schema::DatasetKind;
use crate::sort::Sorter;
use crate::store::{self, SaveOptions};
use crate::validation::{self, ValidationResult};

/// Where the datasets and the report live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataPaths {
    pub areas: PathBuf,
    pub formats: PathBuf,
    pub glossary: PathBuf,
    pub report: PathBuf,
}

impl DataPaths {
    /// The default file names inside `dir`.
    pub fn in_dir(dir: &Path, report: impl Into<PathBuf>) -> Self {
        Self {
            areas: dir.join(DatasetKind::Areas.default_file_name()),
            formats: dir.join(DatasetKind::Formats.default_file_name()),
            glossary: dir.join(DatasetKind::Glossary.default_file_name()),
            report: report.into(),
        }
    }

    pub fn dataset(&self, kind: DatasetKind) -> &Path {
        match kind {
            DatasetKind::Areas => &self.areas,
            DatasetKind::Formats => &self.formats,
            DatasetKind::Glossary => &self.glossary,
        }
    }
}

/// Flags controlling the decision stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OrganizeOptions {
    /// Validate and report, never write datasets.
    pub validate_only: bool,
    /// Organize even when validation found errors.
    pub force: bool,
}

/// What the pipeline chose to do after validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// `--validate-only` was given.
    ValidateOnly,
    /// Datasets will be organized.
    Organize,
    /// Validation failed and `--force` was not given.
    SkipInvalid,
    /// At least one dataset could not be loaded.
    SkipFailedLoad,
}

/// Picks the next stage from the validation outcome.
///
/// A run with a load failure never organizes, even with `--force`: the
/// datasets that did load are left as they are.
pub fn decide(valid: bool, load_failed: bool, options: OrganizeOptions) -> Decision {
    if options.validate_only {
        Decision::ValidateOnly
    } else if load_failed {
        Decision::SkipFailedLoad
    } else if valid || options.force {
        Decision::Organize
    } else {
        Decision::SkipInvalid
    }
}

/// How far a dataset got through loading and validation.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatasetStatus {
    Validated { result: ValidationResult },
    NotLoaded { error: String },
}

/// What organizing did to one dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum OrganizeOutcome {
    /// Already in order; the file was not touched.
    Skipped,
    /// Rewritten in order after copying the original to `backup`.
    Sorted { backup: PathBuf, records: usize },
}

/// Per-dataset record of a run.
#[derive(Clone, Debug, Serialize)]
pub struct DatasetSummary {
    pub dataset: DatasetKind,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: DatasetStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organized: Option<OrganizeOutcome>,
}

impl DatasetSummary {
    pub fn validation(&self) -> Option<&ValidationResult> {
        match &self.status {
            DatasetStatus::Validated { result } => Some(result),
            DatasetStatus::NotLoaded { .. } => None,
        }
    }

    /// A dataset that failed to load counts as one error.
    pub fn error_count(&self) -> usize {
        match &self.status {
            DatasetStatus::Validated { result } => result.error_count(),
            DatasetStatus::NotLoaded { .. } => 1,
        }
    }

    pub fn warning_count(&self) -> usize {
        self.validation().map_or(0, ValidationResult::warning_count)
    }

    pub fn is_valid(&self) -> bool {
        self.validation().is_some_and(ValidationResult::is_valid)
    }
}

/// Everything a run did, in dataset order.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub valid: bool,
    pub decision: Decision,
    pub datasets: Vec<DatasetSummary>,
    pub report: PathBuf,
}

impl RunSummary {
    pub fn dataset(&self, kind: DatasetKind) -> Option<&DatasetSummary> {
        self.datasets.iter().find(|d| d.dataset == kind)
    }

    pub fn load_failed(&self) -> bool {
        self.datasets
            .iter()
            .any(|d| matches!(d.status, DatasetStatus::NotLoaded { .. }))
    }

    pub fn total_errors(&self) -> usize {
        self.datasets.iter().map(DatasetSummary::error_count).sum()
    }

    pub fn total_warnings(&self) -> usize {
        self.datasets.iter().map(DatasetSummary::warning_count).sum()
    }

    /// Backups written during this run.
    pub fn backups(&self) -> impl Iterator<Item = &Path> {
        self.datasets.iter().filter_map(|d| match &d.organized {
            Some(OrganizeOutcome::Sorted { backup, .. }) => Some(backup.as_path()),
            _ => None,
        })
    }

    /// Exit status of the binary: 0 only for a fully valid, fully loaded run.
    pub fn exit_code(&self) -> u8 {
        if self.valid && !self.load_failed() {
            0
        } else {
            1
        }
    }
}

/// Runs the whole pipeline.
///
/// # Errors
/// [`TidyError::NotFound`] if any dataset file is missing (nothing is read
/// and no report is written). Errors while organizing or writing the
/// report are also returned. Parse failures are not errors here; they are
/// recorded in the summary as [`DatasetStatus::NotLoaded`].
pub fn run(paths: &DataPaths, options: OrganizeOptions, log: &RunLog) -> Result<RunSummary, TidyError> {
    log.info("Starting data organization");
    if options.validate_only {
        log.info("Validate-only mode: datasets will not be modified");
    }
    if options.force {
        log.warn("Force mode: datasets will be organized even with validation errors");
    }

    for kind in DatasetKind::ALL {
        let path = paths.dataset(kind);
        if !store::exists(path) {
            log.error(format_args!("{} file not found: {}", kind, path.display()));
            return Err(TidyError::NotFound {
                path: path.to_path_buf(),
            });
        }
        if let Some(info) = store::file_info(path) {
            log.debug(format_args!(
                "{}: {} ({} bytes)",
                kind,
                info.path.display(),
                info.size
            ));
        }
    }

    log.section("DATA VALIDATION");
    let loaded = load_all(paths, log);
    let mut datasets = validate_all(paths, &loaded, log);

    let valid = datasets.iter().all(DatasetSummary::is_valid);
    let load_failed = loaded.iter().any(Result::is_err);
    let decision = decide(valid, load_failed, options);

    match decision {
        Decision::ValidateOnly => log.info("Validation finished; organizing skipped"),
        Decision::SkipFailedLoad => log.warn("Organizing skipped: not every dataset could be loaded"),
        Decision::SkipInvalid => {
            log.warn("Organizing skipped because of validation errors");
            log.info("Fix the errors or rerun with --force");
        }
        Decision::Organize => {
            log.section("DATA ORGANIZATION");
            for (summary, records) in datasets.iter_mut().zip(&loaded) {
                if let Ok(records) = records {
                    let outcome = organize_dataset(summary.dataset, &summary.path, records, log)?;
                    summary.organized = Some(outcome);
                }
            }
        }
    }

    let summary = RunSummary {
        generated_at: Utc::now(),
        valid,
        decision,
        datasets,
        report: paths.report.clone(),
    };

    log.section("REPORT");
    report::write(&paths.report, &report::render(&summary))?;
    log.info(format_args!("Report written to {}", paths.report.display()));

    if summary.exit_code() == 0 {
        log.success(format_args!(
            "Finished in {:.2}s",
            log.elapsed().as_secs_f64()
        ));
    } else {
        log.failure(format_args!(
            "Finished with {} error(s) in {:.2}s",
            summary.total_errors(),
            log.elapsed().as_secs_f64()
        ));
    }
    Ok(summary)
}

/// Loads each dataset in [`DatasetKind::ALL`] order, keeping failures.
fn load_all(paths: &DataPaths, log: &RunLog) -> Vec<Result<Value, TidyError>> {
    DatasetKind::ALL
        .iter()
        .map(|&kind| {
            let loaded = store::load(paths.dataset(kind));
            if let Err(err) = &loaded {
                log.failure(format_args!("Failed to load {}: {}", kind, err));
            }
            loaded
        })
        .collect()
}

fn validate_all(
    paths: &DataPaths,
    loaded: &[Result<Value, TidyError>],
    log: &RunLog,
) -> Vec<DatasetSummary> {
    // Cross-references resolve against the areas dataset when it loaded.
    let areas = loaded.first().and_then(|r| r.as_ref().ok());

    DatasetKind::ALL
        .iter()
        .zip(loaded)
        .map(|(&kind, records)| {
            let path = paths.dataset(kind).to_path_buf();
            let status = match records {
                Ok(records) => {
                    log.subsection(format_args!("Validating {}", kind));
                    let cross = (kind != DatasetKind::Areas).then_some(areas).flatten();
                    let result = validation::validate(kind, records, cross);
                    log_result(&result, log);
                    DatasetStatus::Validated { result }
                }
                Err(err) => DatasetStatus::NotLoaded {
                    error: err.to_string(),
                },
            };
            DatasetSummary {
                dataset: kind,
                path,
                status,
                organized: None,
            }
        })
        .collect()
}

fn log_result(result: &ValidationResult, log: &RunLog) {
    if result.is_valid() {
        log.success(format_args!(
            "{} valid ({} records)",
            result.dataset, result.stats.total
        ));
    } else {
        log.failure(format_args!(
            "{} has {} error(s)",
            result.dataset,
            result.error_count()
        ));
        for error in result.errors() {
            log.error(format_args!("  {}", error));
        }
    }
    if result.warning_count() > 0 {
        log.warn(format_args!(
            "{} has {} warning(s)",
            result.dataset,
            result.warning_count()
        ));
        for warning in result.warnings() {
            log.warn(format_args!("  {}", warning));
        }
    }
}

/// Sorts one dataset in place on disk, unless it is already in order.
fn organize_dataset(
    kind: DatasetKind,
    path: &Path,
    records: &Value,
    log: &RunLog,
) -> Result<OrganizeOutcome, TidyError> {
    let sorter = Sorter::for_dataset(kind);
    if sorter.is_sorted(records) {
        log.info(format_args!("{} already sorted", kind));
        return Ok(OrganizeOutcome::Skipped);
    }

    let backup = store::backup(path)?;
    log.info(format_args!("Backup created: {}", backup.display()));

    let sorted = sorter.sort(records)?;
    let count = sorted.len();
    store::save(path, &Value::Array(sorted), SaveOptions::default())?;
    log.success(format_args!(
        "{} organized: {} records sorted by {}",
        kind,
        count,
        kind.sort_key()
    ));

    Ok(OrganizeOutcome::Sorted {
        backup,
        records: count,
    })
}
