//! Markdown rendering of a run.

use std::fmt;
use std::fs;
use std::path::Path;

use super::{DatasetStatus, DatasetSummary, RunSummary};
use crate::error::TidyError;

const CRITICAL_FIXES: [&str; 3] = [
    "Fill in every required field that is missing",
    "Resolve duplicated IDs, names, extensions and slugs",
    "Correct fields that have the wrong data type",
];

const IMPROVEMENTS: [&str; 3] = [
    "Use kebab-case for IDs and slugs",
    "Check that reference URLs are well formed",
    "Remove fields the schema does not expect",
];

/// Renders the report for a finished run.
pub fn render(summary: &RunSummary) -> String {
    MarkdownReport(summary).to_string()
}

/// Writes rendered report content to `path`, replacing any previous report.
///
/// # Errors
/// Returns [`TidyError::ReportWrite`] if the file cannot be written.
pub fn write(path: &Path, content: &str) -> Result<(), TidyError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| TidyError::ReportWrite {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| TidyError::ReportWrite {
        path: path.to_path_buf(),
        source,
    })
}

struct MarkdownReport<'a>(&'a RunSummary);

impl fmt::Display for MarkdownReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = self.0;
        let errors = summary.total_errors();
        let warnings = summary.total_warnings();

        writeln!(f, "# Data Validation Report - BioinFormats")?;
        writeln!(f)?;
        writeln!(
            f,
            "Generated at: {}",
            summary.generated_at.format("%Y-%m-%dT%H:%M:%S%.3fZ")
        )?;
        writeln!(f)?;

        writeln!(f, "## Summary")?;
        writeln!(f)?;
        let overall = if summary.valid {
            "✅ VALID"
        } else {
            "❌ HAS ERRORS"
        };
        writeln!(f, "- **Overall status**: {}", overall)?;
        writeln!(f, "- **Total errors**: {}", errors)?;
        writeln!(f, "- **Total warnings**: {}", warnings)?;

        for dataset in &summary.datasets {
            writeln!(f)?;
            write_dataset(f, dataset)?;
        }

        if errors > 0 || warnings > 0 {
            writeln!(f)?;
            writeln!(f, "## Suggested fixes")?;
            if errors > 0 {
                writeln!(f)?;
                writeln!(f, "### Critical errors")?;
                writeln!(f)?;
                write_numbered(f, &CRITICAL_FIXES)?;
            }
            if warnings > 0 {
                writeln!(f)?;
                writeln!(f, "### Recommended improvements")?;
                writeln!(f)?;
                write_numbered(f, &IMPROVEMENTS)?;
            }
        }

        Ok(())
    }
}

fn write_dataset(f: &mut fmt::Formatter<'_>, dataset: &DatasetSummary) -> fmt::Result {
    writeln!(f, "## {}", dataset.dataset)?;
    writeln!(f)?;

    let result = match &dataset.status {
        DatasetStatus::Validated { result } => result,
        DatasetStatus::NotLoaded { error } => {
            writeln!(f, "- **Status**: ⚠️ NOT LOADED")?;
            writeln!(f, "- **File**: `{}`", dataset.path.display())?;
            return writeln!(f, "- **Load error**: {}", error);
        }
    };

    let status = if result.is_valid() {
        "✅ VALID"
    } else {
        "❌ INVALID"
    };
    writeln!(f, "- **Status**: {}", status)?;
    writeln!(f, "- **Total records**: {}", result.stats.total)?;
    writeln!(f, "- **Errors**: {}", result.error_count())?;
    writeln!(f, "- **Warnings**: {}", result.warning_count())?;

    let errors = result.errors();
    if !errors.is_empty() {
        writeln!(f)?;
        writeln!(f, "### Errors")?;
        writeln!(f)?;
        for error in &errors {
            writeln!(f, "- {}", error)?;
        }
    }

    let warnings = result.warnings();
    if !warnings.is_empty() {
        writeln!(f)?;
        writeln!(f, "### Warnings")?;
        writeln!(f)?;
        for warning in &warnings {
            writeln!(f, "- {}", warning)?;
        }
    }

    Ok(())
}

fn write_numbered(f: &mut fmt::Formatter<'_>, items: &[&str]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        writeln!(f, "{}. {}", i + 1, item)?;
    }
    Ok(())
}
