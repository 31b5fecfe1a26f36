use std::path::PathBuf;
use thiserror::Error;

use crate::schema::DatasetKind;

/// The main error type for bioformats-tidy operations.
///
/// Validation problems are not errors: they are reported as
/// [`Violation`](crate::validation::Violation)s. This type covers the
/// failures that stop a stage outright.
#[derive(Debug, Error)]
pub enum TidyError {
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON from {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse YAML from {path}: {source}")]
    YamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write YAML to {path}: {source}")]
    YamlWrite {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{dataset} must be a sequence")]
    NotASequence { dataset: DatasetKind },

    #[error("Failed to write report to {path}: {source}")]
    ReportWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TidyError {
    /// Path of the file involved, when the error has one.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            TidyError::NotFound { path }
            | TidyError::Io { path, .. }
            | TidyError::JsonParse { path, .. }
            | TidyError::YamlParse { path, .. }
            | TidyError::JsonWrite { path, .. }
            | TidyError::YamlWrite { path, .. }
            | TidyError::ReportWrite { path, .. } => Some(path),
            TidyError::NotASequence { .. } => None,
        }
    }
}
