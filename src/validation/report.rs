//! Validation result types for structured error reporting.
//!
//! Every problem a validator finds is a typed [`Violation`]. The familiar
//! string views (`"Format 0: field 'description' is required"`) are
//! rendered from those values on demand.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::schema::DatasetKind;

/// The result of validating one dataset.
#[derive(Clone, Debug, Serialize)]
pub struct ValidationResult {
    /// Which dataset was validated.
    pub dataset: DatasetKind,

    /// All violations found, in discovery order.
    pub issues: Vec<Violation>,

    /// Record count and duplicate counters.
    pub stats: ValidationStats,
}

impl ValidationResult {
    /// Creates an empty result for `dataset`.
    pub fn new(dataset: DatasetKind) -> Self {
        Self {
            dataset,
            issues: Vec::new(),
            stats: ValidationStats::default(),
        }
    }

    /// The result for input that is not a sequence of records.
    pub fn not_a_sequence(dataset: DatasetKind) -> Self {
        let mut result = Self::new(dataset);
        result.add(Violation::error(
            ViolationKind::NotASequence,
            Location::Dataset,
            format!("{} must be a sequence", dataset),
        ));
        result
    }

    /// Adds a violation to the result.
    pub fn add(&mut self, violation: Violation) {
        self.issues.push(violation);
    }

    /// Returns the number of errors.
    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    /// Returns the number of warnings.
    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    /// Warnings never affect validity.
    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    /// Rendered error messages.
    pub fn errors(&self) -> Vec<String> {
        self.rendered(Severity::Error)
    }

    /// Rendered warning messages.
    pub fn warnings(&self) -> Vec<String> {
        self.rendered(Severity::Warning)
    }

    /// Violations of one kind, useful for filtering.
    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.issues.iter().filter(move |i| i.kind == kind)
    }

    fn rendered(&self, severity: Severity) -> Vec<String> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .map(ToString::to_string)
            .collect()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.issues.is_empty() {
            return writeln!(
                f,
                "{}: {} record(s), no issues found",
                self.dataset, self.stats.total
            );
        }

        writeln!(
            f,
            "{}: {} record(s), {} error(s) and {} warning(s):",
            self.dataset,
            self.stats.total,
            self.error_count(),
            self.warning_count()
        )?;

        for issue in &self.issues {
            let severity = match issue.severity {
                Severity::Error => "ERROR",
                Severity::Warning => "WARN ",
            };
            writeln!(f, "  [{}] {}", severity, issue)?;
        }

        Ok(())
    }
}

/// Record count and per-field duplicate counters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationStats {
    /// Number of records in the dataset.
    pub total: usize,

    /// Distinct duplicated values per unique field. Three records sharing
    /// one id count as one duplicate id.
    pub duplicates: BTreeMap<&'static str, usize>,
}

impl ValidationStats {
    /// Distinct duplicated values for `field` (0 if the field is not tracked).
    pub fn duplicates_of(&self, field: &str) -> usize {
        self.duplicates.get(field).copied().unwrap_or(0)
    }
}

/// A single validation finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Error or warning.
    pub severity: Severity,

    /// A stable code for the finding.
    pub kind: ViolationKind,

    /// Where the finding applies.
    pub location: Location,

    /// A human-readable description, without the location prefix.
    pub message: String,
}

impl Violation {
    pub fn new(
        severity: Severity,
        kind: ViolationKind,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            kind,
            location,
            message: message.into(),
        }
    }

    pub fn error(kind: ViolationKind, location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, kind, location, message)
    }

    pub fn warning(kind: ViolationKind, location: Location, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, kind, location, message)
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Location::Dataset => f.write_str(&self.message),
            Location::Record { .. } => write!(f, "{}: {}", self.location, self.message),
        }
    }
}

/// The severity of a violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory; never blocks organizing.
    Warning,
    /// Blocks organizing unless forced.
    Error,
}

/// A stable code identifying the type of violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationKind {
    /// The dataset is not a sequence of records.
    NotASequence,
    /// A required field is absent or empty.
    MissingField,
    /// A field holds the wrong kind of value.
    TypeMismatch,
    /// A unique field repeats an earlier record's value.
    DuplicateValue,
    /// A value outside an enumerated set.
    InvalidEnum,
    /// A key outside the schema.
    UnknownField,
    /// A URL that does not parse as an absolute URL.
    MalformedUrl,
    /// An identifier that is not kebab-case, or an extension with a leading dot.
    NamingConvention,
    /// A soft reference to an area that does not exist.
    UnknownReference,
}

/// Where a violation occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "lowercase")]
pub enum Location {
    /// The dataset as a whole.
    Dataset,
    /// A record, addressed by its 0-based position.
    Record { label: &'static str, index: usize },
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Dataset => write!(f, "dataset"),
            Location::Record { label, index } => write!(f, "{} {}", label, index),
        }
    }
}
