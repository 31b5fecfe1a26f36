//! Dataset validation for the BioinFormats data files.
//!
//! This module checks each dataset for:
//! - Structural integrity (required fields, value kinds, nested shapes)
//! - Uniqueness of identifiers, names, extensions and slugs
//! - Naming conventions (kebab-case identifiers)
//! - Soft references from formats and glossary terms to areas
//!
//! Validators are pure: they take the loaded values and return a
//! [`ValidationResult`]; nothing is logged or written here.

mod areas;
mod formats;
mod glossary;
mod report;

pub use areas::validate_areas;
pub use formats::validate_formats;
pub use glossary::validate_glossary;
pub use report::{Location, Severity, ValidationResult, ValidationStats, Violation, ViolationKind};

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::schema::{is_present, DatasetKind, ReferenceType, Schema};

static KEBAB_CASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("kebab-case pattern is valid")
});

/// Validates any dataset by kind.
///
/// `valid_areas` is only consulted for formats and glossary terms.
pub fn validate(
    dataset: DatasetKind,
    records: &Value,
    valid_areas: Option<&Value>,
) -> ValidationResult {
    match dataset {
        DatasetKind::Areas => validate_areas(records),
        DatasetKind::Formats => validate_formats(records, valid_areas),
        DatasetKind::Glossary => validate_glossary(records, valid_areas),
    }
}

/// Returns true if `s` is lowercase alphanumeric segments joined by single hyphens.
pub fn is_kebab_case(s: &str) -> bool {
    KEBAB_CASE.is_match(s)
}

/// Outcome of checking a URL's syntax.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UrlCheck {
    Valid,
    Invalid { reason: String },
}

/// Checks that `s` parses as an absolute URL. Syntax only; nothing is fetched.
pub fn check_url(s: &str) -> UrlCheck {
    match url::Url::parse(s) {
        Ok(_) => UrlCheck::Valid,
        Err(e) => UrlCheck::Invalid {
            reason: e.to_string(),
        },
    }
}

/// Collects the identifiers a soft reference may point at.
///
/// Returns `None` when no area collection was supplied or it yields no
/// identifiers, in which case reference checks are skipped.
fn known_areas(valid_areas: Option<&Value>, key: &str) -> Option<HashSet<String>> {
    let names: HashSet<String> = valid_areas?
        .as_array()?
        .iter()
        .filter_map(|area| area.get(key).and_then(Value::as_str))
        .map(str::to_owned)
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

/// Returns the field's value if it is present and text.
fn text_field<'v>(record: &'v Map<String, Value>, field: &str) -> Option<&'v str> {
    record
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Tracks one unique field across a dataset.
struct UniqueField {
    field: &'static str,
    seen: HashSet<String>,
    duplicated: HashSet<String>,
}

impl UniqueField {
    fn new(field: &'static str) -> Self {
        Self {
            field,
            seen: HashSet::new(),
            duplicated: HashSet::new(),
        }
    }

    /// Records `value`; returns true if an earlier record already used it.
    fn observe(&mut self, value: &str) -> bool {
        if self.seen.insert(value.to_owned()) {
            false
        } else {
            self.duplicated.insert(value.to_owned());
            true
        }
    }
}

/// Accumulates violations while walking a dataset record by record.
struct Checker {
    schema: &'static Schema,
    result: ValidationResult,
    location: Location,
}

impl Checker {
    fn new(dataset: DatasetKind, total: usize) -> Self {
        let mut result = ValidationResult::new(dataset);
        result.stats.total = total;
        Self {
            schema: dataset.schema(),
            result,
            location: Location::Dataset,
        }
    }

    /// Moves to record `index`; returns its fields if it is an object.
    fn begin_record<'v>(
        &mut self,
        index: usize,
        record: &'v Value,
    ) -> Option<&'v Map<String, Value>> {
        self.location = Location::Record {
            label: self.schema.dataset.record_label(),
            index,
        };
        let fields = record.as_object();
        if fields.is_none() {
            self.error(ViolationKind::TypeMismatch, "record must be an object");
        }
        fields
    }

    fn error(&mut self, kind: ViolationKind, message: impl Into<String>) {
        self.result
            .add(Violation::error(kind, self.location, message));
    }

    fn warning(&mut self, kind: ViolationKind, message: impl Into<String>) {
        self.result
            .add(Violation::warning(kind, self.location, message));
    }

    /// Required-field presence, then the kind of every present field.
    fn check_shape(&mut self, record: &Map<String, Value>) {
        for spec in self.schema.required_fields() {
            if !is_present(record.get(spec.name)) {
                self.error(
                    ViolationKind::MissingField,
                    format!("field '{}' is required", spec.name),
                );
            }
        }

        for spec in self.schema.fields {
            let Some(value) = record.get(spec.name) else {
                continue;
            };
            if is_present(Some(value)) && !spec.kind.matches(value) {
                let suffix = if spec.required { "" } else { " when present" };
                self.error(
                    ViolationKind::TypeMismatch,
                    format!("'{}' must be {}{}", spec.name, spec.kind.describe(), suffix),
                );
            }
        }
    }

    /// One warning per key outside the schema.
    fn check_unknown_fields(&mut self, record: &Map<String, Value>) {
        for key in record.keys() {
            if !self.schema.permits(key) {
                self.warning(
                    ViolationKind::UnknownField,
                    format!("field '{}' is not expected", key),
                );
            }
        }
    }

    fn check_kebab(&mut self, what: &str, value: &str) {
        if !is_kebab_case(value) {
            self.warning(
                ViolationKind::NamingConvention,
                format!("{} '{}' is not kebab-case", what, value),
            );
        }
    }

    fn check_unique(&mut self, tracker: &mut UniqueField, what: &str, value: &str) {
        if tracker.observe(value) {
            self.error(
                ViolationKind::DuplicateValue,
                format!("{} '{}' is duplicated", what, value),
            );
        }
    }

    /// Text items of a list field; non-text items are reported.
    fn text_items<'v>(&mut self, record: &'v Map<String, Value>, field: &str) -> Vec<&'v str> {
        let Some(items) = record.get(field).and_then(Value::as_array) else {
            return Vec::new();
        };
        let mut texts = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match item.as_str() {
                Some(s) => texts.push(s),
                None => self.error(
                    ViolationKind::TypeMismatch,
                    format!("{}[{}] must be text", field, i),
                ),
            }
        }
        texts
    }

    /// Soft references: unknown names are warnings only.
    fn check_references_to_areas(
        &mut self,
        what: &str,
        names: &[&str],
        known: Option<&HashSet<String>>,
    ) {
        let Some(known) = known else {
            return;
        };
        for name in names {
            if !known.contains(*name) {
                self.warning(
                    ViolationKind::UnknownReference,
                    format!("{} '{}' not found among valid areas", what, name),
                );
            }
        }
    }

    /// Checks each entry of a `references` list.
    ///
    /// `title` and `url` are always required; `type` only when
    /// `typed` is set (format references).
    fn check_reference_list(&mut self, record: &Map<String, Value>, typed: bool) {
        let Some(refs) = record.get("references").and_then(Value::as_array) else {
            return;
        };
        for (i, reference) in refs.iter().enumerate() {
            let Some(reference) = reference.as_object() else {
                self.error(
                    ViolationKind::TypeMismatch,
                    format!("references[{}] must be an object", i),
                );
                continue;
            };

            if !is_present(reference.get("title")) {
                self.error(
                    ViolationKind::MissingField,
                    format!("references[{}] must have field 'title'", i),
                );
            }

            match reference.get("url") {
                url if !is_present(url) => self.error(
                    ViolationKind::MissingField,
                    format!("references[{}] must have field 'url'", i),
                ),
                Some(Value::String(url)) => {
                    if let UrlCheck::Invalid { reason } = check_url(url) {
                        self.warning(
                            ViolationKind::MalformedUrl,
                            format!("references[{}] URL '{}' looks invalid ({})", i, url, reason),
                        );
                    }
                }
                Some(other) => self.warning(
                    ViolationKind::MalformedUrl,
                    format!("references[{}] URL {} looks invalid (not text)", i, other),
                ),
                None => {}
            }

            if typed {
                self.check_reference_type(i, reference.get("type"));
            }
        }
    }

    fn check_reference_type(&mut self, i: usize, value: Option<&Value>) {
        if !is_present(value) {
            self.error(
                ViolationKind::MissingField,
                format!("references[{}] must have field 'type'", i),
            );
            return;
        }
        let parsed = value
            .and_then(Value::as_str)
            .and_then(ReferenceType::parse);
        if parsed.is_none() {
            let shown = match value {
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
                None => String::new(),
            };
            self.error(
                ViolationKind::InvalidEnum,
                format!(
                    "references[{}] type '{}' must be one of: {}",
                    i,
                    shown,
                    ReferenceType::allowed_list()
                ),
            );
        }
    }

    /// Closes the run, recording distinct duplicate counts.
    fn finish<const N: usize>(mut self, trackers: [UniqueField; N]) -> ValidationResult {
        for tracker in trackers {
            self.result
                .stats
                .duplicates
                .insert(tracker.field, tracker.duplicated.len());
        }
        self.result
    }
}
