//! Record schemas for the three BioinFormats datasets.
//!
//! Records are kept as order-preserving JSON values so that a load/save
//! cycle never disturbs their key order. What each dataset *should* look
//! like is described here, once, as a fixed table of fields per dataset:
//! which fields are required, which are merely permitted, and what kind of
//! value each one holds. The validators walk these tables instead of
//! hard-coding field lists.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// One of the three datasets maintained by the toolchain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Areas,
    Formats,
    Glossary,
}

impl DatasetKind {
    /// All datasets, in pipeline order.
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Areas,
        DatasetKind::Formats,
        DatasetKind::Glossary,
    ];

    /// Label used to prefix index-addressed messages ("Format 3: ...").
    pub fn record_label(self) -> &'static str {
        match self {
            DatasetKind::Areas => "Area",
            DatasetKind::Formats => "Format",
            DatasetKind::Glossary => "Term",
        }
    }

    /// Field the sorter orders records by.
    pub fn sort_key(self) -> &'static str {
        match self {
            DatasetKind::Areas => "name",
            DatasetKind::Formats => "extension",
            DatasetKind::Glossary => "term",
        }
    }

    /// Conventional file name inside the data directory.
    pub fn default_file_name(self) -> &'static str {
        match self {
            DatasetKind::Areas => "areas.json",
            DatasetKind::Formats => "formats.json",
            DatasetKind::Glossary => "glossary.json",
        }
    }

    /// The schema describing this dataset's records.
    pub fn schema(self) -> &'static Schema {
        match self {
            DatasetKind::Areas => &AREA_SCHEMA,
            DatasetKind::Formats => &FORMAT_SCHEMA,
            DatasetKind::Glossary => &GLOSSARY_SCHEMA,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DatasetKind::Areas => "Areas",
            DatasetKind::Formats => "Formats",
            DatasetKind::Glossary => "Glossary",
        };
        f.write_str(name)
    }
}

/// The kind of value a field holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    /// A string.
    Text,
    /// An ordered sequence (JSON array / YAML list).
    List,
}

impl FieldKind {
    /// Returns true if `value` has this kind.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::List => value.is_array(),
        }
    }

    /// Human-readable name used in type-mismatch messages.
    pub fn describe(self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::List => "a list",
        }
    }
}

/// A single field in a schema.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

const fn required(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: true,
    }
}

const fn optional(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        kind,
        required: false,
    }
}

/// The fixed set of fields a dataset's records may carry.
#[derive(Debug)]
pub struct Schema {
    pub dataset: DatasetKind,
    pub fields: &'static [FieldSpec],
}

impl Schema {
    /// Required fields, in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Looks up a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns true if `name` is one of the schema's fields.
    pub fn permits(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}

pub static AREA_SCHEMA: Schema = Schema {
    dataset: DatasetKind::Areas,
    fields: &[
        required("id", FieldKind::Text),
        required("name", FieldKind::Text),
        optional("description", FieldKind::Text),
        optional("icon", FieldKind::Text),
    ],
};

pub static FORMAT_SCHEMA: Schema = Schema {
    dataset: DatasetKind::Formats,
    fields: &[
        required("extension", FieldKind::Text),
        required("name", FieldKind::Text),
        required("area", FieldKind::List),
        required("description", FieldKind::Text),
        required("example_filenames", FieldKind::List),
        required("example_file_content", FieldKind::Text),
        required("example_file_explanation", FieldKind::List),
        required("pipeline_examples", FieldKind::List),
        required("tools", FieldKind::List),
        required("references", FieldKind::List),
        required("encoding_type", FieldKind::Text),
        optional("used_in_repositories", FieldKind::List),
        optional("notes", FieldKind::Text),
    ],
};

pub static GLOSSARY_SCHEMA: Schema = Schema {
    dataset: DatasetKind::Glossary,
    fields: &[
        required("id", FieldKind::Text),
        required("term", FieldKind::Text),
        required("slug", FieldKind::Text),
        required("definition", FieldKind::Text),
        required("area_ids", FieldKind::List),
        optional("aliases", FieldKind::List),
        optional("related_terms", FieldKind::List),
        optional("references", FieldKind::List),
    ],
};

/// Permitted values of a format reference's `type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceType {
    Documentation,
    Paper,
    Tool,
    Standard,
}

impl ReferenceType {
    pub const ALL: [ReferenceType; 4] = [
        ReferenceType::Documentation,
        ReferenceType::Paper,
        ReferenceType::Tool,
        ReferenceType::Standard,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceType::Documentation => "documentation",
            ReferenceType::Paper => "paper",
            ReferenceType::Tool => "tool",
            ReferenceType::Standard => "standard",
        }
    }

    /// Parses an exact, lowercase reference type.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Comma-separated list of the permitted values.
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Whether a value counts as "present" for a required field.
///
/// Absent, `null`, `false`, `0` and `""` are missing; empty lists and
/// objects are present.
pub fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
