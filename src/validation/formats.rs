//! Format dataset validation.

use serde_json::{Map, Value};

use super::{known_areas, text_field, Checker, UniqueField, ValidationResult, ViolationKind};
use crate::schema::{is_present, DatasetKind};

/// Validates the formats dataset.
///
/// `valid_areas` is the loaded areas dataset. Each name in a format's
/// `area` list should match an area's `name`; misses are warnings. When
/// `valid_areas` is `None` (or holds no names) the reference check is
/// skipped entirely.
pub fn validate_formats(formats: &Value, valid_areas: Option<&Value>) -> ValidationResult {
    let Some(records) = formats.as_array() else {
        return ValidationResult::not_a_sequence(DatasetKind::Formats);
    };

    let area_names = known_areas(valid_areas, "name");
    let mut checker = Checker::new(DatasetKind::Formats, records.len());
    let mut extensions = UniqueField::new("extension");

    for (index, record) in records.iter().enumerate() {
        let Some(format) = checker.begin_record(index, record) else {
            continue;
        };

        checker.check_shape(format);

        if let Some(extension) = text_field(format, "extension") {
            checker.check_unique(&mut extensions, "extension", extension);
            if extension.starts_with('.') {
                checker.warning(
                    ViolationKind::NamingConvention,
                    format!("extension '{}' should not start with a dot", extension),
                );
            }
        }

        let areas = checker.text_items(format, "area");
        checker.check_references_to_areas("area", &areas, area_names.as_ref());

        check_pipeline_examples(&mut checker, format);
        checker.check_reference_list(format, true);
        checker.check_unknown_fields(format);
    }

    checker.finish([extensions])
}

/// Each pipeline example must be an object with `pipeline` and `explanation`.
fn check_pipeline_examples(checker: &mut Checker, format: &Map<String, Value>) {
    let Some(examples) = format.get("pipeline_examples").and_then(Value::as_array) else {
        return;
    };
    for (i, example) in examples.iter().enumerate() {
        let Some(example) = example.as_object() else {
            checker.error(
                ViolationKind::TypeMismatch,
                format!("pipeline_examples[{}] must be an object", i),
            );
            continue;
        };
        for field in ["pipeline", "explanation"] {
            if !is_present(example.get(field)) {
                checker.error(
                    ViolationKind::MissingField,
                    format!("pipeline_examples[{}] must have field '{}'", i, field),
                );
            }
        }
    }
}
