//! Area dataset validation.

use serde_json::Value;

use super::{text_field, Checker, UniqueField, ValidationResult};
use crate::schema::DatasetKind;

/// Validates the areas dataset.
///
/// Checks required `id`/`name`, kebab-case ids (warning), unique ids and
/// names, and unexpected fields.
pub fn validate_areas(areas: &Value) -> ValidationResult {
    let Some(records) = areas.as_array() else {
        return ValidationResult::not_a_sequence(DatasetKind::Areas);
    };

    let mut checker = Checker::new(DatasetKind::Areas, records.len());
    let mut ids = UniqueField::new("id");
    let mut names = UniqueField::new("name");

    for (index, record) in records.iter().enumerate() {
        let Some(area) = checker.begin_record(index, record) else {
            continue;
        };

        checker.check_shape(area);

        if let Some(id) = text_field(area, "id") {
            checker.check_kebab("ID", id);
            checker.check_unique(&mut ids, "ID", id);
        }

        if let Some(name) = text_field(area, "name") {
            checker.check_unique(&mut names, "name", name);
        }

        checker.check_unknown_fields(area);
    }

    checker.finish([ids, names])
}
