//! Glossary dataset validation.

use serde_json::Value;

use super::{known_areas, text_field, Checker, UniqueField, ValidationResult};
use crate::schema::DatasetKind;

/// Validates the glossary dataset.
///
/// `area_ids` entries are soft references to area `id`s, checked against
/// `valid_areas` when it is supplied.
pub fn validate_glossary(glossary: &Value, valid_areas: Option<&Value>) -> ValidationResult {
    let Some(records) = glossary.as_array() else {
        return ValidationResult::not_a_sequence(DatasetKind::Glossary);
    };

    let area_ids = known_areas(valid_areas, "id");
    let mut checker = Checker::new(DatasetKind::Glossary, records.len());
    let mut ids = UniqueField::new("id");
    let mut terms = UniqueField::new("term");
    let mut slugs = UniqueField::new("slug");

    for (index, record) in records.iter().enumerate() {
        let Some(term) = checker.begin_record(index, record) else {
            continue;
        };

        checker.check_shape(term);

        if let Some(id) = text_field(term, "id") {
            checker.check_kebab("ID", id);
            checker.check_unique(&mut ids, "ID", id);
        }

        if let Some(name) = text_field(term, "term") {
            checker.check_unique(&mut terms, "term", name);
        }

        if let Some(slug) = text_field(term, "slug") {
            checker.check_kebab("slug", slug);
            checker.check_unique(&mut slugs, "slug", slug);
        }

        let referenced = checker.text_items(term, "area_ids");
        checker.check_references_to_areas("area_id", &referenced, area_ids.as_ref());

        checker.check_reference_list(term, false);
        checker.check_unknown_fields(term);
    }

    checker.finish([ids, terms, slugs])
}
