//! Deterministic ordering of dataset records.
//!
//! Each dataset is ordered by one field: areas by `name`, formats by
//! `extension`, glossary terms by `term`. Sorting clones the records and
//! never touches their content; ties keep their input order.

pub mod collate;

use std::borrow::Cow;
use std::cmp::Ordering;

use serde_json::Value;

use crate::error::TidyError;
use crate::schema::DatasetKind;

/// Sorts and checks the order of one dataset.
#[derive(Clone, Copy, Debug)]
pub struct Sorter {
    dataset: DatasetKind,
}

impl Sorter {
    pub fn for_dataset(dataset: DatasetKind) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> DatasetKind {
        self.dataset
    }

    /// The sort key of a record. Missing or non-text keys are empty text;
    /// numbers use their decimal rendering.
    pub fn key<'v>(&self, record: &'v Value) -> Cow<'v, str> {
        match record.get(self.dataset.sort_key()) {
            Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
            Some(Value::Number(n)) => Cow::Owned(n.to_string()),
            _ => Cow::Borrowed(""),
        }
    }

    fn compare(&self, a: &Value, b: &Value) -> Ordering {
        collate::compare(&self.key(a), &self.key(b), true)
    }

    /// Returns the records in collation order.
    ///
    /// # Errors
    /// Returns [`TidyError::NotASequence`] if `records` is not a list.
    pub fn sort(&self, records: &Value) -> Result<Vec<Value>, TidyError> {
        let records = records.as_array().ok_or(TidyError::NotASequence {
            dataset: self.dataset,
        })?;
        let mut sorted = records.clone();
        // `sort_by` is stable: equal keys keep their relative order.
        sorted.sort_by(|a, b| self.compare(a, b));
        Ok(sorted)
    }

    /// Returns true if no adjacent pair is inverted.
    ///
    /// Uses the same numeric-aware ordering as [`Sorter::sort`], so sorted
    /// output always passes and an organized dataset is never rewritten
    /// (`v2, v10` is in order here, though plain collation would invert it).
    /// Non-lists, empty lists and single records count as sorted.
    pub fn is_sorted(&self, records: &Value) -> bool {
        match records.as_array() {
            Some(records) => records
                .windows(2)
                .all(|pair| self.compare(&pair[0], &pair[1]) != Ordering::Greater),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sort_areas_by_name() {
        let areas = json!([
            {"id": "proteomics", "name": "Proteomics"},
            {"id": "genomics", "name": "Genomics"}
        ]);
        let sorter = Sorter::for_dataset(DatasetKind::Areas);
        assert!(!sorter.is_sorted(&areas));

        let sorted = sorter.sort(&areas).unwrap();
        assert_eq!(sorted[0]["name"], "Genomics");
        assert_eq!(sorted[1]["name"], "Proteomics");
        assert!(sorter.is_sorted(&Value::Array(sorted)));
    }

    #[test]
    fn test_sort_does_not_mutate_input() {
        let formats = json!([{"extension": "vcf"}, {"extension": "bam"}]);
        let before = formats.clone();
        let _ = Sorter::for_dataset(DatasetKind::Formats).sort(&formats).unwrap();
        assert_eq!(formats, before);
    }

    #[test]
    fn test_sort_formats_numeric_aware() {
        let formats = json!([
            {"extension": "v10"},
            {"extension": "v2"},
            {"extension": "2bit"}
        ]);
        let sorter = Sorter::for_dataset(DatasetKind::Formats);
        let sorted = sorter.sort(&formats).unwrap();
        let keys: Vec<_> = sorted.iter().map(|f| sorter.key(f).into_owned()).collect();
        assert_eq!(keys, vec!["2bit", "v2", "v10"]);
        assert!(sorter.is_sorted(&Value::Array(sorted)));
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let glossary = json!([
            {"term": "Read", "id": "first"},
            {"term": "Alignment", "id": "a"},
            {"term": "read", "id": "second"}
        ]);
        let sorted = Sorter::for_dataset(DatasetKind::Glossary)
            .sort(&glossary)
            .unwrap();
        assert_eq!(sorted[1]["id"], "first");
        assert_eq!(sorted[2]["id"], "second");
    }

    #[test]
    fn test_missing_key_sorts_first() {
        let glossary = json!([{"term": "Contig"}, {"id": "orphan"}]);
        let sorted = Sorter::for_dataset(DatasetKind::Glossary)
            .sort(&glossary)
            .unwrap();
        assert_eq!(sorted[0]["id"], "orphan");
    }

    #[test]
    fn test_is_sorted_is_numeric_aware() {
        let sorter = Sorter::for_dataset(DatasetKind::Formats);
        let formats = json!([{"extension": "v2"}, {"extension": "v10"}]);
        assert!(sorter.is_sorted(&formats));
        assert_eq!(sorter.sort(&formats).unwrap(), formats.as_array().unwrap().clone());
    }

    #[test]
    fn test_is_sorted_trivial_inputs() {
        let sorter = Sorter::for_dataset(DatasetKind::Areas);
        assert!(sorter.is_sorted(&json!([])));
        assert!(sorter.is_sorted(&json!([{"name": "Zoology"}])));
        assert!(sorter.is_sorted(&json!({"name": "not a list"})));
    }

    #[test]
    fn test_sort_rejects_non_sequence() {
        let err = Sorter::for_dataset(DatasetKind::Formats)
            .sort(&json!({"extension": "bam"}))
            .unwrap_err();
        assert!(matches!(
            err,
            TidyError::NotASequence {
                dataset: DatasetKind::Formats
            }
        ));
        assert_eq!(err.to_string(), "Formats must be a sequence");
    }
}
