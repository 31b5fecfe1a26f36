//! Read-only lookups over loaded datasets.
//!
//! Library-only API for the catalog site and other consumers of the data
//! files; the organize pipeline and the CLI do not call into it. Load a
//! dataset with [`crate::store::load`] and query the returned value.

use serde_json::Value;

use crate::sort::collate;

/// Finds the format whose `extension` matches, ignoring case and one
/// leading dot on the query.
pub fn find_format<'v>(formats: &'v Value, extension: &str) -> Option<&'v Value> {
    let wanted = extension.strip_prefix('.').unwrap_or(extension);
    if wanted.is_empty() {
        return None;
    }
    formats.as_array()?.iter().find(|format| {
        format
            .get("extension")
            .and_then(Value::as_str)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(wanted))
    })
}

/// Distinct area names referenced by the formats, in collation order.
pub fn area_names_in_formats(formats: &Value) -> Vec<String> {
    let mut names: Vec<String> = formats
        .as_array()
        .into_iter()
        .flatten()
        .filter_map(|format| format.get("area").and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect();
    names.sort_by(|a, b| collate::compare(a, b, true).then_with(|| a.cmp(b)));
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn formats() -> Value {
        json!([
            {"extension": "bam", "name": "Binary Alignment Map", "area": ["Genomics", "Transcriptomics"]},
            {"extension": "mzML", "name": "mzML", "area": ["Proteomics"]},
            {"extension": "vcf", "name": "Variant Call Format", "area": ["Genomics"]}
        ])
    }

    #[test]
    fn test_find_format_ignores_case_and_dot() {
        let formats = formats();
        assert_eq!(find_format(&formats, "bam").unwrap()["name"], "Binary Alignment Map");
        assert_eq!(find_format(&formats, "BAM").unwrap()["extension"], "bam");
        assert_eq!(find_format(&formats, ".bam").unwrap()["extension"], "bam");
        assert_eq!(find_format(&formats, "MZML").unwrap()["extension"], "mzML");
    }

    #[test]
    fn test_find_format_misses() {
        let formats = formats();
        assert!(find_format(&formats, "cram").is_none());
        assert!(find_format(&formats, "").is_none());
        assert!(find_format(&formats, ".").is_none());
        assert!(find_format(&formats, "..bam").is_none());
        assert!(find_format(&json!({"extension": "bam"}), "bam").is_none());
    }

    #[test]
    fn test_area_names_distinct_and_sorted() {
        assert_eq!(
            area_names_in_formats(&formats()),
            vec!["Genomics", "Proteomics", "Transcriptomics"]
        );
    }

    #[test]
    fn test_area_names_skip_malformed() {
        let formats = json!([
            {"extension": "x", "area": "Genomics"},
            {"extension": "y", "area": [1, "", "Ômica"]},
            {"extension": "z"}
        ]);
        assert_eq!(area_names_in_formats(&formats), vec!["Ômica"]);
    }
}
