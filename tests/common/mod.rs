#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use bioformats_tidy::{DataPaths, DatasetKind};
use serde_json::{json, Value};
use tempfile::TempDir;

pub fn area(id: &str, name: &str) -> Value {
    json!({"id": id, "name": name})
}

/// A format record that passes validation when `areas` are known areas.
pub fn format(extension: &str, name: &str, areas: &[&str]) -> Value {
    json!({
        "extension": extension,
        "name": name,
        "area": areas,
        "description": format!("{} files", name),
        "example_filenames": [format!("sample.{}", extension)],
        "example_file_content": "...",
        "example_file_explanation": ["Header line"],
        "pipeline_examples": [
            {"pipeline": format!("tool view sample.{}", extension), "explanation": "Inspect the file"}
        ],
        "tools": ["samtools"],
        "references": [
            {"title": "Specification", "url": "https://example.org/spec", "type": "standard"}
        ],
        "encoding_type": "text"
    })
}

/// A glossary term whose id and slug are both `id`.
pub fn term(id: &str, name: &str, area_ids: &[&str]) -> Value {
    json!({
        "id": id,
        "term": name,
        "slug": id,
        "definition": format!("Definition of {}", name),
        "area_ids": area_ids
    })
}

/// Valid datasets where only the areas are out of order.
pub fn unsorted_areas() -> [Value; 3] {
    [
        json!([area("proteomics", "Proteomics"), area("genomics", "Genomics")]),
        json!([
            format("bam", "Binary Alignment Map", &["Genomics"]),
            format("mzml", "mzML", &["Proteomics"])
        ]),
        json!([
            term("contig", "Contig", &["genomics"]),
            term("peptide", "Peptide", &["proteomics"])
        ]),
    ]
}

/// A temp directory holding the three dataset files and the report.
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new(datasets: [Value; 3]) -> Self {
        let fixture = Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        };
        for (kind, records) in DatasetKind::ALL.into_iter().zip(datasets) {
            fixture.write(kind, &records);
        }
        fixture
    }

    pub fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn report_path(&self) -> PathBuf {
        self.dir.path().join("validation-report.md")
    }

    pub fn paths(&self) -> DataPaths {
        DataPaths::in_dir(self.data_dir(), self.report_path())
    }

    pub fn dataset_path(&self, kind: DatasetKind) -> PathBuf {
        self.dir.path().join(kind.default_file_name())
    }

    pub fn write(&self, kind: DatasetKind, records: &Value) {
        let content = serde_json::to_string_pretty(records).expect("serialize dataset");
        fs::write(self.dataset_path(kind), content + "\n").expect("write dataset");
    }

    pub fn write_raw(&self, kind: DatasetKind, content: &str) {
        fs::write(self.dataset_path(kind), content).expect("write dataset");
    }

    pub fn read(&self, kind: DatasetKind) -> Value {
        let content = fs::read_to_string(self.dataset_path(kind)).expect("read dataset");
        serde_json::from_str(&content).expect("parse dataset")
    }

    pub fn read_raw(&self, kind: DatasetKind) -> String {
        fs::read_to_string(self.dataset_path(kind)).expect("read dataset")
    }

    pub fn report(&self) -> String {
        fs::read_to_string(self.report_path()).expect("read report")
    }

    /// Backup files of one dataset, sorted by name.
    pub fn backups(&self, kind: DatasetKind) -> Vec<PathBuf> {
        let prefix = format!("{}.backup.", kind.default_file_name());
        let mut found: Vec<PathBuf> = fs::read_dir(self.dir.path())
            .expect("read temp dir")
            .map(|entry| entry.expect("dir entry").path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.starts_with(&prefix))
            })
            .collect();
        found.sort();
        found
    }
}
