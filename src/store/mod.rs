//! Flat-file storage for the datasets.
//!
//! Datasets are read and written as JSON, or as YAML when the path ends
//! in `.yaml`/`.yml`. Values keep their key order through a load/save
//! cycle, so the only change a save makes is the one the caller made.
//!
//! Writes are not atomic. Callers that rewrite a dataset take a
//! [`backup`] first.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use crate::error::TidyError;

/// On-disk encoding of a dataset file, chosen by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Yaml,
}

impl FileFormat {
    /// `.yaml` and `.yml` are YAML; everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                FileFormat::Yaml
            }
            _ => FileFormat::Json,
        }
    }
}

/// Options for [`save`].
#[derive(Clone, Copy, Debug)]
pub struct SaveOptions {
    /// Spaces per indentation level (JSON only; YAML always uses 2).
    pub indent: usize,
    /// Append a single trailing newline.
    pub trailing_newline: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            trailing_newline: true,
        }
    }
}

/// Size and modification time of a file on disk.
#[derive(Clone, Debug, Serialize)]
pub struct FileInfo {
    pub path: PathBuf,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Reads and parses a dataset file.
///
/// # Errors
/// [`TidyError::NotFound`] if the file does not exist, a parse error
/// carrying the path if the content is malformed, [`TidyError::Io`] for
/// any other read failure.
pub fn load(path: &Path) -> Result<Value, TidyError> {
    let content = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
    parse(path, &content)
}

/// Parses file content according to the path's format.
pub fn parse(path: &Path, content: &str) -> Result<Value, TidyError> {
    match FileFormat::from_path(path) {
        FileFormat::Json => serde_json::from_str(content).map_err(|source| TidyError::JsonParse {
            path: path.to_path_buf(),
            source,
        }),
        FileFormat::Yaml => serde_yaml::from_str(content).map_err(|source| TidyError::YamlParse {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Serializes a value the way [`save`] would write it.
pub fn render(path: &Path, value: &Value, options: SaveOptions) -> Result<String, TidyError> {
    let mut content = match FileFormat::from_path(path) {
        FileFormat::Json => {
            let indent = " ".repeat(options.indent);
            let mut buf = Vec::new();
            let mut ser =
                Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
            value
                .serialize(&mut ser)
                .map_err(|source| TidyError::JsonWrite {
                    path: path.to_path_buf(),
                    source,
                })?;
            // serde_json only emits valid UTF-8.
            String::from_utf8_lossy(&buf).into_owned()
        }
        FileFormat::Yaml => serde_yaml::to_string(value).map_err(|source| TidyError::YamlWrite {
            path: path.to_path_buf(),
            source,
        })?,
    };

    let trimmed = content.trim_end_matches('\n').len();
    content.truncate(trimmed);
    if options.trailing_newline {
        content.push('\n');
    }
    Ok(content)
}

/// Writes a value to `path`, creating parent directories as needed.
///
/// Overwrites existing content in place.
///
/// # Errors
/// Returns an error if the value cannot be serialized or the file cannot
/// be written.
pub fn save(path: &Path, value: &Value, options: SaveOptions) -> Result<(), TidyError> {
    let content = render(path, value, options)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| io_error(parent, source))?;
    }
    fs::write(path, content).map_err(|source| io_error(path, source))
}

/// Copies `path` to `<path>.backup.<timestamp>` and returns the new path.
///
/// The timestamp is the current UTC instant in ISO-8601 form with every
/// `:` and `.` replaced by `-`. Backups are never pruned.
///
/// # Errors
/// [`TidyError::NotFound`] if `path` does not exist, [`TidyError::Io`] if
/// the copy fails.
pub fn backup(path: &Path) -> Result<PathBuf, TidyError> {
    if !path.exists() {
        return Err(TidyError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let target = backup_path(path, Utc::now());
    fs::copy(path, &target).map_err(|source| io_error(&target, source))?;
    Ok(target)
}

/// The backup path for `path` at instant `at`.
pub fn backup_path(path: &Path, at: DateTime<Utc>) -> PathBuf {
    let stamp = at
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
        .replace([':', '.'], "-");
    let mut name = OsString::from(path.as_os_str());
    name.push(".backup.");
    name.push(stamp);
    PathBuf::from(name)
}

pub fn exists(path: &Path) -> bool {
    path.exists()
}

/// Size and modification time, or `None` if the file is missing.
pub fn file_info(path: &Path) -> Option<FileInfo> {
    let meta = fs::metadata(path).ok()?;
    Some(FileInfo {
        path: path.to_path_buf(),
        size: meta.len(),
        modified: meta.modified().ok().map(DateTime::<Utc>::from),
    })
}

fn io_error(path: &Path, source: std::io::Error) -> TidyError {
    if source.kind() == ErrorKind::NotFound {
        TidyError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        TidyError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_load_missing_file() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = load(&temp.path().join("areas.json")).unwrap_err();
        assert!(matches!(err, TidyError::NotFound { .. }));
        assert!(err.to_string().contains("areas.json"));
    }

    #[test]
    fn test_load_malformed_json_names_path() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("formats.json");
        fs::write(&path, "[{\"extension\": ").expect("write file");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, TidyError::JsonParse { .. }));
        assert!(err.to_string().contains("formats.json"));
    }

    #[test]
    fn test_save_preserves_key_order_and_newline() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("nested/dir/areas.json");
        let original = "[\n  {\n    \"name\": \"Genomics\",\n    \"id\": \"genomics\"\n  }\n]\n";
        let value = parse(&path, original).expect("parse");

        save(&path, &value, SaveOptions::default()).expect("save");

        let written = fs::read_to_string(&path).expect("read back");
        assert_eq!(written, original);
    }

    #[test]
    fn test_save_custom_indent_without_newline() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("areas.json");
        let options = SaveOptions {
            indent: 4,
            trailing_newline: false,
        };
        save(&path, &json!([{"id": "a"}]), options).expect("save");
        let written = fs::read_to_string(&path).expect("read back");
        assert_eq!(written, "[\n    {\n        \"id\": \"a\"\n    }\n]");
    }

    #[test]
    fn test_yaml_roundtrip_keeps_order() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("formats.yaml");
        fs::write(&path, "- extension: vcf\n  name: Variant Call Format\n  area:\n  - Genomics\n")
            .expect("write yaml");

        let value = load(&path).expect("load yaml");
        assert_eq!(value[0]["extension"], "vcf");
        let keys: Vec<_> = value[0].as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["extension", "name", "area"]);

        save(&path, &value, SaveOptions::default()).expect("save yaml");
        let reloaded = load(&path).expect("reload yaml");
        assert_eq!(reloaded, value);
    }

    #[test]
    fn test_backup_path_is_filesystem_safe() {
        let at = Utc.with_ymd_and_hms(2026, 10, 19, 12, 34, 56).unwrap();
        let path = backup_path(Path::new("data/areas.json"), at);
        assert_eq!(
            path,
            PathBuf::from("data/areas.json.backup.2026-10-19T12-34-56-000Z")
        );
    }

    #[test]
    fn test_backup_copies_content() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("glossary.json");
        fs::write(&path, "[]\n").expect("write file");

        let created = backup(&path).expect("backup");
        assert!(created
            .to_string_lossy()
            .starts_with(&*path.to_string_lossy()));
        assert!(!created.file_name().unwrap().to_string_lossy().contains(':'));
        assert_eq!(fs::read_to_string(&created).expect("read backup"), "[]\n");
    }

    #[test]
    fn test_backup_missing_source() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let err = backup(&temp.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TidyError::NotFound { .. }));
    }

    #[test]
    fn test_exists_and_file_info() {
        let temp = tempfile::tempdir().expect("create temp dir");
        let path = temp.path().join("areas.json");
        assert!(!exists(&path));
        assert!(file_info(&path).is_none());

        fs::write(&path, "[]").expect("write file");
        assert!(exists(&path));
        let info = file_info(&path).expect("file info");
        assert_eq!(info.size, 2);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(FileFormat::from_path(Path::new("a.yml")), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path(Path::new("a.YAML")), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path(Path::new("a.json")), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("noext")), FileFormat::Json);
    }
}
