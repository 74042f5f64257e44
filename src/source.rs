//! Sensor data sources.
//!
//! Sources sit outside the pipeline core: they only need to yield a batch
//! of flat key/value records matching the raw reading shape. Validation of
//! that shape belongs to the input schema step, not to the source.

use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::{value_to_record, Batch};
use crate::error::{PipelineError, Result};

// ---

/// A source of raw sensor readings.
pub trait SensorSource {
    /// Load the full batch of raw records.
    fn load(&self) -> Result<Batch>;
}

/// Load sensor readings from a `.json` (array of objects) or `.jsonl`
/// (one object per line) file.
#[derive(Debug, Clone)]
pub struct FileSource {
    // ---
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        // ---
        FileSource { path: path.into() }
    }
}

impl SensorSource for FileSource {
    fn load(&self) -> Result<Batch> {
        // ---
        if !self.path.exists() {
            return Err(PipelineError::NotFound {
                path: self.path.clone(),
            });
        }

        let extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => load_json(&self.path),
            Some("jsonl") => load_jsonl(&self.path),
            other => Err(PipelineError::UnsupportedFormat {
                reason: format!("unrecognized file extension: {:?}", other.unwrap_or("")),
            }),
        }
    }
}

fn load_json(path: &Path) -> Result<Batch> {
    // ---
    let text = fs::read_to_string(path)?;
    let document: serde_json::Value =
        serde_json::from_str(&text).map_err(|e| PipelineError::UnsupportedFormat {
            reason: format!("invalid JSON in {}: {}", path.display(), e),
        })?;

    let rows = document
        .as_array()
        .ok_or_else(|| PipelineError::UnsupportedFormat {
            reason: format!("{} must contain a JSON array of records", path.display()),
        })?;

    rows.iter().map(value_to_record).collect()
}

fn load_jsonl(path: &Path) -> Result<Batch> {
    // ---
    let text = fs::read_to_string(path)?;
    let mut batch = Batch::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let value: serde_json::Value =
            serde_json::from_str(line).map_err(|e| PipelineError::UnsupportedFormat {
                reason: format!("invalid JSON on line {} of {}: {}", line_no + 1, path.display(), e),
            })?;
        batch.push(value_to_record(&value)?);
    }

    Ok(batch)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::batch::Cell;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn temp_file_with(suffix: &str, contents: &str) -> NamedTempFile {
        // ---
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_json_array() {
        // ---
        let file = temp_file_with(
            ".json",
            r#"[{"mesh_id": "mesh-001", "temperature_c": 22.4}]"#,
        );
        let batch = FileSource::new(file.path()).load().unwrap();

        assert_eq!(batch.len(), 1);
        assert_eq!(
            batch[0].get("mesh_id"),
            Some(&Cell::Str("mesh-001".to_string()))
        );
        assert_eq!(batch[0].get("temperature_c"), Some(&Cell::Float(22.4)));
    }

    #[test]
    fn loads_json_lines_skipping_blanks() {
        // ---
        let file = temp_file_with(
            ".jsonl",
            "{\"mesh_id\": \"mesh-001\"}\n\n{\"mesh_id\": \"mesh-002\"}\n",
        );
        let batch = FileSource::new(file.path()).load().unwrap();

        assert_eq!(batch.len(), 2);
        assert_eq!(
            batch[1].get("mesh_id"),
            Some(&Cell::Str("mesh-002".to_string()))
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        // ---
        let err = FileSource::new("/no/such/readings.json").load().unwrap_err();
        assert!(matches!(err, PipelineError::NotFound { .. }));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        // ---
        let file = temp_file_with(".csv", "mesh_id\nmesh-001\n");
        let err = FileSource::new(file.path()).load().unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    #[test]
    fn non_array_document_is_unsupported() {
        // ---
        let file = temp_file_with(".json", r#"{"mesh_id": "mesh-001"}"#);
        let err = FileSource::new(file.path()).load().unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }

    #[test]
    fn broken_json_is_unsupported() {
        // ---
        let file = temp_file_with(".json", "[{not json");
        let err = FileSource::new(file.path()).load().unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat { .. }));
    }
}
