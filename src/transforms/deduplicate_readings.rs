//! Deduplication step.

use std::collections::HashSet;

use chrono::SecondsFormat;
use tracing::debug;

use crate::batch::{require, Batch, Cell, Record};
use crate::error::Result;
use crate::transforms::Transform;

// ---

/// Remove readings that share the `(mesh_id, device_id, timestamp)`
/// identity key, keeping the first occurrence in original batch order.
///
/// All other fields are ignored even when they differ between duplicates;
/// the surviving rows keep their relative order.
pub struct DeduplicateReadings;

impl Transform for DeduplicateReadings {
    fn name(&self) -> &'static str {
        "deduplicate_readings"
    }

    fn transform(&self, batch: Batch) -> Result<Batch> {
        // ---
        let before = batch.len();
        let mut seen: HashSet<(String, String, String)> = HashSet::new();
        let mut result = Batch::with_capacity(batch.len());

        for row in batch {
            if seen.insert(identity_key(&row)?) {
                result.push(row);
            }
        }

        debug!("Deduplicated {} row(s) down to {}", before, result.len());
        Ok(result)
    }
}

fn identity_key(row: &Record) -> Result<(String, String, String)> {
    // ---
    let mesh_id = cell_key(require(row, "mesh_id")?);
    let device_id = cell_key(require(row, "device_id")?);
    let timestamp = cell_key(require(row, "timestamp")?);
    Ok((mesh_id, device_id, timestamp))
}

/// Canonical string form of a key cell. Typed timestamps and their raw
/// string spellings compare exactly, never fuzzily.
fn cell_key(cell: &Cell) -> String {
    // ---
    match cell {
        Cell::Timestamp(t) => t.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        Cell::Str(s) => s.clone(),
        other => format!("{other:?}"),
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::error::PipelineError;

    fn row(mesh_id: &str, device_id: &str, timestamp: &str, temperature_c: f64) -> Record {
        // ---
        let mut row = Record::new();
        row.insert("mesh_id".to_string(), Cell::Str(mesh_id.to_string()));
        row.insert("device_id".to_string(), Cell::Str(device_id.to_string()));
        row.insert("timestamp".to_string(), Cell::Str(timestamp.to_string()));
        row.insert("temperature_c".to_string(), Cell::Float(temperature_c));
        row
    }

    #[test]
    fn first_occurrence_wins_even_when_other_fields_differ() {
        // ---
        let batch = vec![
            row("mesh-001", "device-A", "2025-03-26T13:45:00Z", 22.4),
            row("mesh-001", "device-A", "2025-03-26T13:45:00Z", 99.9),
        ];

        let result = DeduplicateReadings.transform(batch).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get("temperature_c"), Some(&Cell::Float(22.4)));
    }

    #[test]
    fn distinct_keys_all_survive_in_order() {
        // ---
        let batch = vec![
            row("mesh-001", "device-A", "2025-03-26T13:45:00Z", 22.4),
            row("mesh-001", "device-B", "2025-03-26T13:45:00Z", 23.1),
            row("mesh-002", "device-A", "2025-03-26T13:45:00Z", 24.0),
            row("mesh-001", "device-A", "2025-03-26T13:46:00Z", 25.0),
        ];

        let result = DeduplicateReadings.transform(batch.clone()).unwrap();
        assert_eq!(result, batch);
    }

    #[test]
    fn relative_order_is_preserved_around_dropped_rows() {
        // ---
        let batch = vec![
            row("mesh-001", "device-A", "2025-03-26T13:45:00Z", 1.0),
            row("mesh-001", "device-A", "2025-03-26T13:45:00Z", 2.0),
            row("mesh-002", "device-B", "2025-03-26T13:45:00Z", 3.0),
        ];

        let result = DeduplicateReadings.transform(batch).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].get("temperature_c"), Some(&Cell::Float(1.0)));
        assert_eq!(result[1].get("temperature_c"), Some(&Cell::Float(3.0)));
    }

    #[test]
    fn missing_key_column_fails() {
        // ---
        let mut incomplete = Record::new();
        incomplete.insert("mesh_id".to_string(), Cell::Str("mesh-001".to_string()));

        let err = DeduplicateReadings.transform(vec![incomplete]).unwrap_err();
        assert!(matches!(err, PipelineError::MissingField { .. }));
    }

    #[test]
    fn empty_batch_stays_empty() {
        // ---
        assert!(DeduplicateReadings
            .transform(Batch::new())
            .unwrap()
            .is_empty());
    }
}
