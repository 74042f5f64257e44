//! Typed data models for the sensor pipeline.
//!
//! The batch container is loosely typed (see `batch`), but the three record
//! shapes that matter have typed views here. Conversion goes through serde,
//! so a record produced by the transforms deserializes into its model and a
//! model serializes back into a flat record.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::batch::{value_to_record, Record};
use crate::error::{PipelineError, Result, Violation};

// ---

/// Raw sensor reading as it arrives from a source.
///
/// `timestamp` stays a string here: raw input may carry malformed values
/// that only the timestamp normalizer knows how to repair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    // ---
    pub mesh_id: String,
    pub device_id: String,
    pub timestamp: String,
    pub temperature_c: f64,
    pub humidity: f64,
    pub status: String,
}

/// Sensor reading after normalization, conversion, and anomaly detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedReading {
    // ---
    pub mesh_id: String,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub timestamp_est: DateTime<Utc>,
    pub temperature_c: f64,
    pub temperature_f: f64,
    pub humidity: f64,
    pub status: String,
    pub temperature_alert: bool,
    pub humidity_alert: bool,
    pub status_alert: bool,
    pub is_healthy: bool,
}

/// Aggregated summary per mesh network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshSummary {
    // ---
    pub mesh_id: String,
    pub avg_temperature_c: f64,
    pub avg_temperature_f: f64,
    pub avg_humidity: f64,
    pub total_readings: u64,
    pub temperature_anomaly_count: u64,
    pub humidity_anomaly_count: u64,
    pub status_anomaly_count: u64,
    pub healthy_reading_percentage: f64,
}

// ---

/// Deserialize a record into a typed model.
///
/// `row_idx` is threaded into the diagnostic if the record does not match
/// the model shape.
pub fn from_record<T: DeserializeOwned>(record: &Record, row_idx: usize) -> Result<T> {
    // ---
    let value = serde_json::to_value(record).map_err(|e| PipelineError::UnsupportedFormat {
        reason: e.to_string(),
    })?;
    serde_json::from_value(value).map_err(|e| PipelineError::SchemaViolation {
        violations: vec![Violation {
            row: Some(row_idx),
            column: "<record>".to_string(),
            reason: e.to_string(),
        }],
    })
}

/// Serialize a typed model into a flat record.
pub fn to_record<T: Serialize>(model: &T) -> Result<Record> {
    // ---
    let value = serde_json::to_value(model).map_err(|e| PipelineError::UnsupportedFormat {
        reason: e.to_string(),
    })?;
    value_to_record(&value)
}
