//! Dynamic record batch threaded through the pipeline.
//!
//! Every pipeline step consumes and produces the same container shape: a
//! `Batch` of flat key/value `Record`s whose values are loosely typed
//! [`Cell`]s. Raw input arrives with string timestamps and is progressively
//! tightened by the transforms (typed instants, derived columns) until the
//! final mesh summaries are emitted. Cells serialize to flat JSON values,
//! so a finished batch can be written out as a JSON array directly.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};

use crate::error::{PipelineError, Result, Violation};

// ---

/// One loosely typed value in a record.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Timestamp(DateTime<Utc>),
}

/// One flat key/value record.
pub type Record = BTreeMap<String, Cell>;

/// The container every pipeline step consumes and produces.
pub type Batch = Vec<Record>;

impl Cell {
    // ---

    /// Human-readable type name used in schema diagnostics.
    pub fn type_name(&self) -> &'static str {
        // ---
        match self {
            Cell::Null => "null",
            Cell::Bool(_) => "bool",
            Cell::Int(_) => "int",
            Cell::Float(_) => "float",
            Cell::Str(_) => "str",
            Cell::Timestamp(_) => "timestamp",
        }
    }

    /// Convert a scalar JSON value into a cell.
    ///
    /// Returns `None` for nested values (arrays, objects), which have no
    /// place in a flat sensor record.
    pub fn from_json(value: &serde_json::Value) -> Option<Cell> {
        // ---
        match value {
            serde_json::Value::Null => Some(Cell::Null),
            serde_json::Value::Bool(b) => Some(Cell::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Some(Cell::Int(i))
                } else {
                    n.as_f64().map(Cell::Float)
                }
            }
            serde_json::Value::String(s) => Some(Cell::Str(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // ---
        match self {
            Cell::Null => serializer.serialize_unit(),
            Cell::Bool(b) => serializer.serialize_bool(*b),
            Cell::Int(i) => serializer.serialize_i64(*i),
            Cell::Float(f) => serializer.serialize_f64(*f),
            Cell::Str(s) => serializer.serialize_str(s),
            Cell::Timestamp(t) => {
                serializer.serialize_str(&t.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

// ---

/// Convert a parsed JSON value into a flat record.
///
/// Fails with [`PipelineError::UnsupportedFormat`] if the value is not an
/// object or contains nested (non-scalar) fields.
pub fn value_to_record(value: &serde_json::Value) -> Result<Record> {
    // ---
    let map = value
        .as_object()
        .ok_or_else(|| PipelineError::UnsupportedFormat {
            reason: format!("expected a JSON object per record, found: {value}"),
        })?;

    let mut record = Record::new();
    for (key, val) in map {
        let cell = Cell::from_json(val).ok_or_else(|| PipelineError::UnsupportedFormat {
            reason: format!("field `{key}` holds a nested value; records must be flat"),
        })?;
        record.insert(key.clone(), cell);
    }
    Ok(record)
}

// ---
// Typed field accessors used by the transforms. Absence is a
// `MissingField`; a present-but-wrong-typed cell is reported as a
// single-entry `SchemaViolation` carrying the row index.

fn type_mismatch(row_idx: usize, field: &str, expected: &str, found: &Cell) -> PipelineError {
    // ---
    PipelineError::SchemaViolation {
        violations: vec![Violation {
            row: Some(row_idx),
            column: field.to_string(),
            reason: format!("expected {expected}, found {}", found.type_name()),
        }],
    }
}

/// Fetch a cell, failing with `MissingField` if the column is absent.
pub fn require<'a>(row: &'a Record, field: &str) -> Result<&'a Cell> {
    // ---
    row.get(field).ok_or_else(|| PipelineError::MissingField {
        field: field.to_string(),
    })
}

/// Fetch a numeric cell as `f64` (accepts int or float).
pub fn require_f64(row: &Record, row_idx: usize, field: &str) -> Result<f64> {
    // ---
    match require(row, field)? {
        Cell::Float(f) => Ok(*f),
        Cell::Int(i) => Ok(*i as f64),
        other => Err(type_mismatch(row_idx, field, "float", other)),
    }
}

/// Fetch a string cell.
pub fn require_str<'a>(row: &'a Record, row_idx: usize, field: &str) -> Result<&'a str> {
    // ---
    match require(row, field)? {
        Cell::Str(s) => Ok(s.as_str()),
        other => Err(type_mismatch(row_idx, field, "str", other)),
    }
}
