//! Declarative batch schemas for `codemetal-sensorpipe`.
//!
//! Each schema is plain data: an ordered set of column descriptors plus a
//! strictness flag, consumed by one generic validation engine. Validation
//! is lazy in the sense that it collects every violation in the batch
//! before failing, rather than stopping at the first offending cell.

use crate::batch::{Batch, Cell};
use crate::error::{PipelineError, Result, Violation};

// ---

/// Expected cell type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Str,
    Float,
    Int,
    Bool,
    Timestamp,
}

impl ColumnKind {
    fn matches(self, cell: &Cell) -> bool {
        // ---
        matches!(
            (self, cell),
            (ColumnKind::Str, Cell::Str(_))
                | (ColumnKind::Float, Cell::Float(_))
                | (ColumnKind::Int, Cell::Int(_))
                | (ColumnKind::Bool, Cell::Bool(_))
                | (ColumnKind::Timestamp, Cell::Timestamp(_))
        )
    }

    fn name(self) -> &'static str {
        // ---
        match self {
            ColumnKind::Str => "str",
            ColumnKind::Float => "float",
            ColumnKind::Int => "int",
            ColumnKind::Bool => "bool",
            ColumnKind::Timestamp => "timestamp",
        }
    }
}

/// Domain constraint applied after the type check.
#[derive(Debug, Clone)]
pub enum Check {
    /// String value must be one of the listed literals.
    OneOf(&'static [&'static str]),
    /// String value must be non-empty.
    NonEmpty,
}

/// Declaration of a single column.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    // ---
    pub name: &'static str,
    pub kind: ColumnKind,
    pub nullable: bool,
    pub check: Option<Check>,
}

impl ColumnSpec {
    pub fn new(name: &'static str, kind: ColumnKind) -> Self {
        // ---
        ColumnSpec {
            name,
            kind,
            nullable: false,
            check: None,
        }
    }

    pub fn with_check(mut self, check: Check) -> Self {
        // ---
        self.check = Some(check);
        self
    }
}

/// A declarative batch schema: ordered columns plus a strictness flag.
///
/// Strict schemas reject any column not explicitly declared.
#[derive(Debug, Clone)]
pub struct Schema {
    // ---
    pub name: &'static str,
    pub columns: Vec<ColumnSpec>,
    pub strict: bool,
}

impl Schema {
    /// Validate a batch, collecting every violation before failing.
    ///
    /// On success the batch is untouched; the caller keeps using it as-is.
    pub fn validate(&self, batch: &Batch) -> Result<()> {
        // ---
        let mut violations = Vec::new();

        for (row_idx, row) in batch.iter().enumerate() {
            for spec in &self.columns {
                match row.get(spec.name) {
                    None => violations.push(Violation {
                        row: Some(row_idx),
                        column: spec.name.to_string(),
                        reason: "column is missing".to_string(),
                    }),
                    Some(Cell::Null) => {
                        if !spec.nullable {
                            violations.push(Violation {
                                row: Some(row_idx),
                                column: spec.name.to_string(),
                                reason: "null value in non-nullable column".to_string(),
                            });
                        }
                    }
                    Some(cell) => {
                        if !spec.kind.matches(cell) {
                            violations.push(Violation {
                                row: Some(row_idx),
                                column: spec.name.to_string(),
                                reason: format!(
                                    "expected {}, found {}",
                                    spec.kind.name(),
                                    cell.type_name()
                                ),
                            });
                            continue;
                        }
                        if let Cell::Float(f) = cell {
                            if !f.is_finite() {
                                violations.push(Violation {
                                    row: Some(row_idx),
                                    column: spec.name.to_string(),
                                    reason: "non-finite float".to_string(),
                                });
                                continue;
                            }
                        }
                        if let Some(violation) = check_domain(spec, cell, row_idx) {
                            violations.push(violation);
                        }
                    }
                }
            }

            if self.strict {
                for column in row.keys() {
                    if !self.columns.iter().any(|spec| spec.name == column) {
                        violations.push(Violation {
                            row: Some(row_idx),
                            column: column.clone(),
                            reason: "column not declared in schema".to_string(),
                        });
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(PipelineError::SchemaViolation { violations })
        }
    }
}

fn check_domain(spec: &ColumnSpec, cell: &Cell, row_idx: usize) -> Option<Violation> {
    // ---
    let check = spec.check.as_ref()?;
    let value = match cell {
        Cell::Str(s) => s.as_str(),
        // Domain checks only apply to string columns.
        _ => return None,
    };

    let reason = match check {
        Check::OneOf(allowed) if !allowed.contains(&value) => {
            format!("value `{}` not in {:?}", value, allowed)
        }
        Check::NonEmpty if value.is_empty() => "empty string".to_string(),
        _ => return None,
    };

    Some(Violation {
        row: Some(row_idx),
        column: spec.name.to_string(),
        reason,
    })
}

// ---

const STATUS_VALUES: &[&str] = &["ok", "warning", "error"];

/// Schema for raw input readings. Timestamps are still raw strings here so
/// malformed values survive long enough for the normalizer to repair them.
pub fn input_schema() -> Schema {
    // ---
    Schema {
        name: "sensor_reading",
        strict: true,
        columns: vec![
            ColumnSpec::new("mesh_id", ColumnKind::Str).with_check(Check::NonEmpty),
            ColumnSpec::new("device_id", ColumnKind::Str),
            ColumnSpec::new("timestamp", ColumnKind::Str),
            ColumnSpec::new("temperature_c", ColumnKind::Float),
            ColumnSpec::new("humidity", ColumnKind::Float),
            ColumnSpec::new("status", ColumnKind::Str).with_check(Check::OneOf(STATUS_VALUES)),
        ],
    }
}

/// Schema for fully processed readings: typed timestamps plus the alert
/// and health columns.
pub fn processed_schema() -> Schema {
    // ---
    Schema {
        name: "processed_reading",
        strict: true,
        columns: vec![
            ColumnSpec::new("mesh_id", ColumnKind::Str).with_check(Check::NonEmpty),
            ColumnSpec::new("device_id", ColumnKind::Str),
            ColumnSpec::new("timestamp", ColumnKind::Timestamp),
            ColumnSpec::new("timestamp_est", ColumnKind::Timestamp),
            ColumnSpec::new("temperature_c", ColumnKind::Float),
            ColumnSpec::new("temperature_f", ColumnKind::Float),
            ColumnSpec::new("humidity", ColumnKind::Float),
            ColumnSpec::new("status", ColumnKind::Str).with_check(Check::OneOf(STATUS_VALUES)),
            ColumnSpec::new("temperature_alert", ColumnKind::Bool),
            ColumnSpec::new("humidity_alert", ColumnKind::Bool),
            ColumnSpec::new("status_alert", ColumnKind::Bool),
            ColumnSpec::new("is_healthy", ColumnKind::Bool),
        ],
    }
}

/// Schema for aggregated mesh summaries.
pub fn summary_schema() -> Schema {
    // ---
    Schema {
        name: "mesh_summary",
        strict: true,
        columns: vec![
            ColumnSpec::new("mesh_id", ColumnKind::Str).with_check(Check::NonEmpty),
            ColumnSpec::new("avg_temperature_c", ColumnKind::Float),
            ColumnSpec::new("avg_temperature_f", ColumnKind::Float),
            ColumnSpec::new("avg_humidity", ColumnKind::Float),
            ColumnSpec::new("total_readings", ColumnKind::Int),
            ColumnSpec::new("temperature_anomaly_count", ColumnKind::Int),
            ColumnSpec::new("humidity_anomaly_count", ColumnKind::Int),
            ColumnSpec::new("status_anomaly_count", ColumnKind::Int),
            ColumnSpec::new("healthy_reading_percentage", ColumnKind::Float),
        ],
    }
}
