//! Error types for the sensor pipeline core.
//!
//! Every pipeline step fails fast with one of these variants; the executor
//! propagates them unchanged (no retries, no partial output). The binary
//! entry point wraps them in `anyhow` at the process boundary.

use std::path::PathBuf;

use thiserror::Error;

// ---

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// A single schema violation: which row, which column, and why.
///
/// `row` is `None` for batch-level problems that are not tied to a
/// specific record (currently unused but kept for diagnostics parity).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    // ---
    pub row: Option<usize>,
    pub column: String,
    pub reason: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // ---
        match self.row {
            Some(row) => write!(f, "row {}, column `{}`: {}", row, self.column, self.reason),
            None => write!(f, "column `{}`: {}", self.column, self.reason),
        }
    }
}

/// Main error type for the pipeline core.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// One or more rows/columns failed structural or domain constraints.
    /// Carries the full list of violations, not just the first.
    #[error("schema validation failed with {} violation(s): {}",
        .violations.len(), format_violations(.violations))]
    SchemaViolation { violations: Vec<Violation> },

    /// A timestamp value could not be parsed, even after the known
    /// `+00:00Z` malformation repair.
    #[error("malformed timestamp: `{value}`")]
    MalformedTimestamp { value: String },

    /// A step's required input column is absent.
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    /// The underlying input resource does not exist.
    #[error("input not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The input encoding is not one the source understands.
    #[error("unsupported input format: {reason}")]
    UnsupportedFormat { reason: String },

    /// Incidental I/O failure while reading input or writing output.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_violations(violations: &[Violation]) -> String {
    // ---
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn schema_violation_lists_every_entry() {
        // ---
        let err = PipelineError::SchemaViolation {
            violations: vec![
                Violation {
                    row: Some(0),
                    column: "status".to_string(),
                    reason: "column is missing".to_string(),
                },
                Violation {
                    row: Some(2),
                    column: "humidity".to_string(),
                    reason: "expected float, found str".to_string(),
                },
            ],
        };

        let msg = err.to_string();
        assert!(msg.contains("2 violation(s)"));
        assert!(msg.contains("row 0, column `status`"));
        assert!(msg.contains("row 2, column `humidity`"));
    }

    #[test]
    fn malformed_timestamp_names_the_value() {
        // ---
        let err = PipelineError::MalformedTimestamp {
            value: "not-a-time".to_string(),
        };
        assert!(err.to_string().contains("not-a-time"));
    }
}
