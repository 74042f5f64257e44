//! Schema validation step.

use tracing::debug;

use crate::batch::Batch;
use crate::error::Result;
use crate::schema::Schema;
use crate::transforms::Transform;

// ---

/// Validate the batch against a declarative [`Schema`].
///
/// On success the batch passes through unchanged; on failure the error
/// carries every violation found in the batch, not just the first.
pub struct ValidateSchema {
    // ---
    schema: Schema,
}

impl ValidateSchema {
    pub fn new(schema: Schema) -> Self {
        // ---
        ValidateSchema { schema }
    }
}

impl Transform for ValidateSchema {
    fn name(&self) -> &'static str {
        "validate_schema"
    }

    fn transform(&self, batch: Batch) -> Result<Batch> {
        // ---
        debug!(
            "Validating {} row(s) against `{}` schema",
            batch.len(),
            self.schema.name
        );
        self.schema.validate(&batch)?;
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::batch::{Cell, Record};
    use crate::error::PipelineError;
    use crate::schema::input_schema;

    #[test]
    fn valid_batch_passes_through_unchanged() {
        // ---
        let mut row = Record::new();
        row.insert("mesh_id".to_string(), Cell::Str("mesh-001".to_string()));
        row.insert("device_id".to_string(), Cell::Str("device-A".to_string()));
        row.insert(
            "timestamp".to_string(),
            Cell::Str("2025-03-26T13:45:00Z".to_string()),
        );
        row.insert("temperature_c".to_string(), Cell::Float(22.4));
        row.insert("humidity".to_string(), Cell::Float(41.2));
        row.insert("status".to_string(), Cell::Str("ok".to_string()));

        let batch = vec![row.clone()];
        let result = ValidateSchema::new(input_schema()).transform(batch).unwrap();
        assert_eq!(result, vec![row]);
    }

    #[test]
    fn invalid_batch_fails_with_schema_violation() {
        // ---
        let batch = vec![Record::new()];
        let err = ValidateSchema::new(input_schema())
            .transform(batch)
            .unwrap_err();
        assert!(matches!(err, PipelineError::SchemaViolation { .. }));
    }

    #[test]
    fn empty_batch_passes() {
        // ---
        let result = ValidateSchema::new(input_schema())
            .transform(Batch::new())
            .unwrap();
        assert!(result.is_empty());
    }
}
