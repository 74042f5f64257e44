//! Celsius to Fahrenheit conversion step.

use tracing::debug;

use crate::batch::{require_f64, Batch, Cell};
use crate::error::Result;
use crate::transforms::Transform;

// ---

/// Derive `temperature_f` from `temperature_c`, element-wise.
pub struct ConvertTemperature;

impl Transform for ConvertTemperature {
    fn name(&self) -> &'static str {
        "convert_temperature"
    }

    fn transform(&self, mut batch: Batch) -> Result<Batch> {
        // ---
        debug!("Converting temperatures for {} row(s)", batch.len());

        for (row_idx, row) in batch.iter_mut().enumerate() {
            let celsius = require_f64(row, row_idx, "temperature_c")?;
            let fahrenheit = celsius * 9.0 / 5.0 + 32.0;
            row.insert("temperature_f".to_string(), Cell::Float(fahrenheit));
        }

        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::batch::Record;
    use crate::error::PipelineError;
    use approx::assert_relative_eq;

    fn row_with_celsius(celsius: f64) -> Record {
        // ---
        let mut row = Record::new();
        row.insert("temperature_c".to_string(), Cell::Float(celsius));
        row
    }

    #[test]
    fn converts_celsius_to_fahrenheit() {
        // ---
        let batch = vec![row_with_celsius(22.4), row_with_celsius(-15.2)];
        let result = ConvertTemperature.transform(batch).unwrap();

        match result[0].get("temperature_f") {
            Some(Cell::Float(f)) => assert_relative_eq!(*f, 72.32, epsilon = 1e-9),
            other => panic!("expected float cell, got {other:?}"),
        }
        match result[1].get("temperature_f") {
            Some(Cell::Float(f)) => assert_relative_eq!(*f, 4.64, epsilon = 1e-9),
            other => panic!("expected float cell, got {other:?}"),
        }
    }

    #[test]
    fn zero_celsius_is_freezing_point() {
        // ---
        let result = ConvertTemperature
            .transform(vec![row_with_celsius(0.0)])
            .unwrap();
        assert_eq!(result[0].get("temperature_f"), Some(&Cell::Float(32.0)));
    }

    #[test]
    fn missing_celsius_column_fails() {
        // ---
        let err = ConvertTemperature
            .transform(vec![Record::new()])
            .unwrap_err();
        match err {
            PipelineError::MissingField { field } => assert_eq!(field, "temperature_c"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_batch_is_a_no_op() {
        // ---
        assert!(ConvertTemperature
            .transform(Batch::new())
            .unwrap()
            .is_empty());
    }
}
