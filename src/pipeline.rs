//! Generic pipeline executor for composing transformation steps.

use tracing::{debug, info};

use crate::batch::Batch;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::schema::{input_schema, processed_schema, summary_schema};
use crate::transforms::{
    AggregateMesh, ConvertTemperature, ConvertTimestamp, DeduplicateReadings, DetectAnomalies,
    Transform, ValidateSchema,
};

// ---

/// An ordered chain of transformation steps.
///
/// `run` threads the batch through every step in list order, handing each
/// step exclusive ownership of the batch and taking back its output. Steps
/// are never skipped or reordered; a failing step aborts the run
/// immediately and its error propagates unchanged.
pub struct Pipeline {
    // ---
    steps: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    pub fn new(steps: Vec<Box<dyn Transform>>) -> Self {
        // ---
        Pipeline { steps }
    }

    /// Execute all steps in sequence and return the final batch.
    pub fn run(&self, batch: Batch) -> Result<Batch> {
        // ---
        info!(
            "Running pipeline: {} step(s), {} input row(s)",
            self.steps.len(),
            batch.len()
        );

        let mut result = batch;
        for step in &self.steps {
            debug!("Step `{}`: {} row(s) in", step.name(), result.len());
            result = step.transform(result)?;
            debug!("Step `{}`: {} row(s) out", step.name(), result.len());
        }

        Ok(result)
    }
}

/// Build the canonical sensor pipeline.
///
/// Order matters: raw input is schema-checked before any transformation,
/// per-row processing is re-checked against the processed schema before
/// deduplication and aggregation, and the final summaries are checked on
/// the way out.
pub fn create_sensor_pipeline(config: PipelineConfig) -> Pipeline {
    // ---
    Pipeline::new(vec![
        Box::new(ValidateSchema::new(input_schema())),
        Box::new(ConvertTimestamp),
        Box::new(ConvertTemperature),
        Box::new(DetectAnomalies::new(config)),
        Box::new(ValidateSchema::new(processed_schema())),
        Box::new(DeduplicateReadings),
        Box::new(AggregateMesh),
        Box::new(ValidateSchema::new(summary_schema())),
    ])
}
