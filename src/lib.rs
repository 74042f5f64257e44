//! Batch ETL pipeline for sensor mesh telemetry.
//!
//! Ingests batches of sensor readings grouped by mesh network, validates
//! and normalizes them, flags anomalous readings against configurable
//! thresholds, deduplicates repeated records, and aggregates per-mesh
//! statistics. Everything runs single-threaded over a bounded in-memory
//! batch; loading and persisting are the caller's concern.
//!
//! This gateway follows the Explicit Module Boundary Pattern (EMBP):
//! consumers import from the crate root and never reach into submodules.
//!
//! ```no_run
//! use sensorpipe::{create_sensor_pipeline, FileSource, PipelineConfig, SensorSource};
//!
//! # fn main() -> anyhow::Result<()> {
//! let batch = FileSource::new("data/sensor_data.json").load()?;
//! let pipeline = create_sensor_pipeline(PipelineConfig::default());
//! let summaries = pipeline.run(batch)?;
//! # Ok(())
//! # }
//! ```

mod batch;
mod config;
mod error;
mod models;
mod pipeline;
mod schema;
mod source;
mod transforms;

pub use batch::{Batch, Cell, Record};
pub use config::{load_from_env, PipelineConfig};
pub use error::{PipelineError, Result, Violation};
pub use models::{from_record, to_record, MeshSummary, ProcessedReading, SensorReading};
pub use pipeline::{create_sensor_pipeline, Pipeline};
pub use schema::{input_schema, processed_schema, summary_schema, Check, ColumnKind, ColumnSpec, Schema};
pub use source::{FileSource, SensorSource};
pub use transforms::{
    AggregateMesh, ConvertTemperature, ConvertTimestamp, DeduplicateReadings, DetectAnomalies,
    Transform, ValidateSchema,
};
