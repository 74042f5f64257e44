//! Pipeline transformation steps.
//!
//! Each step lives in its own sibling module and follows the Explicit
//! Module Boundary Pattern (EMBP): internal helpers stay private to the
//! step file, and this gateway re-exports only the step types. The
//! executor in `pipeline.rs` knows about the [`Transform`] trait, never
//! about individual step internals.

use crate::batch::Batch;
use crate::error::Result;

mod aggregate_mesh;
mod convert_temperature;
mod convert_timestamp;
mod deduplicate_readings;
mod detect_anomalies;
mod validate_schema;

pub use aggregate_mesh::AggregateMesh;
pub use convert_temperature::ConvertTemperature;
pub use convert_timestamp::ConvertTimestamp;
pub use deduplicate_readings::DeduplicateReadings;
pub use detect_anomalies::DetectAnomalies;
pub use validate_schema::ValidateSchema;

// ---

/// A single pipeline step: consumes a batch, produces a batch.
///
/// Steps take the batch by value; the executor hands each step exclusive
/// ownership in turn, so no step can observe another's intermediate state.
pub trait Transform {
    /// Step name used in progress logging.
    fn name(&self) -> &'static str;

    /// Apply the step. Fails fast with a typed error; partial output is
    /// never returned.
    fn transform(&self, batch: Batch) -> Result<Batch>;
}
