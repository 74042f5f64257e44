//! Mesh-level aggregation step.

use std::collections::HashMap;

use tracing::debug;

use crate::batch::Batch;
use crate::error::Result;
use crate::models::{from_record, to_record, MeshSummary, ProcessedReading};
use crate::transforms::Transform;

// ---

/// Group processed readings by `mesh_id` and compute per-mesh statistics:
/// means of the numeric columns (2 dp), anomaly counts per alert dimension,
/// and the healthy-reading percentage (1 dp).
///
/// Meshes are emitted in order of first appearance. A zero-row input yields
/// a zero-row output; this step runs after processed-schema validation, so
/// each record is read back through the typed [`ProcessedReading`] model.
pub struct AggregateMesh;

impl Transform for AggregateMesh {
    fn name(&self) -> &'static str {
        "aggregate_mesh"
    }

    fn transform(&self, batch: Batch) -> Result<Batch> {
        // ---
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<ProcessedReading>> = HashMap::new();

        for (row_idx, row) in batch.iter().enumerate() {
            let reading: ProcessedReading = from_record(row, row_idx)?;
            if !groups.contains_key(&reading.mesh_id) {
                order.push(reading.mesh_id.clone());
            }
            groups.entry(reading.mesh_id.clone()).or_default().push(reading);
        }

        debug!(
            "Aggregating {} row(s) into {} mesh summaries",
            batch.len(),
            order.len()
        );

        let mut result = Batch::with_capacity(order.len());
        for mesh_id in order {
            let readings = &groups[&mesh_id];
            result.push(to_record(&summarize(mesh_id, readings))?);
        }
        Ok(result)
    }
}

fn summarize(mesh_id: String, readings: &[ProcessedReading]) -> MeshSummary {
    // ---
    let total = readings.len() as f64;

    let avg_temperature_c = readings.iter().map(|r| r.temperature_c).sum::<f64>() / total;
    let avg_temperature_f = readings.iter().map(|r| r.temperature_f).sum::<f64>() / total;
    let avg_humidity = readings.iter().map(|r| r.humidity).sum::<f64>() / total;

    let temperature_anomalies = readings.iter().filter(|r| r.temperature_alert).count();
    let humidity_anomalies = readings.iter().filter(|r| r.humidity_alert).count();
    let status_anomalies = readings.iter().filter(|r| r.status_alert).count();
    let healthy = readings.iter().filter(|r| r.is_healthy).count();

    MeshSummary {
        mesh_id,
        avg_temperature_c: round_to(avg_temperature_c, 2),
        avg_temperature_f: round_to(avg_temperature_f, 2),
        avg_humidity: round_to(avg_humidity, 2),
        total_readings: readings.len() as u64,
        temperature_anomaly_count: temperature_anomalies as u64,
        humidity_anomaly_count: humidity_anomalies as u64,
        status_anomaly_count: status_anomalies as u64,
        healthy_reading_percentage: round_to(healthy as f64 / total * 100.0, 1),
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    // ---
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
