//! Per-reading anomaly detection step.

use tracing::debug;

use crate::batch::{require_f64, require_str, Batch, Cell};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::transforms::Transform;

// ---

/// Flag out-of-range temperature/humidity and non-nominal status per
/// reading, and derive the composite `is_healthy` flag.
///
/// The three alerts are orthogonal: temperature and humidity alerts depend
/// only on the numeric thresholds (strict `<` / `>`, a reading exactly on a
/// bound does not alert), and status is handled separately via
/// `status_alert`. A reading is healthy iff none of the three is set.
pub struct DetectAnomalies {
    // ---
    config: PipelineConfig,
}

impl DetectAnomalies {
    pub fn new(config: PipelineConfig) -> Self {
        // ---
        DetectAnomalies { config }
    }
}

impl Transform for DetectAnomalies {
    fn name(&self) -> &'static str {
        "detect_anomalies"
    }

    fn transform(&self, mut batch: Batch) -> Result<Batch> {
        // ---
        debug!("Detecting anomalies in {} row(s)", batch.len());

        for (row_idx, row) in batch.iter_mut().enumerate() {
            let temperature_c = require_f64(row, row_idx, "temperature_c")?;
            let humidity = require_f64(row, row_idx, "humidity")?;
            let status = require_str(row, row_idx, "status")?;

            let temperature_alert =
                temperature_c < self.config.temp_low || temperature_c > self.config.temp_high;
            let humidity_alert =
                humidity < self.config.hum_low || humidity > self.config.hum_high;
            let status_alert = status != "ok";
            let is_healthy = !(temperature_alert || humidity_alert || status_alert);

            row.insert(
                "temperature_alert".to_string(),
                Cell::Bool(temperature_alert),
            );
            row.insert("humidity_alert".to_string(), Cell::Bool(humidity_alert));
            row.insert("status_alert".to_string(), Cell::Bool(status_alert));
            row.insert("is_healthy".to_string(), Cell::Bool(is_healthy));
        }

        Ok(batch)
    }
}
