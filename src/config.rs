//! Configuration loader for the `codemetal-sensorpipe` batch pipeline.
//!
//! This module centralizes all runtime configuration values and their
//! defaults, loading from environment variables (with optional `.env` file
//! support provided by the caller). By consolidating configuration logic
//! here, we avoid scattering `env::var` calls throughout the codebase.

use std::env;

use anyhow::{anyhow, Result};

/// Parse an optional float environment variable with a default value.
macro_rules! parse_env_f64 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<f64>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Anomaly thresholds shared read-only by every threshold-consuming step.
///
/// All fields are immutable after loading, ensuring a consistent
/// configuration snapshot for the lifetime of the pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    // ---
    /// Low temperature threshold (°C).
    pub temp_low: f64,

    /// High temperature threshold (°C).
    pub temp_high: f64,

    /// Low humidity threshold (%).
    pub hum_low: f64,

    /// High humidity threshold (%).
    pub hum_high: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        // ---
        PipelineConfig {
            temp_low: -10.0,
            temp_high: 60.0,
            hum_low: 10.0,
            hum_high: 90.0,
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `PIPELINE_TEMP_LOW` – low temperature threshold in °C (default: -10.0)
/// - `PIPELINE_TEMP_HIGH` – high temperature threshold in °C (default: 60.0)
/// - `PIPELINE_HUM_LOW` – low humidity threshold in % (default: 10.0)
/// - `PIPELINE_HUM_HIGH` – high humidity threshold in % (default: 90.0)
///
/// Returns an error if any variable is present but not a valid float.
pub fn load_from_env() -> Result<PipelineConfig> {
    // ---
    let defaults = PipelineConfig::default();

    let temp_low = parse_env_f64!("PIPELINE_TEMP_LOW", defaults.temp_low);
    let temp_high = parse_env_f64!("PIPELINE_TEMP_HIGH", defaults.temp_high);
    let hum_low = parse_env_f64!("PIPELINE_HUM_LOW", defaults.hum_low);
    let hum_high = parse_env_f64!("PIPELINE_HUM_HIGH", defaults.hum_high);

    Ok(PipelineConfig {
        temp_low,
        temp_high,
        hum_low,
        hum_high,
    })
}

impl PipelineConfig {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  PIPELINE_TEMP_LOW  : {}", self.temp_low);
        tracing::info!("  PIPELINE_TEMP_HIGH : {}", self.temp_high);
        tracing::info!("  PIPELINE_HUM_LOW   : {}", self.hum_low);
        tracing::info!("  PIPELINE_HUM_HIGH  : {}", self.hum_high);
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn defaults_match_documented_thresholds() {
        // ---
        let cfg = PipelineConfig::default();
        assert_eq!(cfg.temp_low, -10.0);
        assert_eq!(cfg.temp_high, 60.0);
        assert_eq!(cfg.hum_low, 10.0);
        assert_eq!(cfg.hum_high, 90.0);
    }
}
