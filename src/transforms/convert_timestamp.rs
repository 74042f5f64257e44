//! Timestamp normalization step.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use crate::batch::{require, Batch, Cell};
use crate::error::{PipelineError, Result};
use crate::transforms::Transform;

// ---

/// Fixed five-hour western offset for the derived `timestamp_est` column.
/// This is a constant offset, not a calendar-aware timezone conversion.
const EST_OFFSET_HOURS: i64 = 5;

/// Parse raw timestamp strings into UTC instants and derive `timestamp_est`.
///
/// A known upstream malformation carries both a numeric UTC offset and a
/// trailing `Z` (e.g. `...+00:00Z`); those values are repaired by dropping
/// the offset segment before parsing. Anything else that fails to parse is
/// a hard [`PipelineError::MalformedTimestamp`] — rows are never silently
/// dropped.
pub struct ConvertTimestamp;

impl Transform for ConvertTimestamp {
    fn name(&self) -> &'static str {
        "convert_timestamp"
    }

    fn transform(&self, mut batch: Batch) -> Result<Batch> {
        // ---
        debug!("Normalizing timestamps for {} row(s)", batch.len());

        for row in batch.iter_mut() {
            let timestamp = match require(row, "timestamp")? {
                Cell::Timestamp(t) => *t,
                Cell::Str(raw) => parse_utc(raw)?,
                other => {
                    return Err(PipelineError::MalformedTimestamp {
                        value: format!("<{}>", other.type_name()),
                    })
                }
            };

            row.insert("timestamp".to_string(), Cell::Timestamp(timestamp));
            row.insert(
                "timestamp_est".to_string(),
                Cell::Timestamp(timestamp - Duration::hours(EST_OFFSET_HOURS)),
            );
        }

        Ok(batch)
    }
}

fn parse_utc(raw: &str) -> Result<DateTime<Utc>> {
    // ---
    // Repair the known `...+00:00Z` malformation by dropping the numeric
    // offset segment, leaving the single trailing `Z`.
    let repaired = match raw.strip_suffix("+00:00Z") {
        Some(stripped) => format!("{stripped}Z"),
        None => raw.to_string(),
    };

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&repaired) {
        return Ok(parsed.with_timezone(&Utc));
    }

    // No zone marker present: assume UTC. Both the "T" and space
    // separators show up in practice.
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&repaired, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    Err(PipelineError::MalformedTimestamp {
        value: raw.to_string(),
    })
}
