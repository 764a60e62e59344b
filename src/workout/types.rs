//! Input records describing one recorded workout.
//!
//! The shapes mirror the JSON returned by the class platform: a workout record,
//! a summary of whole-ride aggregates, and the per-second performance graph.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Identifies a workout and the class it was taken from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// Workout identifier
    pub id: String,
    /// Start time in epoch seconds (UTC)
    pub start_time: i64,
    /// Ride as seen by the user
    pub ride: RideInfo,
    /// Class metadata
    pub peloton: ClassInfo,
}

impl WorkoutRecord {
    /// Ride duration in seconds from the class metadata.
    pub fn duration_seconds(&self) -> i64 {
        self.peloton.ride.duration
    }

    /// Instructor leading the class, if any.
    pub fn instructor(&self) -> Option<&Instructor> {
        self.peloton.ride.instructor.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.ride.title
    }
}

/// User-facing ride details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RideInfo {
    /// Class title
    pub title: String,
}

/// Wrapper around the class ride metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassInfo {
    pub ride: ClassRide,
}

/// Class ride metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassRide {
    /// Scheduled duration in seconds
    pub duration: i64,
    /// Instructor, absent for scenic or just-ride classes
    #[serde(default)]
    pub instructor: Option<Instructor>,
}

/// Class instructor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instructor {
    pub first_name: String,
    pub last_name: String,
}

/// Whole-ride aggregates.
///
/// Every field is optional and loosely typed so that a sparse or malformed
/// summary still loads; the lap builder decides which values are unusable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutSummary {
    /// Maximum speed in mph
    #[serde(default)]
    pub max_speed: Option<Value>,
    /// Average speed in mph
    #[serde(default)]
    pub avg_speed: Option<Value>,
    /// Calories burned
    #[serde(default)]
    pub calories: Option<Value>,
    /// Maximum heart rate in BPM
    #[serde(default)]
    pub max_heart_rate: Option<Value>,
    /// Average heart rate in BPM
    #[serde(default)]
    pub avg_heart_rate: Option<Value>,
    /// Maximum cadence in RPM
    #[serde(default)]
    pub max_cadence: Option<Value>,
    /// Average cadence in RPM
    #[serde(default)]
    pub avg_cadence: Option<Value>,
    /// Maximum resistance (percent)
    #[serde(default)]
    pub max_resistance: Option<Value>,
    /// Average resistance (percent)
    #[serde(default)]
    pub avg_resistance: Option<Value>,
    /// Maximum power in watts
    #[serde(default)]
    pub max_power: Option<Value>,
    /// Average power in watts
    #[serde(default)]
    pub avg_power: Option<Value>,
    /// Total work in kilojoules
    #[serde(default)]
    pub total_work: Option<Value>,
}

/// Per-second telemetry for a workout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkoutSamples {
    /// Named scalar results, kept raw; index 1 holds total distance in miles
    #[serde(default, deserialize_with = "list_or_empty")]
    pub summaries: Vec<Value>,
    /// Metric series, `None` when the platform returned no metrics list
    #[serde(default, deserialize_with = "metric_list")]
    pub metrics: Option<Vec<MetricSeries>>,
    /// Elapsed seconds for each sample tick
    #[serde(default)]
    pub seconds_since_pedaling_start: Vec<i64>,
}

impl WorkoutSamples {
    /// Number of sample ticks on the timeline.
    pub fn tick_count(&self) -> usize {
        self.seconds_since_pedaling_start.len()
    }
}

/// One telemetry series aligned with the sample timeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricSeries {
    /// Series identifier, e.g. `heart_rate`
    #[serde(default)]
    pub slug: String,
    /// Raw per-tick values, loosely typed; anything but a list reads as empty
    #[serde(default, deserialize_with = "list_or_empty")]
    pub values: Vec<Value>,
}

impl MetricSeries {
    /// Create a numeric series.
    pub fn new(slug: impl Into<String>, values: &[f64]) -> Self {
        Self {
            slug: slug.into(),
            values: values.iter().map(|v| Value::from(*v)).collect(),
        }
    }

    /// Numeric value at a timeline index.
    pub fn value_at(&self, index: usize) -> Result<f64, SampleError> {
        let raw = self.values.get(index).ok_or(SampleError::OutOfRange {
            index,
            len: self.values.len(),
        })?;
        raw.as_f64().ok_or(SampleError::NotNumeric { index })
    }
}

fn list_or_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        other => {
            tracing::warn!("Expected a list, got {}", other);
            Ok(Vec::new())
        }
    }
}

fn metric_list<'de, D>(deserializer: D) -> Result<Option<Vec<MetricSeries>>, D::Error>
where
    D: Deserializer<'de>,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        Value::Null => return Ok(None),
        other => {
            tracing::warn!("Metrics is not a list: {}", other);
            return Ok(None);
        }
    };

    let series = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<MetricSeries>(item) {
            Ok(series) => Some(series),
            Err(e) => {
                tracing::warn!("Skipping unreadable metric series: {}", e);
                None
            }
        })
        .collect();
    Ok(Some(series))
}

/// Failure to read one value from a metric series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    /// Series is shorter than the timeline
    #[error("index {index} out of range for series of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// Value is null or not a number
    #[error("value at index {index} is not numeric")]
    NotNumeric { index: usize },
}
