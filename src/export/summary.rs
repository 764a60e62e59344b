//! Lap-level aggregates.
//!
//! Distance and the remaining aggregates are extracted by two separate steps
//! so that callers can tell which part of the input was unusable. Either
//! failure aborts the export.

use super::document::{Element, Slots, LAP_TPX_TEMPLATE};
use super::format::{
    format_cadence, format_heart_rate, format_hundredths, format_miles_as_meters, format_speed,
};
use super::types::ExportError;
use crate::workout::{WorkoutSamples, WorkoutSummary};
use serde_json::Value;

/// Position of total distance (miles) in the samples summaries.
pub const DISTANCE_SUMMARY_INDEX: usize = 1;

/// Formatted lap aggregates taken from the workout summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapAggregates {
    pub maximum_speed: String,
    pub average_heart_rate: String,
    pub maximum_heart_rate: String,
    pub calories: String,
    pub total_power: String,
    pub average_cadence: String,
    pub maximum_cadence: String,
    pub average_resistance: String,
    pub maximum_resistance: String,
    pub average_speed: String,
    pub average_watts: String,
    pub maximum_watts: String,
}

/// Everything the lap needs besides its track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LapSummary {
    pub total_time_seconds: String,
    pub distance_meters: String,
    pub aggregates: LapAggregates,
}

impl LapSummary {
    /// Lap elements other than `Track`, ready for the lap template.
    pub fn into_slots(self, slots: &mut Slots) -> Result<(), ExportError> {
        let a = self.aggregates;

        let mut tpx = Slots::new();
        tpx.set(Element::text("TotalPower", a.total_power));
        tpx.set(Element::text("AverageCadence", a.average_cadence));
        tpx.set(Element::text("MaximumCadence", a.maximum_cadence));
        tpx.set(Element::text("AverageResistance", a.average_resistance));
        tpx.set(Element::text("MaximumResistance", a.maximum_resistance));
        tpx.set(Element::text("AverageSpeed", a.average_speed));
        tpx.set(Element::text("MaximumSpeed", a.maximum_speed.clone()));
        tpx.set(Element::text("AverageWatts", a.average_watts));
        tpx.set(Element::text("MaximumWatts", a.maximum_watts));
        let tpx = Element::from_template("TPX", LAP_TPX_TEMPLATE, tpx)?;

        slots.set(Element::text("TotalTimeSeconds", self.total_time_seconds));
        slots.set(Element::text("DistanceMeters", self.distance_meters));
        slots.set(Element::text("MaximumSpeed", a.maximum_speed));
        slots.set(Element::value("AverageHeartRateBpm", a.average_heart_rate));
        slots.set(Element::value("MaximumHeartRateBpm", a.maximum_heart_rate));
        slots.set(Element::text("Calories", a.calories));
        slots.set(Element::text("Intensity", "Active"));
        slots.set(Element::container("Extensions", vec![tpx]));
        Ok(())
    }
}

/// Total distance in meters, one decimal, from `summaries[1].value`.
///
/// The index is positional; the slug of that entry is not checked.
pub fn extract_distance(samples: &WorkoutSamples) -> Result<String, ExportError> {
    let entry = samples
        .summaries
        .get(DISTANCE_SUMMARY_INDEX)
        .ok_or_else(|| {
            ExportError::DistanceExtractionFailed(format!(
                "summaries has {} entries, distance expected at index {}",
                samples.summaries.len(),
                DISTANCE_SUMMARY_INDEX
            ))
        })?;

    let miles = entry.get("value").and_then(Value::as_f64).ok_or_else(|| {
        ExportError::DistanceExtractionFailed(format!(
            "summaries[{}] has no numeric value: {}",
            DISTANCE_SUMMARY_INDEX, entry
        ))
    })?;

    Ok(format_miles_as_meters(miles))
}

/// All aggregates other than distance. The first unusable field fails the step.
pub fn extract_aggregates(summary: &WorkoutSummary) -> Result<LapAggregates, ExportError> {
    let calories = required(&summary.calories, "calories")?;

    Ok(LapAggregates {
        maximum_speed: format_speed(required(&summary.max_speed, "max_speed")?),
        average_heart_rate: format_heart_rate(required(&summary.avg_heart_rate, "avg_heart_rate")?),
        maximum_heart_rate: format_heart_rate(required(&summary.max_heart_rate, "max_heart_rate")?),
        calories: (calories.round_ties_even() as i64).to_string(),
        total_power: format_hundredths(required(&summary.total_work, "total_work")?),
        average_speed: format_speed(required(&summary.avg_speed, "avg_speed")?),
        average_cadence: format_cadence(required(&summary.avg_cadence, "avg_cadence")?),
        maximum_cadence: format_cadence(required(&summary.max_cadence, "max_cadence")?),
        average_resistance: format_hundredths(required(&summary.avg_resistance, "avg_resistance")?),
        maximum_resistance: format_hundredths(required(&summary.max_resistance, "max_resistance")?),
        average_watts: format_hundredths(required(&summary.avg_power, "avg_power")?),
        maximum_watts: format_hundredths(required(&summary.max_power, "max_power")?),
    })
}

fn required(value: &Option<Value>, field: &str) -> Result<f64, ExportError> {
    match value {
        None => Err(ExportError::SummaryExtractionFailed(format!("{} is missing", field))),
        Some(raw) => raw.as_f64().ok_or_else(|| {
            ExportError::SummaryExtractionFailed(format!("{} is not numeric: {}", field, raw))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::document::LAP_TEMPLATE;
    use serde_json::json;

    fn full_summary() -> WorkoutSummary {
        serde_json::from_value(json!({
            "max_speed": 25.0,
            "avg_speed": 18.0,
            "calories": 412.5,
            "max_heart_rate": 171,
            "avg_heart_rate": 144.6,
            "max_cadence": 110,
            "avg_cadence": 84.5,
            "max_resistance": 62,
            "avg_resistance": 41.257,
            "max_power": 402,
            "avg_power": 182.333,
            "total_work": 327000.0
        }))
        .unwrap()
    }

    fn samples_with_summaries(summaries: Vec<Value>) -> WorkoutSamples {
        WorkoutSamples {
            summaries,
            ..Default::default()
        }
    }

    fn summary_value(slug: &str, value: Value) -> Value {
        json!({"slug": slug, "value": value})
    }

    #[test]
    fn test_extract_distance_uses_index_one() {
        let samples = samples_with_summaries(vec![
            summary_value("total_output", json!(327)),
            summary_value("distance", json!(10.0)),
        ]);
        assert_eq!(extract_distance(&samples).unwrap(), "16093.4");
    }

    #[test]
    fn test_extract_distance_ignores_slug_at_index_one() {
        let samples = samples_with_summaries(vec![
            summary_value("distance", json!(99.0)),
            summary_value("calories", json!(1.0)),
        ]);
        assert_eq!(extract_distance(&samples).unwrap(), "1609.3");
    }

    #[test]
    fn test_extract_distance_too_few_summaries() {
        let samples = samples_with_summaries(vec![summary_value("distance", json!(10.0))]);
        assert!(matches!(
            extract_distance(&samples),
            Err(ExportError::DistanceExtractionFailed(_))
        ));
    }

    #[test]
    fn test_extract_distance_non_numeric() {
        let samples = samples_with_summaries(vec![
            summary_value("total_output", json!(327)),
            summary_value("distance", json!("ten")),
        ]);
        assert!(matches!(
            extract_distance(&samples),
            Err(ExportError::DistanceExtractionFailed(_))
        ));
    }

    #[test]
    fn test_extract_aggregates_formats_fields() {
        let aggregates = extract_aggregates(&full_summary()).unwrap();

        assert_eq!(aggregates.maximum_speed, "11.18");
        assert_eq!(aggregates.average_speed, "8.05");
        assert_eq!(aggregates.calories, "412");
        assert_eq!(aggregates.average_heart_rate, "145");
        assert_eq!(aggregates.maximum_heart_rate, "171");
        assert_eq!(aggregates.total_power, "327000.00");
        assert_eq!(aggregates.average_cadence, "84");
        assert_eq!(aggregates.maximum_cadence, "110");
        assert_eq!(aggregates.average_resistance, "41.26");
        assert_eq!(aggregates.maximum_resistance, "62.00");
        assert_eq!(aggregates.average_watts, "182.33");
        assert_eq!(aggregates.maximum_watts, "402.00");
    }

    #[test]
    fn test_extract_aggregates_missing_field_fails() {
        let summary = WorkoutSummary {
            avg_resistance: None,
            ..full_summary()
        };

        match extract_aggregates(&summary) {
            Err(ExportError::SummaryExtractionFailed(msg)) => {
                assert!(msg.contains("avg_resistance"))
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_extract_distance_null_entry() {
        let samples: WorkoutSamples =
            serde_json::from_value(json!({"summaries": [{"value": 1}, null]})).unwrap();
        assert!(matches!(
            extract_distance(&samples),
            Err(ExportError::DistanceExtractionFailed(_))
        ));
    }

    #[test]
    fn test_extract_distance_entry_without_value() {
        let samples =
            samples_with_summaries(vec![json!({"value": 205}), json!({"slug": "distance"})]);
        assert!(matches!(
            extract_distance(&samples),
            Err(ExportError::DistanceExtractionFailed(_))
        ));
    }

    #[test]
    fn test_extract_aggregates_non_numeric_field_fails() {
        let summary = WorkoutSummary {
            max_speed: Some(json!("fast")),
            ..full_summary()
        };

        match extract_aggregates(&summary) {
            Err(ExportError::SummaryExtractionFailed(msg)) => {
                assert!(msg.contains("max_speed"));
                assert!(msg.contains("not numeric"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_into_slots_lap_extension_order() {
        let summary = LapSummary {
            total_time_seconds: "1800".to_string(),
            distance_meters: "16093.4".to_string(),
            aggregates: extract_aggregates(&full_summary()).unwrap(),
        };
        let mut slots = Slots::new();
        summary.into_slots(&mut slots).unwrap();
        slots.set(Element::container("Track", vec![]));

        let lap = Element::from_template("Lap", LAP_TEMPLATE, slots).unwrap();
        let tpx = lap.child("Extensions").and_then(|e| e.child("TPX")).unwrap();
        let expected: Vec<_> = LAP_TPX_TEMPLATE.iter().map(|s| s.name).collect();
        assert_eq!(tpx.child_names(), expected);
        assert_eq!(
            tpx.child("MaximumSpeed").and_then(|e| e.text_content()),
            Some("11.18")
        );
    }
}
