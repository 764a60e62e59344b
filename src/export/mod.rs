//! TCX export of recorded workouts.
//!
//! The pipeline runs once per workout: validate the samples, build the lap
//! aggregates, build one track point per timeline tick, assemble the document
//! and write it. Failures before the write abort the export with no file on
//! disk; missing telemetry values only drop single track point fields.

pub mod diagnostics;
pub mod document;
pub mod format;
pub mod metrics;
pub mod output;
pub mod summary;
pub mod track;
pub mod types;

pub use diagnostics::{Diagnostic, DiagnosticSink, Step, TracingSink};
pub use metrics::{MetricKind, MetricTracks};
pub use output::generate_tcx_filename;
pub use types::ExportError;

use crate::workout::{WorkoutRecord, WorkoutSamples, WorkoutSummary};
use document::{tcx_document, write_document, Element, Slots, ACTIVITY_TEMPLATE, LAP_TEMPLATE};
use format::format_timestamp;
use std::path::PathBuf;
use summary::{extract_aggregates, extract_distance, LapSummary};
use track::{build_track_points, timeline_timestamps, track_element};

/// Output options for the serialized document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Spaces per nesting level, `0` for compact output
    pub indent: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Build the TCX document for a workout.
pub fn build_tcx(
    workout: &WorkoutRecord,
    summary: &WorkoutSummary,
    samples: Option<&WorkoutSamples>,
    options: &ExportOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<String, ExportError> {
    let samples = match samples {
        Some(samples) if samples.tick_count() > 0 => samples,
        _ => return Err(fatal(sink, Step::Validation, ExportError::NoSamples)),
    };
    let (start, times) =
        timeline(workout, samples).map_err(|e| fatal(sink, Step::Validation, e))?;

    let distance_meters =
        extract_distance(samples).map_err(|e| fatal(sink, Step::Distance, e))?;
    let aggregates = extract_aggregates(summary).map_err(|e| fatal(sink, Step::Summary, e))?;
    let lap_summary = LapSummary {
        total_time_seconds: workout.duration_seconds().to_string(),
        distance_meters,
        aggregates,
    };

    let metrics = samples
        .metrics
        .as_deref()
        .ok_or_else(|| fatal(sink, Step::Metrics, ExportError::NoMetrics))?;
    let tracks = MetricTracks::extract(metrics);
    tracing::debug!(
        "Found {} of {} metric series for workout {}",
        tracks.len(),
        metrics.len(),
        workout.id
    );

    let points = build_track_points(times, &tracks, sink);

    assemble(start, lap_summary, &points)
        .and_then(|activity| write_document(&tcx_document(activity), options.indent))
        .map_err(|e| fatal(sink, Step::Write, e))
}

/// Build the TCX document for a workout and write it into `output_dir`.
///
/// Returns the path of the written file.
pub fn export_workout(
    workout: &WorkoutRecord,
    summary: &WorkoutSummary,
    samples: Option<&WorkoutSamples>,
    output_dir: &str,
    options: &ExportOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<PathBuf, ExportError> {
    let content = build_tcx(workout, summary, samples, options, sink)?;

    let dir = output::clean_output_dir(output_dir);
    let filename = generate_tcx_filename(workout);
    let path = output::write_export(&dir, &filename, &content)
        .map_err(|e| fatal(sink, Step::Write, e))?;

    tracing::info!("Exported workout {} to {}", workout.id, path.display());
    Ok(path)
}

/// Start timestamp and per-tick timestamps, rejecting instants outside the date range.
fn timeline(
    workout: &WorkoutRecord,
    samples: &WorkoutSamples,
) -> Result<(String, Vec<String>), ExportError> {
    let start = format_timestamp(workout.start_time)?;
    let times = timeline_timestamps(workout.start_time, &samples.seconds_since_pedaling_start)?;
    Ok((start, times))
}

/// The `Activity` element holding one lap with its track.
fn assemble(
    start: String,
    lap_summary: LapSummary,
    points: &[track::TrackPoint],
) -> Result<Element, ExportError> {
    let mut lap = Slots::new();
    lap_summary.into_slots(&mut lap)?;
    lap.set(track_element(points)?);
    let lap =
        Element::from_template("Lap", LAP_TEMPLATE, lap)?.with_attribute("StartTime", &start);

    let mut activity = Slots::new();
    activity.set(Element::text("Id", start));
    activity.set(lap);
    Ok(Element::from_template("Activity", ACTIVITY_TEMPLATE, activity)?
        .with_attribute("Sport", "Biking"))
}

fn fatal(sink: &mut dyn DiagnosticSink, step: Step, error: ExportError) -> ExportError {
    sink.report(Diagnostic::new(step, error.to_string()));
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn lap_summary() -> LapSummary {
        let summary: WorkoutSummary = serde_json::from_value(json!({
            "max_speed": 20.0, "avg_speed": 15.0, "calories": 250,
            "max_heart_rate": 160, "avg_heart_rate": 130,
            "max_cadence": 100, "avg_cadence": 80,
            "max_resistance": 50, "avg_resistance": 40,
            "max_power": 300, "avg_power": 150, "total_work": 180000
        }))
        .unwrap();
        LapSummary {
            total_time_seconds: "1200".to_string(),
            distance_meters: "8046.7".to_string(),
            aggregates: extract_aggregates(&summary).unwrap(),
        }
    }

    #[test]
    fn test_assemble_sets_activity_attributes() {
        let start = format_timestamp(1_600_000_000).unwrap();
        let activity = assemble(start.clone(), lap_summary(), &[]).unwrap();

        assert_eq!(activity.attribute("Sport"), Some("Biking"));
        assert_eq!(activity.child("Id").and_then(|id| id.text_content()), Some(start.as_str()));

        let lap = activity.child("Lap").unwrap();
        assert_eq!(lap.attribute("StartTime"), Some("2020-09-13T12:26:40.0000Z"));
        assert_eq!(lap.attribute("Sport"), None);
    }

    #[test]
    fn test_document_root_declares_namespaces() {
        let activity = assemble("t".to_string(), lap_summary(), &[]).unwrap();
        let root = tcx_document(activity);

        assert_eq!(root.attribute("xmlns"), Some(document::NS_TCX));
        assert_eq!(root.attribute("xmlns:ns3"), Some(document::NS_ACTIVITY_EXTENSION));
        assert_eq!(root.attribute("xsi:schemaLocation"), Some(document::SCHEMA_LOCATION));
    }
}
