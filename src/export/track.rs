//! Track point construction.
//!
//! One track point is produced per timeline tick. Each metric lookup is its
//! own fallible step: a missing or non-numeric value is reported and the
//! field is left out of that point, nothing else is affected.

use super::diagnostics::{Diagnostic, DiagnosticSink, Step};
use super::document::{Element, Slots, TRACKPOINT_TEMPLATE, TRACKPOINT_TPX_TEMPLATE};
use super::format::{
    format_cadence, format_decimal, format_heart_rate, format_timestamp, format_whole,
    mph_to_meters_per_second,
};
use super::metrics::{MetricKind, MetricTracks};
use super::types::ExportError;

/// Formatted values of one track point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackPoint {
    pub time: String,
    pub heart_rate: Option<String>,
    pub cadence: Option<String>,
    /// Running sum of per-point speeds in m/s
    pub distance_meters: Option<String>,
    pub speed: Option<String>,
    pub watts: Option<String>,
    pub resistance: Option<String>,
}

impl TrackPoint {
    pub fn new(time: String) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }

    /// Build the `Trackpoint` element.
    pub fn to_element(&self) -> Result<Element, ExportError> {
        let mut tpx = Slots::new();
        tpx.set_opt(self.speed.clone().map(|v| Element::text("Speed", v)));
        tpx.set_opt(self.watts.clone().map(|v| Element::text("Watts", v)));
        tpx.set_opt(self.resistance.clone().map(|v| Element::text("Resistance", v)));
        let tpx = Element::from_template("TPX", TRACKPOINT_TPX_TEMPLATE, tpx)?;

        let mut slots = Slots::new();
        slots.set(Element::text("Time", self.time.clone()));
        slots.set_opt(self.heart_rate.clone().map(|v| Element::value("HeartRateBpm", v)));
        slots.set_opt(self.cadence.clone().map(|v| Element::text("Cadence", v)));
        slots.set_opt(
            self.distance_meters
                .clone()
                .map(|v| Element::text("DistanceMeters", v)),
        );
        slots.set(Element::container("Extensions", vec![tpx]));
        Element::from_template("Trackpoint", TRACKPOINT_TEMPLATE, slots)
    }
}

/// Timestamp text for every offset on the timeline.
///
/// Fails on the first tick that falls outside the representable date range.
pub fn timeline_timestamps(
    start_time: i64,
    offsets: &[i64],
) -> Result<Vec<String>, ExportError> {
    offsets
        .iter()
        .map(|offset| format_timestamp(start_time.saturating_add(*offset)))
        .collect()
}

/// Build one track point per timeline timestamp.
///
/// Distance accumulates the rounded m/s speed of each point in order, which
/// is only a distance when ticks are one second apart.
pub fn build_track_points(
    times: Vec<String>,
    tracks: &MetricTracks<'_>,
    sink: &mut dyn DiagnosticSink,
) -> Vec<TrackPoint> {
    let mut total_distance = 0.0;
    let mut points = Vec::with_capacity(times.len());

    for (index, time) in times.into_iter().enumerate() {
        let mut point = TrackPoint::new(time);

        point.heart_rate =
            lookup(tracks, MetricKind::HeartRate, index, sink).map(format_heart_rate);
        point.cadence = lookup(tracks, MetricKind::Cadence, index, sink).map(format_cadence);

        if let Some(mph) = lookup(tracks, MetricKind::Speed, index, sink) {
            let meters_per_second = mph_to_meters_per_second(mph);
            total_distance += meters_per_second;
            point.speed = Some(format_decimal(meters_per_second));
            point.distance_meters = Some(format_decimal(total_distance));
        }

        point.watts = lookup(tracks, MetricKind::Output, index, sink).map(format_whole);
        point.resistance = lookup(tracks, MetricKind::Resistance, index, sink).map(format_whole);

        points.push(point);
    }

    tracing::debug!("Built {} track points", points.len());
    points
}

/// Build the `Track` element.
pub fn track_element(points: &[TrackPoint]) -> Result<Element, ExportError> {
    let children = points
        .iter()
        .map(TrackPoint::to_element)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Element::container("Track", children))
}

fn lookup(
    tracks: &MetricTracks<'_>,
    kind: MetricKind,
    index: usize,
    sink: &mut dyn DiagnosticSink,
) -> Option<f64> {
    let series = tracks.get(kind)?;
    match series.value_at(index) {
        Ok(value) => Some(value),
        Err(e) => {
            sink.report(Diagnostic::new(
                Step::TrackPoint {
                    index,
                    metric: kind,
                },
                e.to_string(),
            ));
            None
        }
    }
}
