//! Classification of telemetry series by slug.

use crate::workout::MetricSeries;
use std::fmt;

/// Telemetry series written to track points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    HeartRate,
    Cadence,
    Speed,
    Output,
    Resistance,
}

impl MetricKind {
    /// All recognized kinds.
    pub const ALL: [MetricKind; 5] = [
        MetricKind::HeartRate,
        MetricKind::Cadence,
        MetricKind::Speed,
        MetricKind::Output,
        MetricKind::Resistance,
    ];

    /// Slug identifying this kind in the samples record.
    pub fn slug(&self) -> &'static str {
        match self {
            MetricKind::HeartRate => "heart_rate",
            MetricKind::Cadence => "cadence",
            MetricKind::Speed => "speed",
            MetricKind::Output => "output",
            MetricKind::Resistance => "resistance",
        }
    }

    /// Look up a kind by slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// One optional slot per recognized metric.
///
/// Every slot starts empty; a scan fills the slot for each recognized slug,
/// later series replacing earlier ones with the same slug.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricTracks<'a> {
    pub heart_rate: Option<&'a MetricSeries>,
    pub cadence: Option<&'a MetricSeries>,
    pub speed: Option<&'a MetricSeries>,
    pub output: Option<&'a MetricSeries>,
    pub resistance: Option<&'a MetricSeries>,
}

impl<'a> MetricTracks<'a> {
    /// Classify a metric list in a single pass. Unrecognized slugs are ignored.
    pub fn extract(metrics: &'a [MetricSeries]) -> Self {
        let mut tracks = Self::default();
        for series in metrics {
            match MetricKind::from_slug(&series.slug) {
                Some(kind) => *tracks.slot_mut(kind) = Some(series),
                None => tracing::trace!("Ignoring metric {}", series.slug),
            }
        }
        tracks
    }

    /// Series for a kind, if one was found.
    pub fn get(&self, kind: MetricKind) -> Option<&'a MetricSeries> {
        match kind {
            MetricKind::HeartRate => self.heart_rate,
            MetricKind::Cadence => self.cadence,
            MetricKind::Speed => self.speed,
            MetricKind::Output => self.output,
            MetricKind::Resistance => self.resistance,
        }
    }

    /// Number of filled slots.
    pub fn len(&self) -> usize {
        MetricKind::ALL
            .iter()
            .filter(|kind| self.get(**kind).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slot_mut(&mut self, kind: MetricKind) -> &mut Option<&'a MetricSeries> {
        match kind {
            MetricKind::HeartRate => &mut self.heart_rate,
            MetricKind::Cadence => &mut self.cadence,
            MetricKind::Speed => &mut self.speed,
            MetricKind::Output => &mut self.output,
            MetricKind::Resistance => &mut self.resistance,
        }
    }
}
