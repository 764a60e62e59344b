//! Reporting of export failures.
//!
//! The export pipeline never logs directly. Every failure, whether it aborts
//! the export or only drops one field from one track point, is handed to the
//! [`DiagnosticSink`] the caller passed in.

use super::metrics::MetricKind;
use std::fmt;

/// Pipeline step a diagnostic originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Input validation
    Validation,
    /// Total distance extraction
    Distance,
    /// Lap aggregate extraction
    Summary,
    /// Metric series lookup
    Metrics,
    /// One metric of one track point
    TrackPoint { index: usize, metric: MetricKind },
    /// Document serialization or file write
    Write,
}

impl Step {
    /// Whether a failure at this step aborts the export.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Step::TrackPoint { .. })
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Validation => write!(f, "validation"),
            Step::Distance => write!(f, "distance"),
            Step::Summary => write!(f, "summary"),
            Step::Metrics => write!(f, "metrics"),
            Step::TrackPoint { index, metric } => write!(f, "trackpoint {} {}", index, metric),
            Step::Write => write!(f, "write"),
        }
    }
}

/// A reported failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub step: Step,
    pub message: String,
}

impl Diagnostic {
    pub fn new(step: Step, message: impl Into<String>) -> Self {
        Self {
            step,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.step, self.message)
    }
}

/// Receiver for export diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Collects diagnostics in memory.
impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing`: fatal steps at error level, track point
/// omissions at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        if diagnostic.step.is_fatal() {
            tracing::error!(step = %diagnostic.step, "{}", diagnostic.message);
        } else {
            tracing::warn!(step = %diagnostic.step, "{}", diagnostic.message);
        }
    }
}
