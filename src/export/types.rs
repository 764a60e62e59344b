//! Export error kinds.

use thiserror::Error;

/// Errors that abort a TCX export. No file is written when one is returned.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Samples record missing or its timeline is empty
    #[error("No workout sample data")]
    NoSamples,

    /// Samples record has no metrics list
    #[error("No workout metrics data")]
    NoMetrics,

    /// Start time or a sample tick falls outside the representable date range
    #[error("Timestamp out of range: {0}")]
    TimestampOutOfRange(i64),

    /// Total distance could not be read from the samples summaries
    #[error("Failed to parse distance: {0}")]
    DistanceExtractionFailed(String),

    /// A lap aggregate could not be read from the workout summary
    #[error("Failed to parse speed/calories/heart rate: {0}")]
    SummaryExtractionFailed(String),

    /// A required element was not supplied to a document template
    #[error("Missing required element: {0}")]
    MissingElement(&'static str),

    /// XML generation error
    #[error("XML error: {0}")]
    XmlError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<quick_xml::Error> for ExportError {
    fn from(e: quick_xml::Error) -> Self {
        ExportError::XmlError(e.to_string())
    }
}
