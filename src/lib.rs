//! RideTcx - Indoor cycling workout to TCX converter
//!
//! Converts a recorded class workout (workout record, ride summary and
//! per-second performance samples) into a Training Center XML activity file
//! that fitness platforms can import.

pub mod config;
pub mod export;
pub mod workout;

// Re-export commonly used types
pub use config::ExportConfig;
pub use export::{build_tcx, export_workout, DiagnosticSink, ExportError, ExportOptions};
pub use workout::{WorkoutRecord, WorkoutSamples, WorkoutSummary};
