//! Workout input records and their JSON loader.

pub mod loader;
pub mod types;

pub use loader::{load_samples, load_summary, load_workout, LoadError};
pub use types::{
    ClassInfo, ClassRide, Instructor, MetricSeries, RideInfo, SampleError, WorkoutRecord,
    WorkoutSamples, WorkoutSummary,
};
