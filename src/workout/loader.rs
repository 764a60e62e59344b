//! Loading workout records from JSON files.

use super::types::{WorkoutRecord, WorkoutSamples, WorkoutSummary};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors while loading workout inputs.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Load a workout record.
pub fn load_workout(path: &Path) -> Result<WorkoutRecord, LoadError> {
    load_json(path)
}

/// Load a workout summary.
pub fn load_summary(path: &Path) -> Result<WorkoutSummary, LoadError> {
    load_json(path)
}

/// Load workout samples. A file containing JSON `null` yields `None`.
pub fn load_samples(path: &Path) -> Result<Option<WorkoutSamples>, LoadError> {
    load_json(path)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let value = serde_json::from_str(&content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Loaded {}", path.display());
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_samples_null_is_none() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "null").unwrap();

        let samples = load_samples(file.path()).unwrap();
        assert!(samples.is_none());
    }

    #[test]
    fn test_load_summary_parses_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"max_speed": 22.5, "calories": 410.4}}"#).unwrap();

        let summary = load_summary(file.path()).unwrap();
        assert_eq!(summary.max_speed, Some(serde_json::json!(22.5)));
        assert_eq!(summary.calories, Some(serde_json::json!(410.4)));
        assert!(summary.avg_power.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let result = load_workout(Path::new("/nonexistent/workout.json"));
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let result = load_workout(file.path());
        assert!(matches!(result, Err(LoadError::Parse { .. })));
    }
}
