//! Output file naming and writing.

use super::types::ExportError;
use crate::workout::WorkoutRecord;
use std::path::{Path, PathBuf};

/// Filename for a workout export.
///
/// `{start}-{title}{ with First Last}-{id}.tcx`, with `/` and `:` in the title
/// replaced by `-`.
pub fn generate_tcx_filename(workout: &WorkoutRecord) -> String {
    let title = workout.title().replace(['/', ':'], "-");
    let instructor = workout
        .instructor()
        .map(|i| format!(" with {} {}", i.first_name, i.last_name))
        .unwrap_or_default();

    format!(
        "{}-{}{}-{}.tcx",
        workout.start_time, title, instructor, workout.id
    )
}

/// Output directory with every `"` removed.
pub fn clean_output_dir(output_dir: &str) -> PathBuf {
    PathBuf::from(output_dir.replace('"', ""))
}

/// Write a document into `output_dir` and return its path.
pub fn write_export(
    output_dir: &Path,
    filename: &str,
    content: &str,
) -> Result<PathBuf, ExportError> {
    let path = output_dir.join(filename);
    std::fs::write(&path, content)?;
    Ok(path)
}
