use std::path::PathBuf;

use thiserror::Error;

/// Per-file failure taxonomy. Every variant is recovered by appending a
/// line to the run log and moving on to the next step or file; none of
/// these abort the batch.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("File is not a CSV: {}", .0.display())]
    NotCsv(PathBuf),

    #[error("Failed to parse CSV: {0}")]
    Load(String),

    #[error("Invalid filter expression: {0}")]
    Filter(String),

    #[error("Failed to render chart: {0}")]
    Plot(String),
}
