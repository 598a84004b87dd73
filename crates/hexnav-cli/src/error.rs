//! CLI error type.

use thiserror::Error;

/// Errors surfaced to the terminal.
#[derive(Debug, Error)]
pub enum CliError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Staging error.
    #[error(transparent)]
    Ingest(#[from] hexnav_ingest::IngestError),

    /// Grid or engine error.
    #[error(transparent)]
    Grid(#[from] hexnav_grid::GridError),

    /// Cell index error.
    #[error(transparent)]
    Cell(#[from] hexnav_cell::CellError),

    /// Window template error.
    #[error(transparent)]
    Window(#[from] hexnav_window::WindowError),

    /// Job file could not be parsed.
    #[error("Job file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Template output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Job description is invalid.
    #[error("Invalid job: {0}")]
    Job(String),
}
