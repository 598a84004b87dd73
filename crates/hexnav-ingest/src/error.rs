//! Error types for the staging seam.

use hexnav_cell::CellError;
use hexnav_grid::GridError;
use thiserror::Error;

/// Errors that can occur while staging points or grid tables.
#[derive(Debug, Error)]
pub enum IngestError {
    /// I/O error reading or writing a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Columnar file format error.
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// A staged grid file without the cell identifier column.
    #[error("Staged grid file has no '{0}' column")]
    MissingIdColumn(&'static str),

    /// No column name matched the expected coordinate prefixes.
    #[error("No {axis} coordinate column recognized")]
    MissingCoordinates {
        /// Which axis could not be resolved.
        axis: &'static str,
    },

    /// More than one column name matched a coordinate axis.
    #[error("Ambiguous {axis} coordinate columns: {candidates}")]
    AmbiguousCoordinates {
        /// Which axis was ambiguous.
        axis: &'static str,
        /// The competing column names.
        candidates: String,
    },

    /// No numeric band column next to the coordinates.
    #[error("No band value column found in the staged points file")]
    MissingBand,

    /// A column holds values the staging schema cannot represent.
    #[error("Column '{column}' has an unsupported value: {found}")]
    UnsupportedColumn {
        /// Offending column name.
        column: String,
        /// Description of the offending value.
        found: String,
    },

    /// Failure decoding a cell identifier.
    #[error("Cell index error: {0}")]
    Cell(#[from] CellError),

    /// Failure assembling the grid table.
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),
}
