//! Error types for the cell index wrapper.

use thiserror::Error;

/// Errors that can occur when working with the cell index primitive.
#[derive(Debug, Error)]
pub enum CellError {
    /// Latitude/longitude pair rejected by the index (non-finite values).
    #[error("Invalid coordinate: {0}")]
    InvalidLatLng(#[from] h3o::error::InvalidLatLng),

    /// Resolution value outside what the index encodes (0-15).
    #[error("Invalid resolution: {0}")]
    InvalidResolution(#[from] h3o::error::InvalidResolution),

    /// A 64-bit token that does not decode to a cell.
    #[error("Invalid cell index: {0}")]
    InvalidIndex(#[from] h3o::error::InvalidCellIndex),

    /// Local IJ coordinates undefined for this origin/cell pair
    /// (too far apart or crossing a pentagon distortion).
    #[error("Local IJ coordinates unavailable: {0}")]
    LocalIj(#[from] h3o::error::LocalIjError),
}
