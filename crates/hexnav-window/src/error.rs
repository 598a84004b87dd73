//! Error types for neighborhood templates.

use hexnav_cell::CellError;
use thiserror::Error;

/// Errors that can occur when building or anchoring a window template.
#[derive(Debug, Error)]
pub enum WindowError {
    /// The reference mode string is not one of the recognized values.
    #[error("Unknown reference mode '{0}' (expected 'm' or 'arc')")]
    UnknownReference(String),

    /// The anchor cell's resolution does not match the template's.
    #[error("Template built at resolution {expected}, anchor cell is at {found}")]
    ResolutionMismatch {
        /// Resolution the template was built for.
        expected: u8,
        /// Resolution of the offered anchor cell.
        found: u8,
    },

    /// Failure in the underlying cell index primitive.
    #[error("Cell index error: {0}")]
    Cell(#[from] CellError),
}
