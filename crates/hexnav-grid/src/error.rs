//! Error types for grid tables and the resolution-change engine.

use hexnav_cell::CellError;
use thiserror::Error;

/// Errors that can occur when building or transforming grid tables.
#[derive(Debug, Error)]
pub enum GridError {
    /// Requested target resolution falls outside the configured range.
    #[error("Target resolution {target} is outside the allowed range {lower}-{upper}")]
    ResolutionOutOfRange {
        /// The resolution the caller asked for.
        target: i32,
        /// Coarsest allowed resolution.
        lower: u8,
        /// Finest allowed resolution.
        upper: u8,
    },

    /// The table has no rows, so its resolution cannot be determined.
    #[error("Grid table is empty; current resolution cannot be determined")]
    EmptyTable,

    /// Identifier rows are not all at the same resolution.
    #[error("Mixed-resolution rows: expected resolution {expected}, found {found}")]
    MixedResolution {
        /// Resolution of the first row.
        expected: u8,
        /// Conflicting resolution encountered.
        found: u8,
    },

    /// A column's row count does not match the table's.
    #[error("Column '{column}' has {actual} rows, table has {expected}")]
    LengthMismatch {
        /// Offending column name.
        column: String,
        /// Row count of the table.
        expected: usize,
        /// Row count of the column.
        actual: usize,
    },

    /// A column with this name already exists.
    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    /// The name is reserved for the cell identifier column.
    #[error("Column name '{0}' is reserved for the cell identifier")]
    ReservedColumn(String),

    /// A column flagged additive by its name does not hold numbers.
    #[error("Additive column '{0}' is not numeric")]
    NonNumericAdditive(String),

    /// Failure in the underlying cell index primitive.
    #[error("Cell index error: {0}")]
    Cell(#[from] CellError),

    /// Failure reported by a query backend substrate.
    #[error("Query backend error: {0}")]
    Backend(String),
}
