//! # hexnav-grid
//!
//! Grid tables on the hexagonal index and the resolution-change engine.
//!
//! A [`GridFrame`] is a columnar table with one row per cell occurrence:
//! the `h3_id` identifier column plus named columns. Columns whose name ends
//! in `_var` are additive variables - conserved quantities whose total over a
//! region is resolution-invariant. Everything else is contextual and is
//! broadcast on refinement, first-value-reduced on aggregation.
//!
//! The [`ScaleEngine`] trait is the resolution-change contract; this crate
//! ships the in-memory [`MemoryEngine`], and the query-backend substrate
//! implements the same trait elsewhere. Both compose stepwise: one level per
//! pass, additive columns divided by the child count on each refinement and
//! summed on each aggregation.
//!
//! ## Example
//!
//! ```
//! use hexnav_grid::{project_points, MemoryEngine, SamplePoint, ScaleEngine, BAND_COLUMN};
//! use hexnav_cell::Resolution;
//!
//! let points = vec![
//!     SamplePoint::new(-122.33, 47.61, 14.0),
//!     SamplePoint::new(-122.34, 47.62, 7.0),
//! ];
//! let grid = project_points(&points, Resolution::Ten, BAND_COLUMN)?;
//!
//! let engine = MemoryEngine::new();
//! let finer = engine.change_resolution(&grid, 1)?;
//! assert_eq!(finer.len(), 14);
//! # Ok::<(), hexnav_grid::GridError>(())
//! ```

mod bootstrap;
mod classify;
mod engine;
mod error;
mod frame;
mod geom;

pub use bootstrap::{project_points, SamplePoint, BAND_COLUMN};
pub use classify::{classify_columns, ColumnRoles, ADDITIVE_SUFFIX};
pub use engine::{MemoryEngine, ScaleEngine};
pub use error::GridError;
pub use frame::{Column, GridFrame, CHILD_CELLS_COLUMN, GEOM_COLUMN, ID_COLUMN};
pub use geom::{annotate_geometry, cell_polygon};

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
