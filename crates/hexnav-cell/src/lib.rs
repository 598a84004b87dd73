//! # hexnav-cell
//!
//! Thin wrapper over the H3 hierarchical cell index.
//!
//! The grid engines treat cells as opaque identifiers with four primitives:
//! resolution lookup, parent, children, and point-to-cell projection. This
//! crate pins those primitives to `h3o` and carries the shared resolution
//! range configuration, so the engine crates never touch the index library
//! directly.
//!
//! ## Example
//!
//! ```
//! use hexnav_cell::{cell_from_latlng, children_of, parent_of, resolution_of};
//! use hexnav_cell::Resolution;
//!
//! let cell = cell_from_latlng(47.6062, -122.3321, Resolution::Ten)?;
//! assert_eq!(resolution_of(cell), 10);
//!
//! let children = children_of(cell);
//! assert_eq!(children.len(), 7);
//! assert_eq!(parent_of(children[0]), Some(cell));
//! # Ok::<(), hexnav_cell::CellError>(())
//! ```

mod bounds;
mod error;
mod index;
mod local;

pub use bounds::{ResolutionBounds, CHILD_NUM};
pub use error::CellError;
pub use index::{boundary_of, cell_from_latlng, center_of, children_of, parent_of, resolution_of};
pub use local::{local_offset, offset_to_cell, IjOffset};

// Re-exported so downstream crates share one index vocabulary.
pub use h3o::{CellIndex, LatLng, Resolution};

/// Result type for cell index operations.
pub type Result<T> = std::result::Result<T, CellError>;
