//! # hexnav-window
//!
//! Fixed-size local windows around points of interest.
//!
//! Raster sources come with a physical cell size; analyses frequently need
//! the set of index cells approximating one raster cell as a square window.
//! This crate builds that set once, as translation-invariant IJ offsets
//! around a center cell, so the same template can be re-anchored at every
//! point of interest without re-running the geometry.
//!
//! ## Example
//!
//! ```
//! use hexnav_window::{SquareRef, WindowTemplate};
//! use hexnav_cell::cell_from_latlng;
//!
//! // A 1 km x 1 km window template centered on London.
//! let template = WindowTemplate::build(51.51, -0.13, 1000.0, SquareRef::Meters)?;
//!
//! // Re-anchor it on Paris without rebuilding.
//! let center = cell_from_latlng(48.85, 2.35, template.resolution()?)?;
//! let window = template.anchor(center)?;
//! assert_eq!(window.len(), template.len());
//! # Ok::<(), hexnav_window::WindowError>(())
//! ```

mod error;
mod sizing;
mod square;
mod template;

pub use error::WindowError;
pub use sizing::resolution_for_size;
pub use square::{square_bounds, SquareBounds, SquareRef, EARTH_RADIUS_M};
pub use template::{reference_templates, WindowTemplate, REFERENCE_SIZES_M};

/// Result type for window operations.
pub type Result<T> = std::result::Result<T, WindowError>;
