//! # hexnav-ingest
//!
//! Parquet staging for point records and grid tables.
//!
//! Raster conversion happens upstream and out of process; what arrives here
//! is a columnar file of `(lon, lat, band value)` records. This crate reads
//! those files (detecting coordinate columns by name and filtering no-data
//! rows) and round-trips grid tables to Parquet so pipelines can stage
//! intermediate results between resolution changes.
//!
//! ## Example
//!
//! ```no_run
//! use hexnav_ingest::{read_points, NodataFilter};
//! use hexnav_grid::{project_points, BAND_COLUMN};
//! use hexnav_cell::Resolution;
//!
//! let filter = NodataFilter { sentinel: Some(-9999.0), drop_nonpositive: true };
//! let staged = read_points("population.parquet", &filter)?;
//! let grid = project_points(&staged.points, Resolution::Eight, &staged.value_column)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod codec;
mod detect;
mod error;
mod grid_io;
mod points;

pub use detect::detect_coordinates;
pub use error::IngestError;
pub use grid_io::{read_frame, write_frame};
pub use points::{read_points, write_points, NodataFilter, StagedPoints, LAT_COLUMN, LON_COLUMN};

/// Result type for staging operations.
pub type Result<T> = std::result::Result<T, IngestError>;
