//! # hexnav-duckdb
//!
//! DuckDB-backed substrate for the resolution-change contract.
//!
//! [`DuckdbEngine`] implements the same `ScaleEngine` trait as the in-memory
//! engine, pushing each level to the query backend as one declarative
//! statement. The contract is substrate-agnostic: given the same input and
//! level count, both engines produce the same identifiers exactly and the
//! same additive values up to floating-point summation order; row order is
//! unspecified on both sides.
//!
//! ## Example
//!
//! ```no_run
//! use hexnav_duckdb::DuckdbEngine;
//! use hexnav_grid::{project_points, SamplePoint, ScaleEngine, BAND_COLUMN};
//! use hexnav_cell::Resolution;
//!
//! let points = vec![SamplePoint::new(-0.13, 51.51, 21.0)];
//! let grid = project_points(&points, Resolution::Nine, BAND_COLUMN)?;
//!
//! let engine = DuckdbEngine::new()?;
//! let finer = engine.change_resolution(&grid, 1)?;
//! assert_eq!(finer.len(), 7);
//! # Ok::<(), hexnav_grid::GridError>(())
//! ```

mod engine;

pub use engine::DuckdbEngine;
