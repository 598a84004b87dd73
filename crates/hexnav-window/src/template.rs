//! Reusable neighborhood templates.
//!
//! A template is the set of IJ offsets covering a square window around a
//! center cell. Offsets are translation-invariant, so a template computed
//! once can be re-anchored at any cell of the same resolution to produce the
//! corresponding window there.

use hexnav_cell::{
    cell_from_latlng, center_of, local_offset, offset_to_cell, resolution_of, CellIndex, IjOffset,
    Resolution,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::WindowError;
use crate::sizing::{disk_radius, resolution_for_size};
use crate::square::{square_bounds, SquareRef};

/// Reference raster cell sizes a template set is built for, meters.
pub const REFERENCE_SIZES_M: [f64; 5] = [10.0, 100.0, 1_000.0, 5_000.0, 10_000.0];

/// A square neighborhood expressed as offsets around an anchor cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowTemplate {
    /// Physical side length the template approximates, meters.
    pub side_m: f64,
    /// Indexing resolution the offsets are valid at.
    pub resolution: u8,
    /// Cell offsets relative to the anchor, the anchor itself included.
    pub offsets: Vec<IjOffset>,
}

impl WindowTemplate {
    /// Build a template for a square of `side_m` meters around a center.
    ///
    /// Enumerates the cells whose centers fall inside the square (the
    /// polyfill convention) at the resolution selected for the size, and
    /// stores them as offsets relative to the center cell.
    pub fn build(
        lat: f64,
        lon: f64,
        side_m: f64,
        reference: SquareRef,
    ) -> Result<Self, WindowError> {
        let bounds = square_bounds(lat, lon, side_m, reference);
        let resolution = resolution_for_size(side_m)?;
        let center = cell_from_latlng(lat, lon, resolution)?;

        let k = disk_radius(side_m, resolution);
        let mut offsets = Vec::new();
        for cell in center.grid_disk::<Vec<_>>(k) {
            let (cell_lat, cell_lon) = center_of(cell);
            if bounds.contains(cell_lat, cell_lon) {
                offsets.push(local_offset(center, cell)?);
            }
        }
        debug!(
            side_m,
            resolution = u8::from(resolution),
            cells = offsets.len(),
            "built window template"
        );

        Ok(Self {
            side_m,
            resolution: u8::from(resolution),
            offsets,
        })
    }

    /// Materialize the window around a new anchor cell.
    ///
    /// The anchor must be at the template's resolution.
    pub fn anchor(&self, center: CellIndex) -> Result<Vec<CellIndex>, WindowError> {
        let found = resolution_of(center);
        if found != self.resolution {
            return Err(WindowError::ResolutionMismatch {
                expected: self.resolution,
                found,
            });
        }
        self.offsets
            .iter()
            .map(|&offset| offset_to_cell(center, offset).map_err(WindowError::from))
            .collect()
    }

    /// Number of cells in the window.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Check if the window is empty.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Resolution as the index type.
    pub fn resolution(&self) -> Result<Resolution, WindowError> {
        Ok(Resolution::try_from(self.resolution).map_err(hexnav_cell::CellError::from)?)
    }
}

/// Templates for every reference size, plus an optional custom size.
///
/// Sizes are sorted ascending; a custom size deduplicates against the
/// reference list.
pub fn reference_templates(
    lat: f64,
    lon: f64,
    reference: SquareRef,
    custom_size_m: Option<f64>,
) -> Result<Vec<WindowTemplate>, WindowError> {
    let mut sizes: Vec<f64> = REFERENCE_SIZES_M.to_vec();
    if let Some(size) = custom_size_m {
        if size > 0.0 && !sizes.contains(&size) {
            sizes.push(size);
        }
    }
    sizes.sort_by(|a, b| a.total_cmp(b));

    sizes
        .into_iter()
        .map(|size| WindowTemplate::build(lat, lon, size, reference))
        .collect()
}
