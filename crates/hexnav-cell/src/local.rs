//! Local IJ offsets relative to an anchor cell.
//!
//! The index assigns every cell near an anchor a pair of axial coordinates.
//! Differences of those coordinates are translation-invariant, which is what
//! makes precomputed neighborhood templates re-anchorable at any center cell.

use h3o::{CellIndex, CoordIJ, LocalIJ};

use crate::Result;

/// A relative `(i, j)` offset between two cells in an anchor's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IjOffset {
    /// Offset along the local i axis.
    pub i: i32,
    /// Offset along the local j axis.
    pub j: i32,
}

impl IjOffset {
    /// Create an offset.
    pub fn new(i: i32, j: i32) -> Self {
        Self { i, j }
    }
}

/// Offset of `cell` relative to `origin`, in `origin`'s local frame.
pub fn local_offset(origin: CellIndex, cell: CellIndex) -> Result<IjOffset> {
    let origin_ij = origin.to_local_ij(origin)?;
    let cell_ij = cell.to_local_ij(origin)?;
    Ok(IjOffset {
        i: cell_ij.coord.i - origin_ij.coord.i,
        j: cell_ij.coord.j - origin_ij.coord.j,
    })
}

/// Cell at the given offset from `origin`, in `origin`'s local frame.
pub fn offset_to_cell(origin: CellIndex, offset: IjOffset) -> Result<CellIndex> {
    let origin_ij = origin.to_local_ij(origin)?;
    let coord = CoordIJ::new(
        origin_ij.coord.i + offset.i,
        origin_ij.coord.j + offset.j,
    );
    let cell = CellIndex::try_from(LocalIJ::new(origin, coord))?;
    Ok(cell)
}
