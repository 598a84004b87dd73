//! Physical size to indexing resolution selection.

use hexnav_cell::Resolution;

use crate::error::WindowError;

/// Average hexagon edge length in meters per resolution, 0 through 15.
///
/// Used to size the search disk when enumerating the cells covering a
/// window; the published averages are accurate enough for that purpose.
pub(crate) const AVG_EDGE_LENGTH_M: [f64; 16] = [
    1_107_712.591,
    418_676.005_5,
    158_244.655_8,
    59_810.857_94,
    22_606.379_4,
    8_544.408_276,
    3_229.482_772,
    1_220.629_759,
    461.354_684,
    174.375_668,
    65.907_807,
    24.910_561,
    9.415_526,
    3.559_893,
    1.348_575,
    0.509_713,
];

/// Reference raster cell sizes with pinned resolutions, meters.
const SIZE_LOOKUP: [(f64, u8); 5] = [
    (10.0, 14),
    (100.0, 12),
    (1_000.0, 11),
    (5_000.0, 10),
    (10_000.0, 8),
];

/// Resolution for a raster cell size, by lookup or logarithmic fit.
///
/// Known reference sizes use the pinned table; everything else falls back to
/// `round(A - alpha * ln(size))` where `alpha = 5 / ln(1000)` and
/// `A = 13 + alpha * ln(10)`, clamped to what the index encodes.
pub fn resolution_for_size(side_m: f64) -> Result<Resolution, WindowError> {
    if let Some(&(_, res)) = SIZE_LOOKUP.iter().find(|&&(size, _)| size == side_m) {
        return Ok(Resolution::try_from(res).map_err(hexnav_cell::CellError::from)?);
    }

    let alpha = 5.0 / 1_000f64.ln();
    let a = 13.0 + alpha * 10f64.ln();
    let fitted = (a - alpha * side_m.ln()).round();
    let clamped = fitted.clamp(0.0, 15.0) as u8;
    Ok(Resolution::try_from(clamped).map_err(hexnav_cell::CellError::from)?)
}

/// Grid-disk radius that covers a square of the given side at a resolution.
///
/// Adjacent cell centers are `sqrt(3)` edge lengths apart; the disk must
/// reach the square's corner, one ring of slack on top.
pub(crate) fn disk_radius(side_m: f64, res: Resolution) -> u32 {
    let edge_m = AVG_EDGE_LENGTH_M[usize::from(u8::from(res))];
    let corner_m = side_m / 2.0 * std::f64::consts::SQRT_2;
    let spacing_m = edge_m * 3f64.sqrt();
    (corner_m / spacing_m).ceil() as u32 + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_sizes() {
        assert_eq!(u8::from(resolution_for_size(10.0).unwrap()), 14);
        assert_eq!(u8::from(resolution_for_size(100.0).unwrap()), 12);
        assert_eq!(u8::from(resolution_for_size(1_000.0).unwrap()), 11);
        assert_eq!(u8::from(resolution_for_size(5_000.0).unwrap()), 10);
        assert_eq!(u8::from(resolution_for_size(10_000.0).unwrap()), 8);
    }

    #[test]
    fn test_logarithmic_fallback() {
        // A - alpha*ln(2000) = 13 - alpha*ln(200) ~ 9.16
        assert_eq!(u8::from(resolution_for_size(2_000.0).unwrap()), 9);
        // Tiny sizes clamp at the finest encodable resolution.
        assert_eq!(u8::from(resolution_for_size(0.01).unwrap()), 15);
        // Huge sizes clamp at zero.
        assert_eq!(u8::from(resolution_for_size(1e12).unwrap()), 0);
    }

    #[test]
    fn test_fallback_monotonically_coarsens() {
        let fine = resolution_for_size(50.0).unwrap();
        let coarse = resolution_for_size(50_000.0).unwrap();
        assert!(u8::from(fine) > u8::from(coarse));
    }

    #[test]
    fn test_disk_radius_covers_square() {
        let res = Resolution::try_from(11).unwrap();
        let k = disk_radius(1_000.0, res);
        // Corner at ~707 m, spacing ~43 m: radius must exceed 16 rings.
        assert!(k >= 17);
    }
}
