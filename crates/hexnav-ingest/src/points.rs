//! Staged point records: the seam between raster conversion and the grid.
//!
//! A staged points file is a columnar table of `(lon, lat, band value)` rows.
//! Reading detects the coordinate columns by name, picks the band column, and
//! applies a no-data filter, yielding the records the bootstrap projects onto
//! the grid.

use std::path::Path;

use hexnav_grid::{SamplePoint, BAND_COLUMN};
use parquet::file::reader::{FileReader, SerializedFileReader};
use tracing::{debug, info};

use crate::codec::{double_field, numeric_field, write_table, StagedColumn};
use crate::detect::detect_coordinates;
use crate::error::IngestError;
use crate::Result;

/// Canonical longitude column name written by the staging writer.
pub const LON_COLUMN: &str = "lon";

/// Canonical latitude column name written by the staging writer.
pub const LAT_COLUMN: &str = "lat";

/// No-data filtering policy applied while reading staged points.
///
/// Mirrors the conversion-side convention: a sentinel marks missing samples,
/// and sources whose zero/negative values are padding can drop those too.
/// Non-finite values are always dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NodataFilter {
    /// Sentinel value marking missing data.
    pub sentinel: Option<f64>,
    /// Drop values `<= 0` (padding in count-like rasters).
    pub drop_nonpositive: bool,
}

impl NodataFilter {
    /// Check whether a band value survives the filter.
    pub fn keeps(&self, value: f64) -> bool {
        if !value.is_finite() {
            return false;
        }
        if self.sentinel.is_some_and(|s| value == s) {
            return false;
        }
        if self.drop_nonpositive && value <= 0.0 {
            return false;
        }
        true
    }
}

/// Points read from a staged file.
#[derive(Debug, Clone)]
pub struct StagedPoints {
    /// Surviving point records.
    pub points: Vec<SamplePoint>,
    /// Name of the band column the values came from.
    pub value_column: String,
    /// Records removed by the no-data filter.
    pub dropped: usize,
}

/// Write point records as a staged Parquet file (`lon`, `lat`, band column).
pub fn write_points(
    path: impl AsRef<Path>,
    points: &[SamplePoint],
    value_column: &str,
) -> Result<()> {
    let fields = vec![
        double_field(LON_COLUMN)?,
        double_field(LAT_COLUMN)?,
        double_field(value_column)?,
    ];
    let columns = vec![
        StagedColumn::Doubles(points.iter().map(|p| p.lon).collect()),
        StagedColumn::Doubles(points.iter().map(|p| p.lat).collect()),
        StagedColumn::Doubles(points.iter().map(|p| p.value).collect()),
    ];
    write_table(path.as_ref(), fields, columns)?;
    debug!(rows = points.len(), path = %path.as_ref().display(), "staged point records");
    Ok(())
}

/// Read a staged points file, detecting columns and filtering no-data rows.
pub fn read_points(path: impl AsRef<Path>, filter: &NodataFilter) -> Result<StagedPoints> {
    let file = std::fs::File::open(path.as_ref())?;
    let reader = SerializedFileReader::new(file)?;

    let names: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.name().to_string())
        .collect();

    let (lon_column, lat_column) = detect_coordinates(&names)?;
    let value_column = names
        .iter()
        .find(|name| name.as_str() == BAND_COLUMN)
        .or_else(|| {
            names
                .iter()
                .find(|name| **name != lon_column && **name != lat_column)
        })
        .cloned()
        .ok_or(IngestError::MissingBand)?;
    debug!(
        lon = %lon_column,
        lat = %lat_column,
        band = %value_column,
        "detected staged point columns"
    );

    let mut points = Vec::new();
    let mut dropped = 0usize;
    for row in reader.get_row_iter(None)? {
        let row = row?;
        let mut lon = None;
        let mut lat = None;
        let mut value = None;
        for (name, field) in row.get_column_iter() {
            if *name == lon_column {
                lon = numeric_field(field);
            } else if *name == lat_column {
                lat = numeric_field(field);
            } else if *name == value_column {
                value = numeric_field(field);
            }
        }
        let (Some(lon), Some(lat), Some(value)) = (lon, lat, value) else {
            return Err(IngestError::UnsupportedColumn {
                column: value_column.clone(),
                found: "non-numeric row value".to_string(),
            });
        };
        if filter.keeps(value) {
            points.push(SamplePoint::new(lon, lat, value));
        } else {
            dropped += 1;
        }
    }

    info!(
        kept = points.len(),
        dropped,
        path = %path.as_ref().display(),
        "read staged point records"
    );
    Ok(StagedPoints {
        points,
        value_column,
        dropped,
    })
}
