//! Coordinate column detection by name.
//!
//! Staged point files name their coordinate columns inconsistently (`lon`,
//! `lng`, `x`, `easting`, ...). Detection is by case-insensitive name prefix;
//! more than one candidate per axis is a schema error the caller must resolve
//! by renaming, never a silent pick.

use crate::error::IngestError;

const LON_PREFIXES: [&str; 4] = ["lon", "lng", "x", "east"];
const LAT_PREFIXES: [&str; 4] = ["lat", "ltd", "y", "north"];

/// Names of the detected `(lon, lat)` columns.
pub fn detect_coordinates(names: &[String]) -> Result<(String, String), IngestError> {
    let lon = single_match(names, &LON_PREFIXES, "longitude")?;
    let lat = single_match(names, &LAT_PREFIXES, "latitude")?;
    Ok((lon, lat))
}

fn single_match(
    names: &[String],
    prefixes: &[&str],
    axis: &'static str,
) -> Result<String, IngestError> {
    let candidates: Vec<&String> = names
        .iter()
        .filter(|name| {
            let lower = name.to_ascii_lowercase();
            prefixes.iter().any(|prefix| lower.starts_with(prefix))
        })
        .collect();

    match candidates.as_slice() {
        [] => Err(IngestError::MissingCoordinates { axis }),
        [only] => Ok((*only).clone()),
        many => Err(IngestError::AmbiguousCoordinates {
            axis,
            candidates: many
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_common_names() {
        let (lon, lat) = detect_coordinates(&names(&["lon", "lat", "band_var"])).unwrap();
        assert_eq!(lon, "lon");
        assert_eq!(lat, "lat");

        let (lon, lat) = detect_coordinates(&names(&["Longitude", "Latitude", "v"])).unwrap();
        assert_eq!(lon, "Longitude");
        assert_eq!(lat, "Latitude");

        let (lon, lat) = detect_coordinates(&names(&["x", "y", "band_var"])).unwrap();
        assert_eq!(lon, "x");
        assert_eq!(lat, "y");
    }

    #[test]
    fn test_ambiguous_is_an_error() {
        let err = detect_coordinates(&names(&["lon", "lng", "lat"])).unwrap_err();
        assert!(matches!(
            err,
            IngestError::AmbiguousCoordinates {
                axis: "longitude",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_is_an_error() {
        let err = detect_coordinates(&names(&["lon", "band_var"])).unwrap_err();
        assert!(matches!(
            err,
            IngestError::MissingCoordinates { axis: "latitude" }
        ));
    }
}
