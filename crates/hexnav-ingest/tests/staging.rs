//! Round-trip tests for the Parquet staging seam.

use approx::assert_relative_eq;
use hexnav_cell::{cell_from_latlng, Resolution};
use hexnav_grid::{
    project_points, Column, GridFrame, MemoryEngine, SamplePoint, ScaleEngine, BAND_COLUMN,
    CHILD_CELLS_COLUMN,
};
use hexnav_ingest::{
    read_frame, read_points, write_frame, write_points, IngestError, NodataFilter,
};

fn sample_points() -> Vec<SamplePoint> {
    vec![
        SamplePoint::new(-0.13, 51.51, 12.5),
        SamplePoint::new(2.35, 48.85, 7.25),
        SamplePoint::new(13.4, 52.52, 0.0),
        SamplePoint::new(-74.0, 40.7, -9999.0),
    ]
}

#[test]
fn points_round_trip_with_filter() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.parquet");
    write_points(&path, &sample_points(), BAND_COLUMN).unwrap();

    let filter = NodataFilter {
        sentinel: Some(-9999.0),
        drop_nonpositive: true,
    };
    let staged = read_points(&path, &filter).unwrap();

    assert_eq!(staged.value_column, BAND_COLUMN);
    assert_eq!(staged.points.len(), 2);
    assert_eq!(staged.dropped, 2);
    assert_relative_eq!(staged.points[0].value, 12.5);
    assert_relative_eq!(staged.points[0].lon, -0.13);
    assert_relative_eq!(staged.points[0].lat, 51.51);
}

#[test]
fn points_read_without_filter_keeps_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.parquet");
    write_points(&path, &sample_points(), "density_var").unwrap();

    let staged = read_points(&path, &NodataFilter::default()).unwrap();
    assert_eq!(staged.value_column, "density_var");
    assert_eq!(staged.points.len(), 4);
    assert_eq!(staged.dropped, 0);
}

#[test]
fn grid_frame_round_trip() {
    let res = Resolution::try_from(9).unwrap();
    let ids = vec![
        cell_from_latlng(51.5, -0.1, res).unwrap(),
        cell_from_latlng(48.85, 2.35, res).unwrap(),
    ];
    let child_lists = vec![
        vec![cell_from_latlng(51.5, -0.1, Resolution::Ten).unwrap()],
        Vec::new(),
    ];
    let frame = GridFrame::new(ids)
        .with_column(BAND_COLUMN, Column::Float(vec![3.5, 4.5]))
        .unwrap()
        .with_column("zone", Column::Text(vec!["west".into(), "east".into()]))
        .unwrap()
        .with_column(CHILD_CELLS_COLUMN, Column::Cells(child_lists))
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("grid.parquet");
    write_frame(&path, &frame).unwrap();
    let loaded = read_frame(&path).unwrap();

    assert_eq!(loaded.sorted_by_id(), frame.sorted_by_id());
}

#[test]
fn transformed_grid_survives_staging() {
    let points = vec![
        SamplePoint::new(-0.13, 51.51, 14.0),
        SamplePoint::new(-0.14, 51.52, 7.0),
    ];
    let grid = project_points(&points, Resolution::Nine, BAND_COLUMN).unwrap();
    let coarse = MemoryEngine::new().change_resolution(&grid, -1).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("coarse.parquet");
    write_frame(&path, &coarse).unwrap();
    let loaded = read_frame(&path).unwrap();

    assert_eq!(loaded.sorted_by_id(), coarse.sorted_by_id());
}

#[test]
fn points_file_is_not_a_grid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("points.parquet");
    write_points(&path, &sample_points(), BAND_COLUMN).unwrap();

    let err = read_frame(&path).unwrap_err();
    assert!(matches!(err, IngestError::MissingIdColumn("h3_id")));
}
