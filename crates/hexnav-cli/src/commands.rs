//! Subcommand implementations.

use std::path::Path;

use hexnav_cell::{CellError, Resolution};
use hexnav_duckdb::DuckdbEngine;
use hexnav_grid::{annotate_geometry, project_points, MemoryEngine, ScaleEngine};
use hexnav_ingest::{read_frame, read_points, write_frame, NodataFilter};
use hexnav_window::{reference_templates, SquareRef, WindowTemplate};
use tracing::info;

use crate::cli::EngineChoice;
use crate::error::CliError;
use crate::job::{Job, Step};

fn engine_for(choice: EngineChoice) -> Result<Box<dyn ScaleEngine>, CliError> {
    Ok(match choice {
        EngineChoice::Memory => Box::new(MemoryEngine::new()),
        EngineChoice::Duckdb => Box::new(DuckdbEngine::new()?),
    })
}

fn resolution_from(value: u8) -> Result<Resolution, CliError> {
    Ok(Resolution::try_from(value).map_err(CellError::from)?)
}

/// `hexnav project`
pub fn project(
    input: &Path,
    output: &Path,
    resolution: u8,
    nodata: Option<f64>,
    drop_nonpositive: bool,
) -> Result<(), CliError> {
    let filter = NodataFilter {
        sentinel: nodata,
        drop_nonpositive,
    };
    let staged = read_points(input, &filter)?;
    let res = resolution_from(resolution)?;
    let grid = project_points(&staged.points, res, &staged.value_column)?;
    write_frame(output, &grid)?;
    info!(rows = grid.len(), output = %output.display(), "projected grid written");
    Ok(())
}

/// `hexnav rescale`
pub fn rescale(
    input: &Path,
    output: &Path,
    levels: Option<i32>,
    to_res: Option<u8>,
    choice: EngineChoice,
) -> Result<(), CliError> {
    let frame = read_frame(input)?;
    let engine = engine_for(choice)?;
    let result = match (levels, to_res) {
        (Some(levels), None) => engine.change_resolution(&frame, levels)?,
        (None, Some(target)) => engine.set_resolution(&frame, target)?,
        _ => {
            return Err(CliError::Job(
                "exactly one of --levels or --to-res is required".to_string(),
            ))
        }
    };
    write_frame(output, &result)?;
    info!(rows = result.len(), output = %output.display(), "rescaled grid written");
    Ok(())
}

/// `hexnav geometry`
pub fn geometry(input: &Path, output: &Path) -> Result<(), CliError> {
    let frame = read_frame(input)?;
    let annotated = annotate_geometry(&frame)?;
    write_frame(output, &annotated)?;
    info!(rows = annotated.len(), output = %output.display(), "annotated grid written");
    Ok(())
}

/// `hexnav window`
pub fn window(
    lat: f64,
    lon: f64,
    size: f64,
    reference: &str,
    all: bool,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let reference: SquareRef = reference.parse()?;
    let json = if all {
        let templates = reference_templates(lat, lon, reference, Some(size))?;
        serde_json::to_string_pretty(&templates)?
    } else {
        let template = WindowTemplate::build(lat, lon, size, reference)?;
        serde_json::to_string_pretty(&template)?
    };
    match output {
        Some(path) => std::fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

/// `hexnav run`
pub fn run_job(path: &Path) -> Result<(), CliError> {
    let job = Job::load(path)?;
    let engine = engine_for(job.engine)?;

    let mut steps = job.steps.iter();
    let mut frame = match job.steps.first() {
        Some(Step::Project {
            resolution,
            value_column,
        }) => {
            steps.next();
            let staged = read_points(&job.input, &job.nodata.filter())?;
            let column = value_column
                .clone()
                .unwrap_or_else(|| staged.value_column.clone());
            project_points(&staged.points, resolution_from(*resolution)?, &column)?
        }
        _ => read_frame(&job.input)?,
    };

    for step in steps {
        frame = match step {
            Step::Rescale { levels } => engine.change_resolution(&frame, *levels)?,
            Step::SetResolution { target } => engine.set_resolution(&frame, *target)?,
            Step::Geometry => annotate_geometry(&frame)?,
            Step::Project { .. } => {
                return Err(CliError::Job("project must be the first step".to_string()))
            }
        };
    }

    write_frame(&job.output, &frame)?;
    info!(rows = frame.len(), output = %job.output.display(), "job complete");
    Ok(())
}
