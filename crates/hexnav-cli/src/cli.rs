//! Command line definition.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Project raster-derived points onto a hexagonal grid and move the result
/// between resolutions.
#[derive(Debug, Parser)]
#[command(name = "hexnav", version, about)]
pub struct Cli {
    /// Show info-level logs on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all logs.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which resolution-change substrate executes the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineChoice {
    /// In-memory columnar engine.
    #[default]
    Memory,
    /// DuckDB declarative-query engine.
    Duckdb,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Project staged point records onto the grid at a resolution.
    Project {
        /// Staged points Parquet file.
        #[arg(long)]
        input: PathBuf,
        /// Grid table Parquet file to write.
        #[arg(long)]
        output: PathBuf,
        /// Indexing resolution (0-15).
        #[arg(long)]
        resolution: u8,
        /// Sentinel value marking missing data.
        #[arg(long)]
        nodata: Option<f64>,
        /// Drop zero and negative band values.
        #[arg(long)]
        drop_nonpositive: bool,
    },

    /// Change a grid table's resolution by a relative or absolute amount.
    Rescale {
        /// Grid table Parquet file.
        #[arg(long)]
        input: PathBuf,
        /// Grid table Parquet file to write.
        #[arg(long)]
        output: PathBuf,
        /// Relative level change (positive refines, negative coarsens).
        #[arg(long, allow_hyphen_values = true, conflicts_with = "to_res")]
        levels: Option<i32>,
        /// Absolute target resolution.
        #[arg(long)]
        to_res: Option<u8>,
        /// Execution substrate.
        #[arg(long, value_enum, default_value = "memory")]
        engine: EngineChoice,
    },

    /// Attach cell boundary polygons to a grid table.
    Geometry {
        /// Grid table Parquet file.
        #[arg(long)]
        input: PathBuf,
        /// Grid table Parquet file to write.
        #[arg(long)]
        output: PathBuf,
    },

    /// Build a square neighborhood template around a point.
    Window {
        /// Center latitude, degrees.
        #[arg(long)]
        lat: f64,
        /// Center longitude, degrees.
        #[arg(long)]
        lon: f64,
        /// Square side length, meters.
        #[arg(long)]
        size: f64,
        /// Reference mode: 'm' or 'arc'.
        #[arg(long, default_value = "arc")]
        reference: String,
        /// Emit templates for every reference size too.
        #[arg(long)]
        all: bool,
        /// Write JSON here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Execute a YAML-described pipeline.
    Run {
        /// Job description file.
        #[arg(long)]
        job: PathBuf,
    },
}
