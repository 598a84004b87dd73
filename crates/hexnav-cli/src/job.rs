//! YAML job descriptions: a staged input, a pipeline of steps, one output.

use std::path::PathBuf;

use hexnav_ingest::NodataFilter;
use serde::Deserialize;

use crate::cli::EngineChoice;
use crate::error::CliError;

/// A pipeline job loaded from YAML.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Job {
    /// Input file: staged points if the first step projects, a grid table
    /// otherwise.
    pub input: PathBuf,
    /// Grid table Parquet file to write.
    pub output: PathBuf,
    /// Execution substrate for resolution changes.
    #[serde(default)]
    pub engine: EngineChoice,
    /// No-data policy applied when reading staged points.
    #[serde(default)]
    pub nodata: NodataSpec,
    /// Steps executed in order.
    pub steps: Vec<Step>,
}

/// No-data policy as written in the job file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodataSpec {
    /// Sentinel value marking missing data.
    pub sentinel: Option<f64>,
    /// Drop zero and negative band values.
    #[serde(default)]
    pub drop_nonpositive: bool,
}

impl NodataSpec {
    /// The staging-side filter described by this entry.
    pub fn filter(&self) -> NodataFilter {
        NodataFilter {
            sentinel: self.sentinel,
            drop_nonpositive: self.drop_nonpositive,
        }
    }
}

/// One pipeline step.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Project staged points onto the grid. Must be the first step.
    Project {
        /// Indexing resolution (0-15).
        resolution: u8,
        /// Override for the band column name.
        #[serde(default)]
        value_column: Option<String>,
    },
    /// Shift resolution by a relative level count.
    Rescale {
        /// Positive refines, negative coarsens.
        levels: i32,
    },
    /// Bring the table to an absolute resolution.
    SetResolution {
        /// Target resolution.
        target: u8,
    },
    /// Attach cell boundary polygons.
    Geometry,
}

impl Job {
    /// Load and validate a job file.
    pub fn load(path: &std::path::Path) -> Result<Self, CliError> {
        let text = std::fs::read_to_string(path)?;
        let job: Job = serde_yaml::from_str(&text)?;
        job.validate()?;
        Ok(job)
    }

    fn validate(&self) -> Result<(), CliError> {
        if self.steps.is_empty() {
            return Err(CliError::Job("job has no steps".to_string()));
        }
        for (position, step) in self.steps.iter().enumerate() {
            if matches!(step, Step::Project { .. }) && position != 0 {
                return Err(CliError::Job(
                    "project must be the first step".to_string(),
                ));
            }
        }
        Ok(())
    }
}
