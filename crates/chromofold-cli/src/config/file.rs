use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub anneal: Option<FileAnnealConfig>,
    pub structure: Option<FileStructureConfig>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileAnnealConfig {
    pub temp_start: Option<f64>,
    pub temp_end: Option<f64>,
    pub num_temp_steps: Option<usize>,
    pub dynamics_steps_per_temp: Option<usize>,
    pub time_step: Option<f64>,
    pub repulsion_distance: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileStructureConfig {
    pub init_radius: Option<f64>,
    pub num_models: Option<usize>,
    pub random_seed: Option<u64>,
    pub jitter_sigma: Option<f64>,
    pub particle_mass: Option<f64>,
    pub particle_radius: Option<f64>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Reading configuration file from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
