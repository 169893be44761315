use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use crate::cli::{FoldArgs, ScheduleArgs};
use crate::error::Result;
use chromofold::engine::config::{AnnealConfigBuilder, StructureConfig, StructureConfigBuilder};
use chromofold::engine::error::EngineError;
use tracing::info;

/// Merges the layered configuration sources for the `fold` command:
/// CLI arguments override the TOML file, which overrides built-in defaults.
pub fn build_structure_config(args: &FoldArgs) -> Result<StructureConfig> {
    let defaults = DefaultsConfig::default();
    let file_config = load_file_config(args.config.as_deref())?;

    let anneal_file = file_config.anneal.unwrap_or_default();
    let anneal = AnnealConfigBuilder::new()
        .temp_start(anneal_file.temp_start.unwrap_or(defaults.temp_start))
        .temp_end(anneal_file.temp_end.unwrap_or(defaults.temp_end))
        .num_temp_steps(anneal_file.num_temp_steps.unwrap_or(defaults.num_temp_steps))
        .dynamics_steps_per_temp(
            anneal_file
                .dynamics_steps_per_temp
                .unwrap_or(defaults.dynamics_steps_per_temp),
        )
        .time_step(anneal_file.time_step.unwrap_or(defaults.time_step))
        .repulsion_distance(
            anneal_file
                .repulsion_distance
                .unwrap_or(defaults.repulsion_distance),
        )
        .build()
        .map_err(EngineError::from)?;

    let structure_file = file_config.structure.unwrap_or_default();
    let mut builder = StructureConfigBuilder::new()
        .anneal(anneal)
        .init_radius(structure_file.init_radius.unwrap_or(defaults.init_radius))
        .num_models(
            args.models
                .or(structure_file.num_models)
                .unwrap_or(defaults.num_models),
        );
    if let Some(seed) = args.seed.or(structure_file.random_seed) {
        builder = builder.random_seed(seed);
    }
    if let Some(sigma) = structure_file.jitter_sigma {
        builder = builder.jitter_sigma(sigma);
    }
    if let Some(mass) = structure_file.particle_mass {
        builder = builder.particle_mass(mass);
    }
    if let Some(radius) = structure_file.particle_radius {
        builder = builder.particle_radius(radius);
    }

    Ok(builder.build().map_err(EngineError::from)?)
}

/// Resolves the schedule parameters for the `schedule` command from CLI
/// arguments, an optional config file, and the defaults, in that order.
pub fn build_schedule_params(args: &ScheduleArgs) -> Result<(f64, f64, usize)> {
    let defaults = DefaultsConfig::default();
    let anneal_file = load_file_config(args.config.as_deref())?
        .anneal
        .unwrap_or_default();
    Ok((
        args.temp_start
            .or(anneal_file.temp_start)
            .unwrap_or(defaults.temp_start),
        args.temp_end
            .or(anneal_file.temp_end)
            .unwrap_or(defaults.temp_end),
        args.num_temp_steps
            .or(anneal_file.num_temp_steps)
            .unwrap_or(defaults.num_temp_steps),
    ))
}

fn load_file_config(path: Option<&std::path::Path>) -> Result<FileConfig> {
    match path {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            FileConfig::from_file(path)
        }
        None => Ok(FileConfig::default()),
    }
}
