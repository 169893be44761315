use crate::cli::FoldArgs;
use crate::config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use chromofold::core::io::restraints::{read_restraint_file, read_restraint_table_inferring};
use chromofold::core::io::xyz::write_xyz_file;
use chromofold::core::models::resolution::ResolutionLevel;
use chromofold::engine::anneal::CancellationToken;
use chromofold::engine::error::EngineError;
use chromofold::engine::progress::ProgressReporter;
use chromofold::workflows::structure::generate_models;
use std::fs::File;
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: FoldArgs) -> Result<()> {
    let structure_config = config::build_structure_config(&args)?;

    if args.restraints.len() != args.particle_sizes.len() {
        return Err(CliError::Argument(format!(
            "{} restraint table(s) but {} particle size(s); one size per level is required",
            args.restraints.len(),
            args.particle_sizes.len()
        )));
    }
    if let Some(counts) = &args.particle_counts
        && counts.len() != args.restraints.len()
    {
        return Err(CliError::Argument(format!(
            "{} restraint table(s) but {} particle count(s)",
            args.restraints.len(),
            counts.len()
        )));
    }

    let mut levels = Vec::with_capacity(args.restraints.len());
    for (idx, path) in args.restraints.iter().enumerate() {
        let count = args.particle_counts.as_ref().map(|counts| counts[idx]);
        levels.push(load_level(path, args.particle_sizes[idx], count)?);
    }

    std::fs::create_dir_all(&args.output)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let cancel = CancellationToken::new();

    println!(
        "Starting structure calculation: {} level(s), {} model(s)...",
        levels.len(),
        structure_config.num_models
    );
    info!("Invoking the core structure workflow...");

    let model_set = generate_models(&levels, &structure_config, &reporter, &cancel)?;

    for failure in &model_set.failures {
        warn!(model = failure.index, error = %failure.error, "Model run failed.");
        eprintln!("  Model {} failed: {}", failure.index + 1, failure.error);
    }
    if model_set.models.is_empty() {
        return Err(CliError::AllModelsFailed(model_set.failures.len()));
    }

    let mut models = model_set.models;
    models.sort_unstable_by_key(|model| model.index);
    for model in &models {
        // Models are numbered from 1 everywhere the user sees them, file
        // names included.
        let number = model.index + 1;
        let output_path = args.output.join(format!("model_{number:03}.xyz"));
        let comment = match model.seed {
            Some(seed) => format!("chromofold model {number} seed {seed}"),
            None => format!("chromofold model {number} (entropy-seeded)"),
        };
        write_xyz_file(&output_path, &model.system, &comment)?;
        println!(
            "✓ Model {} ({} particles) written to: {}",
            number,
            model.system.len(),
            output_path.display()
        );
    }

    if !model_set.failures.is_empty() {
        println!(
            "Completed with partial results: {} of {} model(s) converged.",
            models.len(),
            models.len() + model_set.failures.len()
        );
    }

    Ok(())
}

fn load_level(path: &Path, bases_per_particle: u64, count: Option<usize>) -> Result<ResolutionLevel> {
    info!("Loading restraint table from {:?}", path);
    let restraints = match count {
        Some(count) => read_restraint_file(path, count),
        None => {
            let file = File::open(path)?;
            read_restraint_table_inferring(file)
        }
    }
    .map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;

    let particle_count = restraints.particle_count();
    ResolutionLevel::new(bases_per_particle, particle_count, restraints)
        .map_err(|e| CliError::Core(EngineError::from(e)))
}
