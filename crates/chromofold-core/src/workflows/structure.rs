use nalgebra::Vector3;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};
use tracing::{info, instrument, warn};

use crate::core::models::resolution::ResolutionLevel;
use crate::core::models::system::ParticleSystem;
use crate::engine::anneal::{CancellationToken, anneal};
use crate::engine::config::StructureConfig;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One independent, fully converged structure.
#[derive(Debug, Clone)]
pub struct Model {
    pub index: usize,
    pub seed: Option<u64>,
    pub system: ParticleSystem,
}

/// A model run that failed; other models in the same batch are unaffected.
#[derive(Debug)]
pub struct ModelFailure {
    pub index: usize,
    pub error: EngineError,
}

/// The outcome of a multi-model batch: converged models plus per-model
/// failures. An entirely failed batch still returns `Ok` with an empty
/// `models` list; interpreting partial results is the caller's decision.
#[derive(Debug, Default)]
pub struct ModelSet {
    pub models: Vec<Model>,
    pub failures: Vec<ModelFailure>,
}

/// Runs the full coarse-to-fine pipeline once, producing the finest level's
/// coordinates.
///
/// The coarsest level starts from a random placement inside
/// `config.init_radius`; every subsequent level starts from a fresh buffer
/// expanded from the previous level's converged coordinates. All levels share
/// the same annealing parameters.
#[instrument(skip_all, name = "structure_workflow", fields(levels = levels.len()))]
pub fn calculate_structure(
    levels: &[ResolutionLevel],
    config: &StructureConfig,
    seed: Option<u64>,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<ParticleSystem, EngineError> {
    validate_hierarchy(levels)?;

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let coarsest = &levels[0];
    let mut system = ParticleSystem::random_in_sphere(
        coarsest.particle_count(),
        config.particle_mass,
        config.particle_radius,
        config.init_radius,
        &mut rng,
    );

    let mut final_violations = 0;
    for (idx, level) in levels.iter().enumerate() {
        if idx > 0 {
            system = expand_to_level(&system, &levels[idx - 1], level, config, &mut rng);
        }
        info!(
            bases_per_particle = level.bases_per_particle(),
            particles = level.particle_count(),
            "Annealing resolution level."
        );
        reporter.report(Progress::LevelStart {
            bases_per_particle: level.bases_per_particle(),
            particle_count: level.particle_count(),
            num_stages: config.anneal.num_temp_steps as u64,
        });
        let outcome = anneal(
            &mut system,
            level.restraints(),
            &config.anneal,
            &mut rng,
            reporter,
            cancel,
        )?;
        final_violations = outcome.final_diagnostics.restraint_violations;
        reporter.report(Progress::LevelFinish);
    }

    reporter.report(Progress::Message(format!(
        "converged with {final_violations} violated restraint(s) at the finest level"
    )));
    Ok(system)
}

/// Runs `config.num_models` independent pipelines, one per seed, collecting
/// failures without aborting the batch. Models are the coarse-grained unit of
/// parallelism: with the `parallel` feature they fan out across the rayon
/// pool, sharing nothing but read-only inputs.
#[instrument(skip_all, name = "model_batch", fields(models = config.num_models))]
pub fn generate_models(
    levels: &[ResolutionLevel],
    config: &StructureConfig,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<ModelSet, EngineError> {
    validate_hierarchy(levels)?;

    let run_one = |index: usize| -> (usize, Option<u64>, Result<ParticleSystem, EngineError>) {
        let seed = config.random_seed.map(|base| base + index as u64);
        reporter.report(Progress::ModelStart {
            index,
            total: config.num_models,
        });
        let result = calculate_structure(levels, config, seed, reporter, cancel);
        if result.is_ok() {
            reporter.report(Progress::ModelFinish { index });
        }
        (index, seed, result)
    };

    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<_> = (0..config.num_models).map(run_one).collect();

    #[cfg(feature = "parallel")]
    let outcomes: Vec<_> = (0..config.num_models).into_par_iter().map(run_one).collect();

    let mut set = ModelSet::default();
    for (index, seed, result) in outcomes {
        match result {
            Ok(system) => set.models.push(Model {
                index,
                seed,
                system,
            }),
            Err(error) => {
                warn!(model = index, %error, "Model run failed; continuing with the rest.");
                set.failures.push(ModelFailure { index, error });
            }
        }
    }

    info!(
        converged = set.models.len(),
        failed = set.failures.len(),
        "Model batch complete."
    );
    Ok(set)
}

/// Builds the fine level's initial coordinates from the coarse level's
/// converged ones: each fine particle inherits the position of the coarse
/// particle covering its genomic interval, plus Gaussian jitter so coincident
/// siblings can separate under repulsion.
pub fn expand_to_level(
    coarse: &ParticleSystem,
    coarse_level: &ResolutionLevel,
    fine_level: &ResolutionLevel,
    config: &StructureConfig,
    rng: &mut StdRng,
) -> ParticleSystem {
    let coarse_positions = coarse.positions();
    let positions = (0..fine_level.particle_count())
        .map(|fine_idx| {
            let parent = parent_index(fine_idx, fine_level, coarse_level);
            let x: f64 = StandardNormal.sample(rng);
            let y: f64 = StandardNormal.sample(rng);
            let z: f64 = StandardNormal.sample(rng);
            let jitter = Vector3::new(
                config.jitter_sigma * x,
                config.jitter_sigma * y,
                config.jitter_sigma * z,
            );
            coarse_positions[parent] + jitter
        })
        .collect();
    ParticleSystem::from_parts(
        positions,
        vec![config.particle_mass; fine_level.particle_count()],
        vec![config.particle_radius; fine_level.particle_count()],
    )
}

/// Maps a fine particle to the coarse particle covering the start of its
/// genomic interval.
fn parent_index(
    fine_idx: usize,
    fine_level: &ResolutionLevel,
    coarse_level: &ResolutionLevel,
) -> usize {
    let genomic_start = fine_idx as u64 * fine_level.bases_per_particle();
    let parent = (genomic_start / coarse_level.bases_per_particle()) as usize;
    parent.min(coarse_level.particle_count() - 1)
}

fn validate_hierarchy(levels: &[ResolutionLevel]) -> Result<(), EngineError> {
    if levels.is_empty() {
        return Err(EngineError::Configuration(
            "at least one resolution level is required".to_string(),
        ));
    }
    for pair in levels.windows(2) {
        if pair[1].bases_per_particle() >= pair[0].bases_per_particle()
            || pair[1].particle_count() < pair[0].particle_count()
        {
            return Err(EngineError::Configuration(format!(
                "resolution levels must be ordered coarse to fine ({} bp / {} particles followed by {} bp / {} particles)",
                pair[0].bases_per_particle(),
                pair[0].particle_count(),
                pair[1].bases_per_particle(),
                pair[1].particle_count(),
            )));
        }
    }
    Ok(())
}
