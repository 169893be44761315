use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

use crate::core::models::restraint::RestraintSet;
use crate::core::models::system::ParticleSystem;

use super::config::AnnealConfig;
use super::dynamics::{self, Diagnostics, DynamicsParams};
use super::error::EngineError;
use super::progress::{Progress, ProgressReporter};
use super::schedule::Schedule;

/// Cooperative cancellation flag checked between temperature stages, the
/// only safe suspension point of a run.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Summary of one completed annealing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnealOutcome {
    pub stages_run: usize,
    pub final_diagnostics: Diagnostics,
}

/// Relaxes `system` against `restraints` across the full temperature
/// schedule, mutating it in place, and recenters the result.
///
/// Each temperature stage invokes the dynamics kernel exactly once for
/// `dynamics_steps_per_temp` iterations at that stage's temperature and
/// repulsion scale; stage `k + 1` starts from stage `k`'s output coordinates.
/// Schedule validation happens before any dynamics runs. A non-finite
/// coordinate aborts the run with [`EngineError::Divergence`]; it is never
/// retried here.
#[instrument(skip_all, name = "anneal", fields(particles = system.len()))]
pub fn anneal(
    system: &mut ParticleSystem,
    restraints: &RestraintSet,
    config: &AnnealConfig,
    rng: &mut StdRng,
    reporter: &ProgressReporter,
    cancel: &CancellationToken,
) -> Result<AnnealOutcome, EngineError> {
    if config.dynamics_steps_per_temp == 0 {
        return Err(EngineError::InvalidSchedule {
            reason: "dynamics_steps_per_temp must be at least 1".to_string(),
        });
    }
    let schedule = Schedule::build(config.temp_start, config.temp_end, config.num_temp_steps)?;

    if restraints.particle_count() != system.len() {
        return Err(EngineError::SystemMismatch {
            system_particles: system.len(),
            restraint_particles: restraints.particle_count(),
        });
    }

    info!(
        stages = schedule.len(),
        restraints = restraints.len(),
        temp_start = config.temp_start,
        temp_end = config.temp_end,
        "Starting annealing run."
    );

    let mut final_diagnostics = Diagnostics::default();
    for (step, stage) in schedule.stages().iter().enumerate() {
        if cancel.is_cancelled() {
            info!(step, "Annealing run cancelled between stages.");
            return Err(EngineError::Interrupted);
        }
        if !system.all_finite() {
            return Err(EngineError::Divergence { step });
        }

        let params = DynamicsParams {
            temperature: stage.temperature,
            time_step: config.time_step,
            num_iterations: config.dynamics_steps_per_temp,
            repulsion_scale: stage.repulsion_scale,
            repulsion_distance: config.repulsion_distance,
        };
        final_diagnostics = dynamics::advance(system, restraints, &params, rng);

        debug!(
            step,
            temperature = stage.temperature,
            repulsion_scale = stage.repulsion_scale,
            violations = final_diagnostics.restraint_violations,
            contacts = final_diagnostics.repulsive_contacts,
            rms_displacement = final_diagnostics.rms_displacement,
            "Temperature stage complete."
        );
        reporter.report(Progress::StageComplete {
            step,
            temperature: stage.temperature,
            violations: final_diagnostics.restraint_violations,
        });
    }

    if !system.all_finite() {
        return Err(EngineError::Divergence {
            step: schedule.len(),
        });
    }
    system.recenter();

    info!(
        violations = final_diagnostics.restraint_violations,
        "Annealing run complete."
    );
    Ok(AnnealOutcome {
        stages_run: schedule.len(),
        final_diagnostics,
    })
}
