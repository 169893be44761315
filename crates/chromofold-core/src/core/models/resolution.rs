use super::restraint::RestraintSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResolutionError {
    #[error(
        "Restraint set covers {restraint_particles} particles but the level declares {declared}"
    )]
    ParticleCountMismatch {
        restraint_particles: usize,
        declared: usize,
    },

    #[error("A resolution level must contain at least one particle")]
    EmptyLevel,

    #[error("bases_per_particle must be positive")]
    ZeroParticleSize,
}

/// One rung of the coarse-to-fine hierarchy: a particle granularity (bases
/// per particle) together with the particle count and restraint set built for
/// it by the external restraint-builder collaborator.
///
/// Levels are consumed once per model run; the level's converged coordinates
/// seed the next, finer level.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionLevel {
    bases_per_particle: u64,
    particle_count: usize,
    restraints: RestraintSet,
}

impl ResolutionLevel {
    pub fn new(
        bases_per_particle: u64,
        particle_count: usize,
        restraints: RestraintSet,
    ) -> Result<Self, ResolutionError> {
        if bases_per_particle == 0 {
            return Err(ResolutionError::ZeroParticleSize);
        }
        if particle_count == 0 {
            return Err(ResolutionError::EmptyLevel);
        }
        if restraints.particle_count() != particle_count {
            return Err(ResolutionError::ParticleCountMismatch {
                restraint_particles: restraints.particle_count(),
                declared: particle_count,
            });
        }
        Ok(Self {
            bases_per_particle,
            particle_count,
            restraints,
        })
    }

    pub fn bases_per_particle(&self) -> u64 {
        self.bases_per_particle
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn restraints(&self) -> &RestraintSet {
        &self.restraints
    }
}
