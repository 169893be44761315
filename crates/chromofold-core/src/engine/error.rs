use thiserror::Error;

use crate::core::models::resolution::ResolutionError;
use crate::core::models::restraint::RestraintError;

use super::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid annealing schedule: {reason}")]
    InvalidSchedule { reason: String },

    #[error(transparent)]
    Restraint(#[from] RestraintError),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error(
        "Restraint set covers {restraint_particles} particles but the system has {system_particles}"
    )]
    SystemMismatch {
        system_particles: usize,
        restraint_particles: usize,
    },

    #[error("Non-finite coordinates at temperature step {step}: the run diverged and was aborted")]
    Divergence { step: usize },

    #[error("Run interrupted by cancellation request")]
    Interrupted,
}
