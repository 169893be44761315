use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid value for parameter {parameter}: {message}")]
    InvalidParameter {
        parameter: &'static str,
        message: String,
    },
}

const DEFAULT_PARTICLE_MASS: f64 = 1.0;
const DEFAULT_PARTICLE_RADIUS: f64 = 0.5;

/// Jitter applied when seeding a fine level from a coarse one, as a fraction
/// of the repulsion distance, unless the caller sets an explicit sigma.
const DEFAULT_JITTER_FRACTION: f64 = 0.1;

/// Parameters for one annealing run, shared across all resolution levels.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealConfig {
    pub temp_start: f64,
    pub temp_end: f64,
    pub num_temp_steps: usize,
    pub dynamics_steps_per_temp: usize,
    pub time_step: f64,
    pub repulsion_distance: f64,
}

#[derive(Default)]
pub struct AnnealConfigBuilder {
    temp_start: Option<f64>,
    temp_end: Option<f64>,
    num_temp_steps: Option<usize>,
    dynamics_steps_per_temp: Option<usize>,
    time_step: Option<f64>,
    repulsion_distance: Option<f64>,
}

impl AnnealConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn temp_start(mut self, temp: f64) -> Self {
        self.temp_start = Some(temp);
        self
    }
    pub fn temp_end(mut self, temp: f64) -> Self {
        self.temp_end = Some(temp);
        self
    }
    pub fn num_temp_steps(mut self, steps: usize) -> Self {
        self.num_temp_steps = Some(steps);
        self
    }
    pub fn dynamics_steps_per_temp(mut self, steps: usize) -> Self {
        self.dynamics_steps_per_temp = Some(steps);
        self
    }
    pub fn time_step(mut self, dt: f64) -> Self {
        self.time_step = Some(dt);
        self
    }
    pub fn repulsion_distance(mut self, dist: f64) -> Self {
        self.repulsion_distance = Some(dist);
        self
    }

    pub fn build(self) -> Result<AnnealConfig, ConfigError> {
        let time_step = self
            .time_step
            .ok_or(ConfigError::MissingParameter("time_step"))?;
        if !time_step.is_finite() || time_step <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "time_step",
                message: format!("must be finite and positive, got {time_step}"),
            });
        }
        let repulsion_distance = self
            .repulsion_distance
            .ok_or(ConfigError::MissingParameter("repulsion_distance"))?;
        if !repulsion_distance.is_finite() || repulsion_distance <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "repulsion_distance",
                message: format!("must be finite and positive, got {repulsion_distance}"),
            });
        }
        Ok(AnnealConfig {
            temp_start: self
                .temp_start
                .ok_or(ConfigError::MissingParameter("temp_start"))?,
            temp_end: self
                .temp_end
                .ok_or(ConfigError::MissingParameter("temp_end"))?,
            num_temp_steps: self
                .num_temp_steps
                .ok_or(ConfigError::MissingParameter("num_temp_steps"))?,
            dynamics_steps_per_temp: self
                .dynamics_steps_per_temp
                .ok_or(ConfigError::MissingParameter("dynamics_steps_per_temp"))?,
            time_step,
            repulsion_distance,
        })
    }
}

/// Parameters for one complete multi-resolution structure calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureConfig {
    pub anneal: AnnealConfig,
    pub init_radius: f64,
    pub num_models: usize,
    pub particle_mass: f64,
    pub particle_radius: f64,
    pub jitter_sigma: f64,
    pub random_seed: Option<u64>,
}

#[derive(Default)]
pub struct StructureConfigBuilder {
    anneal: Option<AnnealConfig>,
    init_radius: Option<f64>,
    num_models: Option<usize>,
    particle_mass: Option<f64>,
    particle_radius: Option<f64>,
    jitter_sigma: Option<f64>,
    random_seed: Option<u64>,
}

impl StructureConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn anneal(mut self, config: AnnealConfig) -> Self {
        self.anneal = Some(config);
        self
    }
    pub fn init_radius(mut self, radius: f64) -> Self {
        self.init_radius = Some(radius);
        self
    }
    pub fn num_models(mut self, n: usize) -> Self {
        self.num_models = Some(n);
        self
    }
    pub fn particle_mass(mut self, mass: f64) -> Self {
        self.particle_mass = Some(mass);
        self
    }
    pub fn particle_radius(mut self, radius: f64) -> Self {
        self.particle_radius = Some(radius);
        self
    }
    pub fn jitter_sigma(mut self, sigma: f64) -> Self {
        self.jitter_sigma = Some(sigma);
        self
    }
    pub fn random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<StructureConfig, ConfigError> {
        let anneal = self.anneal.ok_or(ConfigError::MissingParameter("anneal"))?;
        let init_radius = self
            .init_radius
            .ok_or(ConfigError::MissingParameter("init_radius"))?;
        if !init_radius.is_finite() || init_radius <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "init_radius",
                message: format!("must be finite and positive, got {init_radius}"),
            });
        }
        let num_models = self
            .num_models
            .ok_or(ConfigError::MissingParameter("num_models"))?;
        if num_models == 0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "num_models",
                message: "must be at least 1".to_string(),
            });
        }

        let particle_mass = self.particle_mass.unwrap_or(DEFAULT_PARTICLE_MASS);
        let particle_radius = self.particle_radius.unwrap_or(DEFAULT_PARTICLE_RADIUS);
        for (parameter, value) in [
            ("particle_mass", particle_mass),
            ("particle_radius", particle_radius),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    parameter,
                    message: format!("must be finite and positive, got {value}"),
                });
            }
        }

        let jitter_sigma = self
            .jitter_sigma
            .unwrap_or(DEFAULT_JITTER_FRACTION * anneal.repulsion_distance);
        if !jitter_sigma.is_finite() || jitter_sigma < 0.0 {
            return Err(ConfigError::InvalidParameter {
                parameter: "jitter_sigma",
                message: format!("must be finite and non-negative, got {jitter_sigma}"),
            });
        }

        Ok(StructureConfig {
            anneal,
            init_radius,
            num_models,
            particle_mass,
            particle_radius,
            jitter_sigma,
            random_seed: self.random_seed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anneal_config() -> AnnealConfig {
        AnnealConfigBuilder::new()
            .temp_start(500.0)
            .temp_end(1.0)
            .num_temp_steps(50)
            .dynamics_steps_per_temp(20)
            .time_step(0.01)
            .repulsion_distance(1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn anneal_builder_reports_the_missing_parameter() {
        let result = AnnealConfigBuilder::new().time_step(0.01).build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingParameter("repulsion_distance")
        );
    }

    #[test]
    fn anneal_builder_rejects_non_positive_time_step() {
        let result = AnnealConfigBuilder::new()
            .temp_start(500.0)
            .temp_end(1.0)
            .num_temp_steps(50)
            .dynamics_steps_per_temp(20)
            .time_step(0.0)
            .repulsion_distance(1.0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                parameter: "time_step",
                ..
            })
        ));
    }

    #[test]
    fn structure_builder_fills_documented_defaults() {
        let config = StructureConfigBuilder::new()
            .anneal(anneal_config())
            .init_radius(10.0)
            .num_models(4)
            .build()
            .unwrap();
        assert_eq!(config.particle_mass, DEFAULT_PARTICLE_MASS);
        assert_eq!(config.particle_radius, DEFAULT_PARTICLE_RADIUS);
        assert!((config.jitter_sigma - 0.1).abs() < 1e-12);
        assert_eq!(config.random_seed, None);
    }

    #[test]
    fn structure_builder_rejects_zero_models() {
        let result = StructureConfigBuilder::new()
            .anneal(anneal_config())
            .init_radius(10.0)
            .num_models(0)
            .build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidParameter {
                parameter: "num_models",
                ..
            })
        ));
    }

    #[test]
    fn structure_builder_requires_the_anneal_section() {
        let result = StructureConfigBuilder::new()
            .init_radius(10.0)
            .num_models(1)
            .build();
        assert_eq!(result.unwrap_err(), ConfigError::MissingParameter("anneal"));
    }
}
