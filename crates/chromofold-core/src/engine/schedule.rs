use std::f64::consts::PI;

use super::error::EngineError;

/// Controls how sharply the repulsion ramp rises around the run's midpoint.
/// A width of `num_steps / RAMP_STEEPNESS` keeps the scale below 0.1 at the
/// first step and above 0.9 at the last for the default step counts.
const RAMP_STEEPNESS: f64 = 8.0;

/// One temperature step of an annealing run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub temperature: f64,
    pub repulsion_scale: f64,
}

/// The fully determined sequence of `(temperature, repulsion_scale)` stages
/// for one annealing run.
///
/// Temperatures follow an exponential decay from `temp_start` toward
/// `temp_end`; the repulsion scale follows a rescaled-arctangent sigmoid from
/// near 0 to near 1, centered at the run's midpoint. Both sequences are
/// derived deterministically from `(temp_start, temp_end, num_steps)` alone.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    stages: Vec<Stage>,
}

impl Schedule {
    pub fn build(temp_start: f64, temp_end: f64, num_steps: usize) -> Result<Self, EngineError> {
        if !(temp_start.is_finite() && temp_end.is_finite()) || temp_end <= 0.0 {
            return Err(EngineError::InvalidSchedule {
                reason: format!(
                    "temperatures must be finite and positive (got start = {temp_start}, end = {temp_end})"
                ),
            });
        }
        if temp_start <= temp_end {
            return Err(EngineError::InvalidSchedule {
                reason: format!(
                    "temp_start ({temp_start}) must be strictly greater than temp_end ({temp_end})"
                ),
            });
        }
        if num_steps == 0 {
            return Err(EngineError::InvalidSchedule {
                reason: "num_temp_steps must be at least 1".to_string(),
            });
        }

        let stages = (0..num_steps)
            .map(|step| Stage {
                temperature: temperature_at(step, num_steps, temp_start, temp_end),
                repulsion_scale: repulsion_at(step, num_steps),
            })
            .collect();
        Ok(Self { stages })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// `temp(k) = temp_start * exp(-(k / n) * ln(temp_start / temp_end))`, so the
/// sequence starts exactly at `temp_start` and decays toward `temp_end`.
#[inline]
fn temperature_at(step: usize, num_steps: usize, temp_start: f64, temp_end: f64) -> f64 {
    let fraction = step as f64 / num_steps as f64;
    temp_start * (-fraction * (temp_start / temp_end).ln()).exp()
}

/// Sigmoid ramp over the step index: a rescaled arctangent centered at the
/// midpoint, mapping into (0, 1).
#[inline]
fn repulsion_at(step: usize, num_steps: usize) -> f64 {
    let n = num_steps as f64;
    let width = n / RAMP_STEEPNESS;
    0.5 + ((step as f64 - n / 2.0) / width).atan() / PI
}
