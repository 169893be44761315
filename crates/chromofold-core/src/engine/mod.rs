//! # Engine Module
//!
//! The restrained simulated-annealing engine: pure pairwise force functions,
//! the explicit-integration dynamics kernel, the temperature/repulsion
//! schedule, and the annealing loop that ties them together.
//!
//! The engine operates on a [`crate::core::models::system::ParticleSystem`]
//! it is given exclusive access to for the duration of a call; all
//! configuration is validated before any dynamics runs.

pub mod anneal;
pub mod config;
pub mod dynamics;
pub mod error;
pub mod forces;
pub mod progress;
pub mod schedule;
