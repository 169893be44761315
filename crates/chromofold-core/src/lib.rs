//! # Chromofold Core Library
//!
//! A library for inferring three-dimensional genome structures from pairwise
//! distance restraints derived from chromatin contact data (e.g., Hi-C),
//! using restrained simulated-annealing molecular dynamics.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`ParticleSystem`,
//!   `RestraintSet`), pure mathematical force functions, and restraint-table I/O.
//!
//! - **[`engine`]: The Logic Core.** This stateful layer implements the dynamics
//!   kernel, the temperature/repulsion schedule, and the annealing loop that
//!   relaxes a particle system against its restraints.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing layer. It
//!   drives the engine across a coarse-to-fine resolution hierarchy and across
//!   independent models, providing a simple entry point for end-users.

pub mod core;
pub mod engine;
pub mod workflows;
