//! # Workflows Module
//!
//! The public, user-facing layer. It drives the annealing engine across a
//! coarse-to-fine resolution hierarchy to produce one structure model, and
//! orchestrates independent models across random seeds.

pub mod structure;
