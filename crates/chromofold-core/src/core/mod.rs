//! # Core Module
//!
//! Fundamental building blocks for restraint-based structure inference: the
//! particle-system representation, validated restraint sets with ambiguity
//! grouping, resolution-level descriptors, and restraint-table I/O.
//!
//! Everything in this module is stateless with respect to the annealing
//! process; the [`crate::engine`] layer owns all mutation during a run.

pub mod io;
pub mod models;
