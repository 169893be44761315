//! Input/output at the boundaries of the core: reading restraint tables
//! produced by an external restraint builder, and writing converged model
//! coordinates for downstream serialization tools.

pub mod restraints;
pub mod xyz;
