//! Data structures describing a particle system and the distance restraints
//! imposed on it, plus the resolution hierarchy they are organized into.

pub mod resolution;
pub mod restraint;
pub mod system;
