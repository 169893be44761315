use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RestraintError {
    #[error("Restraint pairs a particle with itself: index {index}")]
    SelfPair { index: usize },

    #[error("Particle index {index} is out of range for a system of {particle_count} particles")]
    ParticleOutOfRange {
        index: usize,
        particle_count: usize,
    },

    #[error("Invalid distance bounds: lower = {lower}, upper = {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error(
        "Ambiguity group [{start}, {start_plus_len}) is out of range or overlaps another group ({restraint_count} restraints total)",
        start_plus_len = start + len
    )]
    InvalidGroup {
        start: usize,
        len: usize,
        restraint_count: usize,
    },
}

/// An allowed distance range between two particles, derived from an observed
/// contact. The restraint is satisfied whenever the pair distance lies in
/// `[lower, upper]`; it exerts no force inside that band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Restraint {
    pub i: usize,
    pub j: usize,
    pub lower: f64,
    pub upper: f64,
}

impl Restraint {
    pub fn new(i: usize, j: usize, lower: f64, upper: f64) -> Result<Self, RestraintError> {
        if i == j {
            return Err(RestraintError::SelfPair { index: i });
        }
        if !(lower.is_finite() && upper.is_finite()) || lower < 0.0 || lower > upper {
            return Err(RestraintError::InvalidBounds { lower, upper });
        }
        Ok(Self { i, j, lower, upper })
    }

    /// How far outside the allowed band the pair currently sits; zero when
    /// the restraint is satisfied.
    pub fn violation(&self, positions: &[Point3<f64>]) -> f64 {
        let dist = (positions[self.i] - positions[self.j]).norm();
        if dist < self.lower {
            self.lower - dist
        } else if dist > self.upper {
            dist - self.upper
        } else {
            0.0
        }
    }
}

/// A contiguous run of restraints of which only one member need be satisfied,
/// modeling multi-mapping contact evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmbiguityGroup {
    pub start: usize,
    pub len: usize,
}

/// Selects the member of an ambiguity group with the smallest current
/// violation. This is the single enforcement policy for ambiguous evidence:
/// the selected member receives the restraint force, the rest receive none.
pub fn least_violated(members: &[Restraint], positions: &[Point3<f64>]) -> usize {
    debug_assert!(!members.is_empty());
    let mut best = 0;
    let mut best_violation = members[0].violation(positions);
    for (idx, restraint) in members.iter().enumerate().skip(1) {
        let violation = restraint.violation(positions);
        if violation < best_violation {
            best_violation = violation;
            best = idx;
        }
    }
    best
}

/// An immutable, validated description of every restraint imposed on one
/// resolution level of a particle system.
///
/// Restraints not covered by an explicit [`AmbiguityGroup`] form implicit
/// singleton groups; enforcement iterates over *units*, each of which is a
/// slice of the restraint list with exactly one actively enforced member.
#[derive(Debug, Clone, PartialEq)]
pub struct RestraintSet {
    particle_count: usize,
    restraints: Vec<Restraint>,
    groups: Vec<AmbiguityGroup>,
    units: Vec<AmbiguityGroup>,
}

impl RestraintSet {
    /// Validates and assembles a restraint set.
    ///
    /// `groups` must be sorted by start index, non-overlapping, non-empty,
    /// and in range; every restraint must reference particles below
    /// `particle_count`. Validation failures are rejected here, before any
    /// dynamics ever runs.
    pub fn new(
        particle_count: usize,
        restraints: Vec<Restraint>,
        groups: Vec<AmbiguityGroup>,
    ) -> Result<Self, RestraintError> {
        for restraint in &restraints {
            for index in [restraint.i, restraint.j] {
                if index >= particle_count {
                    return Err(RestraintError::ParticleOutOfRange {
                        index,
                        particle_count,
                    });
                }
            }
        }

        let mut covered_until = 0usize;
        for group in &groups {
            let invalid = group.len == 0
                || group.start < covered_until
                || group.start + group.len > restraints.len();
            if invalid {
                return Err(RestraintError::InvalidGroup {
                    start: group.start,
                    len: group.len,
                    restraint_count: restraints.len(),
                });
            }
            covered_until = group.start + group.len;
        }

        let units = Self::build_units(restraints.len(), &groups);
        Ok(Self {
            particle_count,
            restraints,
            groups,
            units,
        })
    }

    /// Convenience constructor for a set without ambiguity groups.
    pub fn unambiguous(
        particle_count: usize,
        restraints: Vec<Restraint>,
    ) -> Result<Self, RestraintError> {
        Self::new(particle_count, restraints, Vec::new())
    }

    fn build_units(restraint_count: usize, groups: &[AmbiguityGroup]) -> Vec<AmbiguityGroup> {
        let mut units = Vec::new();
        let mut next = 0usize;
        for group in groups {
            while next < group.start {
                units.push(AmbiguityGroup {
                    start: next,
                    len: 1,
                });
                next += 1;
            }
            units.push(*group);
            next = group.start + group.len;
        }
        while next < restraint_count {
            units.push(AmbiguityGroup {
                start: next,
                len: 1,
            });
            next += 1;
        }
        units
    }

    pub fn particle_count(&self) -> usize {
        self.particle_count
    }

    pub fn restraints(&self) -> &[Restraint] {
        &self.restraints
    }

    pub fn groups(&self) -> &[AmbiguityGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.restraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.restraints.is_empty()
    }

    /// Iterates over enforcement units: each explicit ambiguity group, plus a
    /// singleton unit for every ungrouped restraint, in list order.
    pub fn units(&self) -> impl Iterator<Item = &[Restraint]> {
        self.units
            .iter()
            .map(|unit| &self.restraints[unit.start..unit.start + unit.len])
    }

    /// Counts units whose violation exceeds `tolerance`. An ambiguity group
    /// is violated only when every member is (one satisfied contact is
    /// enough evidence).
    pub fn violated_units(&self, positions: &[Point3<f64>], tolerance: f64) -> usize {
        self.units()
            .filter(|members| {
                members
                    .iter()
                    .all(|restraint| restraint.violation(positions) > tolerance)
            })
            .count()
    }
}
