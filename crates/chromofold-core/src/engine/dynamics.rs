use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand_distr::{Distribution, StandardNormal};

use crate::core::models::restraint::{RestraintSet, least_violated};
use crate::core::models::system::ParticleSystem;

use super::forces::{
    REPULSION_STIFFNESS, RESTRAINT_STIFFNESS, flat_bottom_spring, soft_sphere_repulsion,
};

/// Absolute distance excess beyond which a restraint counts as violated in
/// the diagnostics.
pub const VIOLATION_TOLERANCE: f64 = 0.05;

/// Kinetic energy floor below which the thermostat skips rescaling.
const KINETIC_EPSILON: f64 = 1e-300;

/// Per-iteration velocity damping factor. Bleeds kinetic energy between
/// thermostat caps so the system settles into the restraint minima as the
/// temperature drops.
const VELOCITY_DAMPING: f64 = 0.98;

/// Per-call parameters for the dynamics kernel. Callers obtain these from a
/// validated [`super::schedule::Schedule`] stage plus the run configuration;
/// the kernel itself performs no range checking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynamicsParams {
    pub temperature: f64,
    pub time_step: f64,
    pub num_iterations: usize,
    pub repulsion_scale: f64,
    pub repulsion_distance: f64,
}

/// Scalar summaries of the system state after one kernel call. Used for
/// logging and monitoring only; the schedule never reads them back.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Diagnostics {
    /// Enforcement units currently violated beyond [`VIOLATION_TOLERANCE`].
    pub restraint_violations: usize,
    /// Particle pairs with an engaged repulsive force on the final iteration.
    pub repulsive_contacts: usize,
    /// Root-mean-square per-particle displacement of the final iteration.
    pub rms_displacement: f64,
}

/// Runs `num_iterations` explicit integration steps against the restraint
/// and repulsion forces, mutating `system` in place.
///
/// Each iteration has two phases separated by a barrier: every pair force is
/// computed from the same position snapshot, then a single pass integrates
/// velocities and positions. Thermal kinetic energy is injected once from a
/// Maxwell distribution at `temperature`; a capping thermostat keeps kinetic
/// energy at or below the thermal target while per-iteration damping drains
/// the rest, so high temperatures tolerate large excursions and low
/// temperatures quench the system into its restraint minima.
pub fn advance(
    system: &mut ParticleSystem,
    restraints: &RestraintSet,
    params: &DynamicsParams,
    rng: &mut StdRng,
) -> Diagnostics {
    let n = system.len();
    if n == 0 {
        return Diagnostics::default();
    }
    debug_assert!(params.temperature > 0.0);
    debug_assert!(params.time_step > 0.0);
    debug_assert!((0.0..=1.0).contains(&params.repulsion_scale));
    debug_assert_eq!(restraints.particle_count(), n);

    let masses = system.masses().to_vec();
    let dt = params.time_step;

    let mut velocities = thermal_velocities(&masses, params.temperature, rng);
    let mut forces = vec![Vector3::zeros(); n];
    let mut repulsive_contacts = 0;
    let mut sq_displacement = 0.0;

    for _ in 0..params.num_iterations {
        for force in &mut forces {
            *force = Vector3::zeros();
        }
        repulsive_contacts = 0;

        {
            let positions = system.positions();

            for members in restraints.units() {
                let restraint = members[least_violated(members, positions)];
                let delta = positions[restraint.i] - positions[restraint.j];
                let dist = delta.norm();
                let magnitude =
                    flat_bottom_spring(dist, restraint.lower, restraint.upper, RESTRAINT_STIFFNESS);
                if magnitude != 0.0 {
                    // flat_bottom_spring returns 0 at near-zero separation,
                    // so dividing by dist here is safe.
                    let direction = delta / dist;
                    forces[restraint.i] += direction * magnitude;
                    forces[restraint.j] -= direction * magnitude;
                }
            }

            for a in 0..n {
                for b in (a + 1)..n {
                    let delta = positions[a] - positions[b];
                    let dist = delta.norm();
                    let magnitude = soft_sphere_repulsion(
                        dist,
                        params.repulsion_distance,
                        params.repulsion_scale,
                        REPULSION_STIFFNESS,
                    );
                    if magnitude > 0.0 {
                        repulsive_contacts += 1;
                        let direction = delta / dist;
                        forces[a] += direction * magnitude;
                        forces[b] -= direction * magnitude;
                    }
                }
            }
        }

        sq_displacement = 0.0;
        let positions = system.positions_mut();
        for idx in 0..n {
            velocities[idx] += forces[idx] * (dt / masses[idx]);
            velocities[idx] *= VELOCITY_DAMPING;
            let step = velocities[idx] * dt;
            positions[idx] += step;
            sq_displacement += step.norm_squared();
        }

        cap_to_temperature(&mut velocities, &masses, params.temperature);
    }

    Diagnostics {
        restraint_violations: restraints.violated_units(system.positions(), VIOLATION_TOLERANCE),
        repulsive_contacts,
        rms_displacement: (sq_displacement / n as f64).sqrt(),
    }
}

/// Draws per-particle velocities from the Maxwell distribution at the given
/// temperature (kB = 1, arbitrary units).
fn thermal_velocities(masses: &[f64], temperature: f64, rng: &mut StdRng) -> Vec<Vector3<f64>> {
    masses
        .iter()
        .map(|&mass| {
            let sigma = (temperature / mass).sqrt();
            let x: f64 = StandardNormal.sample(rng);
            let y: f64 = StandardNormal.sample(rng);
            let z: f64 = StandardNormal.sample(rng);
            Vector3::new(sigma * x, sigma * y, sigma * z)
        })
        .collect()
}

/// Velocity-capping thermostat: when the total kinetic energy exceeds
/// `1.5 * N * T`, scales all velocities down to that target. The thermal
/// target is an upper bound only; a system colder than its temperature is
/// left alone so it can keep settling.
fn cap_to_temperature(velocities: &mut [Vector3<f64>], masses: &[f64], temperature: f64) {
    let kinetic: f64 = velocities
        .iter()
        .zip(masses)
        .map(|(v, &m)| 0.5 * m * v.norm_squared())
        .sum();
    if kinetic < KINETIC_EPSILON {
        return;
    }
    let target = 1.5 * velocities.len() as f64 * temperature;
    if kinetic <= target {
        return;
    }
    let lambda = (target / kinetic).sqrt();
    for velocity in velocities.iter_mut() {
        *velocity *= lambda;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::restraint::{AmbiguityGroup, Restraint};
    use nalgebra::Point3;
    use rand::SeedableRng;

    fn two_particle_system(separation: f64) -> ParticleSystem {
        ParticleSystem::from_parts(
            vec![Point3::origin(), Point3::new(separation, 0.0, 0.0)],
            vec![1.0; 2],
            vec![0.5; 2],
        )
    }

    fn params(temperature: f64, num_iterations: usize) -> DynamicsParams {
        DynamicsParams {
            temperature,
            time_step: 0.05,
            num_iterations,
            repulsion_scale: 0.5,
            repulsion_distance: 1.0,
        }
    }

    #[test]
    fn coincident_restrained_particles_stay_finite() {
        let mut system = two_particle_system(0.0);
        let restraints =
            RestraintSet::unambiguous(2, vec![Restraint::new(0, 1, 1.0, 2.0).unwrap()]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        advance(&mut system, &restraints, &params(1.0, 1), &mut rng);
        assert!(system.all_finite());
    }

    #[test]
    fn overstretched_restraint_pulls_the_pair_together() {
        let mut system = two_particle_system(5.0);
        let restraints =
            RestraintSet::unambiguous(2, vec![Restraint::new(0, 1, 1.0, 2.0).unwrap()]).unwrap();
        let before = restraints.restraints()[0].violation(system.positions());
        let mut rng = StdRng::seed_from_u64(2);
        advance(&mut system, &restraints, &params(0.01, 200), &mut rng);
        let after = restraints.restraints()[0].violation(system.positions());
        assert!(system.all_finite());
        assert!(after < before);
    }

    #[test]
    fn repulsion_pushes_overlapping_particles_apart() {
        let mut system = two_particle_system(0.4);
        let restraints = RestraintSet::unambiguous(2, Vec::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let mut p = params(1e-6, 100);
        p.repulsion_scale = 1.0;
        advance(&mut system, &restraints, &p, &mut rng);
        let dist = (system.positions()[0] - system.positions()[1]).norm();
        assert!(dist > 0.4);
    }

    #[test]
    fn ambiguous_group_leaves_the_more_violated_member_alone() {
        // Restraint (0,2) is satisfied, so (0,1) must receive no force; with a
        // negligible temperature, particle 1 should barely move.
        let positions = vec![
            Point3::origin(),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
        ];
        let mut system = ParticleSystem::from_parts(positions, vec![1.0; 3], vec![0.5; 3]);
        let restraints = RestraintSet::new(
            3,
            vec![
                Restraint::new(0, 1, 1.0, 2.0).unwrap(),
                Restraint::new(0, 2, 1.0, 2.0).unwrap(),
            ],
            vec![AmbiguityGroup { start: 0, len: 2 }],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(4);
        let mut p = params(1e-12, 10);
        p.repulsion_scale = 0.0;
        advance(&mut system, &restraints, &p, &mut rng);
        let moved = (system.positions()[1] - Point3::new(10.0, 0.0, 0.0)).norm();
        assert!(moved < 1e-4);
    }

    #[test]
    fn diagnostics_count_violations_and_contacts() {
        let positions = vec![
            Point3::origin(),
            Point3::new(0.5, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
        ];
        let mut system = ParticleSystem::from_parts(positions, vec![1.0; 3], vec![0.5; 3]);
        let restraints =
            RestraintSet::unambiguous(3, vec![Restraint::new(0, 2, 1.0, 2.0).unwrap()]).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let p = DynamicsParams {
            temperature: 1e-12,
            time_step: 1e-6,
            num_iterations: 1,
            repulsion_scale: 1.0,
            repulsion_distance: 1.0,
        };
        let diagnostics = advance(&mut system, &restraints, &p, &mut rng);
        assert_eq!(diagnostics.restraint_violations, 1);
        assert_eq!(diagnostics.repulsive_contacts, 1);
        assert!(diagnostics.rms_displacement >= 0.0);
    }

    #[test]
    fn low_temperature_dynamics_quenches_into_the_restraint_band() {
        // At a low but nonzero temperature the thermostat must not keep
        // re-energizing the pair; damping should let it come to rest inside
        // the band, leaving both the violation and the motion near zero.
        let mut system = two_particle_system(5.0);
        let restraints =
            RestraintSet::unambiguous(2, vec![Restraint::new(0, 1, 1.0, 2.0).unwrap()]).unwrap();
        let mut rng = StdRng::seed_from_u64(17);
        let p = DynamicsParams {
            temperature: 0.1,
            time_step: 0.02,
            num_iterations: 500,
            repulsion_scale: 1.0,
            repulsion_distance: 1.0,
        };
        let diagnostics = advance(&mut system, &restraints, &p, &mut rng);
        assert_eq!(diagnostics.restraint_violations, 0);
        assert!(
            diagnostics.rms_displacement < 1e-3,
            "pair is still moving: rms {}",
            diagnostics.rms_displacement
        );
    }

    #[test]
    fn kernel_is_deterministic_for_a_fixed_seed() {
        let restraints =
            RestraintSet::unambiguous(2, vec![Restraint::new(0, 1, 1.0, 2.0).unwrap()]).unwrap();
        let mut system_a = two_particle_system(5.0);
        let mut system_b = two_particle_system(5.0);
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);
        let diag_a = advance(&mut system_a, &restraints, &params(1.0, 50), &mut rng_a);
        let diag_b = advance(&mut system_b, &restraints, &params(1.0, 50), &mut rng_b);
        assert_eq!(system_a, system_b);
        assert_eq!(diag_a, diag_b);
    }

    #[test]
    fn empty_system_yields_default_diagnostics() {
        let mut system = ParticleSystem::uniform(0, 1.0, 0.5);
        let restraints = RestraintSet::unambiguous(0, Vec::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(6);
        let diagnostics = advance(&mut system, &restraints, &params(1.0, 10), &mut rng);
        assert_eq!(diagnostics, Diagnostics::default());
    }
}
