use nalgebra::{Point3, Vector3};
use rand::Rng;
use rand::rngs::StdRng;

/// Represents an ordered collection of particles with positions, masses, and
/// interaction radii.
///
/// This struct is the central coordinate container of the library. The number
/// of particles is fixed for the lifetime of the system, and a particle's
/// identity is its index; restraints refer to particles by index only.
///
/// The three internal buffers always have identical length.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSystem {
    positions: Vec<Point3<f64>>,
    masses: Vec<f64>,
    radii: Vec<f64>,
}

impl ParticleSystem {
    /// Creates a system of `n` particles at the origin with uniform mass and radius.
    pub fn uniform(n: usize, mass: f64, radius: f64) -> Self {
        Self {
            positions: vec![Point3::origin(); n],
            masses: vec![mass; n],
            radii: vec![radius; n],
        }
    }

    /// Creates a system of `n` particles with uniform mass and radius, placed
    /// uniformly at random inside a sphere of radius `init_radius` centered at
    /// the origin.
    ///
    /// Placement draws from the supplied generator only, so two calls with
    /// identically seeded generators produce identical systems.
    pub fn random_in_sphere(
        n: usize,
        mass: f64,
        radius: f64,
        init_radius: f64,
        rng: &mut StdRng,
    ) -> Self {
        let mut system = Self::uniform(n, mass, radius);
        for position in &mut system.positions {
            // Rejection sampling from the bounding cube keeps the distribution
            // uniform over the ball rather than biased toward the center.
            *position = loop {
                let candidate = Point3::new(
                    rng.gen_range(-init_radius..=init_radius),
                    rng.gen_range(-init_radius..=init_radius),
                    rng.gen_range(-init_radius..=init_radius),
                );
                if candidate.coords.norm() <= init_radius {
                    break candidate;
                }
            };
        }
        system
    }

    /// Builds a system from explicit per-particle data.
    ///
    /// # Panics
    ///
    /// Panics if the buffer lengths disagree; callers construct these buffers
    /// together and a mismatch is a programming error, not an input error.
    pub fn from_parts(positions: Vec<Point3<f64>>, masses: Vec<f64>, radii: Vec<f64>) -> Self {
        assert_eq!(positions.len(), masses.len());
        assert_eq!(positions.len(), radii.len());
        Self {
            positions,
            masses,
            radii,
        }
    }

    /// Returns the number of particles in the system.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if the system contains no particles.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.positions
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    /// Computes the centroid of all particle positions.
    ///
    /// Returns the zero vector for an empty system.
    pub fn centroid(&self) -> Vector3<f64> {
        if self.positions.is_empty() {
            return Vector3::zeros();
        }
        let sum: Vector3<f64> = self.positions.iter().map(|p| p.coords).sum();
        sum / self.positions.len() as f64
    }

    /// Translates the system so its centroid lies at the origin.
    ///
    /// Translation carries no physical meaning for a restrained structure;
    /// this normalizes output for comparison and serialization. The operation
    /// is idempotent up to floating-point roundoff.
    pub fn recenter(&mut self) {
        let centroid = self.centroid();
        for position in &mut self.positions {
            *position -= centroid;
        }
    }

    /// Returns `true` if every coordinate of every particle is finite.
    pub fn all_finite(&self) -> bool {
        self.positions
            .iter()
            .all(|p| p.coords.iter().all(|c| c.is_finite()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn uniform_system_has_matching_buffer_lengths() {
        let system = ParticleSystem::uniform(7, 1.0, 0.5);
        assert_eq!(system.len(), 7);
        assert_eq!(system.masses().len(), 7);
        assert_eq!(system.radii().len(), 7);
        assert!(system.positions().iter().all(|p| *p == Point3::origin()));
    }

    #[test]
    fn random_placement_stays_within_the_initial_radius() {
        let mut rng = StdRng::seed_from_u64(7);
        let system = ParticleSystem::random_in_sphere(50, 1.0, 0.5, 10.0, &mut rng);
        assert!(
            system
                .positions()
                .iter()
                .all(|p| p.coords.norm() <= 10.0 + TOLERANCE)
        );
    }

    #[test]
    fn random_placement_is_deterministic_for_a_fixed_seed() {
        let mut rng_a = StdRng::seed_from_u64(42);
        let mut rng_b = StdRng::seed_from_u64(42);
        let a = ParticleSystem::random_in_sphere(20, 1.0, 0.5, 5.0, &mut rng_a);
        let b = ParticleSystem::random_in_sphere(20, 1.0, 0.5, 5.0, &mut rng_b);
        assert_eq!(a, b);
    }

    #[test]
    fn recenter_moves_centroid_to_origin() {
        let positions = vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(3.0, 2.0, 1.0),
            Point3::new(2.0, 5.0, 2.0),
        ];
        let mut system = ParticleSystem::from_parts(positions, vec![1.0; 3], vec![0.5; 3]);
        system.recenter();
        assert!(system.centroid().norm() < TOLERANCE);
    }

    #[test]
    fn recenter_is_idempotent() {
        let positions = vec![Point3::new(4.0, -2.0, 7.5), Point3::new(-1.0, 0.0, 3.0)];
        let mut once = ParticleSystem::from_parts(positions, vec![1.0; 2], vec![0.5; 2]);
        once.recenter();
        let mut twice = once.clone();
        twice.recenter();
        for (a, b) in once.positions().iter().zip(twice.positions()) {
            assert!((a - b).norm() < TOLERANCE);
        }
    }

    #[test]
    fn centroid_of_empty_system_is_zero() {
        let system = ParticleSystem::uniform(0, 1.0, 0.5);
        assert_eq!(system.centroid(), Vector3::zeros());
    }

    #[test]
    fn all_finite_detects_nan_coordinates() {
        let mut system = ParticleSystem::uniform(3, 1.0, 0.5);
        assert!(system.all_finite());
        system.positions_mut()[1].x = f64::NAN;
        assert!(!system.all_finite());
    }
}
