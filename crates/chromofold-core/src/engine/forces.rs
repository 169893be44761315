/// Separations below this are treated as coincident; pair forces vanish there
/// so a degenerate initialization never produces a NaN gradient.
pub const NEAR_ZERO_DISTANCE: f64 = 1e-6;

/// Upper bound on any single pair-force magnitude. Keeps the explicit
/// integrator stable when a restraint is grossly violated at high temperature.
pub const MAX_FORCE_MAGNITUDE: f64 = 1e3;

/// Spring constant of the flat-bottomed restraint potential.
pub const RESTRAINT_STIFFNESS: f64 = 1.0;

/// Spring constant of the soft-sphere overlap potential (before scaling by
/// the schedule's repulsion coefficient).
pub const REPULSION_STIFFNESS: f64 = 1.0;

#[inline]
fn clamp_force(force: f64) -> f64 {
    force.clamp(-MAX_FORCE_MAGNITUDE, MAX_FORCE_MAGNITUDE)
}

/// Flat-bottomed spring force for a distance restraint, as a signed scalar
/// along the pair axis: positive pushes the pair apart, negative pulls it
/// together. Zero inside `[lower, upper]` and exactly zero at (near) zero
/// separation.
#[inline]
pub fn flat_bottom_spring(dist: f64, lower: f64, upper: f64, stiffness: f64) -> f64 {
    if dist < NEAR_ZERO_DISTANCE {
        return 0.0;
    }
    if dist < lower {
        clamp_force(stiffness * (lower - dist))
    } else if dist > upper {
        clamp_force(-stiffness * (dist - upper))
    } else {
        0.0
    }
}

/// Soft-sphere repulsion between two particles closer than `cutoff`, scaled
/// by the schedule's `scale` in `[0, 1]`. Always non-negative (pure push),
/// linear in the overlap depth, and exactly zero at (near) zero separation.
#[inline]
pub fn soft_sphere_repulsion(dist: f64, cutoff: f64, scale: f64, stiffness: f64) -> f64 {
    if dist < NEAR_ZERO_DISTANCE || dist >= cutoff {
        return 0.0;
    }
    clamp_force(scale * stiffness * (cutoff - dist))
}
