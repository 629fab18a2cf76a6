//! Central-mass gravity and the velocity-Verlet integrator
//!
//! Bodies live in the central mass's frame: a body's position is its offset
//! from the central mass, so the force always points at the origin.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// The dominant point mass every body orbits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CentralMass {
    /// Screen-space anchor the scene is drawn around
    pub position: DVec3,
    /// Gravitational parameter G·M in scene units
    pub mass: f64,
    /// Separations below this are clamped when computing the force (0 disables)
    pub min_separation: f64,
}

impl CentralMass {
    pub fn new(position: DVec3, mass: f64, min_separation: f64) -> Self {
        Self {
            position,
            mass,
            min_separation,
        }
    }

    /// Acceleration of a body at `offset` from the central mass
    ///
    /// `a = -mass * r / |r|^3`, with `|r|` floored at `min_separation`.
    /// A body exactly at the centre has no defined direction and gets zero.
    #[inline]
    pub fn acceleration(&self, offset: DVec3) -> DVec3 {
        let r = offset.length();
        if r == 0.0 {
            return DVec3::ZERO;
        }
        let d = r.max(self.min_separation);
        offset * (-self.mass / (r * d * d))
    }
}

/// Advance `(position, velocity)` by `substeps` velocity-Verlet steps of size `dt`
///
/// The acceleration at the end of one sub-step seeds the next, so each sub-step
/// costs a single force evaluation.
pub fn leapfrog(
    position: &mut DVec3,
    velocity: &mut DVec3,
    central: &CentralMass,
    dt: f64,
    substeps: u32,
) {
    let half_dt = 0.5 * dt;
    let mut acc = central.acceleration(*position);

    for _ in 0..substeps {
        // Drift with the current acceleration folded in
        *position += *velocity * dt + acc * (dt * half_dt);

        // Kick, re-evaluate, kick
        *velocity += acc * half_dt;
        acc = central.acceleration(*position);
        *velocity += acc * half_dt;
    }
}

/// Specific orbital energy `v²/2 - mass/|r|`
#[inline]
pub fn specific_energy(position: DVec3, velocity: DVec3, central: &CentralMass) -> f64 {
    0.5 * velocity.length_squared() - central.mass / position.length()
}

/// Specific angular momentum `r × v`
#[inline]
pub fn specific_angular_momentum(position: DVec3, velocity: DVec3) -> DVec3 {
    position.cross(velocity)
}
