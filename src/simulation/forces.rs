//! Force calculation for the particle simulation.
//!
//! Provides the 12-6 Lennard-Jones pair force and potential under the
//! periodic minimum-image convention, plus the per-step force pass used by
//! the integrator (pairs, fixed sites, uniform bias).

use crate::particle::Particle;
use crate::profile_scope;
use ultraviolet::Vec2;

/// Immutable force-field parameters, in reduced units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceFieldParams {
    pub sigma: f32,
    pub epsilon: f32,
    pub box_width: f32,
    pub box_height: f32,
}

impl ForceFieldParams {
    pub fn from_config(config: &crate::config::SimConfig) -> Self {
        Self {
            sigma: config.sigma,
            epsilon: config.epsilon,
            box_width: config.box_width,
            box_height: config.box_height,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ForceField {
    pub params: ForceFieldParams,
}

impl ForceField {
    pub fn new(params: ForceFieldParams) -> Self {
        Self { params }
    }

    /// Nearest-image displacement `a - b` in the periodic box.
    pub fn minimum_image(&self, a: Vec2, b: Vec2) -> Vec2 {
        let w = self.params.box_width;
        let h = self.params.box_height;
        let mut d = a - b;
        d.x -= w * (d.x / w).round();
        d.y -= h * (d.y / h).round();
        d
    }

    pub fn distance(&self, a: Vec2, b: Vec2) -> f32 {
        self.minimum_image(a, b).mag()
    }

    /// Map a position back into `[0, W) x [0, H)`.
    pub fn wrap(&self, pos: Vec2) -> Vec2 {
        Vec2::new(
            wrap_coord(pos.x, self.params.box_width),
            wrap_coord(pos.y, self.params.box_height),
        )
    }

    /// Force on a particle at `p1` exerted by one at `p2`.
    /// Positive magnitude pushes the two apart.
    pub fn pair_force(&self, p1: Vec2, p2: Vec2) -> Vec2 {
        let d = self.minimum_image(p1, p2);
        let r2 = d.mag_sq();
        if r2 == 0.0 {
            return Vec2::zero();
        }
        let sigma2 = self.params.sigma * self.params.sigma;
        let sr2 = sigma2 / r2;
        let sr6 = sr2 * sr2 * sr2;
        let fmag = 48.0 * self.params.epsilon * sr6 * (sr6 - 0.5) / r2;
        d * fmag
    }

    pub fn pair_potential(&self, p1: Vec2, p2: Vec2) -> f32 {
        let r2 = self.minimum_image(p1, p2).mag_sq();
        if r2 == 0.0 {
            return 0.0;
        }
        let sigma2 = self.params.sigma * self.params.sigma;
        let sr2 = sigma2 / r2;
        let sr6 = sr2 * sr2 * sr2;
        4.0 * self.params.epsilon * (sr6 * sr6 - sr6)
    }

    /// Clear and recompute the force on every particle.
    ///
    /// Each unordered pair is evaluated once and applied with opposite signs.
    /// Fixed sites push on particles but are never pushed back.
    pub fn compute_forces(&self, particles: &mut [Particle], fixed_sites: &[Vec2], bias: Vec2) {
        profile_scope!("forces_lj");
        for p in particles.iter_mut() {
            p.force = Vec2::zero();
        }
        let n = particles.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let f = self.pair_force(particles[i].pos, particles[j].pos);
                particles[i].force += f;
                particles[j].force -= f;
            }
        }
        if !fixed_sites.is_empty() {
            for p in particles.iter_mut() {
                for &site in fixed_sites {
                    p.force += self.pair_force(p.pos, site);
                }
            }
        }
        if bias != Vec2::zero() {
            for p in particles.iter_mut() {
                p.force += bias;
            }
        }
    }

    /// Total pair potential energy, including particle/site interactions.
    pub fn potential_energy(&self, particles: &[Particle], fixed_sites: &[Vec2]) -> f32 {
        let n = particles.len();
        let mut energy = 0.0;
        for i in 0..n {
            for j in (i + 1)..n {
                energy += self.pair_potential(particles[i].pos, particles[j].pos);
            }
            for &site in fixed_sites {
                energy += self.pair_potential(particles[i].pos, site);
            }
        }
        energy
    }
}

fn wrap_coord(x: f32, len: f32) -> f32 {
    let w = x.rem_euclid(len);
    // rem_euclid can round up to exactly `len` for tiny negative inputs
    if w >= len {
        0.0
    } else {
        w
    }
}
