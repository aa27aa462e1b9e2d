// simulation/obstacle.rs
// Pointer-driven repulsive obstacle: spring force, per-frame update policy,
// and the parked start position used after a reset

use super::forces::ForceField;
use crate::particle::Particle;
use ultraviolet::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObstacleParams {
    pub radius: f32,
    pub spring_k: f32,
}

impl From<&crate::config::ObstacleConfig> for ObstacleParams {
    fn from(cfg: &crate::config::ObstacleConfig) -> Self {
        Self {
            radius: cfg.radius,
            spring_k: cfg.spring_k,
        }
    }
}

/// Add a linear spring repulsion `k * (R - r)` to every particle inside the
/// obstacle, directed from the center towards the particle.
pub fn apply_repulsion(
    particles: &mut [Particle],
    center: Vec2,
    params: &ObstacleParams,
    field: &ForceField,
) {
    let r0 = params.radius;
    for p in particles.iter_mut() {
        let d = field.minimum_image(p.pos, center);
        let r2 = d.mag_sq();
        if r2 >= r0 * r0 {
            continue;
        }
        // A particle exactly at the center has no defined normal
        let r = if r2 > 0.0 { r2.sqrt() } else { r0 };
        let overlap = r0 - r;
        p.force += d / r * (params.spring_k * overlap);
    }
}

/// True when every particle is at least `clearance` away from `pos`.
pub fn is_clear(particles: &[Particle], pos: Vec2, clearance: f32, field: &ForceField) -> bool {
    particles
        .iter()
        .all(|p| field.distance(p.pos, pos) >= clearance)
}

/// Per-frame obstacle update.
///
/// While running the obstacle follows the pointer directly. While paused it
/// only moves onto a candidate that does not overlap matter, so resuming never
/// starts with particles inside the obstacle. A missing pointer clears it.
pub fn update_center(
    current: Option<Vec2>,
    pointer: Option<Vec2>,
    paused: bool,
    particles: &[Particle],
    params: &ObstacleParams,
    field: &ForceField,
) -> Option<Vec2> {
    let candidate = match pointer {
        Some(c) => c,
        None => return None,
    };
    if !paused {
        return Some(candidate);
    }
    let clearance = field.params.sigma + params.radius;
    if is_clear(particles, candidate, clearance, field) {
        Some(candidate)
    } else {
        current
    }
}

/// Smallest grid step of the parking scan, in sigma
const MIN_SCAN_STEP: f32 = 0.05;

/// First grid point (row-major, margin `sigma + R`, step `R` but at least
/// `MIN_SCAN_STEP` sigma) clear of all particles, or the box center if none is.
pub fn find_safe_start(particles: &[Particle], params: &ObstacleParams, field: &ForceField) -> Vec2 {
    let w = field.params.box_width;
    let h = field.params.box_height;
    let margin = field.params.sigma + params.radius;
    let step = params.radius.max(MIN_SCAN_STEP * field.params.sigma);
    let mut y = margin;
    while y < h - margin {
        let mut x = margin;
        while x < w - margin {
            let pos = Vec2::new(x, y);
            if is_clear(particles, pos, margin, field) {
                return pos;
            }
            x += step;
        }
        y += step;
    }
    Vec2::new(w / 2.0, h / 2.0)
}
