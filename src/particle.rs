// particle.rs
// Contains the Group enum and the Particle record

use ultraviolet::Vec2;

/// Visual/thermal class of a particle. Fixed at creation.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Group {
    /// Background fluid, spawned at random positions
    Bulk,
    /// Particles seeded on the label mask
    Label,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Force accumulator. Rewritten by every force evaluation.
    pub force: Vec2,
    group: Group,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, group: Group) -> Self {
        Self {
            pos,
            vel,
            force: Vec2::zero(),
            group,
        }
    }

    pub fn group(&self) -> Group {
        self.group
    }

    /// Per-particle kinetic measure used for render alpha (unit mass).
    pub fn local_temperature(&self) -> f32 {
        0.5 * self.vel.mag_sq()
    }
}
