// spawn.rs
// Particle placement: random or explicit positions, overlap rejection with a
// fixed retry budget, and Maxwell-Boltzmann velocity sampling per group

use crate::config::{self, SimConfig};
use crate::particle::{Group, Particle};
use crate::simulation::forces::ForceField;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use tracing::{debug, warn};
use ultraviolet::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnParams {
    pub mass: f32,
    pub kb: f32,
    pub bulk_temperature: f32,
    pub label_temperature: f32,
    pub attempts: usize,
    /// Rejection distance to existing particles and fixed sites
    pub min_distance: f32,
}

impl SpawnParams {
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            mass: config.mass,
            kb: config.kb,
            bulk_temperature: config.bulk_temperature,
            label_temperature: config.label_temperature,
            attempts: config.spawn_attempts,
            min_distance: config.spawn_min_spacing * config.sigma,
        }
    }

    pub fn temperature(&self, group: Group) -> f32 {
        match group {
            Group::Bulk => self.bulk_temperature,
            Group::Label => self.label_temperature,
        }
    }
}

/// Owns the placement policy and the random source; the particles themselves
/// are passed in explicitly.
pub struct ParticleField {
    pub params: SpawnParams,
    rng: StdRng,
}

impl ParticleField {
    pub fn new(params: SpawnParams, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self { params, rng }
    }

    /// Sample a velocity with independent Gaussian components of standard
    /// deviation `sqrt(kB T / m)`.
    pub fn sample_velocity(&mut self, temperature: f32) -> Vec2 {
        let sigma = (self.params.kb * temperature / self.params.mass).sqrt();
        let vx: f32 = StandardNormal.sample(&mut self.rng);
        let vy: f32 = StandardNormal.sample(&mut self.rng);
        Vec2::new(vx * sigma, vy * sigma)
    }

    /// Try to place one particle. Random coordinates are drawn for each
    /// attempt when `pos` is `None`; an explicit `pos` is retried as-is and
    /// rejected outright if not finite.
    /// Returns `false` once the attempt budget is spent.
    pub fn add_particle(
        &mut self,
        particles: &mut Vec<Particle>,
        fixed_sites: &[Vec2],
        field: &ForceField,
        pos: Option<Vec2>,
        group: Option<Group>,
    ) -> bool {
        if pos.is_some_and(|p| !(p.x.is_finite() && p.y.is_finite())) {
            debug!(?pos, "rejected non-finite position");
            return false;
        }
        let w = field.params.box_width;
        let h = field.params.box_height;
        for _ in 0..self.params.attempts {
            let candidate = match pos {
                Some(p) => field.wrap(p),
                None => Vec2::new(self.rng.random_range(0.0..w), self.rng.random_range(0.0..h)),
            };
            if overlaps_any(particles, fixed_sites, candidate, self.params.min_distance, field) {
                continue;
            }
            let group = group.unwrap_or(Group::Bulk);
            let vel = self.sample_velocity(self.params.temperature(group));
            particles.push(Particle::new(candidate, vel, group));
            return true;
        }
        false
    }

    /// Place one label particle per seed (up to `budget`), then fill the rest
    /// of the budget with randomly placed bulk particles.
    ///
    /// Returns the number of particles placed.
    pub fn populate(
        &mut self,
        particles: &mut Vec<Particle>,
        fixed_sites: &[Vec2],
        field: &ForceField,
        seeds: &[Vec2],
        budget: usize,
    ) -> usize {
        let start = particles.len();
        let mut label_misses = 0;
        for &seed in seeds.iter().take(budget) {
            if !self.add_particle(particles, fixed_sites, field, Some(seed), Some(Group::Label)) {
                label_misses += 1;
            }
        }
        if label_misses > 0 {
            debug!(label_misses, seeds = seeds.len(), "label seeds rejected");
        }

        let mut misses = 0;
        while particles.len() - start < budget {
            if self.add_particle(particles, fixed_sites, field, None, None) {
                misses = 0;
            } else {
                misses += 1;
                if misses >= config::FILL_MAX_MISSES {
                    warn!(
                        placed = particles.len() - start,
                        budget, "bulk fill abandoned, box too dense"
                    );
                    break;
                }
            }
        }
        particles.len() - start
    }
}

/// True if `pos` lies closer than `min_distance` (minimum image) to any
/// particle or fixed site.
pub fn overlaps_any(
    particles: &[Particle],
    fixed_sites: &[Vec2],
    pos: Vec2,
    min_distance: f32,
    field: &ForceField,
) -> bool {
    particles
        .iter()
        .map(|p| p.pos)
        .chain(fixed_sites.iter().copied())
        .any(|q| field.distance(pos, q) < min_distance)
}
