// thermal.rs
// Temperature measurement and thermostat strategies

use crate::config::{ThermostatConfig, ThermostatKind};
use crate::particle::Particle;
use tracing::trace;

/// Total kinetic energy `sum(0.5 * m * |v|^2)`.
pub fn kinetic_energy(particles: &[Particle], mass: f32) -> f32 {
    particles.iter().map(|p| 0.5 * mass * p.vel.mag_sq()).sum()
}

/// Degrees of freedom of a 2D system of `n` point particles.
pub fn degrees_of_freedom(n: usize) -> usize {
    2 * n
}

/// Instantaneous temperature `2 KE / (dof kB)`. Zero for an empty system.
pub fn instantaneous_temperature(particles: &[Particle], mass: f32, kb: f32) -> f32 {
    let dof = degrees_of_freedom(particles.len());
    if dof == 0 {
        return 0.0;
    }
    2.0 * kinetic_energy(particles, mass) / (dof as f32 * kb)
}

/// A temperature-control strategy hooked into the velocity-Verlet step.
///
/// The integrator calls, in order within one step: `friction` for the first
/// half-kick, `before_second_kick`, `friction` again for the second half-kick,
/// then `apply`.
pub trait Thermostat {
    fn kind(&self) -> ThermostatKind;

    fn target_temperature(&self) -> f32;

    /// Friction coefficient subtracted from the acceleration in both half-kicks.
    fn friction(&self) -> f32 {
        0.0
    }

    /// Update internal state from the half-step velocities.
    fn before_second_kick(&mut self, _particles: &[Particle], _dof: usize, _dt: f32) {}

    /// Adjust velocities after the second half-kick.
    fn apply(&mut self, _particles: &mut [Particle], _dof: usize) {}
}

/// Instantaneous velocity rescaling onto the target temperature.
#[derive(Clone, Debug)]
pub struct Rescale {
    pub target_temperature: f32,
    pub mass: f32,
    pub kb: f32,
}

impl Thermostat for Rescale {
    fn kind(&self) -> ThermostatKind {
        ThermostatKind::Rescale
    }

    fn target_temperature(&self) -> f32 {
        self.target_temperature
    }

    fn apply(&mut self, particles: &mut [Particle], dof: usize) {
        if dof == 0 {
            return;
        }
        let ke = kinetic_energy(particles, self.mass);
        let current_temp = 2.0 * ke / (dof as f32 * self.kb);
        if !(current_temp > 0.0) || !current_temp.is_finite() {
            trace!(current_temp, "rescale skipped");
            return;
        }
        let scale = (self.target_temperature / current_temp).sqrt();
        for p in particles.iter_mut() {
            p.vel *= scale;
        }
    }
}

/// Nosé–Hoover thermostat. `xi` persists across steps and is read by both
/// half-kicks of a step.
#[derive(Clone, Debug)]
pub struct NoseHoover {
    pub target_temperature: f32,
    pub mass: f32,
    pub kb: f32,
    /// Thermal mass Q
    pub thermal_mass: f32,
    pub xi: f32,
}

impl NoseHoover {
    pub fn new(target_temperature: f32, mass: f32, kb: f32, thermal_mass: f32) -> Self {
        Self {
            target_temperature,
            mass,
            kb,
            thermal_mass,
            xi: 0.0,
        }
    }
}

impl Thermostat for NoseHoover {
    fn kind(&self) -> ThermostatKind {
        ThermostatKind::NoseHoover
    }

    fn target_temperature(&self) -> f32 {
        self.target_temperature
    }

    fn friction(&self) -> f32 {
        self.xi
    }

    fn before_second_kick(&mut self, particles: &[Particle], dof: usize, dt: f32) {
        if dof == 0 {
            return;
        }
        let dof_kb = dof as f32 * self.kb;
        let current_temp = 2.0 * kinetic_energy(particles, self.mass) / dof_kb;
        self.xi += dt * (current_temp - self.target_temperature) * dof_kb / self.thermal_mass;
    }
}

/// Build the strategy selected by `mode`.
///
/// `reference_count` sizes the default Nosé–Hoover thermal mass
/// `Q = dof * kB * T_target`.
pub fn build_thermostat(
    mode: ThermostatKind,
    config: &ThermostatConfig,
    mass: f32,
    kb: f32,
    reference_count: usize,
) -> Box<dyn Thermostat> {
    let target = config.target_temperature;
    match mode {
        ThermostatKind::Rescale => Box::new(Rescale {
            target_temperature: target,
            mass,
            kb,
        }),
        ThermostatKind::NoseHoover => {
            let dof = degrees_of_freedom(reference_count.max(1)) as f32;
            let q = config.thermal_mass.unwrap_or(dof * kb * target);
            Box::new(NoseHoover::new(target, mass, kb, q))
        }
    }
}
