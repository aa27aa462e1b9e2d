//! Velocity-Verlet time integration
//!
//! One `step` performs: half-kick, drift with periodic wrap, force pass,
//! obstacle repulsion, second half-kick, thermostat and the optional
//! velocity clamp. The Nosé–Hoover friction enters both half-kicks.

use super::forces::ForceField;
use super::obstacle::{self, ObstacleParams};
use super::simulation::SimulationState;
use super::thermal::{degrees_of_freedom, Thermostat};
use crate::particle::Particle;
use crate::profile_scope;
use ultraviolet::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntegratorParams {
    pub dt: f32,
    pub mass: f32,
    /// Uniform force added to every particle after the pair pass
    pub external_force: Vec2,
    /// Component-wise velocity limit is `max_displacement / dt`
    pub max_displacement: Option<f32>,
}

impl IntegratorParams {
    pub fn from_config(config: &crate::config::SimConfig) -> Self {
        Self {
            dt: config.dt,
            mass: config.mass,
            external_force: config.external_force(),
            max_displacement: config.max_displacement_per_step.map(|d| d * config.sigma),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Integrator {
    pub params: IntegratorParams,
}

impl Integrator {
    pub fn new(params: IntegratorParams) -> Self {
        Self { params }
    }

    /// Advance `state` by one timestep.
    ///
    /// The thermostat participates only when `state.thermostat_enabled`; the
    /// obstacle only when both `obstacle` and `state.pointer_obstacle` are set.
    pub fn step(
        &self,
        state: &mut SimulationState,
        field: &ForceField,
        thermostat: &mut dyn Thermostat,
        obstacle: Option<&ObstacleParams>,
    ) {
        profile_scope!("integrator_step");
        let dt = self.params.dt;
        let mass = self.params.mass;
        let thermo_on = state.thermostat_enabled;
        let dof = degrees_of_freedom(state.particles.len());

        let xi = if thermo_on { thermostat.friction() } else { 0.0 };
        half_kick(&mut state.particles, mass, dt, xi);

        for p in state.particles.iter_mut() {
            p.pos = field.wrap(p.pos + p.vel * dt);
        }

        field.compute_forces(
            &mut state.particles,
            &state.fixed_sites,
            self.params.external_force,
        );

        if let (Some(params), Some(center)) = (obstacle, state.pointer_obstacle) {
            obstacle::apply_repulsion(&mut state.particles, center, params, field);
        }

        let xi = if thermo_on {
            thermostat.before_second_kick(&state.particles, dof, dt);
            thermostat.friction()
        } else {
            0.0
        };
        half_kick(&mut state.particles, mass, dt, xi);

        if thermo_on {
            thermostat.apply(&mut state.particles, dof);
        }

        if let Some(max_disp) = self.params.max_displacement {
            let vmax = max_disp / dt;
            for p in state.particles.iter_mut() {
                p.vel.x = p.vel.x.clamp(-vmax, vmax);
                p.vel.y = p.vel.y.clamp(-vmax, vmax);
            }
        }

        state.steps += 1;
    }
}

fn half_kick(particles: &mut [Particle], mass: f32, dt: f32, xi: f32) {
    for p in particles.iter_mut() {
        p.vel += p.force / mass * (0.5 * dt) - p.vel * (0.5 * xi * dt);
    }
}
