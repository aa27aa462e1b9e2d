// simulation/simulation.rs
// Contains SimulationState and the Simulation bundle (new, reset, step, add_particle)

use super::forces::{ForceField, ForceFieldParams};
use super::integrator::{Integrator, IntegratorParams};
use super::obstacle::{self, ObstacleParams};
use super::thermal::{build_thermostat, Thermostat};
use crate::config::{SimConfig, ThermostatKind};
use crate::particle::{Group, Particle};
use crate::profile_scope;
use crate::spawn::{ParticleField, SpawnParams};
use crate::text_mask;
use std::time::Duration;
use tracing::info;
use ultraviolet::Vec2;

/// Mutable simulation state. Owned by [`Simulation`], mutated only by the
/// step function and by command handlers on the same thread.
#[derive(Clone, Debug)]
pub struct SimulationState {
    pub particles: Vec<Particle>,
    /// Immobile LJ sites (walls)
    pub fixed_sites: Vec<Vec2>,
    pub paused: bool,
    pub thermostat_enabled: bool,
    pub sub_steps_per_frame: usize,
    /// Repulsion center; `None` while the pointer is off the surface
    pub pointer_obstacle: Option<Vec2>,
    /// Frame clock reading at the last (re)seed
    pub last_reset: Duration,
    /// Integration steps since the last reset
    pub steps: u64,
}

impl SimulationState {
    pub fn new(config: &SimConfig) -> Self {
        Self {
            particles: Vec::new(),
            fixed_sites: config.fixed_sites(),
            paused: false,
            thermostat_enabled: config.thermostat.enabled,
            sub_steps_per_frame: config.sub_steps_per_frame.max(1),
            pointer_obstacle: None,
            last_reset: Duration::ZERO,
            steps: 0,
        }
    }
}

/// The physics core: state plus the components that advance it.
pub struct Simulation {
    pub config: SimConfig,
    pub state: SimulationState,
    pub force_field: ForceField,
    pub integrator: Integrator,
    pub thermostat: Box<dyn Thermostat>,
    pub obstacle: Option<ObstacleParams>,
    pub field: ParticleField,
}

impl Simulation {
    /// Build an empty simulation. Call [`Simulation::reset`] to seed particles.
    pub fn new(config: SimConfig) -> Self {
        let force_field = ForceField::new(ForceFieldParams::from_config(&config));
        let integrator = Integrator::new(IntegratorParams::from_config(&config));
        let thermostat = build_thermostat(
            config.thermostat.mode,
            &config.thermostat,
            config.mass,
            config.kb,
            config.initial_particles,
        );
        let obstacle = config.obstacle.as_ref().map(ObstacleParams::from);
        let field = ParticleField::new(SpawnParams::from_config(&config), config.seed);
        let state = SimulationState::new(&config);
        Self {
            config,
            state,
            force_field,
            integrator,
            thermostat,
            obstacle,
            field,
        }
    }

    /// Clear all particles and re-seed: label particles on the text mask,
    /// bulk particles elsewhere, obstacle parked clear of matter.
    pub fn reset(&mut self, now: Duration) {
        profile_scope!("reset");
        self.state.particles.clear();
        self.state.steps = 0;
        self.state.last_reset = now;
        self.thermostat = build_thermostat(
            self.thermostat.kind(),
            &self.config.thermostat,
            self.config.mass,
            self.config.kb,
            self.config.initial_particles,
        );

        let seeds = match &self.config.label {
            Some(label) => text_mask::seed_label_positions(
                &label.text,
                self.config.box_width,
                self.config.box_height,
                label.gap,
            ),
            None => Vec::new(),
        };
        let placed = self.field.populate(
            &mut self.state.particles,
            &self.state.fixed_sites,
            &self.force_field,
            &seeds,
            self.config.initial_particles,
        );

        self.state.pointer_obstacle = self
            .obstacle
            .as_ref()
            .map(|params| obstacle::find_safe_start(&self.state.particles, params, &self.force_field));

        self.refresh_forces();
        info!(
            placed,
            label_seeds = seeds.len(),
            budget = self.config.initial_particles,
            "simulation seeded"
        );
    }

    /// Recompute forces for the current positions so the next half-kick
    /// starts from a consistent state.
    pub fn refresh_forces(&mut self) {
        self.force_field.compute_forces(
            &mut self.state.particles,
            &self.state.fixed_sites,
            self.integrator.params.external_force,
        );
        if let (Some(params), Some(center)) = (self.obstacle.as_ref(), self.state.pointer_obstacle) {
            obstacle::apply_repulsion(&mut self.state.particles, center, params, &self.force_field);
        }
    }

    /// Advance physics by one timestep.
    pub fn step(&mut self) {
        self.integrator.step(
            &mut self.state,
            &self.force_field,
            self.thermostat.as_mut(),
            self.obstacle.as_ref(),
        );
    }

    /// Best-effort placement of one particle; `false` if no free spot was found.
    pub fn add_particle(&mut self, pos: Option<Vec2>, group: Option<Group>) -> bool {
        self.field.add_particle(
            &mut self.state.particles,
            &self.state.fixed_sites,
            &self.force_field,
            pos,
            group,
        )
    }

    /// Swap the active thermostat strategy. The new strategy starts fresh.
    pub fn set_thermostat_mode(&mut self, mode: ThermostatKind) {
        if self.thermostat.kind() == mode {
            return;
        }
        self.thermostat = build_thermostat(
            mode,
            &self.config.thermostat,
            self.config.mass,
            self.config.kb,
            self.config.initial_particles,
        );
        info!(?mode, "thermostat mode changed");
    }

    pub fn temperature(&self) -> f32 {
        super::thermal::instantaneous_temperature(
            &self.state.particles,
            self.config.mass,
            self.config.kb,
        )
    }
}
