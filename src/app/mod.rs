//! Frame-driven controller for the simulation.
//!
//! The render loop calls [`SimulationController::frame`] once per display
//! refresh with the time elapsed since the view was created. The controller
//! decides whether to re-seed, how many integration steps to run and where
//! the pointer obstacle sits, then hands a read-only [`FrameView`] to the
//! render collaborator.

use crate::commands::SimCommand;
use crate::config::{SimConfig, ThermostatKind};
use crate::profile_scope;
use crate::renderer::input::{self, Viewport};
use crate::renderer::{AsciiSink, FrameView, TraceSink};
use crate::simulation::thermal::Thermostat;
use crate::simulation::{obstacle, Simulation};
use simulation_loop::LoopOptions;
use std::io::BufRead;
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;
use tracing::{debug, info};
use ultraviolet::Vec2;

pub mod simulation_loop;

/// Nominal canvas width in pixels used to map pointer input
pub const CANVAS_WIDTH: f32 = 960.0;
/// The text renderer draws every n-th frame
const ASCII_FRAME_STRIDE: u64 = 30;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Paused,
    Running,
}

/// What a call to [`SimulationController::frame`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The auto-reset interval elapsed; particles were re-seeded and no
    /// physics ran this frame.
    Reset,
    /// Paused; state unchanged.
    Held,
    /// Ran this many integration steps.
    Advanced(usize),
}

pub struct SimulationController {
    pub sim: Simulation,
    reset_interval: Option<Duration>,
    startup_hold: Option<Duration>,
    /// Clock reading at which the startup hold releases
    hold_until: Option<Duration>,
    /// Latest pointer sample in box coordinates
    pointer: Option<Vec2>,
}

impl SimulationController {
    /// Build and seed a simulation at clock reading `now`.
    pub fn new(config: SimConfig, now: Duration) -> Self {
        let reset_interval = config.reset_interval_secs.map(Duration::from_secs_f32);
        let startup_hold = config.startup_hold_secs.map(Duration::from_secs_f32);
        let mut controller = Self {
            sim: Simulation::new(config),
            reset_interval,
            startup_hold,
            hold_until: None,
            pointer: None,
        };
        controller.reset(now);
        controller
    }

    pub fn phase(&self) -> Phase {
        if self.sim.state.paused {
            Phase::Paused
        } else {
            Phase::Running
        }
    }

    /// Re-seed everything and enter the startup hold, if one is configured.
    pub fn reset(&mut self, now: Duration) {
        self.sim.reset(now);
        match self.startup_hold {
            Some(hold) => {
                self.sim.state.paused = true;
                self.hold_until = Some(now + hold);
            }
            None => {
                self.sim.state.paused = false;
                self.hold_until = None;
            }
        }
    }

    /// Run one frame's worth of work.
    pub fn frame(&mut self, now: Duration) -> FrameOutcome {
        profile_scope!("frame");
        if let Some(interval) = self.reset_interval {
            if now.saturating_sub(self.sim.state.last_reset) > interval {
                info!(elapsed = ?now.saturating_sub(self.sim.state.last_reset), "auto-reset");
                self.reset(now);
                return FrameOutcome::Reset;
            }
        }

        if let Some(until) = self.hold_until {
            if now >= until {
                self.hold_until = None;
                self.sim.state.paused = false;
                debug!("startup hold released");
            }
        }

        let outcome = if self.sim.state.paused {
            FrameOutcome::Held
        } else {
            let n = self.sim.state.sub_steps_per_frame;
            for _ in 0..n {
                self.sim.step();
            }
            FrameOutcome::Advanced(n)
        };

        self.track_pointer();
        outcome
    }

    fn track_pointer(&mut self) {
        let (Some(params), Some(pointer)) = (self.sim.obstacle, self.pointer) else {
            return;
        };
        let state = &mut self.sim.state;
        state.pointer_obstacle = obstacle::update_center(
            state.pointer_obstacle,
            Some(pointer),
            state.paused,
            &state.particles,
            &params,
            &self.sim.force_field,
        );
    }

    pub fn toggle_pause(&mut self) {
        self.sim.state.paused = !self.sim.state.paused;
    }

    pub fn toggle_thermostat(&mut self) {
        self.sim.state.thermostat_enabled = !self.sim.state.thermostat_enabled;
        info!(enabled = self.sim.state.thermostat_enabled, "thermostat toggled");
    }

    pub fn set_thermostat_mode(&mut self, mode: ThermostatKind) {
        self.sim.set_thermostat_mode(mode);
    }

    pub fn cycle_thermostat_mode(&mut self) {
        let next = self.sim.thermostat.kind().next();
        self.sim.set_thermostat_mode(next);
    }

    /// Change the sub-steps per frame by `delta`, never going below one.
    pub fn adjust_speed(&mut self, delta: i32) {
        let current = self.sim.state.sub_steps_per_frame as i64;
        self.sim.state.sub_steps_per_frame = (current + delta as i64).max(1) as usize;
    }

    pub fn add_particle_at(&mut self, pos: Vec2) -> bool {
        self.sim.add_particle(Some(pos), None)
    }

    /// Record a pointer sample; the obstacle follows it at the end of the next frame.
    pub fn pointer_moved(&mut self, pos: Vec2) {
        self.pointer = Some(pos);
    }

    pub fn pointer_left(&mut self) {
        self.pointer = None;
        self.sim.state.pointer_obstacle = None;
    }

    pub fn view(&self) -> FrameView<'_> {
        let state = &self.sim.state;
        let config = &self.sim.config;
        FrameView {
            particles: &state.particles,
            fixed_sites: &state.fixed_sites,
            box_width: config.box_width,
            box_height: config.box_height,
            obstacle: state.pointer_obstacle,
            obstacle_radius: self.sim.obstacle.map(|o| o.radius).unwrap_or(0.0),
            paused: state.paused,
            label_overlay: if state.paused {
                config.label.as_ref().map(|l| l.text.as_str())
            } else {
                None
            },
            thermostat_enabled: state.thermostat_enabled,
            thermostat_mode: self.sim.thermostat.kind(),
            sub_steps_per_frame: state.sub_steps_per_frame,
            target_temperature: config.thermostat.target_temperature,
        }
    }
}

/// Spawn a thread that turns terminal lines into key commands.
fn spawn_key_reader(tx: Sender<SimCommand>, viewport: Viewport) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            for event in input::parse_keys(&line) {
                if let Some(cmd) = input::translate(event, &viewport) {
                    if tx.send(cmd).is_err() {
                        return;
                    }
                }
            }
        }
    });
}

/// Seed a simulation from `config` and run it until `options.max_frames`.
pub fn run(config: SimConfig, options: LoopOptions, ascii: bool) -> anyhow::Result<()> {
    config.validate()?;
    let viewport = Viewport::for_box(CANVAS_WIDTH, config.box_width, config.box_height);
    let mut controller = SimulationController::new(config, Duration::ZERO);

    let (tx, rx) = mpsc::channel();
    spawn_key_reader(tx, viewport);

    let frames = if ascii {
        let mut sink = AsciiSink::new(std::io::stdout(), ASCII_FRAME_STRIDE);
        simulation_loop::run_simulation_loop(rx, &mut controller, &mut sink, options)
    } else {
        let mut sink = TraceSink::default();
        simulation_loop::run_simulation_loop(rx, &mut controller, &mut sink, options)
    };
    info!(frames, steps = controller.sim.state.steps, "finished");
    Ok(())
}
