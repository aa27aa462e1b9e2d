// commands.rs
// SimCommand messages from the input layer and their handlers

use crate::app::SimulationController;
use crate::config::ThermostatKind;
use std::time::Duration;
use tracing::{debug, info};
use ultraviolet::Vec2;

/// User intents, already translated into box coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum SimCommand {
    TogglePause,
    ToggleThermostat,
    CycleThermostatMode,
    SetThermostatMode(ThermostatKind),
    /// Change sub-steps per frame by the given amount
    AdjustSpeed(i32),
    AddParticle { x: f32, y: f32 },
    PointerMoved { x: f32, y: f32 },
    PointerLeft,
    Reset,
}

/// Process a single SimCommand
pub fn process_command(cmd: SimCommand, controller: &mut SimulationController, now: Duration) {
    match cmd {
        SimCommand::TogglePause => handle_toggle_pause(controller),
        SimCommand::ToggleThermostat => controller.toggle_thermostat(),
        SimCommand::CycleThermostatMode => controller.cycle_thermostat_mode(),
        SimCommand::SetThermostatMode(mode) => controller.set_thermostat_mode(mode),
        SimCommand::AdjustSpeed(delta) => handle_adjust_speed(controller, delta),
        SimCommand::AddParticle { x, y } => handle_add_particle(controller, x, y),
        SimCommand::PointerMoved { x, y } => controller.pointer_moved(Vec2::new(x, y)),
        SimCommand::PointerLeft => controller.pointer_left(),
        SimCommand::Reset => handle_reset(controller, now),
    }
}

fn handle_toggle_pause(controller: &mut SimulationController) {
    controller.toggle_pause();
    info!(phase = ?controller.phase(), "pause toggled");
}

fn handle_adjust_speed(controller: &mut SimulationController, delta: i32) {
    controller.adjust_speed(delta);
    info!(
        sub_steps = controller.sim.state.sub_steps_per_frame,
        "speed changed"
    );
}

fn handle_add_particle(controller: &mut SimulationController, x: f32, y: f32) {
    let placed = controller.add_particle_at(Vec2::new(x, y));
    debug!(x, y, placed, "add particle");
}

fn handle_reset(controller: &mut SimulationController, now: Duration) {
    info!("manual reset");
    controller.reset(now);
}
