use super::{FrameOutcome, SimulationController};
use crate::commands::{process_command, SimCommand};
use crate::diagnostics::{Snapshot, TemperatureMonitor};
use crate::profile_scope;
use crate::renderer::FrameSink;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoopOptions {
    pub fps: f32,
    /// Stop after this many frames; `None` runs forever
    pub max_frames: Option<u64>,
    /// Pace frames against the wall clock. Otherwise the clock advances by
    /// exactly one frame period per frame.
    pub realtime: bool,
    /// Frames between diagnostic log lines
    pub log_every: u64,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            fps: 60.0,
            max_frames: None,
            realtime: true,
            log_every: 60,
        }
    }
}

/// Clock reading at the start of `frame`.
pub fn frame_time(period: Duration, frame: u64) -> Duration {
    period.mul_f64(frame as f64)
}

/// Drive the controller frame by frame: drain pending commands, advance,
/// present. Returns the number of frames run.
pub fn run_simulation_loop(
    rx: Receiver<SimCommand>,
    controller: &mut SimulationController,
    sink: &mut dyn FrameSink,
    options: LoopOptions,
) -> u64 {
    let period = Duration::from_secs_f32(1.0 / options.fps.max(1.0));
    let start = Instant::now();
    let mut monitor = TemperatureMonitor::new(options.log_every as usize);
    let mut commands_open = true;
    let mut frame: u64 = 0;

    loop {
        if options.max_frames.is_some_and(|max| frame >= max) {
            break;
        }
        let now = if options.realtime {
            start.elapsed()
        } else {
            frame_time(period, frame)
        };

        while commands_open {
            match rx.try_recv() {
                Ok(cmd) => process_command(cmd, controller, now),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!(frame, "command channel closed");
                    commands_open = false;
                }
            }
        }

        let outcome = {
            profile_scope!("simulation_loop");
            controller.frame(now)
        };

        let invalid = controller
            .sim
            .state
            .particles
            .iter()
            .filter(|p| !(p.pos.x.is_finite() && p.pos.y.is_finite() && p.vel.x.is_finite() && p.vel.y.is_finite()))
            .count();
        if invalid > 0 {
            warn!(invalid, "non-finite particle state, re-seeding");
            controller.reset(now);
        }

        if outcome == FrameOutcome::Reset {
            monitor.clear();
        } else {
            monitor.push(controller.sim.temperature());
        }
        sink.present(&controller.view());
        frame += 1;

        if options.log_every > 0 && frame % options.log_every == 0 {
            let snap = Snapshot::capture(&controller.sim);
            info!(
                frame,
                steps = snap.steps,
                particles = snap.particles,
                temperature = snap.temperature,
                mean_temperature = monitor.average().unwrap_or(snap.temperature),
                total_energy = snap.total_energy(),
                "status"
            );
            #[cfg(feature = "profiling")]
            crate::PROFILER.lock().log_and_clear();
        }

        if options.realtime {
            let deadline = frame_time(period, frame);
            if let Some(wait) = deadline.checked_sub(start.elapsed()) {
                std::thread::sleep(wait);
            }
        }
    }
    frame
}
