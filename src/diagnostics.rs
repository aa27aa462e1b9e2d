// diagnostics.rs
// Energy and temperature readouts for the simulation, plus a windowed
// temperature average used by the periodic log line.

use crate::particle::Group;
use crate::simulation::thermal::{instantaneous_temperature, kinetic_energy};
use crate::simulation::Simulation;
use std::collections::VecDeque;

/// Instantaneous observables of one simulation state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    pub steps: u64,
    pub particles: usize,
    pub label_particles: usize,
    pub temperature: f32,
    pub kinetic_energy: f32,
    pub potential_energy: f32,
}

impl Snapshot {
    pub fn capture(sim: &Simulation) -> Self {
        let particles = &sim.state.particles;
        Self {
            steps: sim.state.steps,
            particles: particles.len(),
            label_particles: particles.iter().filter(|p| p.group() == Group::Label).count(),
            temperature: instantaneous_temperature(particles, sim.config.mass, sim.config.kb),
            kinetic_energy: kinetic_energy(particles, sim.config.mass),
            potential_energy: sim
                .force_field
                .potential_energy(particles, &sim.state.fixed_sites),
        }
    }

    pub fn total_energy(&self) -> f32 {
        self.kinetic_energy + self.potential_energy
    }
}

/// Running mean of the last `window` temperature samples.
pub struct TemperatureMonitor {
    window: usize,
    history: VecDeque<f32>,
}

impl TemperatureMonitor {
    /// A window of 1 disables averaging.
    pub fn new(window: usize) -> Self {
        Self {
            window: window.max(1),
            history: VecDeque::new(),
        }
    }

    pub fn push(&mut self, temperature: f32) {
        self.history.push_back(temperature);
        if self.history.len() > self.window {
            self.history.pop_front();
        }
    }

    pub fn average(&self) -> Option<f32> {
        if self.history.is_empty() {
            return None;
        }
        Some(self.history.iter().copied().sum::<f32>() / self.history.len() as f32)
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monitor_keeps_only_window() {
        let mut m = TemperatureMonitor::new(2);
        assert_eq!(m.average(), None);
        m.push(1.0);
        m.push(2.0);
        m.push(4.0);
        assert_eq!(m.average(), Some(3.0));
        m.clear();
        assert_eq!(m.average(), None);
    }
}
