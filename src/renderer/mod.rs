//! Presentation layer.
//!
//! The physics core never draws. Each frame the controller hands a
//! [`FrameView`] to a [`FrameSink`], which decides how to show it. Colors are
//! computed here so every sink agrees on them.

pub mod input;

use crate::config::ThermostatKind;
use crate::particle::{Group, Particle};
use palette::{Hsv, IntoColor, Srgb};
use std::io::Write;
use tracing::{debug, warn};
use ultraviolet::Vec2;

const BULK_HUE: f32 = 220.0;
const LABEL_HUE: f32 = 0.0;
const OBSTACLE_HUE: f32 = 120.0;
const SATURATION: f32 = 0.8;
const VALUE: f32 = 0.8;
const MIN_ALPHA: f32 = 50.0;
const MAX_ALPHA: f32 = 255.0;
const OBSTACLE_ALPHA: u8 = 100;
/// Local temperature that maps to full opacity, in units of the target temperature
const HOT_FACTOR: f32 = 3.0;

/// Read-only view of one frame.
#[derive(Clone, Debug)]
pub struct FrameView<'a> {
    pub particles: &'a [Particle],
    pub fixed_sites: &'a [Vec2],
    pub box_width: f32,
    pub box_height: f32,
    pub obstacle: Option<Vec2>,
    pub obstacle_radius: f32,
    pub paused: bool,
    /// Label text drawn behind the particles while paused
    pub label_overlay: Option<&'a str>,
    pub thermostat_enabled: bool,
    pub thermostat_mode: ThermostatKind,
    pub sub_steps_per_frame: usize,
    pub target_temperature: f32,
}

impl FrameView<'_> {
    /// The obstacle is only shown while the simulation runs.
    pub fn visible_obstacle(&self) -> Option<Vec2> {
        if self.paused {
            None
        } else {
            self.obstacle
        }
    }
}

pub trait FrameSink {
    fn present(&mut self, view: &FrameView<'_>);
}

fn hsv_rgba(hue: f32, alpha: u8) -> [u8; 4] {
    let hsv: Hsv = Hsv::new(hue, SATURATION, VALUE);
    let rgb: Srgb = hsv.into_color();
    [
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
        alpha,
    ]
}

/// Opacity from local temperature, linearly mapped from `[0, 3 T_target]`
/// onto `[50, 255]` and clamped.
pub fn particle_alpha(particle: &Particle, target_temperature: f32) -> u8 {
    let hot = HOT_FACTOR * target_temperature;
    let t = if hot > 0.0 {
        (particle.local_temperature() / hot).clamp(0.0, 1.0)
    } else {
        1.0
    };
    (MIN_ALPHA + t * (MAX_ALPHA - MIN_ALPHA)).round() as u8
}

pub fn particle_color(particle: &Particle, target_temperature: f32) -> [u8; 4] {
    let hue = match particle.group() {
        Group::Bulk => BULK_HUE,
        Group::Label => LABEL_HUE,
    };
    hsv_rgba(hue, particle_alpha(particle, target_temperature))
}

pub fn obstacle_color() -> [u8; 4] {
    hsv_rgba(OBSTACLE_HUE, OBSTACLE_ALPHA)
}

/// Logs a one-line summary of each frame at debug level.
#[derive(Default)]
pub struct TraceSink {
    frames: u64,
}

impl FrameSink for TraceSink {
    fn present(&mut self, view: &FrameView<'_>) {
        self.frames += 1;
        debug!(
            frame = self.frames,
            particles = view.particles.len(),
            paused = view.paused,
            obstacle = ?view.visible_obstacle(),
            "frame"
        );
    }
}

/// Draws frames as text, one character cell per sigma.
///
/// Label particles are `#`, bulk particles are `.`, `o` or `*` by local
/// temperature, fixed sites are `|` and the obstacle is `@`. While paused the
/// label text is printed on the status line.
pub struct AsciiSink<W: Write> {
    out: W,
    /// Only every n-th frame is drawn
    every: u64,
    frames: u64,
}

impl<W: Write> AsciiSink<W> {
    pub fn new(out: W, every: u64) -> Self {
        Self {
            out,
            every: every.max(1),
            frames: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Character grid for one frame, row 0 at the top.
    pub fn rasterize(view: &FrameView<'_>) -> Vec<Vec<char>> {
        let cols = view.box_width.ceil().max(1.0) as usize;
        let rows = view.box_height.ceil().max(1.0) as usize;
        let sx = cols as f32 / view.box_width;
        let sy = rows as f32 / view.box_height;
        let mut grid = vec![vec![' '; cols]; rows];
        let cell = |p: Vec2| {
            let c = ((p.x * sx) as usize).min(cols - 1);
            let r = ((p.y * sy) as usize).min(rows - 1);
            (r, c)
        };

        for &site in view.fixed_sites {
            let (r, c) = cell(site);
            grid[r][c] = '|';
        }
        for p in view.particles {
            let (r, c) = cell(p.pos);
            grid[r][c] = match p.group() {
                Group::Label => '#',
                Group::Bulk => match particle_alpha(p, view.target_temperature) {
                    0..=110 => '.',
                    111..=190 => 'o',
                    _ => '*',
                },
            };
        }
        if let Some(center) = view.visible_obstacle() {
            let (r, c) = cell(center);
            grid[r][c] = '@';
        }
        grid
    }
}

impl<W: Write> FrameSink for AsciiSink<W> {
    fn present(&mut self, view: &FrameView<'_>) {
        self.frames += 1;
        if (self.frames - 1) % self.every != 0 {
            return;
        }
        let grid = Self::rasterize(view);
        let mut text = String::with_capacity(grid.len() * (grid[0].len() + 3));
        let border = format!("+{}+\n", "-".repeat(grid[0].len()));
        text.push_str(&border);
        for row in &grid {
            text.push('|');
            text.extend(row.iter());
            text.push_str("|\n");
        }
        text.push_str(&border);
        text.push_str(&format!(
            "{} thermostat={} ({:?}) steps/frame={}\n",
            match view.label_overlay {
                Some(label) if view.paused => format!("[paused: {}]", label),
                _ if view.paused => "[paused]".to_string(),
                _ => "[running]".to_string(),
            },
            if view.thermostat_enabled { "on" } else { "off" },
            view.thermostat_mode,
            view.sub_steps_per_frame,
        ));
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!(error = %e, "failed to write frame");
        }
    }
}

#[cfg(test)]
mod tests;
