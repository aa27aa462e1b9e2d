// Centralized configuration for simulation parameters
//
// All values are in reduced Lennard-Jones units (sigma, epsilon, mass, kB).

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use ultraviolet::Vec2;

// ====================
// Box / Force Field
// ====================
pub const BOX_WIDTH: f32 = 48.0;
pub const BOX_HEIGHT: f32 = 18.0;
pub const LJ_SIGMA: f32 = 1.0;
pub const LJ_EPSILON: f32 = 5.0;
pub const PARTICLE_MASS: f32 = 1.0;
pub const BOLTZMANN_CONSTANT: f32 = 1.0;
pub const DEFAULT_DT: f32 = 0.01;

// ====================
// Population
// ====================
pub const INITIAL_PARTICLES: usize = 400;
/// Initial temperature of the bulk (background) group
pub const BULK_TEMPERATURE: f32 = 1.5;
/// Initial temperature of the label group
pub const LABEL_TEMPERATURE: f32 = 4.0;
/// Placement attempts before `add_particle` gives up
pub const SPAWN_ATTEMPTS: usize = 5;
/// Minimum spacing to existing particles, as a fraction of sigma
pub const SPAWN_MIN_SPACING: f32 = 0.95;
/// Consecutive placement misses after which the bulk fill is abandoned
pub const FILL_MAX_MISSES: usize = 500;

// ====================
// Thermostat
// ====================
pub const TARGET_TEMPERATURE: f32 = 2.5;

// ====================
// Playback
// ====================
pub const SUB_STEPS_PER_FRAME: usize = 5;
pub const RESET_INTERVAL_SECS: f32 = 60.0;
pub const STARTUP_HOLD_SECS: f32 = 3.0;
/// Largest displacement per step allowed by the velocity clamp, in sigma
pub const MAX_DISPLACEMENT_PER_STEP: f32 = 0.05;

// ====================
// Pointer obstacle
// ====================
pub const OBSTACLE_RADIUS: f32 = 2.5 * LJ_SIGMA;
pub const OBSTACLE_SPRING_K: f32 = 1000.0;

// ====================
// Label seeding
// ====================
pub const LABEL_TEXT: &str = "MMSL";
pub const LABEL_GAP: usize = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermostatKind {
    /// Instantaneous velocity rescaling to the target temperature
    Rescale,
    /// Extended-variable friction thermostat
    NoseHoover,
}

impl Default for ThermostatKind {
    fn default() -> Self {
        ThermostatKind::Rescale
    }
}

impl ThermostatKind {
    pub fn next(self) -> Self {
        match self {
            ThermostatKind::Rescale => ThermostatKind::NoseHoover,
            ThermostatKind::NoseHoover => ThermostatKind::Rescale,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThermostatConfig {
    pub mode: ThermostatKind,
    /// Whether the thermostat starts enabled (NVT) or disabled (NVE)
    pub enabled: bool,
    pub target_temperature: f32,
    /// Nosé–Hoover thermal mass. Defaults to dof * kB * T_target.
    pub thermal_mass: Option<f32>,
}

impl Default for ThermostatConfig {
    fn default() -> Self {
        Self {
            mode: ThermostatKind::Rescale,
            enabled: false,
            target_temperature: TARGET_TEMPERATURE,
            thermal_mass: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub radius: f32,
    pub spring_k: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            radius: OBSTACLE_RADIUS,
            spring_k: OBSTACLE_SPRING_K,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub text: String,
    /// Sampling stride over the label raster, in pixels (one pixel per sigma)
    pub gap: usize,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            text: LABEL_TEXT.to_string(),
            gap: LABEL_GAP,
        }
    }
}

/// A vertical line of fixed LJ sites at integer heights, with gaps left open.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallConfig {
    pub x: f32,
    #[serde(default)]
    pub holes: Vec<f32>,
}

impl WallConfig {
    pub fn sites(&self, box_height: f32) -> Vec<Vec2> {
        let mut sites = Vec::new();
        let mut y = 0.0f32;
        while y <= box_height {
            if !self.holes.iter().any(|h| (h - y).abs() < 1e-3) {
                sites.push(Vec2::new(self.x, y));
            }
            y += 1.0;
        }
        sites
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub box_width: f32,
    pub box_height: f32,
    pub sigma: f32,
    pub epsilon: f32,
    pub mass: f32,
    pub kb: f32,
    pub dt: f32,
    /// Uniform force added to every particle each step
    pub external_force: [f32; 2],

    pub initial_particles: usize,
    pub bulk_temperature: f32,
    pub label_temperature: f32,
    pub spawn_attempts: usize,
    pub spawn_min_spacing: f32,

    pub thermostat: ThermostatConfig,

    pub sub_steps_per_frame: usize,
    /// Velocity clamp as a maximum displacement per step (in sigma). `None` disables it.
    pub max_displacement_per_step: Option<f32>,
    /// Full re-seed interval. `None` disables the periodic reset.
    pub reset_interval_secs: Option<f32>,
    /// Paused phase after each reset. `None` starts running immediately.
    pub startup_hold_secs: Option<f32>,

    pub obstacle: Option<ObstacleConfig>,
    pub label: Option<LabelConfig>,
    #[serde(default)]
    pub walls: Vec<WallConfig>,
    #[serde(default)]
    pub fixed_sites: Vec<[f32; 2]>,

    /// RNG seed; `None` seeds from the OS
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            box_width: BOX_WIDTH,
            box_height: BOX_HEIGHT,
            sigma: LJ_SIGMA,
            epsilon: LJ_EPSILON,
            mass: PARTICLE_MASS,
            kb: BOLTZMANN_CONSTANT,
            dt: DEFAULT_DT,
            external_force: [0.0, 0.0],
            initial_particles: INITIAL_PARTICLES,
            bulk_temperature: BULK_TEMPERATURE,
            label_temperature: LABEL_TEMPERATURE,
            spawn_attempts: SPAWN_ATTEMPTS,
            spawn_min_spacing: SPAWN_MIN_SPACING,
            thermostat: ThermostatConfig::default(),
            sub_steps_per_frame: SUB_STEPS_PER_FRAME,
            max_displacement_per_step: Some(MAX_DISPLACEMENT_PER_STEP),
            reset_interval_secs: Some(RESET_INTERVAL_SECS),
            startup_hold_secs: Some(STARTUP_HOLD_SECS),
            obstacle: Some(ObstacleConfig::default()),
            label: Some(LabelConfig::default()),
            walls: Vec::new(),
            fixed_sites: Vec::new(),
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: SimConfig = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.box_width > 0.0 && self.box_height > 0.0,
            "box dimensions must be positive, got {}x{}",
            self.box_width,
            self.box_height
        );
        ensure!(self.sigma > 0.0, "sigma must be positive");
        ensure!(self.epsilon.is_finite(), "epsilon must be finite");
        ensure!(self.mass > 0.0, "mass must be positive");
        ensure!(self.kb > 0.0, "kb must be positive");
        ensure!(self.dt > 0.0, "dt must be positive");
        ensure!(
            self.external_force.iter().all(|f| f.is_finite()),
            "external_force must be finite"
        );
        for (name, t) in [
            ("bulk_temperature", self.bulk_temperature),
            ("label_temperature", self.label_temperature),
        ] {
            ensure!(t.is_finite() && t >= 0.0, "{} must be a non-negative number, got {}", name, t);
        }
        ensure!(
            self.spawn_min_spacing.is_finite() && self.spawn_min_spacing >= 0.0,
            "spawn_min_spacing must be a non-negative number"
        );
        ensure!(self.sub_steps_per_frame >= 1, "sub_steps_per_frame must be at least 1");
        ensure!(
            self.thermostat.target_temperature > 0.0,
            "thermostat target temperature must be positive"
        );
        if let Some(q) = self.thermostat.thermal_mass {
            ensure!(q > 0.0, "thermal_mass must be positive");
        }
        if let Some(d) = self.max_displacement_per_step {
            ensure!(
                d.is_finite() && d > 0.0,
                "max_displacement_per_step must be positive, got {}",
                d
            );
        }
        for (name, secs) in [
            ("reset_interval_secs", self.reset_interval_secs),
            ("startup_hold_secs", self.startup_hold_secs),
        ] {
            if let Some(secs) = secs {
                ensure!(secs.is_finite() && secs >= 0.0, "{} must be a non-negative number", name);
            }
        }
        if let Some(label) = &self.label {
            ensure!(label.gap >= 1, "label gap must be at least 1");
        }
        if let Some(obstacle) = &self.obstacle {
            ensure!(
                obstacle.radius.is_finite() && obstacle.radius > 0.0,
                "obstacle radius must be positive"
            );
            ensure!(obstacle.spring_k.is_finite(), "obstacle spring_k must be finite");
        }
        Ok(())
    }

    pub fn external_force(&self) -> Vec2 {
        Vec2::new(self.external_force[0], self.external_force[1])
    }

    /// Fixed sites from explicit points and configured walls, wrapped into the box.
    pub fn fixed_sites(&self) -> Vec<Vec2> {
        let mut sites: Vec<Vec2> = self
            .fixed_sites
            .iter()
            .map(|p| Vec2::new(p[0], p[1]))
            .collect();
        for wall in &self.walls {
            sites.extend(wall.sites(self.box_height));
        }
        for s in &mut sites {
            s.x = s.x.rem_euclid(self.box_width);
            s.y = s.y.rem_euclid(self.box_height);
        }
        sites
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: SimConfig = toml::from_str(
            r#"
            box_width = 20.0
            box_height = 10.0
            epsilon = 1.5

            [thermostat]
            mode = "nose_hoover"
            enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(config.box_width, 20.0);
        assert_eq!(config.epsilon, 1.5);
        assert_eq!(config.sigma, LJ_SIGMA);
        assert_eq!(config.thermostat.mode, ThermostatKind::NoseHoover);
        assert!(config.thermostat.enabled);
        assert_eq!(config.thermostat.target_temperature, TARGET_TEMPERATURE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_degenerate_values() {
        let mut config = SimConfig::default();
        config.box_width = 0.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.sub_steps_per_frame = 0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.label = Some(LabelConfig { text: "A".into(), gap: 0 });
        assert!(config.validate().is_err());

        for d in [-0.05, 0.0, f32::NAN, f32::INFINITY] {
            let mut config = SimConfig::default();
            config.max_displacement_per_step = Some(d);
            assert!(config.validate().is_err(), "accepted max displacement {}", d);
        }

        let mut config = SimConfig::default();
        config.bulk_temperature = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.label_temperature = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.spawn_min_spacing = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.epsilon = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.external_force = [0.0, f32::NAN];
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.obstacle = Some(ObstacleConfig { radius: f32::NAN, ..ObstacleConfig::default() });
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_temperature_toml_is_rejected_on_load() {
        let dir = std::env::temp_dir().join(format!("lj_sim_cfg_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        fs::write(&path, "bulk_temperature = -1.0\nmax_displacement_per_step = -0.05\n").unwrap();
        let err = SimConfig::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("bulk_temperature"), "{}", err);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn wall_skips_holes() {
        let wall = WallConfig { x: 10.0, holes: vec![2.0, 5.0, 8.0] };
        let sites = wall.sites(10.0);
        assert_eq!(sites.len(), 8);
        assert!(sites.iter().all(|s| s.x == 10.0));
        assert!(!sites.iter().any(|s| s.y == 5.0));
    }

    #[test]
    fn fixed_sites_are_wrapped_into_box() {
        let mut config = SimConfig::default();
        config.box_width = 20.0;
        config.box_height = 10.0;
        config.walls = vec![WallConfig { x: 10.0, holes: vec![] }];
        let sites = config.fixed_sites();
        // y = 10 wraps onto y = 0
        assert!(sites.iter().all(|s| s.y >= 0.0 && s.y < 10.0));
        assert_eq!(sites.len(), 11);
    }
}
