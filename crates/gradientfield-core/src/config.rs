//! Field tuning, presets, and the on-disk application config.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// How repulsion strength decays between the pointer and the interaction radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Falloff {
    /// `(1 - d/R)^2`
    Quadratic,
    /// `1 - d/R`
    Linear,
}

impl Falloff {
    /// Weight in `[0, 1]` for a normalized distance `d/R`.
    pub fn weight(self, ratio: f32) -> f32 {
        let w = (1.0 - ratio).clamp(0.0, 1.0);
        match self {
            Falloff::Quadratic => w * w,
            Falloff::Linear => w,
        }
    }
}

/// Rule used to move a particle toward its target each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Integrator {
    /// Velocity spring with damping.
    Spring,
    /// Plain exponential approach, no retained velocity.
    Lerp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub particle_count: usize,
    /// Pointer influence radius in normalized field units.
    pub interaction_radius: f32,
    /// Fraction of the remaining distance folded into velocity per frame.
    pub spring_rate: f32,
    pub glow: bool,
    pub logo_scale: f32,
    pub damping: f32,
    pub repulsion_strength: f32,
    pub stroke_width: f32,
    pub path_fraction: f32,
    pub falloff: Falloff,
    pub integrator: Integrator,
    /// Alpha of the background fill laid over the previous frame.
    pub trail_alpha: f32,
    /// Share of the smaller surface dimension covered by one field unit.
    pub frame_fill: f32,
    pub seed: Option<u64>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 1000,
            interaction_radius: 0.4,
            spring_rate: 0.08,
            glow: true,
            logo_scale: 1.0,
            damping: 0.85,
            repulsion_strength: 0.35,
            stroke_width: 0.08,
            path_fraction: 0.85,
            falloff: Falloff::Quadratic,
            integrator: Integrator::Spring,
            trail_alpha: 0.12,
            frame_fill: 0.45,
            seed: None,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<()> {
        if self.particle_count == 0 {
            return Err(Error::invalid("particle_count", "must be at least 1"));
        }
        in_half_open("interaction_radius", self.interaction_radius)?;
        in_half_open("spring_rate", self.spring_rate)?;
        if !(0.0..1.0).contains(&self.damping) {
            return Err(Error::invalid("damping", format!("{} is outside [0, 1)", self.damping)));
        }
        if !(self.logo_scale > 0.0 && self.logo_scale.is_finite()) {
            return Err(Error::invalid("logo_scale", "must be a positive number"));
        }
        if !(0.0..=1.0).contains(&self.path_fraction) {
            return Err(Error::invalid(
                "path_fraction",
                format!("{} is outside [0, 1]", self.path_fraction),
            ));
        }
        if !(self.stroke_width >= 0.0 && self.stroke_width.is_finite()) {
            return Err(Error::invalid("stroke_width", "must be zero or positive"));
        }
        if !(self.repulsion_strength >= 0.0 && self.repulsion_strength.is_finite()) {
            return Err(Error::invalid("repulsion_strength", "must be zero or positive"));
        }
        in_half_open("trail_alpha", self.trail_alpha)?;
        if !(self.frame_fill > 0.0 && self.frame_fill.is_finite()) {
            return Err(Error::invalid("frame_fill", "must be a positive number"));
        }
        Ok(())
    }

    /// Number of particles seeded along the logo path.
    pub fn path_particle_count(&self) -> usize {
        (self.particle_count as f32 * self.path_fraction).floor() as usize
    }

    pub fn ambient_particle_count(&self) -> usize {
        self.particle_count - self.path_particle_count().min(self.particle_count)
    }
}

fn in_half_open(field: &'static str, value: f32) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::invalid(field, format!("{value} is outside (0, 1]")))
    }
}

/// Named tunings of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldPreset {
    Gradient,
    Hero,
    Classic,
}

impl FieldPreset {
    pub const ALL: [FieldPreset; 3] = [FieldPreset::Gradient, FieldPreset::Hero, FieldPreset::Classic];

    pub fn name(self) -> &'static str {
        match self {
            FieldPreset::Gradient => "gradient",
            FieldPreset::Hero => "hero",
            FieldPreset::Classic => "classic",
        }
    }

    pub fn config(self) -> FieldConfig {
        match self {
            FieldPreset::Gradient => FieldConfig::default(),
            FieldPreset::Hero => FieldConfig {
                particle_count: 1200,
                interaction_radius: 0.5,
                spring_rate: 0.06,
                logo_scale: 1.1,
                ..FieldConfig::default()
            },
            FieldPreset::Classic => FieldConfig {
                particle_count: 1000,
                path_fraction: 0.8,
                interaction_radius: 0.5,
                repulsion_strength: 0.3,
                falloff: Falloff::Linear,
                integrator: Integrator::Lerp,
                spring_rate: 0.08,
                stroke_width: 0.05,
                trail_alpha: 0.15,
                frame_fill: 0.4,
                ..FieldConfig::default()
            },
        }
    }
}

impl std::str::FromStr for FieldPreset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FieldPreset::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::invalid("preset", format!("unknown preset `{s}`")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: f32,
    pub height: f32,
    pub show_controls: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Gradient".into(),
            width: 1280.0,
            height: 800.0,
            show_controls: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Seconds a programmatic scroll takes to settle.
    pub duration: f32,
    /// Total scrollable height of the simulated page, in pixels.
    pub content_height: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            duration: 1.2,
            content_height: 4000.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub field: FieldConfig,
    pub window: WindowConfig,
    pub scroll: ScrollConfig,
}

impl AppConfig {
    /// Load from `path`, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let contents = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&contents)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.field.validate()?;
        Ok(config)
    }

    /// Replace the field tuning with a preset, keeping the seed.
    pub fn with_preset(mut self, preset: FieldPreset) -> Self {
        let seed = self.field.seed;
        self.field = preset.config();
        self.field.seed = seed;
        self
    }
}
