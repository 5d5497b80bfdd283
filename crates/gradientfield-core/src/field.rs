//! The particle field: seeding along the logo path and the per-frame spring step.
//!
//! Every particle chases its own target. The target is the particle's origin,
//! pushed away from the pointer when it is close enough, plus a small idle
//! oscillation. Nothing couples one particle to another.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{FieldConfig, Integrator};
use crate::error::Result;
use crate::particle::{Particle, ParticleKind};
use crate::path::PathShape;

/// Simulated seconds per frame.
pub const FRAME_TIME: f32 = 0.016;

pub struct ParticleField {
    particles: Vec<Particle>,
    config: FieldConfig,
    time: f32,
}

#[derive(Serialize)]
pub struct FieldSnapshot<'a> {
    pub time: f32,
    pub config: &'a FieldConfig,
    pub particles: &'a [Particle],
}

impl ParticleField {
    pub fn new(config: FieldConfig, shape: &PathShape) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, shape, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(config: FieldConfig, shape: &PathShape, rng: &mut R) -> Result<Self> {
        config.validate()?;

        let path_count = config.path_particle_count();
        let mut particles = Vec::with_capacity(config.particle_count);
        for i in 0..path_count {
            let progress = i as f32 / path_count as f32;
            particles.push(Particle::on_path(
                shape.sample(progress),
                progress,
                config.stroke_width,
                rng,
            ));
        }
        for _ in 0..config.ambient_particle_count() {
            particles.push(Particle::ambient(rng));
        }

        debug!(
            path = path_count,
            ambient = particles.len() - path_count,
            "seeded particle field"
        );
        Ok(Self {
            particles,
            config,
            time: 0.0,
        })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    /// Swap in new tuning. Layout fields are fixed once the field is seeded,
    /// so changes to them are ignored.
    pub fn reconfigure(&mut self, mut config: FieldConfig) -> Result<()> {
        config.validate()?;
        let layout_changed = config.particle_count != self.config.particle_count
            || config.path_fraction != self.config.path_fraction
            || config.stroke_width != self.config.stroke_width
            || config.seed != self.config.seed;
        if layout_changed {
            warn!("particle layout is fixed after seeding; keeping the current layout");
            config.particle_count = self.config.particle_count;
            config.path_fraction = self.config.path_fraction;
            config.stroke_width = self.config.stroke_width;
            config.seed = self.config.seed;
        }
        self.config = config;
        Ok(())
    }

    /// Where `particle` is heading this frame given a field-space pointer.
    pub fn target(&self, particle: &Particle, pointer: Option<Vec2>) -> Vec2 {
        let mut target = particle.origin;
        if let (Some(pointer), ParticleKind::Path { .. }) = (pointer, particle.kind) {
            target += repulsion(particle.origin, pointer, &self.config);
        }
        target + particle.idle_offset(self.time)
    }

    /// Advance one frame. `pointer` is in field space, `None` when inactive.
    pub fn step(&mut self, pointer: Option<Vec2>) {
        self.time += FRAME_TIME;
        let rate = self.config.spring_rate;
        let damping = self.config.damping;
        let integrator = self.config.integrator;

        for i in 0..self.particles.len() {
            let target = self.target(&self.particles[i], pointer);
            let p = &mut self.particles[i];
            match integrator {
                Integrator::Spring => {
                    p.velocity += (target - p.position) * rate;
                    p.velocity *= damping;
                }
                Integrator::Lerp => {
                    p.velocity = (target - p.position) * rate;
                }
            }
            p.position += p.velocity;
        }
    }

    pub fn snapshot(&self) -> FieldSnapshot<'_> {
        FieldSnapshot {
            time: self.time,
            config: &self.config,
            particles: &self.particles,
        }
    }

    pub fn snapshot_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}

/// Displacement of an origin away from the pointer. Zero at and beyond the
/// interaction radius, largest when the pointer sits on the origin.
pub fn repulsion(origin: Vec2, pointer: Vec2, config: &FieldConfig) -> Vec2 {
    let away = origin - pointer;
    let distance = away.length();
    if distance >= config.interaction_radius {
        return Vec2::ZERO;
    }
    let weight = config.falloff.weight(distance / config.interaction_radius);
    away.try_normalize().unwrap_or(Vec2::Y) * weight * config.repulsion_strength
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Falloff, FieldPreset};

    fn field(count: usize) -> ParticleField {
        let config = FieldConfig {
            particle_count: count,
            seed: Some(7),
            ..FieldConfig::default()
        };
        ParticleField::new(config, &PathShape::zigzag()).unwrap()
    }

    #[test]
    fn seeds_requested_counts_at_rest() {
        let field = field(1000);
        let particles = field.particles();
        assert_eq!(particles.len(), 1000);
        assert_eq!(particles.iter().filter(|p| !p.is_ambient()).count(), 850);
        for p in particles {
            assert_eq!(p.position, p.origin);
            assert_eq!(p.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn path_particles_come_first_in_path_order() {
        let field = field(200);
        let progresses: Vec<f32> = field
            .particles()
            .iter()
            .filter_map(|p| match p.kind {
                ParticleKind::Path { progress, .. } => Some(progress),
                ParticleKind::Ambient { .. } => None,
            })
            .collect();
        assert!(progresses.windows(2).all(|w| w[0] < w[1]));
        assert!(field.particles()[progresses.len()..].iter().all(Particle::is_ambient));
    }

    #[test]
    fn jitter_stays_inside_stroke() {
        let field = field(2000);
        let half = field.config().stroke_width / 2.0;
        let shape = PathShape::zigzag();
        for p in field.particles() {
            if let ParticleKind::Path { progress, jitter, .. } = p.kind {
                assert!(jitter.abs() <= half);
                let base = shape.sample(progress).point;
                assert!((p.origin - base).length() <= half + 1e-6);
            }
        }
    }

    #[test]
    fn same_seed_same_layout() {
        let a = field(300);
        let b = field(300);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn repulsion_profile() {
        let config = FieldConfig::default();
        let origin = Vec2::new(0.1, 0.0);
        assert_eq!(repulsion(origin, Vec2::new(0.6, 0.0), &config), Vec2::ZERO);

        let near = repulsion(origin, Vec2::new(0.15, 0.0), &config);
        let far = repulsion(origin, Vec2::new(0.35, 0.0), &config);
        assert!(near.x < 0.0 && far.x < 0.0, "pushed away from the pointer");
        assert!(near.length() > far.length());

        let on_top = repulsion(origin, origin, &config);
        assert!((on_top - Vec2::Y * config.repulsion_strength).length() < 1e-6);
    }

    #[test]
    fn linear_falloff_is_gentler_near_the_edge() {
        let quadratic = FieldConfig::default();
        let linear = FieldConfig {
            falloff: Falloff::Linear,
            ..FieldConfig::default()
        };
        let pointer = Vec2::new(0.3, 0.0);
        assert!(
            repulsion(Vec2::ZERO, pointer, &linear).length()
                > repulsion(Vec2::ZERO, pointer, &quadratic).length()
        );
    }

    #[test]
    fn ambient_particles_ignore_the_pointer() {
        let field = field(100);
        let ambient = field.particles().iter().find(|p| p.is_ambient()).unwrap();
        assert_eq!(
            field.target(ambient, Some(ambient.origin)),
            field.target(ambient, None)
        );
    }

    #[test]
    fn settles_toward_oscillating_target() {
        let mut field = field(100);
        for p in field.particles.iter_mut() {
            p.position += Vec2::new(0.2, -0.1);
        }
        let initial: f32 = field
            .particles()
            .iter()
            .map(|p| (p.position - p.origin).length())
            .sum();
        for _ in 0..400 {
            field.step(None);
        }
        for p in field.particles() {
            let target = field.target(p, None);
            assert!((p.position - target).length() < 0.01);
            assert!((p.position - p.origin).length() < 0.05);
        }
        let settled: f32 = field
            .particles()
            .iter()
            .map(|p| (p.position - p.origin).length())
            .sum();
        assert!(settled < initial * 0.1);
    }

    #[test]
    fn lerp_integrator_converges_without_overshoot() {
        let config = FieldConfig {
            particle_count: 50,
            seed: Some(2),
            ..FieldPreset::Classic.config()
        };
        let mut field = ParticleField::new(config, &PathShape::zigzag()).unwrap();
        let pointer = Some(Vec2::ZERO);
        for _ in 0..300 {
            field.step(pointer);
        }
        for p in field.particles() {
            assert!((p.position - field.target(p, pointer)).length() < 0.02);
        }
    }

    #[test]
    fn reconfigure_keeps_layout() {
        let mut field = field(120);
        let before = field.particles().to_vec();
        let mut next = field.config().clone();
        next.interaction_radius = 0.2;
        next.particle_count = 10;
        field.reconfigure(next).unwrap();
        assert_eq!(field.config().interaction_radius, 0.2);
        assert_eq!(field.config().particle_count, 120);
        assert_eq!(field.particles(), before.as_slice());

        let bad = FieldConfig {
            spring_rate: 0.0,
            ..field.config().clone()
        };
        assert!(field.reconfigure(bad).is_err());
        assert_eq!(field.config().spring_rate, 0.08);
    }

    #[test]
    fn snapshot_serializes_every_particle() {
        let field = field(20);
        let json: serde_json::Value = serde_json::from_str(&field.snapshot_json().unwrap()).unwrap();
        assert_eq!(json["particles"].as_array().unwrap().len(), 20);
        assert_eq!(json["config"]["particle_count"], 20);
    }
}
