use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::path::PathSample;

/// Hue at the start of the path; the gradient sweeps [`HUE_SPAN`] degrees from here.
pub const HUE_START: f32 = 280.0;
pub const HUE_SPAN: f32 = 60.0;

const BREATHE_RATE: f32 = 1.5;
const BREATHE_AMPLITUDE: f32 = 0.005;
const FLOAT_AMPLITUDE: Vec2 = Vec2::new(0.02, 0.03);
const FLOAT_X_RATE: f32 = 0.7;
/// Brightness gained per unit of speed.
const SPEED_GLOW: f32 = 5.0;
const AMBIENT_ALPHA: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParticleKind {
    /// Anchored on the logo path; breathes vertically.
    Path {
        progress: f32,
        phase: f32,
        /// Signed offset along the segment normal.
        jitter: f32,
    },
    /// Halo particle drifting on a small ellipse.
    Ambient { float_speed: f32, float_offset: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub origin: Vec2,
    pub velocity: Vec2,
    /// Radius in pixels.
    pub radius: f32,
    pub hue: f32,
    pub lightness: f32,
    /// Resting brightness in `[0, 1]`.
    pub brightness: f32,
    pub kind: ParticleKind,
}

impl Particle {
    fn at_rest(origin: Vec2, radius: f32, hue: f32, lightness: f32, brightness: f32, kind: ParticleKind) -> Self {
        Self {
            position: origin,
            origin,
            velocity: Vec2::ZERO,
            radius,
            hue,
            lightness,
            brightness,
            kind,
        }
    }

    /// Seed a path particle `jitter` units off the path along the segment normal.
    pub fn on_path<R: Rng + ?Sized>(sample: PathSample, progress: f32, stroke_width: f32, rng: &mut R) -> Self {
        let jitter = (rng.gen::<f32>() - 0.5) * stroke_width;
        let origin = sample.point + sample.normal * jitter;
        let kind = ParticleKind::Path {
            progress,
            phase: rng.gen::<f32>() * TAU,
            jitter,
        };
        Self::at_rest(
            origin,
            rng.gen_range(1.5..4.0),
            HUE_START + progress * HUE_SPAN,
            rng.gen_range(0.5..0.7),
            rng.gen_range(0.7..1.0),
            kind,
        )
    }

    /// Seed an ambient particle somewhere in the flattened halo around the logo.
    pub fn ambient<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let angle = rng.gen::<f32>() * TAU;
        let reach = rng.gen_range(0.3..0.9);
        let origin = Vec2::new(angle.cos() * reach, angle.sin() * reach * 0.7);
        let kind = ParticleKind::Ambient {
            float_speed: rng.gen_range(0.5..1.0),
            float_offset: rng.gen::<f32>() * TAU,
        };
        Self::at_rest(
            origin,
            rng.gen_range(0.5..1.5),
            HUE_START + rng.gen::<f32>() * HUE_SPAN,
            0.7,
            rng.gen_range(0.3..0.6),
            kind,
        )
    }

    pub fn is_ambient(&self) -> bool {
        matches!(self.kind, ParticleKind::Ambient { .. })
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    /// Displacement added to the target at `time` regardless of the pointer.
    pub fn idle_offset(&self, time: f32) -> Vec2 {
        match self.kind {
            ParticleKind::Path { phase, .. } => {
                Vec2::new(0.0, (time * BREATHE_RATE + phase).sin() * BREATHE_AMPLITUDE)
            }
            ParticleKind::Ambient {
                float_speed,
                float_offset,
            } => Vec2::new(
                (time * float_speed * FLOAT_X_RATE + float_offset).cos(),
                (time * float_speed + float_offset).sin(),
            ) * FLOAT_AMPLITUDE,
        }
    }

    /// Resting brightness lifted by current speed, capped at 1.
    pub fn dynamic_brightness(&self) -> f32 {
        (self.brightness + self.speed() * SPEED_GLOW).min(1.0)
    }

    pub fn fill_color(&self) -> Color {
        if self.is_ambient() {
            Color::hsla(self.hue, 1.0, self.lightness, AMBIENT_ALPHA)
        } else {
            let b = self.dynamic_brightness();
            Color::hsla(self.hue, 1.0, 0.5 + b * 0.2, b)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sample() -> PathSample {
        PathSample {
            point: Vec2::new(0.1, 0.2),
            normal: Vec2::Y,
            segment: 0,
        }
    }

    #[test]
    fn path_particle_starts_at_rest_within_stroke() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let p = Particle::on_path(sample(), 0.5, 0.08, &mut rng);
            assert_eq!(p.position, p.origin);
            assert_eq!(p.velocity, Vec2::ZERO);
            let ParticleKind::Path { jitter, .. } = p.kind else {
                panic!("expected path particle");
            };
            assert!(jitter.abs() <= 0.04);
            assert!(((p.origin - sample().point).length() - jitter.abs()).abs() < 1e-6);
            assert_eq!(p.hue, HUE_START + 30.0);
        }
    }

    #[test]
    fn ambient_particles_sit_in_the_halo() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..200 {
            let p = Particle::ambient(&mut rng);
            assert!(p.is_ambient());
            let unflattened = Vec2::new(p.origin.x, p.origin.y / 0.7).length();
            assert!((0.3 - 1e-5..0.9 + 1e-5).contains(&unflattened));
            assert!((HUE_START..=HUE_START + HUE_SPAN).contains(&p.hue));
        }
    }

    #[test]
    fn idle_offset_is_bounded() {
        let mut rng = StdRng::seed_from_u64(11);
        let path = Particle::on_path(sample(), 0.0, 0.08, &mut rng);
        let ambient = Particle::ambient(&mut rng);
        for step in 0..500 {
            let t = step as f32 * 0.016;
            let breathe = path.idle_offset(t);
            assert_eq!(breathe.x, 0.0);
            assert!(breathe.y.abs() <= BREATHE_AMPLITUDE + 1e-6);
            let drift = ambient.idle_offset(t);
            assert!(drift.x.abs() <= 0.02 + 1e-6 && drift.y.abs() <= 0.03 + 1e-6);
        }
    }

    #[test]
    fn speed_brightens_path_particles() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut p = Particle::on_path(sample(), 0.0, 0.08, &mut rng);
        let resting = p.dynamic_brightness();
        p.velocity = Vec2::new(0.02, 0.0);
        assert!(p.dynamic_brightness() > resting);
        p.velocity = Vec2::new(1.0, 0.0);
        assert_eq!(p.dynamic_brightness(), 1.0);
        assert_eq!(p.fill_color().a, 1.0);
    }
}
