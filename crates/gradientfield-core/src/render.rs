//! Compositing a field onto any 2D drawing surface.

use glam::Vec2;

use crate::color::{Color, BACKGROUND};
use crate::field::ParticleField;
use crate::viewport::Viewport;

/// Path particles brighter than this get a glow when glow is enabled.
pub const GLOW_THRESHOLD: f32 = 0.6;

/// Immediate-mode 2D drawing surface. Colors are straight alpha and are
/// composited source-over onto what is already there.
pub trait Canvas {
    /// Size in pixels.
    fn size(&self) -> Vec2;

    /// Composite `color` over every pixel.
    fn fill(&mut self, color: Color);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Radial gradient from `inner` at the center to transparent at `radius`.
    fn radial_glow(&mut self, center: Vec2, radius: f32, inner: Color);

    fn stroke_ellipse(&mut self, ellipse: Ellipse, color: Color, width: f32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    pub center: Vec2,
    pub radii: Vec2,
    /// Radians in screen space (y down), so positive turns clockwise.
    pub rotation: f32,
}

/// A decorative ring spinning at a fixed rate, sized in field units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRing {
    pub radii: Vec2,
    pub spin: f32,
    pub color: Color,
}

impl OrbitRing {
    pub fn ellipse(&self, viewport: &Viewport, time: f32) -> Ellipse {
        Ellipse {
            center: viewport.center(),
            radii: self.radii * viewport.scale(),
            rotation: time * self.spin,
        }
    }
}

pub fn orbit_rings() -> [OrbitRing; 2] {
    [
        OrbitRing {
            radii: Vec2::new(1.1, 0.9),
            spin: 0.1,
            color: Color::rgba(255, 0, 255, 0.05),
        },
        OrbitRing {
            radii: Vec2::new(1.3, 1.0),
            spin: -0.08,
            color: Color::rgba(59, 0, 255, 0.05),
        },
    ]
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub particles: usize,
    pub glows: usize,
}

/// Draw one frame of `field` without advancing it.
pub fn compose_frame(field: &ParticleField, viewport: &Viewport, canvas: &mut dyn Canvas) -> FrameStats {
    let config = field.config();
    canvas.fill(BACKGROUND.with_alpha(config.trail_alpha));

    let mut stats = FrameStats::default();
    for particle in field.particles() {
        let center = viewport.to_screen(particle.position);
        let brightness = particle.dynamic_brightness();
        if config.glow && !particle.is_ambient() && brightness > GLOW_THRESHOLD {
            let radius = particle.radius * (2.0 + particle.speed() * 10.0);
            let inner = Color::hsla(particle.hue, 1.0, 0.6, brightness * 0.3);
            canvas.radial_glow(center, radius, inner);
            stats.glows += 1;
        }
        canvas.fill_circle(center, particle.radius, particle.fill_color());
        stats.particles += 1;
    }

    for ring in orbit_rings() {
        canvas.stroke_ellipse(ring.ellipse(viewport, field.time()), ring.color, 1.0);
    }
    stats
}
