use glam::Vec2;

use crate::config::FieldConfig;
use crate::pointer::PointerState;

/// Pixel mapping of normalized field space onto a surface. Field `+y` is screen up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Vec2,
    pub logo_scale: f32,
    pub frame_fill: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, config: &FieldConfig) -> Self {
        Self {
            size: Vec2::new(width.max(0.0), height.max(0.0)),
            logo_scale: config.logo_scale,
            frame_fill: config.frame_fill,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.size * 0.5
    }

    /// Pixels per field unit.
    pub fn scale(&self) -> f32 {
        self.size.min_element() * self.frame_fill * self.logo_scale
    }

    pub fn is_empty(&self) -> bool {
        self.scale() <= 0.0
    }

    pub fn to_screen(&self, field: Vec2) -> Vec2 {
        let c = self.center();
        let s = self.scale();
        Vec2::new(c.x + field.x * s, c.y - field.y * s)
    }

    pub fn to_field(&self, screen: Vec2) -> Vec2 {
        let s = self.scale();
        if s <= 0.0 {
            return Vec2::ZERO;
        }
        let c = self.center();
        Vec2::new((screen.x - c.x) / s, (c.y - screen.y) / s)
    }

    /// Pointer position in field space, or `None` while the pointer is inactive.
    ///
    /// This is not the plain `(p - 0.5) * 2` remap into `[-1, 1]`: the pointer
    /// goes through the inverse projection with y flipped, so it lands on the
    /// drawn logo whatever the aspect ratio or logo scale.
    pub fn pointer_to_field(&self, pointer: &PointerState) -> Option<Vec2> {
        pointer
            .active
            .then(|| self.to_field(pointer.position * self.size))
    }
}
