use std::sync::{Arc, Mutex, PoisonError};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Cursor or touch position normalized to the surface, `(0, 0)` top-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerState {
    pub position: Vec2,
    pub active: bool,
}

impl Default for PointerState {
    fn default() -> Self {
        Self {
            position: Vec2::splat(0.5),
            active: false,
        }
    }
}

/// Surface placement in host coordinates, used to normalize raw input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostRect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl HostRect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    /// Map a host point into `[0, 1]` surface space; `None` for an empty rect.
    pub fn normalize(&self, point: Vec2) -> Option<Vec2> {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return None;
        }
        Some((point - self.origin) / self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Move(Vec2),
    Leave,
    TouchMove(Vec2),
    TouchEnd,
}

impl PointerState {
    /// Fold one host event into the state. Mouse and touch share semantics.
    pub fn apply(&mut self, event: PointerEvent, bounds: &HostRect) {
        match event {
            PointerEvent::Move(point) | PointerEvent::TouchMove(point) => {
                if let Some(position) = bounds.normalize(point) {
                    self.position = position;
                    self.active = true;
                }
            }
            PointerEvent::Leave | PointerEvent::TouchEnd => self.active = false,
        }
    }
}

/// Last-write-wins pointer record shared between input handling and the frame step.
#[derive(Debug, Clone, Default)]
pub struct SharedPointer(Arc<Mutex<PointerState>>);

impl SharedPointer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> PointerState {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, state: PointerState) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub fn apply(&self, event: PointerEvent, bounds: &HostRect) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .apply(event, bounds);
    }
}
