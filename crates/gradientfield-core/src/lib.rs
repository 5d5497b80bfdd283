//! Gradientfield core engine: platform-agnostic particle field, compositing, and scroll timelines.

pub mod color;
pub mod config;
pub mod error;
pub mod field;
pub mod particle;
pub mod path;
pub mod pointer;
pub mod render;
pub mod scroll;
pub mod timeline;
pub mod viewport;

pub use color::{Color, Rgba8, BACKGROUND};
pub use config::{AppConfig, Falloff, FieldConfig, FieldPreset, Integrator, ScrollConfig, WindowConfig};
pub use error::{Error, Result};
pub use field::{repulsion, ParticleField, FRAME_TIME};
pub use particle::{Particle, ParticleKind};
pub use path::{PathSample, PathShape};
pub use pointer::{HostRect, PointerEvent, PointerState, SharedPointer};
pub use render::{compose_frame, Canvas, Ellipse, FrameStats};
pub use scroll::{ListenerId, ScrollContext, ScrollMetrics, ScrollState};
pub use timeline::{Easing, Pose, Property, Reveal, Timeline, Track};
pub use viewport::Viewport;
