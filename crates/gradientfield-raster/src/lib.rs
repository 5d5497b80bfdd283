//! Software rendering and headless host implementations for Gradientfield.

mod canvas;
mod host;

pub use crate::canvas::PixelCanvas;
pub use crate::host::{HeadlessInput, HeadlessScheduler};
