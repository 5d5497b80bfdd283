//! Offscreen rendering: run the field for a fixed number of frames and write the last one out.

use std::path::PathBuf;

use glam::Vec2;
use gradientfield_core::{AppConfig, FrameStats, HostRect, PathShape, PointerEvent};
use gradientfield_platform::{HostEvent, ParticleFieldAnimator, Result};
use gradientfield_raster::{HeadlessInput, HeadlessScheduler, PixelCanvas};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct RenderJob {
    pub frames: u32,
    pub width: u32,
    pub height: u32,
    /// Pointer held over the field for the whole run, in `[0, 1]` with y down.
    pub pointer: Option<Vec2>,
    pub output: PathBuf,
    pub snapshot: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub frames: u64,
    pub last: FrameStats,
}

pub fn render(config: &AppConfig, job: &RenderJob) -> Result<RenderReport> {
    let bounds = HostRect::new(0.0, 0.0, job.width as f32, job.height as f32);
    let mut animator = ParticleFieldAnimator::new(config.field.clone(), &PathShape::zigzag(), bounds)?;
    let mut scheduler = HeadlessScheduler::new();
    let mut input = HeadlessInput::new();
    let mut canvas = PixelCanvas::new(job.width, job.height);

    animator.mount(&mut scheduler, &mut input)?;
    if let Some(pointer) = job.pointer {
        let at = bounds.origin + pointer * bounds.size;
        if let Some(event) = input.deliver(HostEvent::Pointer(PointerEvent::Move(at))) {
            animator.handle_event(event);
        }
    }

    let mut last = FrameStats::default();
    for _ in 0..job.frames {
        if !scheduler.tick() {
            break;
        }
        if let Some(stats) = animator.frame(Some(&mut canvas)) {
            last = stats;
        }
    }
    let frames = animator.frames();
    animator.teardown(&mut scheduler, &mut input)?;

    let (subscribed, unsubscribed) = scheduler.totals();
    let (added, removed) = input.totals();
    if subscribed != unsubscribed || added != removed {
        warn!(subscribed, unsubscribed, added, removed, "host registrations left behind");
    }

    canvas.save_png(&job.output)?;
    debug!(path = %job.output.display(), "wrote frame");
    if let Some(path) = &job.snapshot {
        std::fs::write(path, animator.field().snapshot_json()?)?;
        debug!(path = %path.display(), "wrote snapshot");
    }

    info!(frames, particles = last.particles, glows = last.glows, "render finished");
    Ok(RenderReport { frames, last })
}

/// Parse `x,y` with both components in `[0, 1]`.
pub fn parse_pointer(value: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = value
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{value}`"))?;
    let parse = |part: &str| -> std::result::Result<f32, String> {
        let v: f32 = part.trim().parse().map_err(|e| format!("`{part}`: {e}"))?;
        if (0.0..=1.0).contains(&v) {
            Ok(v)
        } else {
            Err(format!("`{part}` is outside 0..=1"))
        }
    };
    Ok(Vec2::new(parse(x)?, parse(y)?))
}
