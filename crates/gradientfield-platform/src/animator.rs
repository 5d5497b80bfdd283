use gradientfield_core::{
    compose_frame, Canvas, FieldConfig, FrameStats, HostRect, ParticleField, PathShape, SharedPointer,
    Viewport,
};
use tracing::{debug, info, warn};

use crate::{FrameScheduler, HostEvent, InputSource, ListenerKind, Result, Subscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    Created,
    Mounted,
    TornDown,
}

/// Drives a [`ParticleField`] from host frames and input.
///
/// Lifecycle: [`mount`](Self::mount) subscribes to the frame scheduler and
/// registers input listeners, [`frame`](Self::frame) runs once per refresh,
/// [`teardown`](Self::teardown) undoes every registration. Resizes and
/// reconfiguration are queued and applied at the start of the next frame.
pub struct ParticleFieldAnimator {
    field: ParticleField,
    pointer: SharedPointer,
    bounds: HostRect,
    viewport: Viewport,
    pending_bounds: Option<HostRect>,
    pending_config: Option<FieldConfig>,
    frame_subscription: Option<Subscription>,
    listeners: Vec<Subscription>,
    state: AnimatorState,
    frames: u64,
}

impl ParticleFieldAnimator {
    pub fn new(config: FieldConfig, shape: &PathShape, bounds: HostRect) -> gradientfield_core::Result<Self> {
        let viewport = Viewport::new(bounds.size.x, bounds.size.y, &config);
        let field = ParticleField::new(config, shape)?;
        Ok(Self {
            field,
            pointer: SharedPointer::new(),
            bounds,
            viewport,
            pending_bounds: None,
            pending_config: None,
            frame_subscription: None,
            listeners: Vec::new(),
            state: AnimatorState::Created,
            frames: 0,
        })
    }

    /// Register input listeners and subscribe to frames. If any registration
    /// fails, the ones already made are undone before the error is returned.
    pub fn mount(&mut self, scheduler: &mut dyn FrameScheduler, input: &mut dyn InputSource) -> Result<()> {
        if self.state != AnimatorState::Created {
            warn!(state = ?self.state, "animator can only be mounted once");
            return Ok(());
        }
        if let Err(err) = self.register(scheduler, input) {
            if let Err(rollback) = self.release(scheduler, input) {
                warn!("rollback after failed mount was incomplete: {rollback}");
            }
            return Err(err);
        }
        self.state = AnimatorState::Mounted;
        info!(
            particles = self.field.particles().len(),
            listeners = self.listeners.len(),
            "particle field mounted"
        );
        Ok(())
    }

    /// Unsubscribe from frames and drop every listener registered by `mount`.
    /// Every removal is attempted; the first failure is returned.
    pub fn teardown(&mut self, scheduler: &mut dyn FrameScheduler, input: &mut dyn InputSource) -> Result<()> {
        if self.state != AnimatorState::Mounted {
            return Ok(());
        }
        self.state = AnimatorState::TornDown;
        let released = self.release(scheduler, input);
        info!(frames = self.frames, "particle field torn down");
        released
    }

    /// Swap in `next`, mounting it before this one is torn down so the host
    /// never goes without a live field. If `next` cannot be mounted, `self`
    /// stays as it was.
    pub fn replace_with(
        &mut self,
        mut next: ParticleFieldAnimator,
        scheduler: &mut dyn FrameScheduler,
        input: &mut dyn InputSource,
    ) -> Result<()> {
        next.mount(scheduler, input)?;
        if !next.is_mounted() {
            return Err(format!("replacement animator is {:?}, expected a fresh one", next.state).into());
        }
        let mut previous = std::mem::replace(self, next);
        previous.teardown(scheduler, input)
    }

    fn register(&mut self, scheduler: &mut dyn FrameScheduler, input: &mut dyn InputSource) -> Result<()> {
        for kind in ListenerKind::ALL {
            let subscription = input.add_listener(kind)?;
            self.listeners.push(subscription);
        }
        self.frame_subscription = Some(scheduler.subscribe()?);
        Ok(())
    }

    fn release(&mut self, scheduler: &mut dyn FrameScheduler, input: &mut dyn InputSource) -> Result<()> {
        let mut first = None;
        if let Some(subscription) = self.frame_subscription.take() {
            if let Err(err) = scheduler.unsubscribe(subscription) {
                warn!(?subscription, "frame unsubscribe failed: {err}");
                first.get_or_insert(err);
            }
        }
        for subscription in self.listeners.drain(..) {
            if let Err(err) = input.remove_listener(subscription) {
                warn!(?subscription, "listener removal failed: {err}");
                first.get_or_insert(err);
            }
        }
        first.map_or(Ok(()), Err)
    }

    pub fn state(&self) -> AnimatorState {
        self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.state == AnimatorState::Mounted
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        if !self.is_mounted() {
            return;
        }
        match event {
            HostEvent::Pointer(pointer) => self.pointer.apply(pointer, &self.bounds),
            HostEvent::Resize(bounds) => {
                // Input normalizes against the new box right away; drawing catches up next frame.
                self.bounds = bounds;
                self.pending_bounds = Some(bounds);
            }
        }
    }

    /// Queue new tuning for the next frame.
    pub fn reconfigure(&mut self, config: FieldConfig) {
        self.pending_config = Some(config);
    }

    /// Run one frame. Draws when a canvas is available, otherwise only simulates.
    /// Returns `None` when not mounted.
    pub fn frame(&mut self, canvas: Option<&mut dyn Canvas>) -> Option<FrameStats> {
        if !self.is_mounted() {
            return None;
        }
        self.apply_pending();

        let pointer = self.viewport.pointer_to_field(&self.pointer.get());
        self.field.step(pointer);
        self.frames += 1;

        let Some(canvas) = canvas else {
            return Some(FrameStats::default());
        };
        if self.viewport.is_empty() {
            return Some(FrameStats::default());
        }
        Some(compose_frame(&self.field, &self.viewport, canvas))
    }

    fn apply_pending(&mut self) {
        if let Some(config) = self.pending_config.take() {
            match self.field.reconfigure(config) {
                Ok(()) => debug!("applied new field config"),
                Err(err) => warn!("rejected field config: {err}"),
            }
        }
        let config = self.field.config();
        let size = self.pending_bounds.take().map_or(self.viewport.size, |b| b.size);
        let next = Viewport::new(size.x, size.y, config);
        if next != self.viewport {
            debug!(width = size.x, height = size.y, scale = next.scale(), "viewport changed");
            self.viewport = next;
        }
    }

    /// Handle for input collaborators that write the pointer directly.
    pub fn pointer(&self) -> SharedPointer {
        self.pointer.clone()
    }

    pub fn field(&self) -> &ParticleField {
        &self.field
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
