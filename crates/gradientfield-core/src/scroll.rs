//! Page scroll position as an explicit, owned context.
//!
//! Components that react to scrolling receive a `&mut ScrollContext` from the
//! page that owns it, subscribe while mounted and unsubscribe on teardown.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::timeline::Easing;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub offset: f32,
    pub content_height: f32,
    pub viewport_height: f32,
}

impl ScrollMetrics {
    pub fn max_offset(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Scrolled fraction in `[0, 1]`; 0 when the page does not scroll.
    pub fn progress(&self) -> f32 {
        let max = self.max_offset();
        if max <= 0.0 {
            return 0.0;
        }
        (self.offset / max).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    pub progress: f32,
    pub offset: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(ScrollState) + Send>;

#[derive(Debug, Clone, Copy)]
struct ScrollAnimation {
    from: f32,
    to: f32,
    elapsed: f32,
}

pub struct ScrollContext {
    metrics: ScrollMetrics,
    duration: f32,
    animation: Option<ScrollAnimation>,
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
    live: bool,
}

impl ScrollContext {
    pub fn new(content_height: f32, viewport_height: f32, duration: f32) -> Self {
        Self {
            metrics: ScrollMetrics {
                offset: 0.0,
                content_height,
                viewport_height,
            },
            duration: duration.max(0.0),
            animation: None,
            listeners: Vec::new(),
            next_id: 0,
            live: false,
        }
    }

    pub fn init(&mut self) {
        self.live = true;
        info!(
            content = self.metrics.content_height,
            viewport = self.metrics.viewport_height,
            "scroll context started"
        );
    }

    /// Stop animating and drop every listener. Returns how many were dropped.
    pub fn teardown(&mut self) -> usize {
        let dropped = self.listeners.len();
        self.listeners.clear();
        self.animation = None;
        self.live = false;
        info!(dropped, "scroll context torn down");
        dropped
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn metrics(&self) -> ScrollMetrics {
        self.metrics
    }

    pub fn state(&self) -> ScrollState {
        ScrollState {
            progress: self.metrics.progress(),
            offset: self.metrics.offset,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(ScrollState) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Jump straight to `offset`, cancelling any animated scroll.
    pub fn set_offset(&mut self, offset: f32) {
        self.animation = None;
        self.move_to(offset);
    }

    pub fn set_progress(&mut self, progress: f32) {
        self.set_offset(progress.clamp(0.0, 1.0) * self.metrics.max_offset());
    }

    /// Start an eased scroll toward `target`, driven by [`advance`](Self::advance).
    pub fn scroll_to(&mut self, target: f32) {
        let to = target.clamp(0.0, self.metrics.max_offset());
        if self.duration <= 0.0 {
            self.set_offset(to);
            return;
        }
        debug!(from = self.metrics.offset, to, "animated scroll");
        self.animation = Some(ScrollAnimation {
            from: self.metrics.offset,
            to,
            elapsed: 0.0,
        });
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Advance an animated scroll by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        if !self.live {
            return;
        }
        let Some(mut animation) = self.animation.take() else {
            return;
        };
        animation.elapsed += dt.max(0.0);
        let t = (animation.elapsed / self.duration).min(1.0);
        let eased = Easing::SmoothScroll.ease(t);
        let offset = animation.from + (animation.to - animation.from) * eased;
        if t < 1.0 {
            self.animation = Some(animation);
            self.move_to(offset);
        } else {
            self.move_to(animation.to);
        }
    }

    /// New page or window dimensions; the offset is clamped to the new range.
    pub fn resize(&mut self, content_height: f32, viewport_height: f32) {
        self.metrics.content_height = content_height;
        self.metrics.viewport_height = viewport_height;
        let offset = self.metrics.offset;
        self.move_to(offset);
    }

    fn move_to(&mut self, offset: f32) {
        self.metrics.offset = offset.clamp(0.0, self.metrics.max_offset());
        if !self.live {
            return;
        }
        let state = self.state();
        for (_, listener) in &mut self.listeners {
            listener(state);
        }
    }
}
