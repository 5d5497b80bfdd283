//! Host abstraction traits so `gradientfield-core` stays host-agnostic.

use gradientfield_core::{HostRect, PointerEvent};
use serde::{Deserialize, Serialize};

mod animator;
pub use animator::{AnimatorState, ParticleFieldAnimator};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Handle returned by a host registration, needed to undo it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListenerKind {
    PointerMove,
    PointerLeave,
    TouchMove,
    TouchEnd,
    Resize,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 5] = [
        ListenerKind::PointerMove,
        ListenerKind::PointerLeave,
        ListenerKind::TouchMove,
        ListenerKind::TouchEnd,
        ListenerKind::Resize,
    ];
}

/// Input delivered by a host to whoever registered for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    Pointer(PointerEvent),
    /// The drawing surface moved or changed size, in host coordinates.
    Resize(HostRect),
}

impl HostEvent {
    pub fn kind(&self) -> ListenerKind {
        match self {
            HostEvent::Pointer(PointerEvent::Move(_)) => ListenerKind::PointerMove,
            HostEvent::Pointer(PointerEvent::Leave) => ListenerKind::PointerLeave,
            HostEvent::Pointer(PointerEvent::TouchMove(_)) => ListenerKind::TouchMove,
            HostEvent::Pointer(PointerEvent::TouchEnd) => ListenerKind::TouchEnd,
            HostEvent::Resize(_) => ListenerKind::Resize,
        }
    }
}

/// Per-display-refresh callback registry (vsync, repaint requests, a test clock).
pub trait FrameScheduler: Send + Sync {
    fn subscribe(&mut self) -> Result<Subscription>;
    fn unsubscribe(&mut self, subscription: Subscription) -> Result<()>;
}

/// Source of pointer, touch, and resize events.
pub trait InputSource: Send + Sync {
    fn add_listener(&mut self, kind: ListenerKind) -> Result<Subscription>;
    fn remove_listener(&mut self, subscription: Subscription) -> Result<()>;
}
