use std::collections::{HashMap, HashSet};

use glam::Vec2;
use gradientfield_core::{HostRect, PointerEvent};
use gradientfield_platform::{FrameScheduler, HostEvent, InputSource, ListenerKind, Result, Subscription};
use tracing::debug;

/// Frames come from egui repaints: while anything is subscribed the window keeps repainting.
pub struct RepaintScheduler {
    context: egui::Context,
    next: u64,
    live: HashSet<Subscription>,
}

impl RepaintScheduler {
    pub fn new(context: egui::Context) -> Self {
        Self {
            context,
            next: 0,
            live: HashSet::new(),
        }
    }

    pub fn is_running(&self) -> bool {
        !self.live.is_empty()
    }

    /// Ask for the next frame if anyone wants it.
    pub fn request_frame(&self) {
        if self.is_running() {
            self.context.request_repaint();
        }
    }
}

impl FrameScheduler for RepaintScheduler {
    fn subscribe(&mut self) -> Result<Subscription> {
        self.next += 1;
        let subscription = Subscription(self.next);
        self.live.insert(subscription);
        self.context.request_repaint();
        Ok(subscription)
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> Result<()> {
        if !self.live.remove(&subscription) {
            return Err(format!("frame subscription {} is not registered", subscription.0).into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contact {
    Mouse,
    Touch,
}

/// Turns egui's per-frame input snapshot into the host events the animator registered for.
#[derive(Debug, Default)]
pub struct EguiInput {
    next: u64,
    listeners: HashMap<Subscription, ListenerKind>,
    contact: Option<Contact>,
    bounds: Option<HostRect>,
}

impl EguiInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn wants(&self, kind: ListenerKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    /// Events for this frame, in physical pixels. `hover` is the pointer
    /// position when it is over the field.
    pub fn poll(&mut self, bounds: HostRect, hover: Option<Vec2>, touching: bool) -> Vec<HostEvent> {
        let mut events = Vec::new();
        if self.bounds != Some(bounds) {
            self.bounds = Some(bounds);
            events.push(HostEvent::Resize(bounds));
        }

        let contact = hover.map(|_| if touching { Contact::Touch } else { Contact::Mouse });
        match (hover, contact) {
            (Some(position), Some(Contact::Touch)) => events.push(HostEvent::Pointer(PointerEvent::TouchMove(position))),
            (Some(position), _) => events.push(HostEvent::Pointer(PointerEvent::Move(position))),
            (None, _) => match self.contact {
                Some(Contact::Touch) => events.push(HostEvent::Pointer(PointerEvent::TouchEnd)),
                Some(Contact::Mouse) => events.push(HostEvent::Pointer(PointerEvent::Leave)),
                None => {}
            },
        }
        self.contact = contact;

        events.retain(|event| self.wants(event.kind()));
        events
    }
}

impl InputSource for EguiInput {
    fn add_listener(&mut self, kind: ListenerKind) -> Result<Subscription> {
        self.next += 1;
        let subscription = Subscription(self.next);
        self.listeners.insert(subscription, kind);
        debug!(?kind, "egui listener added");
        Ok(subscription)
    }

    fn remove_listener(&mut self, subscription: Subscription) -> Result<()> {
        self.listeners
            .remove(&subscription)
            .map(|_| ())
            .ok_or_else(|| format!("listener {} is not registered", subscription.0).into())
    }
}
