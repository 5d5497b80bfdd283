//! Host side for running the field without a window.

use std::collections::HashMap;

use gradientfield_platform::{FrameScheduler, HostEvent, InputSource, ListenerKind, Result, Subscription};
use tracing::debug;

#[derive(Debug)]
struct Registry<T> {
    next: u64,
    live: HashMap<Subscription, T>,
    issued: usize,
    revoked: usize,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            next: 0,
            live: HashMap::new(),
            issued: 0,
            revoked: 0,
        }
    }
}

impl<T> Registry<T> {
    fn issue(&mut self, value: T) -> Subscription {
        self.next += 1;
        self.issued += 1;
        let subscription = Subscription(self.next);
        self.live.insert(subscription, value);
        subscription
    }

    fn revoke(&mut self, subscription: Subscription) -> Result<T> {
        let value = self
            .live
            .remove(&subscription)
            .ok_or_else(|| format!("subscription {} is not registered", subscription.0))?;
        self.revoked += 1;
        Ok(value)
    }
}

/// Frame clock advanced by hand, one frame per [`tick`](Self::tick).
#[derive(Debug, Default)]
pub struct HeadlessScheduler {
    registry: Registry<()>,
    ticks: u64,
}

impl HeadlessScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a frame. Returns whether anyone is subscribed to receive it.
    pub fn tick(&mut self) -> bool {
        self.ticks += 1;
        !self.registry.live.is_empty()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn subscribers(&self) -> usize {
        self.registry.live.len()
    }

    /// `(subscribes, unsubscribes)` over the scheduler's lifetime.
    pub fn totals(&self) -> (usize, usize) {
        (self.registry.issued, self.registry.revoked)
    }
}

impl FrameScheduler for HeadlessScheduler {
    fn subscribe(&mut self) -> Result<Subscription> {
        Ok(self.registry.issue(()))
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> Result<()> {
        self.registry.revoke(subscription)
    }
}

/// Input source fed from a script; only delivers kinds someone listens for.
#[derive(Debug, Default)]
pub struct HeadlessInput {
    registry: Registry<ListenerKind>,
}

impl HeadlessInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listens_for(&self, kind: ListenerKind) -> bool {
        self.registry.live.values().any(|k| *k == kind)
    }

    pub fn listeners(&self) -> usize {
        self.registry.live.len()
    }

    pub fn totals(&self) -> (usize, usize) {
        (self.registry.issued, self.registry.revoked)
    }

    /// Pass `event` through if a listener for its kind is registered.
    pub fn deliver(&self, event: HostEvent) -> Option<HostEvent> {
        if self.listens_for(event.kind()) {
            Some(event)
        } else {
            debug!(kind = ?event.kind(), "dropping event with no listener");
            None
        }
    }
}

impl InputSource for HeadlessInput {
    fn add_listener(&mut self, kind: ListenerKind) -> Result<Subscription> {
        Ok(self.registry.issue(kind))
    }

    fn remove_listener(&mut self, subscription: Subscription) -> Result<()> {
        self.registry.revoke(subscription).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use gradientfield_core::PointerEvent;

    #[test]
    fn scheduler_counts_balance() {
        let mut scheduler = HeadlessScheduler::new();
        assert!(!scheduler.tick());
        let sub = scheduler.subscribe().unwrap();
        assert!(scheduler.tick());
        scheduler.unsubscribe(sub).unwrap();
        assert!(!scheduler.tick());
        assert!(scheduler.unsubscribe(sub).is_err());
        assert_eq!(scheduler.totals(), (1, 1));
        assert_eq!(scheduler.ticks(), 3);
    }

    #[test]
    fn input_only_delivers_registered_kinds() {
        let mut input = HeadlessInput::new();
        let move_event = HostEvent::Pointer(PointerEvent::Move(Vec2::ONE));
        assert_eq!(input.deliver(move_event), None);

        let sub = input.add_listener(ListenerKind::PointerMove).unwrap();
        assert_eq!(input.deliver(move_event), Some(move_event));
        assert_eq!(input.deliver(HostEvent::Pointer(PointerEvent::Leave)), None);

        input.remove_listener(sub).unwrap();
        assert_eq!(input.listeners(), 0);
        assert_eq!(input.deliver(move_event), None);
    }
}
