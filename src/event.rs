//! Event handler registration/firing (spec §4.7, §4.8, §5).
//!
//! Handler slots are guarded by a dedicated lock, independent of the PDI and entry locks, per
//! the lock-order rule in spec §5 (`PDI mutex → entry spinlock → handler lock`).

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Handle returned by [`EventBus::register`], used to [`EventBus::unregister`] later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// A per-event-type registry of handler closures.
pub struct EventBus<E> {
    handlers: Mutex<Vec<(HandlerId, Box<dyn Fn(&E) + Send + Sync>)>>,
    next_id: AtomicU64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        EventBus {
            handlers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handler: impl Fn(&E) + Send + Sync + 'static) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers.lock().unwrap().push((id, Box::new(handler)));
        id
    }

    pub fn unregister(&self, id: HandlerId) {
        self.handlers.lock().unwrap().retain(|(hid, _)| *hid != id);
    }

    pub fn fire(&self, event: &E) {
        for (_, handler) in self.handlers.lock().unwrap().iter() {
            handler(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn fires_every_registered_handler() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Arc::new(AtomicU32::new(0));

        let s1 = Arc::clone(&seen);
        bus.register(move |n| {
            s1.fetch_add(*n, Ordering::Relaxed);
        });
        let s2 = Arc::clone(&seen);
        bus.register(move |n| {
            s2.fetch_add(*n, Ordering::Relaxed);
        });

        bus.fire(&5);
        assert_eq!(seen.load(Ordering::Relaxed), 10);
    }

    #[test]
    fn unregister_stops_future_firings() {
        let bus: EventBus<u32> = EventBus::new();
        let seen = Arc::new(AtomicU32::new(0));
        let s1 = Arc::clone(&seen);
        let id = bus.register(move |n| {
            s1.fetch_add(*n, Ordering::Relaxed);
        });

        bus.fire(&1);
        bus.unregister(id);
        bus.fire(&1);

        assert_eq!(seen.load(Ordering::Relaxed), 1);
    }
}
