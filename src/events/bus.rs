//! In-process publish/subscribe bus
//!
//! Handlers run synchronously on the emitting task, in registration order.
//! A panicking handler is logged and skipped; the remaining handlers still run.

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use super::names::{Event, EventName, EventPayload};

/// Shared handler type
pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Named-event dispatcher. Clones share one registry.
#[derive(Clone, Default)]
pub struct EventBus {
    handlers: Arc<RwLock<HashMap<EventName, Vec<(SubscriptionId, EventHandler)>>>>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `name`. Registering the same handler twice
    /// means it runs twice per emit.
    pub fn subscribe<F>(&self, name: EventName, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(name)
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove one registration. Returns false if `id` was not registered for `name`.
    pub fn unsubscribe(&self, name: EventName, id: SubscriptionId) -> bool {
        let mut registry = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let Some(handlers) = registry.get_mut(&name) else {
            return false;
        };
        let before = handlers.len();
        handlers.retain(|(registered, _)| *registered != id);
        before != handlers.len()
    }

    /// Invoke every handler registered for `name`
    pub fn emit(&self, name: EventName, payload: Option<EventPayload>) {
        // Snapshot so handlers may subscribe or emit without deadlocking.
        let handlers: Vec<EventHandler> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name)
            .map(|handlers| handlers.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        tracing::trace!(event = %name, handlers = handlers.len(), "emit");

        let event = Event::new(name, payload);
        for handler in handlers {
            if panic::catch_unwind(AssertUnwindSafe(|| handler(&event))).is_err() {
                tracing::error!(event = %name, "event handler panicked");
            }
        }
    }

    /// Number of handlers registered for `name`
    pub fn subscriber_count(&self, name: EventName) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name)
            .map_or(0, Vec::len)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("EventBus")
            .field("events", &registry.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn event_bus_should_deliver_payload() {
        let bus = EventBus::new();
        let received = Arc::new(Mutex::new(Vec::new()));
        let received_clone = received.clone();

        bus.subscribe(EventName::UserIdChanged, move |event| {
            received_clone.lock().unwrap().push(event.clone());
        });
        bus.emit(
            EventName::UserIdChanged,
            Some(EventPayload::UserId("u-2".to_string())),
        );

        let received = received.lock().unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].user_id(), Some("u-2"));
    }

    #[test]
    fn event_bus_should_only_deliver_matching_names() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();

        bus.subscribe(EventName::ItemStoreSuccess, move |_| {
            *count_clone.lock().unwrap() += 1;
        });
        bus.emit(EventName::ItemStoreFailure, None);
        bus.emit(EventName::ItemStoreSuccess, None);

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn event_bus_should_run_handlers_in_registration_order() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3 {
            let order = order.clone();
            bus.subscribe(EventName::ItemNew, move |_| order.lock().unwrap().push(i));
        }
        bus.emit(EventName::ItemNew, None);

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn event_bus_should_invoke_duplicate_registrations_twice() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));
        let handler = {
            let count = count.clone();
            move |_: &Event| *count.lock().unwrap() += 1
        };

        bus.subscribe(EventName::ItemClearSuccess, handler.clone());
        bus.subscribe(EventName::ItemClearSuccess, handler);
        bus.emit(EventName::ItemClearSuccess, None);

        assert_eq!(bus.subscriber_count(EventName::ItemClearSuccess), 2);
        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn event_bus_should_isolate_panicking_handler() {
        let bus = EventBus::new();
        let reached = Arc::new(Mutex::new(false));
        let reached_clone = reached.clone();

        bus.subscribe(EventName::ItemUpdateSuccess, |_| panic!("handler failure"));
        bus.subscribe(EventName::ItemUpdateSuccess, move |_| {
            *reached_clone.lock().unwrap() = true;
        });
        bus.emit(EventName::ItemUpdateSuccess, None);

        assert!(*reached.lock().unwrap());
    }

    #[test]
    fn event_bus_should_allow_emit_from_handler() {
        let bus = EventBus::new();
        let inner_bus = bus.clone();
        let count = Arc::new(Mutex::new(0));
        let count_clone = count.clone();

        bus.subscribe(EventName::ItemStoreSuccess, move |_| {
            inner_bus.emit(EventName::ItemNew, None);
        });
        bus.subscribe(EventName::ItemNew, move |_| {
            *count_clone.lock().unwrap() += 1;
        });
        bus.emit(EventName::ItemStoreSuccess, None);

        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn event_bus_should_stop_delivering_after_unsubscribe() {
        let bus = EventBus::new();
        let count = Arc::new(Mutex::new(0));
        let first = {
            let count = count.clone();
            bus.subscribe(EventName::ItemStoreSuccess, move |_| *count.lock().unwrap() += 1)
        };
        let second = {
            let count = count.clone();
            bus.subscribe(EventName::ItemStoreSuccess, move |_| *count.lock().unwrap() += 10)
        };
        assert_ne!(first, second);

        assert!(bus.unsubscribe(EventName::ItemStoreSuccess, first));
        assert!(!bus.unsubscribe(EventName::ItemStoreSuccess, first));
        assert!(!bus.unsubscribe(EventName::ItemNew, second));
        bus.emit(EventName::ItemStoreSuccess, None);

        assert_eq!(*count.lock().unwrap(), 10);
        assert_eq!(bus.subscriber_count(EventName::ItemStoreSuccess), 1);
    }

    #[test]
    fn emit_without_subscribers_is_a_no_op() {
        let bus = EventBus::new();
        bus.emit(EventName::OutfitNew, None);
        assert_eq!(bus.subscriber_count(EventName::OutfitNew), 0);
    }
}
