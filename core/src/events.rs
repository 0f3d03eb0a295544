//! Synchronous publish/subscribe dispatch with ordered delivery.
//!
//! An [`EventBus`] keeps an ordered listener list per event name and
//! notifies it on demand. Dispatch never suspends: every listener for an
//! emit runs to completion on the caller's stack before `emit` returns.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};

use cadence_types::{EmitError, ListenerFailure, SubscriptionId};

type Listener<T> = Box<dyn FnMut(&T) + Send>;

struct Registration<T> {
    id: SubscriptionId,
    once: bool,
    listener: Listener<T>,
}

/// Named registries of listeners with synchronous, in-order notification.
///
/// Closures have no usable notion of reference equality, so [`on`] hands
/// back a [`SubscriptionId`] and [`off`] takes it to remove exactly that
/// registration. Registering the same logic twice yields two independent
/// registrations that each fire per emit.
///
/// [`on`]: EventBus::on
/// [`off`]: EventBus::off
pub struct EventBus<T> {
    registry: HashMap<String, Vec<Registration<T>>>,
    next_id: u64,
}

impl<T> EventBus<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: HashMap::new(),
            next_id: 0,
        }
    }

    /// Appends `listener` to `event`'s delivery list, creating the list if
    /// this is the event's first registration.
    pub fn on(
        &mut self,
        event: impl Into<String>,
        listener: impl FnMut(&T) + Send + 'static,
    ) -> SubscriptionId {
        self.register(event.into(), false, Box::new(listener))
    }

    /// Like [`on`], but the listener is unregistered after it fires on the
    /// next emit. It does not fire at registration time.
    ///
    /// [`on`]: EventBus::on
    pub fn once(
        &mut self,
        event: impl Into<String>,
        listener: impl FnMut(&T) + Send + 'static,
    ) -> SubscriptionId {
        self.register(event.into(), true, Box::new(listener))
    }

    fn register(&mut self, event: String, once: bool, listener: Listener<T>) -> SubscriptionId {
        let id = SubscriptionId::new(self.next_id);
        self.next_id += 1;
        self.registry
            .entry(event)
            .or_default()
            .push(Registration { id, once, listener });
        id
    }

    /// Removes the registration `id` from `event`'s list.
    ///
    /// Returns whether anything was removed. Unknown events and already
    /// removed ids are a quiet no-op, so removing twice is harmless.
    pub fn off(&mut self, event: &str, id: SubscriptionId) -> bool {
        let Some(listeners) = self.registry.get_mut(event) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|reg| reg.id != id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            self.registry.remove(event);
        }
        removed
    }

    /// Synchronously invokes every listener registered for `event`, in
    /// registration order, passing `payload` to each.
    ///
    /// A panicking listener never blocks the ones after it: each listener
    /// runs under `catch_unwind`, delivery always completes, and the panics
    /// are reported together in the returned [`EmitError`] after the last
    /// listener has run. Emitting an event with no registrations is a no-op
    /// returning `Ok(0)`; otherwise `Ok` carries the number of listeners
    /// notified.
    pub fn emit(&mut self, event: &str, payload: &T) -> Result<usize, EmitError> {
        let Some(listeners) = self.registry.get_mut(event) else {
            return Ok(0);
        };

        let notified = listeners.len();
        let mut failures = Vec::new();
        for reg in listeners.iter_mut() {
            let outcome = catch_unwind(AssertUnwindSafe(|| (reg.listener)(payload)));
            if let Err(panic) = outcome {
                let message = panic_message(panic.as_ref());
                tracing::error!(event, id = %reg.id, "listener panicked: {message}");
                failures.push(ListenerFailure {
                    id: reg.id,
                    message,
                });
            }
        }

        listeners.retain(|reg| !reg.once);
        if listeners.is_empty() {
            self.registry.remove(event);
        }

        if failures.is_empty() {
            Ok(notified)
        } else {
            Err(EmitError {
                event: event.to_string(),
                notified,
                failures,
            })
        }
    }

    /// Number of live registrations for `event`.
    #[must_use]
    pub fn listener_count(&self, event: &str) -> usize {
        self.registry.get(event).map_or(0, Vec::len)
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use super::EventBus;

    fn recording_bus() -> (EventBus<String>, Arc<Mutex<Vec<String>>>) {
        (EventBus::new(), Arc::new(Mutex::new(Vec::new())))
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &str) -> impl FnMut(&String) + Send + use<> {
        let log = Arc::clone(log);
        let tag = tag.to_string();
        move |payload: &String| log.lock().unwrap().push(format!("{tag}:{payload}"))
    }

    #[test]
    fn listeners_fire_in_registration_order() {
        let (mut bus, log) = recording_bus();
        bus.on("greet", recorder(&log, "a"));
        bus.on("greet", recorder(&log, "b"));

        let notified = bus.emit("greet", &"hello".to_string()).unwrap();

        assert_eq!(notified, 2);
        assert_eq!(*log.lock().unwrap(), vec!["a:hello", "b:hello"]);
    }

    #[test]
    fn off_removes_only_the_targeted_registration() {
        let (mut bus, log) = recording_bus();
        let a = bus.on("greet", recorder(&log, "a"));
        bus.on("greet", recorder(&log, "b"));

        assert!(bus.off("greet", a));
        bus.emit("greet", &"hello".to_string()).unwrap();

        assert_eq!(*log.lock().unwrap(), vec!["b:hello"]);
    }

    #[test]
    fn off_twice_is_a_quiet_no_op() {
        let mut bus: EventBus<String> = EventBus::new();
        let id = bus.on("greet", |_| {});

        assert!(bus.off("greet", id));
        assert!(!bus.off("greet", id));
        assert!(!bus.off("missing", id));
    }

    #[test]
    fn emit_without_listeners_is_a_no_op() {
        let mut bus: EventBus<String> = EventBus::new();
        assert_eq!(bus.emit("silence", &"hello".to_string()), Ok(0));
    }

    #[test]
    fn duplicate_registrations_each_fire() {
        let count = Arc::new(AtomicU32::new(0));
        let mut bus: EventBus<()> = EventBus::new();
        for _ in 0..2 {
            let sink = Arc::clone(&count);
            bus.on("tick", move |()| {
                sink.fetch_add(1, Ordering::SeqCst);
            });
        }

        bus.emit("tick", &()).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn once_fires_on_the_first_emit_only() {
        let count = Arc::new(AtomicU32::new(0));
        let sink = Arc::clone(&count);
        let mut bus: EventBus<()> = EventBus::new();
        bus.once("ping", move |()| {
            sink.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(bus.emit("ping", &()), Ok(1));
        assert_eq!(bus.emit("ping", &()), Ok(0));
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count("ping"), 0);
    }

    #[test]
    fn once_does_not_disturb_persistent_listeners() {
        let (mut bus, log) = recording_bus();
        bus.on("greet", recorder(&log, "keep"));
        bus.once("greet", recorder(&log, "once"));

        bus.emit("greet", &"first".to_string()).unwrap();
        bus.emit("greet", &"second".to_string()).unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["keep:first", "once:first", "keep:second"]
        );
    }

    #[test]
    fn panicking_listener_does_not_block_later_listeners() {
        let (mut bus, log) = recording_bus();
        let bad = bus.on("greet", |_: &String| panic!("boom"));
        bus.on("greet", recorder(&log, "b"));

        let err = bus.emit("greet", &"hello".to_string()).unwrap_err();

        assert_eq!(*log.lock().unwrap(), vec!["b:hello"]);
        assert_eq!(err.event, "greet");
        assert_eq!(err.notified, 2);
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].id, bad);
        assert_eq!(err.failures[0].message, "boom");
    }

    #[test]
    fn bus_stays_usable_after_a_panic() {
        let (mut bus, log) = recording_bus();
        bus.on("greet", |_: &String| panic!("boom"));
        bus.on("greet", recorder(&log, "b"));

        let _ = bus.emit("greet", &"one".to_string());
        let _ = bus.emit("greet", &"two".to_string());

        assert_eq!(*log.lock().unwrap(), vec!["b:one", "b:two"]);
        assert_eq!(bus.listener_count("greet"), 2);
    }

    #[test]
    fn listener_count_tracks_registrations() {
        let mut bus: EventBus<()> = EventBus::new();
        assert_eq!(bus.listener_count("tick"), 0);

        let a = bus.on("tick", |()| {});
        bus.on("tick", |()| {});
        assert_eq!(bus.listener_count("tick"), 2);

        bus.off("tick", a);
        assert_eq!(bus.listener_count("tick"), 1);
    }
}
