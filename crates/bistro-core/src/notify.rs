//! # Notification Registry
//!
//! Observer fan-out for order-state events: kitchen stations and waiters
//! register once, and every placed order is delivered to each of them.
//!
//! ## Delivery Semantics
//! - set semantics keyed by reference identity (duplicate registration of
//!   the same `Arc` is suppressed)
//! - delivery order follows registration order
//! - fire-and-forget: no retry, no acknowledgment
//! - copy-then-iterate: a stable snapshot of the observer set is taken at
//!   call time, so an observer added or removed during fan-out does not
//!   affect the in-flight notification
//! - an observer that fails is logged and skipped; it never prevents
//!   delivery to subsequent observers
//!
//! The snapshot only defends against reentrant mutation within a single
//! fan-out. The registry is a single-owner component and must be treated
//! as such if ported into a concurrent host.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, warn};

use crate::order::OrderStatus;

// =============================================================================
// Order Event
// =============================================================================

/// Read-only view of an order handed to observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderEvent {
    pub order_id: u64,
    pub status: OrderStatus,
}

// =============================================================================
// Observer
// =============================================================================

/// Error returned by an observer that could not take an event.
///
/// Observer failures are isolated per observer: the registry logs them
/// and continues the fan-out.
#[derive(Debug, Error)]
#[error("observer unavailable: {reason}")]
pub struct NotifyError {
    pub reason: String,
}

impl NotifyError {
    pub fn new(reason: impl Into<String>) -> Self {
        NotifyError {
            reason: reason.into(),
        }
    }
}

/// A notification consumer (kitchen station, waiter).
pub trait Observer: Send + Sync {
    /// Identifier used in fan-out traces.
    fn name(&self) -> &str;

    /// Takes one order event.
    fn update(&self, event: &OrderEvent) -> Result<(), NotifyError>;
}

// =============================================================================
// Registry
// =============================================================================

/// Holds the observer set and fans out order-state events.
#[derive(Default)]
pub struct OrderNotifier {
    observers: Mutex<Vec<Arc<dyn Observer>>>,
}

impl OrderNotifier {
    /// Creates an empty registry.
    pub fn new() -> Self {
        OrderNotifier {
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Registers an observer unless the same reference is already present.
    pub fn register(&self, observer: Arc<dyn Observer>) {
        let mut observers = self.observers.lock().expect("observer list poisoned");
        if !observers.iter().any(|o| Arc::ptr_eq(o, &observer)) {
            debug!(observer = observer.name(), "observer registered");
            observers.push(observer);
        }
    }

    /// Removes an observer, by reference.
    pub fn remove(&self, observer: &Arc<dyn Observer>) {
        let mut observers = self.observers.lock().expect("observer list poisoned");
        observers.retain(|o| !Arc::ptr_eq(o, observer));
    }

    /// Drops every registered observer.
    pub fn clear(&self) {
        self.observers
            .lock()
            .expect("observer list poisoned")
            .clear();
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.lock().expect("observer list poisoned").len()
    }

    /// Delivers `event` to a snapshot of the current observer set.
    ///
    /// The lock is released before delivery so observers may re-enter the
    /// registry (register/remove) without affecting this fan-out.
    pub fn notify(&self, event: OrderEvent) {
        let snapshot: Vec<Arc<dyn Observer>> = self
            .observers
            .lock()
            .expect("observer list poisoned")
            .clone();

        debug!(
            order_id = event.order_id,
            observers = snapshot.len(),
            "notifying observers"
        );

        for observer in snapshot {
            if let Err(error) = observer.update(&event) {
                warn!(
                    observer = observer.name(),
                    order_id = event.order_id,
                    %error,
                    "observer failed, continuing fan-out"
                );
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    /// Observer recording the order ids it receives.
    struct Recorder {
        name: String,
        seen: Mutex<Vec<u64>>,
    }

    impl Recorder {
        fn new(name: &str) -> Arc<Self> {
            Arc::new(Recorder {
                name: name.to_string(),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<u64> {
            self.seen.lock().unwrap().clone()
        }
    }

    impl Observer for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn update(&self, event: &OrderEvent) -> Result<(), NotifyError> {
            self.seen.lock().unwrap().push(event.order_id);
            Ok(())
        }
    }

    /// Observer that always fails.
    struct Broken;

    impl Observer for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn update(&self, _event: &OrderEvent) -> Result<(), NotifyError> {
            Err(NotifyError::new("printer on fire"))
        }
    }

    /// Observer that removes itself from the registry mid-fan-out.
    struct SelfRemover {
        registry: Arc<OrderNotifier>,
        this: Mutex<Option<Arc<dyn Observer>>>,
    }

    impl Observer for SelfRemover {
        fn name(&self) -> &str {
            "self-remover"
        }

        fn update(&self, _event: &OrderEvent) -> Result<(), NotifyError> {
            if let Some(this) = self.this.lock().unwrap().take() {
                self.registry.remove(&this);
            }
            Ok(())
        }
    }

    fn event(order_id: u64) -> OrderEvent {
        OrderEvent {
            order_id,
            status: OrderStatus::Placed,
        }
    }

    #[test]
    fn test_duplicate_registration_delivers_once() {
        let notifier = OrderNotifier::new();
        let recorder = Recorder::new("kitchen");

        notifier.register(recorder.clone() as Arc<dyn Observer>);
        notifier.register(recorder.clone() as Arc<dyn Observer>);
        assert_eq!(notifier.observer_count(), 1);

        notifier.notify(event(1001));
        assert_eq!(recorder.seen(), vec![1001]);
    }

    #[test]
    fn test_delivery_follows_registration_order() {
        let notifier = OrderNotifier::new();
        let first = Recorder::new("first");
        let second = Recorder::new("second");

        notifier.register(first.clone() as Arc<dyn Observer>);
        notifier.register(second.clone() as Arc<dyn Observer>);
        notifier.notify(event(1002));

        assert_eq!(first.seen(), vec![1002]);
        assert_eq!(second.seen(), vec![1002]);
    }

    #[test]
    fn test_failing_observer_does_not_stop_fan_out() {
        let notifier = OrderNotifier::new();
        let recorder = Recorder::new("kitchen");

        notifier.register(Arc::new(Broken));
        notifier.register(recorder.clone() as Arc<dyn Observer>);

        notifier.notify(event(1003));
        assert_eq!(recorder.seen(), vec![1003]);
    }

    #[test]
    fn test_removal_mid_fan_out_keeps_in_flight_delivery() {
        let notifier = Arc::new(OrderNotifier::new());
        let remover = Arc::new(SelfRemover {
            registry: Arc::clone(&notifier),
            this: Mutex::new(None),
        });
        *remover.this.lock().unwrap() = Some(remover.clone() as Arc<dyn Observer>);
        let after = Recorder::new("after");

        notifier.register(remover.clone() as Arc<dyn Observer>);
        notifier.register(after.clone() as Arc<dyn Observer>);

        // The remover drops itself during delivery; the snapshot still
        // reaches the observer registered after it.
        notifier.notify(event(1004));
        assert_eq!(after.seen(), vec![1004]);
        assert_eq!(notifier.observer_count(), 1);

        // The next fan-out no longer includes the removed observer.
        notifier.notify(event(1005));
        assert_eq!(after.seen(), vec![1004, 1005]);
    }

    #[test]
    fn test_remove_and_clear() {
        let notifier = OrderNotifier::new();
        let recorder = Recorder::new("kitchen");
        let as_observer = recorder.clone() as Arc<dyn Observer>;

        notifier.register(as_observer.clone());
        assert_eq!(notifier.observer_count(), 1);

        notifier.remove(&as_observer);
        assert_eq!(notifier.observer_count(), 0);

        notifier.register(as_observer);
        notifier.clear();
        assert_eq!(notifier.observer_count(), 0);
    }
}
