//! Single-threaded publish/subscribe.
//!
//! Listeners run synchronously inside [`Signal::publish`], on the caller's
//! stack. Keep them cheap: the monitor publishes on every pointer move.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

type Listener<T> = Rc<dyn Fn(&T)>;

struct Registry<T> {
    next_id: u64,
    listeners: BTreeMap<u64, Listener<T>>,
}

/// A typed event channel owned by its publisher.
pub struct Signal<T> {
    registry: Rc<RefCell<Registry<T>>>,
}

impl<T: 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> Signal<T> {
    /// Create a signal with no listeners.
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                listeners: BTreeMap::new(),
            })),
        }
    }

    /// Register a listener. It stays registered while the returned handle lives.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id = registry.next_id.wrapping_add(1);
        registry.listeners.insert(id, Rc::new(listener));
        drop(registry);

        let weak: Weak<RefCell<Registry<T>>> = Rc::downgrade(&self.registry);
        Subscription {
            unsubscribe: Some(Box::new(move || {
                if let Some(registry) = weak.upgrade() {
                    registry.borrow_mut().listeners.remove(&id);
                }
            })),
        }
    }

    /// Call every listener with `event`, in subscription order.
    ///
    /// The listener list is snapshotted first, so listeners may subscribe or
    /// unsubscribe while being notified; changes apply to the next publish.
    pub fn publish(&self, event: &T) {
        let listeners: Vec<Listener<T>> = self.registry.borrow().listeners.values().cloned().collect();
        for listener in listeners {
            listener(event);
        }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Handle to a registered listener. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn dispose(mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }

    /// Keep the listener registered for as long as the signal exists.
    pub fn forget(mut self) {
        self.unsubscribe = None;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_publish_reaches_listeners_in_order() {
        let signal: Signal<u32> = Signal::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = {
            let log = log.clone();
            signal.subscribe(move |v| log.borrow_mut().push(("first", *v)))
        };
        let second = {
            let log = log.clone();
            signal.subscribe(move |v| log.borrow_mut().push(("second", *v)))
        };

        signal.publish(&7);
        assert_eq!(*log.borrow(), vec![("first", 7), ("second", 7)]);

        drop(first);
        drop(second);
    }

    #[test]
    fn test_dispose_unsubscribes() {
        let signal: Signal<()> = Signal::new();
        let hits = Rc::new(Cell::new(0));
        let sub = {
            let hits = hits.clone();
            signal.subscribe(move |_| hits.set(hits.get() + 1))
        };

        signal.publish(&());
        sub.dispose();
        signal.publish(&());

        assert_eq!(hits.get(), 1);
        assert_eq!(signal.listener_count(), 0);
    }

    #[test]
    fn test_drop_unsubscribes_and_forget_keeps() {
        let signal: Signal<()> = Signal::new();
        {
            let _sub = signal.subscribe(|_| {});
            assert_eq!(signal.listener_count(), 1);
        }
        assert_eq!(signal.listener_count(), 0);

        signal.subscribe(|_| {}).forget();
        assert_eq!(signal.listener_count(), 1);
    }

    #[test]
    fn test_subscription_outliving_signal() {
        let signal: Signal<()> = Signal::new();
        let sub = signal.subscribe(|_| {});
        drop(signal);
        sub.dispose();
    }

    #[test]
    fn test_listener_may_subscribe_during_publish() {
        let signal: Rc<Signal<()>> = Rc::new(Signal::new());
        let added = Rc::new(RefCell::new(Vec::new()));

        let weak = Rc::downgrade(&signal);
        let sink = added.clone();
        let _sub = signal.subscribe(move |_| {
            if let Some(signal) = weak.upgrade() {
                sink.borrow_mut().push(signal.subscribe(|_| {}));
            }
        });

        signal.publish(&());
        assert_eq!(added.borrow().len(), 1);
        assert_eq!(signal.listener_count(), 2);
    }
}
