//! Minimal change-notification primitive.
//!
//! [`Observers`] is the bare listener registry that property types embed;
//! [`ObservableValue`] couples a stored value with such a registry and is
//! used wherever a plain mutable flag needs to announce replacement (for
//! example the `active` flag of every property).
//!
//! Notification is synchronous on the calling thread and intentionally
//! lock-free; the host is expected to serialize all mutation of a container.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Result type returned by listeners.
///
/// A listener that fails reports an error instead of unwinding; the failure
/// is logged and the remaining listeners still run, so one misbehaving
/// observer cannot starve the others.
pub type ListenerResult = Result<(), Box<dyn std::error::Error>>;

/// Opaque handle identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Rc<dyn Fn(&E) -> ListenerResult>;

/// An ordered set of listeners over events of type `E`.
///
/// `E` may be unsized (`Observers<dyn AnyProperty>` is how properties notify
/// with themselves as payload). Listeners are invoked in registration order
/// on a snapshot of the set, so a listener may register or remove listeners
/// from inside its callback without corrupting the iteration.
pub struct Observers<E: ?Sized> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(ListenerId, Listener<E>)>>,
}

impl<E: ?Sized> Observers<E> {
    pub fn new() -> Self {
        Observers {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Registers a listener and returns the handle used to remove it.
    pub fn add_listener(&self, listener: Listener<E>) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);
        self.entries.borrow_mut().push((id, listener));
        id
    }

    /// Registers a plain closure as a listener.
    pub fn add_fn(&self, listener: impl Fn(&E) -> ListenerResult + 'static) -> ListenerId {
        self.add_listener(Rc::new(listener))
    }

    /// Removes a listener. Returns `false` if the handle was not registered
    /// (already removed, or from another observer set).
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Invokes every registered listener with `event`.
    ///
    /// Listener failures are isolated: an `Err` is logged via [`log::warn`]
    /// and the remaining listeners are still invoked.
    pub fn notify(&self, event: &E) {
        let snapshot: Vec<Listener<E>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in snapshot {
            if let Err(err) = listener(event) {
                log::warn!("settings listener failed: {}", err);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<E: ?Sized> Default for Observers<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// A value cell that notifies listeners whenever the value is replaced.
pub struct ObservableValue<T> {
    value: RefCell<T>,
    observers: Observers<T>,
}

impl<T: Clone + 'static> ObservableValue<T> {
    pub fn new(value: T) -> Self {
        ObservableValue {
            value: RefCell::new(value),
            observers: Observers::new(),
        }
    }

    pub fn get(&self) -> T {
        self.value.borrow().clone()
    }

    /// Replaces the stored value and notifies every listener with the new
    /// value. Notification is unconditional; deduplicating writes of an
    /// unchanged value is the caller's concern.
    pub fn set(&self, value: T) {
        let snapshot = value.clone();
        *self.value.borrow_mut() = value;
        self.observers.notify(&snapshot);
    }

    pub fn add_listener(&self, listener: impl Fn(&T) -> ListenerResult + 'static) -> ListenerId {
        self.observers.add_fn(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.observers.remove_listener(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifies_all_listeners_in_registration_order() {
        let observers: Observers<i32> = Observers::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        observers.add_fn(move |value| {
            first.borrow_mut().push(("first", *value));
            Ok(())
        });
        let second = Rc::clone(&seen);
        observers.add_fn(move |value| {
            second.borrow_mut().push(("second", *value));
            Ok(())
        });

        observers.notify(&7);
        assert_eq!(&*seen.borrow(), &[("first", 7), ("second", 7)]);
    }

    #[test]
    fn failing_listener_does_not_stop_later_listeners() {
        let observers: Observers<i32> = Observers::new();
        let reached = Rc::new(Cell::new(false));

        observers.add_fn(|_| Err("listener exploded".into()));
        let flag = Rc::clone(&reached);
        observers.add_fn(move |_| {
            flag.set(true);
            Ok(())
        });

        observers.notify(&1);
        assert!(reached.get());
    }

    #[test]
    fn removed_listener_is_not_invoked() {
        let observers: Observers<i32> = Observers::new();
        let count = Rc::new(Cell::new(0));

        let counter = Rc::clone(&count);
        let id = observers.add_fn(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

        observers.notify(&1);
        assert!(observers.remove_listener(id));
        assert!(!observers.remove_listener(id));
        observers.notify(&2);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn listener_may_register_another_listener_during_notification() {
        let observers: Rc<Observers<i32>> = Rc::new(Observers::new());
        let inner = Rc::clone(&observers);
        observers.add_fn(move |_| {
            inner.add_fn(|_| Ok(()));
            Ok(())
        });

        observers.notify(&1);
        assert_eq!(observers.len(), 2);
    }

    #[test]
    fn observable_value_replaces_and_notifies() {
        let value = ObservableValue::new(String::from("light"));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        value.add_listener(move |new| {
            sink.borrow_mut().push(new.clone());
            Ok(())
        });

        value.set(String::from("dark"));
        assert_eq!(value.get(), "dark");
        assert_eq!(&*seen.borrow(), &[String::from("dark")]);
    }
}
