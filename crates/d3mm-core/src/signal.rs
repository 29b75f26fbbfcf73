//! Synchronous change-notification signals.
//!
//! Collections emit `updated` after a structural change has committed, on
//! the mutating thread. The organized view subscribes to rebuild its
//! indices. This is a plain observer list; no event bus, no threads.

use std::cell::RefCell;
use std::rc::Rc;

type Callback = Rc<dyn Fn()>;

/// Handle returned by [`Signal::subscribe`]; pass it back to
/// [`Signal::unsubscribe`] to detach the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

/// A synchronous multi-listener notification slot.
///
/// Cloning a signal's owner must not carry observers with it, so owners
/// reset their signal on clone.
#[derive(Default)]
pub struct Signal {
    observers: RefCell<Vec<(u64, Callback)>>,
    next_id: RefCell<u64>,
}

impl Signal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer; fires synchronously on every [`Signal::emit`].
    pub fn subscribe(&self, observer: impl Fn() + 'static) -> Subscription {
        let mut next_id = self.next_id.borrow_mut();
        let id = *next_id;
        *next_id += 1;

        self.observers.borrow_mut().push((id, Rc::new(observer)));

        Subscription(id)
    }

    /// Detach a previously registered observer. Unknown subscriptions are
    /// ignored.
    pub fn unsubscribe(&self, subscription: Subscription) {
        self.observers
            .borrow_mut()
            .retain(|(id, _)| *id != subscription.0);
    }

    /// Invoke every observer, in subscription order.
    pub fn emit(&self) {
        // Snapshot so an observer may subscribe/unsubscribe re-entrantly.
        let observers: Vec<Callback> = self
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| Rc::clone(observer))
            .collect();

        for observer in observers {
            observer();
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }
}

impl std::fmt::Debug for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("observers", &self.observer_count())
            .finish()
    }
}
