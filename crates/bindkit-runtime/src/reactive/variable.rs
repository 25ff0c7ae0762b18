#![forbid(unsafe_code)]

//! Observable mutable value cell.
//!
//! # Design
//!
//! [`Variable<T>`] wraps a value of type `T` in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). Every `set` is a change event: live
//! subscribers are notified in registration order even when the new value
//! equals the old one. Callers that want to skip redundant writes compare
//! before writing (the two-way binding does exactly that).
//!
//! # Performance
//!
//! | Operation     | Complexity                 |
//! |---------------|----------------------------|
//! | `get()`       | O(1) + clone of `T`        |
//! | `set()`       | O(S) where S = subscribers |
//! | `subscribe()` | O(1) amortized             |
//!
//! # Failure Modes
//!
//! - **Re-entrant set**: calling `set()` from a subscriber is allowed; the
//!   nested notification runs to completion before the outer one resumes.
//! - **Subscriber leak**: if [`Subscription`] guards are kept forever,
//!   callbacks accumulate. Dead entries are pruned lazily during notify.
//! - **Dropped while observed**: when the last `Variable` handle is dropped,
//!   streams from [`Variable::as_stream`] complete.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::stream::{Observer, Stream};
use super::subscription::Subscription;

struct Listener<T> {
    on_change: Box<dyn Fn(&T)>,
    on_dropped: RefCell<Option<Box<dyn FnOnce()>>>,
}

/// Shared interior for [`Variable<T>`].
struct VariableInner<T> {
    value: T,
    version: u64,
    /// Listeners stored as weak references. Dead entries are pruned on notify.
    listeners: Vec<Weak<Listener<T>>>,
}

impl<T> Drop for VariableInner<T> {
    fn drop(&mut self) {
        for listener in self.listeners.drain(..).filter_map(|w| w.upgrade()) {
            let on_dropped = listener.on_dropped.borrow_mut().take();
            if let Some(on_dropped) = on_dropped {
                on_dropped();
            }
        }
    }
}

/// A shared, version-tracked value with change notification.
///
/// Cloning a `Variable` creates a new handle to the **same** inner state.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 on each `set` or `update`.
/// 2. Subscribers are notified in registration order.
/// 3. Dead subscribers (dropped [`Subscription`] guards) are pruned lazily.
pub struct Variable<T> {
    inner: Rc<RefCell<VariableInner<T>>>,
}

impl<T> Clone for Variable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Variable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Variable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscriber_count", &inner.listeners.len())
            .finish()
    }
}

impl<T: Clone + 'static> Variable<T> {
    /// Create a new variable with the given initial value at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(VariableInner {
                value,
                version: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Get a clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value and notify every live subscriber.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Modify the value in place and notify every live subscriber.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        {
            let mut inner = self.inner.borrow_mut();
            f(&mut inner.value);
            inner.version += 1;
        }
        self.notify();
    }

    /// Subscribe to value changes. The current value is not delivered.
    ///
    /// Dropping the returned guard unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        self.listen(callback, || {})
    }

    /// Stream of values: the current value on subscribe, then every change.
    /// Completes when the last `Variable` handle is dropped.
    ///
    /// The stream does not keep the variable alive.
    #[must_use]
    pub fn as_stream(&self) -> Stream<T> {
        let weak = Rc::downgrade(&self.inner);
        Stream::create(move |observer: Observer<T>| {
            let Some(inner) = weak.upgrade() else {
                observer.on_completed();
                return Subscription::empty();
            };
            let variable = Variable { inner };
            let current = variable.get();
            observer.on_next(&current);
            let down = observer.clone();
            variable.listen(move |value| down.on_next(value), move || observer.on_completed())
        })
    }

    /// Current version number.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of registered subscribers (including dead ones not yet pruned).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    fn listen(
        &self,
        on_change: impl Fn(&T) + 'static,
        on_dropped: impl FnOnce() + 'static,
    ) -> Subscription {
        let strong = Rc::new(Listener {
            on_change: Box::new(on_change),
            on_dropped: RefCell::new(Some(Box::new(on_dropped))),
        });
        self.inner
            .borrow_mut()
            .listeners
            .push(Rc::downgrade(&strong));
        Subscription::new(move || drop(strong))
    }

    /// Notify live subscribers and prune dead ones.
    fn notify(&self) {
        // Collect first so callbacks run without the borrow held.
        let (listeners, value) = {
            let mut inner = self.inner.borrow_mut();
            inner.listeners.retain(|w| w.strong_count() > 0);
            let listeners: Vec<Rc<Listener<T>>> =
                inner.listeners.iter().filter_map(Weak::upgrade).collect();
            (listeners, inner.value.clone())
        };
        for listener in &listeners {
            (listener.on_change)(&value);
        }
    }
}
