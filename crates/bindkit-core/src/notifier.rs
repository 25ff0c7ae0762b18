#![forbid(unsafe_code)]

//! Callback lists with RAII observer tokens.
//!
//! # Design
//!
//! A [`Notifier<A>`] keeps its observers as `Weak<dyn Fn(&A)>`. The strong
//! `Rc` lives inside the [`ObserverToken`] handed back to the caller, so
//! dropping the token is all it takes to stop receiving notifications. Dead
//! entries are pruned lazily on the next [`Notifier::notify`].
//!
//! Dropping a token never touches the notifier itself. This matters for the
//! "deallocated" signal: observers are routinely dropped from inside a
//! notification that is being delivered while the owning control is being
//! torn down.
//!
//! # Failure Modes
//!
//! - **Observer registered during notify**: it is not called for the
//!   notification in flight (the callback list is snapshotted first).
//! - **Token dropped during notify**: the callback may still receive the
//!   notification in flight if it was already snapshotted.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type CallbackRc<A> = Rc<dyn Fn(&A)>;
type CallbackWeak<A> = Weak<dyn Fn(&A)>;

/// A shared list of observers notified in registration order.
///
/// Cloning a `Notifier` creates a new handle to the **same** observer list.
pub struct Notifier<A> {
    observers: Rc<RefCell<Vec<CallbackWeak<A>>>>,
}

impl<A> Clone for Notifier<A> {
    fn clone(&self) -> Self {
        Self {
            observers: Rc::clone(&self.observers),
        }
    }
}

impl<A> Default for Notifier<A> {
    fn default() -> Self {
        Self {
            observers: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<A> std::fmt::Debug for Notifier<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("observer_count", &self.observers.borrow().len())
            .finish()
    }
}

impl<A: 'static> Notifier<A> {
    /// Create an empty notifier.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. It stays registered until the returned token
    /// is dropped.
    pub fn observe(&self, callback: impl Fn(&A) + 'static) -> ObserverToken {
        let strong: CallbackRc<A> = Rc::new(callback);
        self.observers.borrow_mut().push(Rc::downgrade(&strong));
        ObserverToken {
            _guard: Box::new(strong),
        }
    }

    /// Deliver `arg` to every live observer and prune dead ones.
    pub fn notify(&self, arg: &A) {
        let callbacks: Vec<CallbackRc<A>> = {
            let mut observers = self.observers.borrow_mut();
            observers.retain(|w| w.strong_count() > 0);
            observers.iter().filter_map(Weak::upgrade).collect()
        };
        for cb in &callbacks {
            cb(arg);
        }
    }

    /// Whether both handles share the same observer list.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.observers, &other.observers)
    }

    /// Number of registered observers, including dead ones not yet pruned.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }
}

/// RAII guard for a [`Notifier`] observer. Dropping it unregisters the
/// callback.
pub struct ObserverToken {
    _guard: Box<dyn std::any::Any>,
}

impl std::fmt::Debug for ObserverToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverToken").finish_non_exhaustive()
    }
}
