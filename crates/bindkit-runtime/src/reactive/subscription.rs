#![forbid(unsafe_code)]

//! Disposal handles.

use std::cell::RefCell;

/// RAII disposal handle for a stream subscription or any other resource
/// with a teardown action.
///
/// The teardown runs at most once: on the first [`dispose`](Self::dispose)
/// call, or when the handle is dropped.
pub struct Subscription {
    teardown: RefCell<Option<Box<dyn FnOnce()>>>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

impl Subscription {
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: RefCell::new(Some(Box::new(teardown))),
        }
    }

    /// A handle with nothing to tear down.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            teardown: RefCell::new(None),
        }
    }

    /// Combine several handles into one that disposes them all, in order.
    pub fn from_many(subscriptions: impl IntoIterator<Item = Subscription>) -> Self {
        let subscriptions: Vec<Subscription> = subscriptions.into_iter().collect();
        Self::new(move || {
            for subscription in &subscriptions {
                subscription.dispose();
            }
        })
    }

    /// Run the teardown if it has not run yet.
    pub fn dispose(&self) {
        // Take first so a teardown that reaches this handle again sees it
        // as disposed instead of hitting a borrow conflict.
        let teardown = self.teardown.borrow_mut().take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.teardown.borrow().is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.get_mut().take() {
            teardown();
        }
    }
}
