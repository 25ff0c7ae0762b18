#![forbid(unsafe_code)]

//! Control identity, lifecycle, and attached objects.
//!
//! Every control embeds a [`ControlCore`]. The core gives the control a
//! process-unique [`ControlId`], remembers the thread that created it, fires
//! a "deallocated" notification when it is dropped, and owns a small table
//! of attached objects whose lifetime is tied to the control's own.
//!
//! # Invariants
//!
//! 1. The deallocated notification fires exactly once, from `Drop`, before
//!    any attached object is released.
//! 2. Attached objects are released when the control is dropped and never
//!    earlier.
//! 3. At most one attached object exists per `(key, type)` pair.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, ThreadId};

use crate::notifier::{Notifier, ObserverToken};

static NEXT_CONTROL_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a control instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlId(u64);

impl ControlId {
    fn next() -> Self {
        Self(NEXT_CONTROL_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Build an id from a raw value. Intended for tests and diagnostics.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A stateful control that can be wrapped by the reactive layer.
pub trait Control: 'static {
    fn core(&self) -> &ControlCore;

    fn id(&self) -> ControlId {
        self.core().id()
    }
}

type AttachmentKey = (&'static str, TypeId);

/// Identity, lifecycle signal, and attachment table shared by all controls.
pub struct ControlCore {
    id: ControlId,
    owner: ThreadId,
    attachments: RefCell<HashMap<AttachmentKey, Box<dyn Any>>>,
    deallocated: Notifier<()>,
}

impl std::fmt::Debug for ControlCore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlCore")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("attachments", &self.attachments.borrow().len())
            .finish()
    }
}

impl Default for ControlCore {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlCore {
    /// Create a core owned by the current thread.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: ControlId::next(),
            owner: thread::current().id(),
            attachments: RefCell::new(HashMap::new()),
            deallocated: Notifier::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> ControlId {
        self.id
    }

    /// Thread that created the control.
    #[must_use]
    pub fn owner_thread(&self) -> ThreadId {
        self.owner
    }

    /// Observe the control being dropped. The callback runs at most once.
    pub fn on_deallocated(&self, callback: impl Fn() + 'static) -> ObserverToken {
        self.deallocated.observe(move |_| callback())
    }

    /// Look up the object attached under `key` with type `T`.
    #[must_use]
    pub fn attachment<T: Clone + 'static>(&self, key: &'static str) -> Option<T> {
        self.attachments
            .borrow()
            .get(&(key, TypeId::of::<T>()))
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Return the object attached under `key`, creating and attaching it
    /// with `create` on first use.
    ///
    /// `create` runs without any borrow held, so it may read the control.
    /// If `create` re-entrantly attaches an object under the same key, that
    /// object wins and the freshly created one is discarded.
    pub fn attach_with<T: Clone + 'static>(
        &self,
        key: &'static str,
        create: impl FnOnce() -> T,
    ) -> T {
        if let Some(existing) = self.attachment::<T>(key) {
            return existing;
        }
        let value = create();
        let mut attachments = self.attachments.borrow_mut();
        let slot = (key, TypeId::of::<T>());
        match attachments
            .get(&slot)
            .and_then(|existing| existing.downcast_ref::<T>())
        {
            Some(existing) => existing.clone(),
            None => {
                attachments.insert(slot, Box::new(value.clone()));
                value
            }
        }
    }

    /// Number of attached objects.
    #[must_use]
    pub fn attachment_count(&self) -> usize {
        self.attachments.borrow().len()
    }
}

impl Drop for ControlCore {
    fn drop(&mut self) {
        tracing::debug!(control = %self.id, "control deallocated");
        self.deallocated.notify(&());
        let attachments = std::mem::take(self.attachments.get_mut());
        drop(attachments);
    }
}
