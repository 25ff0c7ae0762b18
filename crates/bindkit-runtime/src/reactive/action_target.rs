#![forbid(unsafe_code)]

//! Bridge from a control's single callback slot to a disposable resource.
//!
//! # Design
//!
//! A control holds at most one target per interaction, and holds it weakly.
//! [`ActionTargetBridge`] is the minimal object that can sit in that slot:
//! it keeps itself alive through a strong self-reference for as long as it
//! is installed, forwards every `perform` to its callback, and on
//! [`dispose`](ActionTargetBridge::dispose) clears the slot and breaks the
//! self-reference.
//!
//! The bridge never owns the control. If the control is dropped first, the
//! bridge notices through its `Weak` and skips the uninstall.
//!
//! # Invariants
//!
//! 1. The installer runs exactly once with `Some(target)` (on construction)
//!    and at most once with `None` (on the first dispose, only if the
//!    control is still alive).
//! 2. The callback is never invoked after `dispose` has started.
//! 3. `dispose` is idempotent.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::thread::ThreadId;

use bindkit_core::{ActionTarget, Control, ControlId, affinity};

/// Installs (`Some`) or clears (`None`) a control's callback slot.
pub type Installer<S> = Rc<dyn Fn(&S, Option<Weak<dyn ActionTarget>>)>;

type Callback = Rc<dyn Fn()>;

/// Occupant of a control's callback slot for one interaction.
pub struct ActionTargetBridge<S> {
    retain_self: RefCell<Option<Rc<ActionTargetBridge<S>>>>,
    subject: Weak<S>,
    control: ControlId,
    owner: ThreadId,
    callback: RefCell<Option<Callback>>,
    installer: RefCell<Option<Installer<S>>>,
    disposed: Cell<bool>,
}

impl<S> std::fmt::Debug for ActionTargetBridge<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionTargetBridge")
            .field("control", &self.control)
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

impl<S: Control> ActionTargetBridge<S> {
    /// Install a new bridge as `subject`'s target and return it.
    ///
    /// The bridge stays alive until [`dispose`](Self::dispose) even if the
    /// returned handle is dropped.
    pub fn new(
        subject: &Rc<S>,
        installer: Installer<S>,
        callback: impl Fn() + 'static,
    ) -> Rc<Self> {
        let bridge = Rc::new(Self {
            retain_self: RefCell::new(None),
            subject: Rc::downgrade(subject),
            control: subject.id(),
            owner: subject.core().owner_thread(),
            callback: RefCell::new(Some(Rc::new(callback))),
            installer: RefCell::new(Some(Rc::clone(&installer))),
            disposed: Cell::new(false),
        });
        *bridge.retain_self.borrow_mut() = Some(Rc::clone(&bridge));

        let target: Rc<dyn ActionTarget> = bridge.clone();
        installer(subject.as_ref(), Some(Rc::downgrade(&target)));
        tracing::debug!(control = %bridge.control, "action target installed");
        bridge
    }

    /// Uninstall from the control (if it is still alive), release the
    /// callback, and release the self-reference.
    ///
    /// # Panics
    ///
    /// In debug builds, panics when called off the control's owning thread.
    pub fn dispose(&self) {
        affinity::debug_ensure(self.owner);
        if self.disposed.replace(true) {
            return;
        }

        let installer = self.installer.borrow_mut().take();
        match (self.subject.upgrade(), installer) {
            (Some(subject), Some(installer)) => {
                installer(subject.as_ref(), None);
                tracing::debug!(control = %self.control, "action target uninstalled");
            }
            _ => {
                tracing::debug!(control = %self.control, "action target released after control drop");
            }
        }

        let callback = self.callback.borrow_mut().take();
        drop(callback);
        let retain_self = self.retain_self.borrow_mut().take();
        drop(retain_self);
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }
}

impl<S> ActionTarget for ActionTargetBridge<S> {
    fn perform(&self) {
        if self.disposed.get() {
            return;
        }
        // Clone out so the callback may dispose this bridge.
        let callback = self.callback.borrow().clone();
        if let Some(callback) = callback {
            callback();
        }
    }
}
