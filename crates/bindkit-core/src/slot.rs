#![forbid(unsafe_code)]

//! Single callback slots ("target/action").
//!
//! A control exposes one [`ActionSlot`] per interaction (value changed,
//! return key, selected, ...). The slot holds at most one target, and holds
//! it weakly: whoever installs a target is responsible for keeping it alive
//! and for clearing the slot again.

use std::cell::{Cell, RefCell};
use std::rc::Weak;

/// Receiver of a control interaction.
pub trait ActionTarget {
    /// Called synchronously when the interaction happens.
    fn perform(&self);
}

/// A control's single callback slot for one interaction.
#[derive(Default)]
pub struct ActionSlot {
    target: RefCell<Option<Weak<dyn ActionTarget>>>,
    installs: Cell<u64>,
}

impl std::fmt::Debug for ActionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionSlot")
            .field("installed", &self.is_installed())
            .field("installs", &self.installs.get())
            .finish()
    }
}

impl ActionSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `target`, or clear the slot with `None`.
    ///
    /// Installing over a live target replaces it; that is a caller error
    /// and is logged.
    pub fn set(&self, target: Option<Weak<dyn ActionTarget>>) {
        let mut slot = self.target.borrow_mut();
        if target.is_some() {
            if slot.as_ref().is_some_and(|t| t.strong_count() > 0) {
                tracing::warn!("action slot already holds a live target; replacing it");
            }
            self.installs.set(self.installs.get() + 1);
        }
        *slot = target;
    }

    /// Whether a live target is installed.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.target
            .borrow()
            .as_ref()
            .is_some_and(|t| t.strong_count() > 0)
    }

    /// Total number of targets ever installed into this slot.
    #[must_use]
    pub fn install_count(&self) -> u64 {
        self.installs.get()
    }

    /// Fire the interaction. Returns `false` if no live target received it.
    ///
    /// The slot is not borrowed while the target runs, so the target may
    /// clear or replace the slot.
    pub fn send(&self) -> bool {
        let target = self.target.borrow().as_ref().and_then(Weak::upgrade);
        match target {
            Some(target) => {
                tracing::trace!("action slot performing");
                target.perform();
                true
            }
            None => false,
        }
    }
}
