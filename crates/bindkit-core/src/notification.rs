#![forbid(unsafe_code)]

//! Named notifications scoped to a sender.
//!
//! Text inputs post their end-of-editing notification here. Observers can
//! filter by sender, which is how a binding listens to exactly one control
//! instance.

use crate::control::ControlId;
use crate::notifier::{Notifier, ObserverToken};

/// Name of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotificationName(&'static str);

impl NotificationName {
    pub const TEXT_FIELD_DID_END_EDITING: Self = Self("text_field.did_end_editing");
    pub const TEXT_VIEW_DID_END_EDITING: Self = Self("text_view.did_end_editing");

    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

/// A posted notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub name: NotificationName,
    pub sender: Option<ControlId>,
}

thread_local! {
    static DEFAULT_CENTER: NotificationCenter = NotificationCenter::new();
}

/// Broadcast hub for [`Notification`]s.
///
/// Cloning shares the same observer list. Each thread has its own default
/// center, matching the single-threaded model of the controls posting to it.
#[derive(Clone, Default)]
pub struct NotificationCenter {
    notifier: Notifier<Notification>,
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("observers", &self.notifier.observer_count())
            .finish()
    }
}

impl NotificationCenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// This thread's default center.
    #[must_use]
    pub fn default_center() -> Self {
        DEFAULT_CENTER.with(Clone::clone)
    }

    /// Observe notifications called `name`. With `sender` set, only
    /// notifications posted by that control are delivered.
    pub fn observe(
        &self,
        name: NotificationName,
        sender: Option<ControlId>,
        callback: impl Fn(&Notification) + 'static,
    ) -> ObserverToken {
        self.notifier.observe(move |note: &Notification| {
            if note.name != name {
                return;
            }
            if sender.is_some() && note.sender != sender {
                return;
            }
            callback(note);
        })
    }

    pub fn post(&self, name: NotificationName, sender: Option<ControlId>) {
        tracing::trace!(name = name.as_str(), ?sender, "posting notification");
        self.notifier.notify(&Notification { name, sender });
    }

    /// Same notifier handle, i.e. both centers deliver to the same observers.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.notifier.ptr_eq(&other.notifier)
    }
}
