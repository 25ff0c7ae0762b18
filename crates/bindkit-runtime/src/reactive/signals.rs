#![forbid(unsafe_code)]

//! Streams over control lifecycle and notification center events.

use std::rc::Rc;

use bindkit_core::{Control, ControlId, Notification, NotificationCenter, NotificationName};

use super::stream::{Observer, Stream};
use super::subscription::Subscription;

/// Emits once and completes when `subject` is dropped.
///
/// Subscribing after the control is gone emits and completes immediately.
/// The stream holds the control weakly.
#[must_use]
pub fn deallocated<S: Control>(subject: &Rc<S>) -> Stream<()> {
    let weak = Rc::downgrade(subject);
    Stream::create(move |observer: Observer<()>| {
        let Some(subject) = weak.upgrade() else {
            observer.on_next(&());
            observer.on_completed();
            return Subscription::empty();
        };
        let token = subject.core().on_deallocated(move || {
            observer.on_next(&());
            observer.on_completed();
        });
        Subscription::new(move || drop(token))
    })
}

/// Notifications named `name` posted to `center`, optionally only those
/// sent by `sender`. Never completes on its own.
#[must_use]
pub fn notifications(
    center: &NotificationCenter,
    name: NotificationName,
    sender: Option<ControlId>,
) -> Stream<Notification> {
    let center = center.clone();
    Stream::create(move |observer: Observer<Notification>| {
        let token = center.observe(name, sender, move |note| observer.on_next(note));
        Subscription::new(move || drop(token))
    })
}
