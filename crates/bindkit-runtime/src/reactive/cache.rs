#![forbid(unsafe_code)]

//! One shared stream per control property.
//!
//! A control accepts a single target per interaction, so every subscriber
//! to, say, a text field's text must go through the same bridge. The
//! streams built here are cached on the control itself (see
//! [`ControlCore::attach_with`](bindkit_core::ControlCore::attach_with)),
//! multicast with [`Stream::share`], and completed by the control's
//! deallocated signal. Value streams read the control's current value for
//! each new subscriber instead of replaying an old emission. The cache entry
//! is released together with the control.
//!
//! # Invariants
//!
//! 1. At most one stream exists per (control, key, value type).
//! 2. At most one bridge is installed per (control, key) while that stream
//!    has subscribers.
//! 3. After the control is dropped the stream completes without emitting.
//! 4. A new subscriber to a value stream first sees the control's current
//!    value.

use std::rc::Rc;

use bindkit_core::Control;

use super::action_target::{ActionTargetBridge, Installer};
use super::signals::deallocated;
use super::stream::{Observer, Stream};
use super::subscription::Subscription;

/// Return the stream cached on `subject` under `key`, building it with
/// `factory` on first use.
pub fn cached_stream<S: Control, T: Clone + 'static>(
    subject: &S,
    key: &'static str,
    factory: impl FnOnce() -> Stream<T>,
) -> Stream<T> {
    subject.core().attach_with(key, || {
        tracing::debug!(control = %subject.id(), key, "creating shared control stream");
        factory()
    })
}

/// Shared stream of payload-free interactions delivered through the slot
/// that `installer` manages.
pub fn action_events<S: Control>(
    subject: &Rc<S>,
    key: &'static str,
    installer: Installer<S>,
) -> Stream<()> {
    cached_stream(subject.as_ref(), key, || {
        let read: Rc<dyn Fn(&S)> = Rc::new(|_: &S| {});
        interactions(subject, installer, read)
    })
}

/// Stream of a control value: `read(subject)` on every subscribe, then again
/// after every interaction delivered through the slot that `installer`
/// manages.
///
/// The seed is read per subscription, so it reflects programmatic writes
/// made since the shared stream connected. Interactions are multicast
/// through a single bridge.
pub fn action_values<S: Control, T: Clone + 'static>(
    subject: &Rc<S>,
    key: &'static str,
    installer: Installer<S>,
    read: impl Fn(&S) -> T + 'static,
) -> Stream<T> {
    cached_stream(subject.as_ref(), key, || {
        let read: Rc<dyn Fn(&S) -> T> = Rc::new(read);
        let changes = interactions(subject, installer, Rc::clone(&read));
        let weak = Rc::downgrade(subject);
        Stream::create(move |observer: Observer<T>| {
            let Some(subject) = weak.upgrade() else {
                observer.on_completed();
                return Subscription::empty();
            };
            observer.on_next(&read(subject.as_ref()));
            if observer.is_stopped() {
                return Subscription::empty();
            }
            changes.subscribe_observer(observer)
        })
    })
}

/// One bridge per connection, emitting `read(subject)` on each interaction,
/// multicast without replay and completed by the control's drop.
fn interactions<S: Control, T: Clone + 'static>(
    subject: &Rc<S>,
    installer: Installer<S>,
    read: Rc<dyn Fn(&S) -> T>,
) -> Stream<T> {
    let weak = Rc::downgrade(subject);
    Stream::create(move |observer: Observer<T>| {
        let Some(subject) = weak.upgrade() else {
            observer.on_completed();
            return Subscription::empty();
        };
        let weak_subject = Rc::downgrade(&subject);
        let read = Rc::clone(&read);
        let bridge = ActionTargetBridge::new(&subject, Rc::clone(&installer), move || {
            if let Some(subject) = weak_subject.upgrade() {
                observer.on_next(&read(subject.as_ref()));
            }
        });
        Subscription::new(move || bridge.dispose())
    })
    .take_until(&deallocated(subject))
    .share()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bindkit_core::{ActionTarget, Item, SwitchItem};
    use std::cell::{Cell, RefCell};
    use std::rc::Weak;

    fn select_installer() -> Installer<Item> {
        Rc::new(|item: &Item, target: Option<Weak<dyn ActionTarget>>| {
            item.select_slot().set(target)
        })
    }

    fn switch_installer() -> Installer<SwitchItem> {
        Rc::new(|switch: &SwitchItem, target: Option<Weak<dyn ActionTarget>>| {
            switch.switch_slot().set(target)
        })
    }

    #[test]
    fn factory_runs_once_per_key() {
        let item = Item::new();
        let builds = Cell::new(0u32);
        for _ in 0..3 {
            let _ = cached_stream(&item, "k", || {
                builds.set(builds.get() + 1);
                Stream::<u8>::empty()
            });
        }
        assert_eq!(builds.get(), 1);
        assert_eq!(item.core().attachment_count(), 1);
    }

    #[test]
    fn many_subscribers_share_one_registration() {
        let item = Rc::new(Item::new());
        let counts: Vec<Rc<Cell<u32>>> = (0..4).map(|_| Rc::new(Cell::new(0))).collect();
        let subs: Vec<Subscription> = counts
            .iter()
            .map(|count| {
                let c = Rc::clone(count);
                action_events(&item, "selected", select_installer())
                    .subscribe_next(move |_| c.set(c.get() + 1))
            })
            .collect();

        item.perform_selection();
        item.perform_selection();

        assert_eq!(item.select_slot().install_count(), 1);
        assert!(counts.iter().all(|c| c.get() == 2));
        drop(subs);
        assert!(!item.select_slot().is_installed());
    }

    #[test]
    fn values_seed_then_follow_interactions() {
        let switch = Rc::new(SwitchItem::with_text("Sync", true));
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = action_values(&switch, "on", switch_installer(), SwitchItem::is_on)
            .subscribe_next(move |v| s.borrow_mut().push(*v));

        switch.toggle(false);
        switch.set_on(true); // programmatic, no emission
        switch.toggle(true);

        assert_eq!(*seen.borrow(), vec![true, false, true]);
    }

    #[test]
    fn late_subscriber_is_seeded_with_current_value() {
        let switch = Rc::new(SwitchItem::with_text("Sync", false));
        let stream = action_values(&switch, "on", switch_installer(), SwitchItem::is_on);
        let _first = stream.subscribe_next(|_| {});
        switch.toggle(true);
        switch.set_on(false);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _late = stream.subscribe_next(move |v| s.borrow_mut().push(*v));
        assert_eq!(*seen.borrow(), vec![false]);
        assert_eq!(switch.switch_slot().install_count(), 1);
    }

    #[test]
    fn late_event_subscriber_sees_no_past_interactions() {
        let item = Rc::new(Item::new());
        let stream = action_events(&item, "selected", select_installer());
        let _first = stream.subscribe_next(|_| {});
        item.perform_selection();

        let hits = Rc::new(Cell::new(0u32));
        let h = Rc::clone(&hits);
        let _late = stream.subscribe_next(move |_| h.set(h.get() + 1));
        assert_eq!(hits.get(), 0);
        item.perform_selection();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn control_drop_completes_stream_and_releases_bridge() {
        let item = Rc::new(Item::new());
        let sentinel = Rc::new(());
        let probe = Rc::clone(&sentinel);
        let stream = cached_stream(item.as_ref(), "selected", || {
            let weak = Rc::downgrade(&item);
            let installer = select_installer();
            Stream::create(move |observer: Observer<()>| {
                let Some(subject) = weak.upgrade() else {
                    observer.on_completed();
                    return Subscription::empty();
                };
                let probe = Rc::clone(&probe);
                let bridge = ActionTargetBridge::new(&subject, Rc::clone(&installer), move || {
                    let _ = &probe;
                    observer.on_next(&());
                });
                Subscription::new(move || bridge.dispose())
            })
            .take_until(&deallocated(&item))
            .share()
        });

        let events = Rc::new(Cell::new(0u32));
        let done = Rc::new(Cell::new(false));
        let e = Rc::clone(&events);
        let d = Rc::clone(&done);
        let sub = stream.subscribe(move |_| e.set(e.get() + 1), move || d.set(true));
        assert_eq!(Rc::strong_count(&sentinel), 3);

        item.perform_selection();
        drop(item);

        assert_eq!(events.get(), 1);
        assert!(done.get());
        // The bridge callback (and its probe clone) is gone; only the factory
        // closure held by our stream handle keeps one.
        assert_eq!(Rc::strong_count(&sentinel), 2);
        drop(stream);
        drop(sub);
        assert_eq!(Rc::strong_count(&sentinel), 1);
    }
}
