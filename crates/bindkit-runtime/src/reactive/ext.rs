#![forbid(unsafe_code)]

//! `control.rx()` namespace: typed sinks, properties, and events per
//! control type.
//!
//! Sinks hold the control weakly. Event and value streams are cached on the
//! control under a fixed key, so `field.rx().text()` called from ten places
//! still installs a single bridge into the field's value slot.

use std::rc::{Rc, Weak};

use bindkit_core::{
    AccessoryType, ActionTarget, AsItem, CellProperty, Control, PropertyValue, SwitchItem,
    TextInputItem, TextInputKind,
};

use super::action_target::Installer;
use super::cache::{action_events, action_values};
use super::control_property::{Binder, ControlEvent, ControlProperty};

const SELECTED: &str = "selected";
const SWITCH_ON: &str = "on";
const TEXT: &str = "text";
const RETURN_KEY: &str = "return_key";

/// Reactive view of a control.
pub struct Reactive<S> {
    base: Rc<S>,
}

impl<S> Clone for Reactive<S> {
    fn clone(&self) -> Self {
        Self {
            base: Rc::clone(&self.base),
        }
    }
}

impl<S: Control> std::fmt::Debug for Reactive<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reactive")
            .field("control", &self.base.id())
            .finish()
    }
}

impl<S> Reactive<S> {
    #[must_use]
    pub fn new(base: Rc<S>) -> Self {
        Self { base }
    }

    #[must_use]
    pub fn base(&self) -> &Rc<S> {
        &self.base
    }
}

/// Entry point for the reactive extensions of a shared control.
pub trait ReactiveExt {
    type Base;

    fn rx(&self) -> Reactive<Self::Base>;
}

impl<S: Control> ReactiveExt for Rc<S> {
    type Base = S;

    fn rx(&self) -> Reactive<S> {
        Reactive::new(Rc::clone(self))
    }
}

impl<S: AsItem> Reactive<S> {
    #[must_use]
    pub fn text_label_text(&self) -> Binder<String> {
        Binder::new(&self.base, |s: &S, text: String| {
            s.item().set_text_label_text(text);
        })
    }

    #[must_use]
    pub fn detail_text_label_text(&self) -> Binder<String> {
        Binder::new(&self.base, |s: &S, text: String| {
            s.item().set_detail_text_label_text(text);
        })
    }

    /// Image by name; `None` clears it.
    #[must_use]
    pub fn image(&self) -> Binder<Option<String>> {
        Binder::new(&self.base, |s: &S, name: Option<String>| {
            s.item().set_image_name(name);
        })
    }

    #[must_use]
    pub fn accessory_type(&self) -> Binder<AccessoryType> {
        Binder::new(&self.base, |s: &S, accessory: AccessoryType| {
            s.item().set_accessory_type(accessory);
        })
    }

    #[must_use]
    pub fn selectable(&self) -> Binder<bool> {
        Binder::new(&self.base, |s: &S, selectable: bool| {
            s.item().set_selectable(selectable);
        })
    }

    /// Sink for an arbitrary item property. Values of the wrong kind for
    /// `property` are rejected with a warning.
    #[must_use]
    pub fn value<E: Into<PropertyValue> + 'static>(&self, property: CellProperty) -> Binder<E> {
        Binder::new(&self.base, move |s: &S, value: E| {
            if !s.item().properties().set(property, value) {
                tracing::warn!(control = %s.id(), ?property, "rejected value of the wrong kind");
            }
        })
    }

    /// Fires each time the item is selected.
    #[must_use]
    pub fn selected(&self) -> ControlEvent {
        let installer: Installer<S> =
            Rc::new(|s: &S, target: Option<Weak<dyn ActionTarget>>| {
                s.item().select_slot().set(target);
            });
        ControlEvent::new(action_events(&self.base, SELECTED, installer))
    }
}

impl Reactive<SwitchItem> {
    /// Switch state: current value, then every user toggle.
    #[must_use]
    pub fn on(&self) -> ControlProperty<bool> {
        let installer: Installer<SwitchItem> =
            Rc::new(|s: &SwitchItem, target: Option<Weak<dyn ActionTarget>>| {
                s.switch_slot().set(target);
            });
        ControlProperty::new(
            action_values(&self.base, SWITCH_ON, installer, SwitchItem::is_on),
            Binder::new(&self.base, |s: &SwitchItem, on: bool| s.set_on(on)),
        )
    }
}

impl<K: TextInputKind> Reactive<TextInputItem<K>> {
    #[must_use]
    pub fn enabled(&self) -> Binder<bool> {
        Binder::new(&self.base, |s: &TextInputItem<K>, enabled: bool| {
            s.set_enabled(enabled);
        })
    }

    /// Each value makes the input active.
    #[must_use]
    pub fn become_first_responder(&self) -> Binder<()> {
        Binder::new(&self.base, |s: &TextInputItem<K>, (): ()| {
            if !s.become_first_responder() {
                tracing::debug!(control = %s.id(), "disabled input refused focus");
            }
        })
    }

    /// Text: current value, then every user edit. Writes through the sink
    /// are programmatic and do not echo back.
    #[must_use]
    pub fn text(&self) -> ControlProperty<String> {
        let installer: Installer<TextInputItem<K>> =
            Rc::new(|s: &TextInputItem<K>, target: Option<Weak<dyn ActionTarget>>| {
                s.value_slot().set(target);
            });
        ControlProperty::new(
            action_values(&self.base, TEXT, installer, TextInputItem::<K>::text),
            Binder::new(&self.base, |s: &TextInputItem<K>, text: String| {
                s.set_text(text);
            }),
        )
    }

    /// Fires each time the user presses return.
    #[must_use]
    pub fn return_key(&self) -> ControlEvent {
        let installer: Installer<TextInputItem<K>> =
            Rc::new(|s: &TextInputItem<K>, target: Option<Weak<dyn ActionTarget>>| {
                s.return_key_slot().set(target);
            });
        ControlEvent::new(action_events(&self.base, RETURN_KEY, installer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reactive::stream::{Observer, Stream};
    use crate::reactive::subscription::Subscription;
    use bindkit_core::{Editable, Item, NotificationCenter, TextFieldItem, TextViewItem};
    use std::cell::{Cell, RefCell};

    fn just<T: Clone + 'static>(values: Vec<T>) -> Stream<T> {
        Stream::create(move |observer: Observer<T>| {
            for value in &values {
                observer.on_next(value);
            }
            Subscription::empty()
        })
    }

    #[test]
    fn item_sinks_write_properties() {
        let item = Rc::new(Item::new());
        let rx = item.rx();
        let _a = just(vec!["Title".to_string()]).bind_to(&rx.text_label_text());
        let _b = just(vec!["Detail".to_string()]).bind_to(&rx.detail_text_label_text());
        let _c = just(vec![Some("star".to_string())]).bind_to(&rx.image());
        let _d = just(vec![AccessoryType::Checkmark]).bind_to(&rx.accessory_type());
        let _e = just(vec![false]).bind_to(&rx.selectable());

        assert_eq!(item.text_label_text(), "Title");
        assert_eq!(item.detail_text_label_text(), "Detail");
        assert_eq!(item.image_name().as_deref(), Some("star"));
        assert_eq!(item.accessory_type(), AccessoryType::Checkmark);
        assert!(!item.is_selectable());
    }

    #[test]
    fn value_sink_checks_property_kind() {
        let item = Rc::new(Item::new());
        item.rx()
            .value::<String>(CellProperty::DetailTextLabelText)
            .on_next("via value".into());
        item.rx()
            .value::<bool>(CellProperty::DetailTextLabelText)
            .on_next(true);
        assert_eq!(item.detail_text_label_text(), "via value");
    }

    #[test]
    fn selected_is_shared_across_calls() {
        let item = Rc::new(Item::new());
        let hits = Rc::new(Cell::new(0u32));
        let h1 = Rc::clone(&hits);
        let h2 = Rc::clone(&hits);
        let _a = item.rx().selected().subscribe(move || h1.set(h1.get() + 1), || {});
        let _b = item.rx().selected().subscribe(move || h2.set(h2.get() + 1), || {});

        item.perform_selection();
        assert_eq!(hits.get(), 2);
        assert_eq!(item.select_slot().install_count(), 1);
    }

    #[test]
    fn switch_on_reads_and_writes() {
        let switch = Rc::new(SwitchItem::with_text("Wi-Fi", false));
        let on = switch.rx().on();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = on.subscribe(move |v| s.borrow_mut().push(*v), || {});

        switch.toggle(true);
        on.on_next(false);
        assert!(!switch.is_on());
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn new_switch_subscriber_sees_sink_write() {
        let switch = Rc::new(SwitchItem::with_text("Bluetooth", false));
        let _first = switch.rx().on().subscribe(|_| {}, || {});
        switch.rx().on().on_next(true);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _late = switch
            .rx()
            .on()
            .subscribe(move |v| s.borrow_mut().push(*v), || {});
        assert!(switch.is_on());
        assert_eq!(*seen.borrow(), vec![true]);
    }

    #[test]
    fn changed_skips_only_the_fresh_seed() {
        let field = Rc::new(TextFieldItem::with_center(NotificationCenter::new()));
        let text = field.rx().text();
        let _first = text.subscribe(|_| {}, || {});
        text.on_next("programmatic".into());

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _changes = text
            .changed()
            .subscribe_next(move |v| s.borrow_mut().push(v.clone()));
        assert!(seen.borrow().is_empty());
        field.type_text("typed");
        assert_eq!(*seen.borrow(), vec!["typed".to_string()]);
    }

    #[test]
    fn text_property_emits_user_edits_only() {
        let field = Rc::new(TextFieldItem::with_center(NotificationCenter::new()));
        field.set_text("start");
        let text = field.rx().text();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = Rc::clone(&seen);
        let _sub = text.subscribe(move |v| s.borrow_mut().push(v.clone()), || {});

        field.type_text("typed");
        text.on_next("written".into());

        assert_eq!(field.text(), "written");
        assert_eq!(*seen.borrow(), vec!["start".to_string(), "typed".to_string()]);
    }

    #[test]
    fn return_key_and_focus() {
        let view = Rc::new(TextViewItem::with_center(NotificationCenter::new()));
        let returns = Rc::new(Cell::new(0u32));
        let r = Rc::clone(&returns);
        let _sub = view.rx().return_key().subscribe(move || r.set(r.get() + 1), || {});

        view.rx().become_first_responder().on_next(());
        assert!(view.is_editing());
        view.press_return();
        assert_eq!(returns.get(), 1);

        view.rx().enabled().on_next(false);
        assert!(!view.is_enabled());
        assert!(!view.is_editing());
    }

    #[test]
    fn events_complete_when_control_drops() {
        let item = Rc::new(Item::new());
        let done = Rc::new(Cell::new(false));
        let d = Rc::clone(&done);
        let _sub = item.rx().selected().subscribe(|| {}, move || d.set(true));
        drop(item);
        assert!(done.get());
    }

    #[test]
    fn text_input_items_keep_item_sinks() {
        let field = Rc::new(TextFieldItem::with_center(NotificationCenter::new()));
        field.rx().text_label_text().on_next("Name".into());
        assert_eq!(field.item().text_label_text(), "Name");
    }
}
