#![forbid(unsafe_code)]

//! Single-line and multi-line text input items.
//!
//! [`TextInputItem<K>`] models both text fields and text views; the kind
//! marker `K` only decides which end-of-editing notification is posted.
//!
//! User input (`type_text`, `press_return`, `toggle`-style interactions)
//! fires the item's action slots. Programmatic writes (`set_text`) never do,
//! so a binding that writes into the item cannot echo back to itself through
//! the slot.

use std::cell::Cell;
use std::marker::PhantomData;

use crate::control::Control;
use crate::item::{AsItem, Item};
use crate::notification::{NotificationCenter, NotificationName};
use crate::property::CellProperty;
use crate::slot::ActionSlot;

/// A control with a transient editing state.
pub trait Editable: Control {
    /// Whether the user is in the middle of an uncommitted edit.
    fn is_editing(&self) -> bool;

    /// Notification posted, with this control as sender, when editing ends.
    fn end_editing_notification(&self) -> NotificationName;

    /// Center the end-of-editing notification is posted to.
    fn notification_center(&self) -> &NotificationCenter;
}

/// Kind marker for [`TextInputItem`].
pub trait TextInputKind: 'static {
    const END_EDITING: NotificationName;
}

/// Single-line text field.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextField;

/// Multi-line text view.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextView;

impl TextInputKind for TextField {
    const END_EDITING: NotificationName = NotificationName::TEXT_FIELD_DID_END_EDITING;
}

impl TextInputKind for TextView {
    const END_EDITING: NotificationName = NotificationName::TEXT_VIEW_DID_END_EDITING;
}

pub type TextFieldItem = TextInputItem<TextField>;
pub type TextViewItem = TextInputItem<TextView>;

/// An [`Item`] hosting an editable text input.
#[derive(Debug)]
pub struct TextInputItem<K> {
    item: Item,
    value_changed: ActionSlot,
    return_key: ActionSlot,
    editing: Cell<bool>,
    programmatic_writes: Cell<u64>,
    center: NotificationCenter,
    _kind: PhantomData<K>,
}

impl<K: TextInputKind> Default for TextInputItem<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: TextInputKind> TextInputItem<K> {
    /// Create an item posting to this thread's default notification center.
    #[must_use]
    pub fn new() -> Self {
        Self::with_center(NotificationCenter::default_center())
    }

    #[must_use]
    pub fn with_center(center: NotificationCenter) -> Self {
        Self {
            item: Item::new(),
            value_changed: ActionSlot::new(),
            return_key: ActionSlot::new(),
            editing: Cell::new(false),
            programmatic_writes: Cell::new(0),
            center,
            _kind: PhantomData,
        }
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.item.properties().text(CellProperty::TextInputText)
    }

    /// Programmatic write. Does not notify the value slot.
    pub fn set_text(&self, text: impl Into<String>) {
        self.programmatic_writes
            .set(self.programmatic_writes.get() + 1);
        self.item
            .properties()
            .set(CellProperty::TextInputText, text.into());
    }

    /// Number of programmatic [`set_text`](Self::set_text) calls so far.
    #[must_use]
    pub fn programmatic_write_count(&self) -> u64 {
        self.programmatic_writes.get()
    }

    #[must_use]
    pub fn placeholder(&self) -> String {
        self.item
            .properties()
            .text(CellProperty::TextInputPlaceholder)
    }

    pub fn set_placeholder(&self, placeholder: impl Into<String>) {
        self.item
            .properties()
            .set(CellProperty::TextInputPlaceholder, placeholder.into());
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.item.properties().flag(CellProperty::TextInputEnabled)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.item
            .properties()
            .set(CellProperty::TextInputEnabled, enabled);
        if !enabled {
            self.end_editing();
        }
    }

    /// Start an edit session. Disabled inputs refuse.
    pub fn begin_editing(&self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.editing.set(true);
        true
    }

    /// Make the input active, i.e. start editing.
    pub fn become_first_responder(&self) -> bool {
        self.begin_editing()
    }

    /// Simulate the user changing the text to `text`. Starts an edit
    /// session if none is active. Returns `false` if the input is disabled.
    pub fn type_text(&self, text: impl Into<String>) -> bool {
        if !self.editing.get() && !self.begin_editing() {
            return false;
        }
        self.item
            .properties()
            .set(CellProperty::TextInputText, text.into());
        self.value_changed.send();
        true
    }

    /// Simulate the user pressing the return key.
    pub fn press_return(&self) -> bool {
        self.return_key.send()
    }

    /// Finish the edit session and post the end-of-editing notification.
    /// No-op when not editing.
    pub fn end_editing(&self) {
        if !self.editing.replace(false) {
            return;
        }
        self.center.post(K::END_EDITING, Some(self.id()));
    }

    /// Slot notified on every user text change.
    #[must_use]
    pub fn value_slot(&self) -> &ActionSlot {
        &self.value_changed
    }

    /// Slot notified when the user presses return.
    #[must_use]
    pub fn return_key_slot(&self) -> &ActionSlot {
        &self.return_key
    }
}

impl<K: TextInputKind> AsItem for TextInputItem<K> {
    fn item(&self) -> &Item {
        &self.item
    }
}

impl<K: TextInputKind> Editable for TextInputItem<K> {
    fn is_editing(&self) -> bool {
        self.editing.get()
    }

    fn end_editing_notification(&self) -> NotificationName {
        K::END_EDITING
    }

    fn notification_center(&self) -> &NotificationCenter {
        &self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn typing_starts_editing_and_updates_text() {
        let field = TextFieldItem::with_center(NotificationCenter::new());
        assert!(!field.is_editing());
        assert!(field.type_text("abc"));
        assert!(field.is_editing());
        assert_eq!(field.text(), "abc");
        assert_eq!(field.programmatic_write_count(), 0);
    }

    #[test]
    fn disabled_input_rejects_typing() {
        let view = TextViewItem::with_center(NotificationCenter::new());
        view.set_enabled(false);
        assert!(!view.type_text("nope"));
        assert!(!view.become_first_responder());
        assert_eq!(view.text(), "");
    }

    #[test]
    fn end_editing_posts_scoped_notification_once() {
        let center = NotificationCenter::new();
        let field = TextFieldItem::with_center(center.clone());
        let posts = Rc::new(Cell::new(0u32));
        let p = Rc::clone(&posts);
        let _token = center.observe(
            NotificationName::TEXT_FIELD_DID_END_EDITING,
            Some(field.id()),
            move |_| p.set(p.get() + 1),
        );

        field.end_editing();
        assert_eq!(posts.get(), 0);

        field.begin_editing();
        field.end_editing();
        field.end_editing();
        assert_eq!(posts.get(), 1);
    }

    #[test]
    fn text_view_posts_its_own_name() {
        let view = TextViewItem::with_center(NotificationCenter::new());
        assert_eq!(
            view.end_editing_notification(),
            NotificationName::TEXT_VIEW_DID_END_EDITING
        );
    }

    #[test]
    fn disabling_ends_the_edit() {
        let field = TextFieldItem::with_center(NotificationCenter::new());
        field.begin_editing();
        field.set_enabled(false);
        assert!(!field.is_editing());
    }
}
