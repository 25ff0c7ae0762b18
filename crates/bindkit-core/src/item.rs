#![forbid(unsafe_code)]

//! Generic list item.

use std::cell::Cell;

use crate::control::{Control, ControlCore};
use crate::property::{AccessoryType, CellProperty, PropertyTable, PropertyValue};
use crate::slot::ActionSlot;

/// A selectable list item with a text label, detail label, image, and
/// accessory.
#[derive(Debug)]
pub struct Item {
    core: ControlCore,
    properties: PropertyTable,
    selectable: Cell<bool>,
    select: ActionSlot,
}

impl Default for Item {
    fn default() -> Self {
        Self::new()
    }
}

impl Item {
    #[must_use]
    pub fn new() -> Self {
        Self {
            core: ControlCore::new(),
            properties: PropertyTable::new(),
            selectable: Cell::new(true),
            select: ActionSlot::new(),
        }
    }

    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        let item = Self::new();
        item.set_text_label_text(text.into());
        item
    }

    #[must_use]
    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    #[must_use]
    pub fn text_label_text(&self) -> String {
        self.properties.text(CellProperty::TextLabelText)
    }

    pub fn set_text_label_text(&self, text: impl Into<String>) {
        self.properties.set(CellProperty::TextLabelText, text.into());
    }

    #[must_use]
    pub fn detail_text_label_text(&self) -> String {
        self.properties.text(CellProperty::DetailTextLabelText)
    }

    pub fn set_detail_text_label_text(&self, text: impl Into<String>) {
        self.properties
            .set(CellProperty::DetailTextLabelText, text.into());
    }

    #[must_use]
    pub fn image_name(&self) -> Option<String> {
        match self.properties.get(CellProperty::ImageName) {
            PropertyValue::Image(name) => name,
            _ => None,
        }
    }

    pub fn set_image_name(&self, name: Option<String>) {
        self.properties.set(CellProperty::ImageName, name);
    }

    #[must_use]
    pub fn accessory_type(&self) -> AccessoryType {
        match self.properties.get(CellProperty::AccessoryType) {
            PropertyValue::Accessory(accessory) => accessory,
            _ => AccessoryType::None,
        }
    }

    pub fn set_accessory_type(&self, accessory: AccessoryType) {
        self.properties.set(CellProperty::AccessoryType, accessory);
    }

    #[must_use]
    pub fn is_selectable(&self) -> bool {
        self.selectable.get()
    }

    pub fn set_selectable(&self, selectable: bool) {
        self.selectable.set(selectable);
    }

    /// Slot notified when the user selects the item.
    #[must_use]
    pub fn select_slot(&self) -> &ActionSlot {
        &self.select
    }

    /// Simulate the user tapping the item. Unselectable items ignore taps.
    pub fn perform_selection(&self) -> bool {
        if !self.selectable.get() {
            return false;
        }
        self.select.send()
    }
}

/// Controls built on top of [`Item`].
pub trait AsItem: 'static {
    fn item(&self) -> &Item;
}

impl AsItem for Item {
    fn item(&self) -> &Item {
        self
    }
}

impl<T: AsItem> Control for T {
    fn core(&self) -> &ControlCore {
        &self.item().core
    }
}
