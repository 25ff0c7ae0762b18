#![forbid(unsafe_code)]

//! On/off switch item.

use crate::item::{AsItem, Item};
use crate::property::CellProperty;
use crate::slot::ActionSlot;

/// An [`Item`] with a trailing switch.
#[derive(Debug, Default)]
pub struct SwitchItem {
    item: Item,
    switch: ActionSlot,
}

impl SwitchItem {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text(text: impl Into<String>, on: bool) -> Self {
        let switch = Self {
            item: Item::with_text(text),
            switch: ActionSlot::new(),
        };
        switch.set_on(on);
        switch
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.item.properties().flag(CellProperty::SwitchOn)
    }

    /// Programmatic write. Does not notify the switch slot.
    pub fn set_on(&self, on: bool) {
        self.item.properties().set(CellProperty::SwitchOn, on);
    }

    /// Slot notified when the user flips the switch.
    #[must_use]
    pub fn switch_slot(&self) -> &ActionSlot {
        &self.switch
    }

    /// Simulate the user flipping the switch to `on`.
    pub fn toggle(&self, on: bool) -> bool {
        self.set_on(on);
        self.switch.send()
    }
}

impl AsItem for SwitchItem {
    fn item(&self) -> &Item {
        &self.item
    }
}
