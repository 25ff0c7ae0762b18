#![forbid(unsafe_code)]

//! Typed cell property table.
//!
//! Controls keep their displayable state in a [`PropertyTable`] indexed by
//! [`CellProperty`]. Each property has a fixed value kind; a write with the
//! wrong kind is rejected and leaves the table unchanged.

use std::cell::RefCell;
use std::collections::HashMap;

/// Accessory shown at the trailing edge of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AccessoryType {
    #[default]
    None,
    DisclosureIndicator,
    DetailDisclosureButton,
    Checkmark,
    DetailButton,
}

/// Addressable cell properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CellProperty {
    TextLabelText,
    DetailTextLabelText,
    ImageName,
    AccessoryType,
    TextInputText,
    TextInputPlaceholder,
    TextInputEnabled,
    SwitchOn,
}

impl CellProperty {
    /// Value a property reads as before it is ever written.
    #[must_use]
    pub fn default_value(self) -> PropertyValue {
        match self {
            Self::TextLabelText
            | Self::DetailTextLabelText
            | Self::TextInputText
            | Self::TextInputPlaceholder => PropertyValue::Text(String::new()),
            Self::ImageName => PropertyValue::Image(None),
            Self::AccessoryType => PropertyValue::Accessory(AccessoryType::None),
            Self::TextInputEnabled => PropertyValue::Bool(true),
            Self::SwitchOn => PropertyValue::Bool(false),
        }
    }

    fn accepts(self, value: &PropertyValue) -> bool {
        std::mem::discriminant(&self.default_value()) == std::mem::discriminant(value)
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "value", rename_all = "snake_case"))]
pub enum PropertyValue {
    Text(String),
    Bool(bool),
    Accessory(AccessoryType),
    Image(Option<String>),
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<AccessoryType> for PropertyValue {
    fn from(value: AccessoryType) -> Self {
        Self::Accessory(value)
    }
}

impl From<Option<String>> for PropertyValue {
    fn from(value: Option<String>) -> Self {
        Self::Image(value)
    }
}

/// Interior-mutable property storage for one control.
#[derive(Debug, Default)]
pub struct PropertyTable {
    values: RefCell<HashMap<CellProperty, PropertyValue>>,
}

impl PropertyTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, property: CellProperty) -> PropertyValue {
        self.values
            .borrow()
            .get(&property)
            .cloned()
            .unwrap_or_else(|| property.default_value())
    }

    /// Write `value`. Returns `false` (and writes nothing) if the value kind
    /// does not match the property.
    pub fn set(&self, property: CellProperty, value: impl Into<PropertyValue>) -> bool {
        let value = value.into();
        if !property.accepts(&value) {
            tracing::debug!(?property, ?value, "rejected property write of the wrong kind");
            return false;
        }
        self.values.borrow_mut().insert(property, value);
        true
    }

    #[must_use]
    pub fn text(&self, property: CellProperty) -> String {
        match self.get(property) {
            PropertyValue::Text(text) => text,
            _ => String::new(),
        }
    }

    #[must_use]
    pub fn flag(&self, property: CellProperty) -> bool {
        matches!(self.get(property), PropertyValue::Bool(true))
    }
}
