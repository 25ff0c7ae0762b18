#![forbid(unsafe_code)]

//! Core: controls, single-slot callback targets, and lifecycle signals.
//!
//! # Role in bindkit
//! `bindkit-core` is the control layer the reactive runtime wraps. It owns
//! control identity and lifetime, the one-target-per-interaction
//! [`ActionSlot`], the end-of-editing [`NotificationCenter`], and the
//! in-process control models (list item, switch, text field, text view).
//!
//! # Primary responsibilities
//! - **ControlCore**: identity, owning thread, "deallocated" signal, and
//!   attached objects released together with the control.
//! - **ActionSlot**: a weakly held single callback target per interaction.
//! - **Control models**: typed property access and simulated user input.
//!
//! # How it fits in the system
//! `bindkit-runtime` installs bridges into action slots, caches one shared
//! stream per control property in the attachment table, and completes those
//! streams from the deallocated signal. Nothing here knows about streams.

pub mod affinity;
pub mod control;
pub mod error;
pub mod item;
pub mod notification;
pub mod notifier;
pub mod property;
pub mod slot;
pub mod switch_item;
pub mod text_input;

pub use control::{Control, ControlCore, ControlId};
pub use error::BindError;
pub use item::{AsItem, Item};
pub use notification::{Notification, NotificationCenter, NotificationName};
pub use notifier::{Notifier, ObserverToken};
pub use property::{AccessoryType, CellProperty, PropertyTable, PropertyValue};
pub use slot::{ActionSlot, ActionTarget};
pub use switch_item::SwitchItem;
pub use text_input::{
    Editable, TextField, TextFieldItem, TextInputItem, TextInputKind, TextView, TextViewItem,
};
