#![forbid(unsafe_code)]

//! Two-way binding between a control property and a [`Variable`].
//!
//! # Design
//!
//! A binding is three subscriptions and one flag:
//!
//! - **variable → control**: every variable value is written into the
//!   property sink, unless the write came from the control itself (the
//!   "change from UI" flag is set) or the user is mid-edit.
//! - **control → variable**: every user change that differs from the
//!   variable's current value is written into the variable with the flag
//!   raised, so the first branch does not echo it back.
//! - **end of editing → control**: when the control posts its
//!   end-of-editing notification, the variable's current value is written
//!   back into the control. This catches up on values dropped while editing.
//!
//! All three are returned as one [`Subscription`]. When either control-side
//! branch completes (the control was dropped) the variable → control branch
//! is disposed immediately.
//!
//! # Invariants
//!
//! 1. A user change never reaches the control's sink through the variable.
//! 2. Equal values are not written into the variable.
//! 3. With [`BindOptions::defer_while_editing`], no variable value is
//!    written into a control that is editing.

use std::cell::Cell;
use std::rc::Rc;

use bindkit_core::{Editable, TextInputItem, TextInputKind};

use super::control_property::ControlProperty;
use super::ext::ReactiveExt;
use super::signals::{deallocated, notifications};
use super::subscription::Subscription;
use super::variable::Variable;

/// Tuning for [`bind_two_way`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BindOptions {
    /// Drop variable updates while the control is editing. Default: true.
    pub defer_while_editing: bool,
    /// Write the variable back into the control when editing ends.
    /// Default: true.
    pub reconcile_on_end_editing: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            defer_while_editing: true,
            reconcile_on_end_editing: true,
        }
    }
}

impl BindOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_defer_while_editing(mut self, defer: bool) -> Self {
        self.defer_while_editing = defer;
        self
    }

    #[must_use]
    pub fn with_reconcile_on_end_editing(mut self, reconcile: bool) -> Self {
        self.reconcile_on_end_editing = reconcile;
        self
    }
}

/// Bind `property` of `control` to `variable` in both directions.
///
/// The binding holds the control weakly and lives until the returned
/// subscription is disposed or dropped.
pub fn bind_two_way<S, T>(
    control: &Rc<S>,
    property: &ControlProperty<T>,
    variable: &Variable<T>,
    options: BindOptions,
) -> Subscription
where
    S: Editable,
    T: Clone + PartialEq + 'static,
{
    let change_from_ui = Rc::new(Cell::new(false));

    let to_control = {
        let guard = Rc::clone(&change_from_ui);
        let weak = Rc::downgrade(control);
        let defer = options.defer_while_editing;
        Rc::new(
            variable
                .as_stream()
                .filter(move |_| {
                    if guard.get() {
                        return false;
                    }
                    let editing = weak.upgrade().is_some_and(|c| c.is_editing());
                    if defer && editing {
                        tracing::trace!("dropping variable update while editing");
                        return false;
                    }
                    true
                })
                .bind_to(property.sink()),
        )
    };

    let to_variable = {
        let guard = Rc::clone(&change_from_ui);
        let cell = variable.clone();
        let shutdown = Rc::clone(&to_control);
        property.changed().subscribe(
            move |value| {
                if cell.with(|current| current == value) {
                    return;
                }
                guard.set(true);
                cell.set(value.clone());
                guard.set(false);
            },
            move || {
                tracing::debug!("control side completed; releasing variable side");
                shutdown.dispose();
            },
        )
    };

    let end_edit = if options.reconcile_on_end_editing {
        let cell = variable.clone();
        let sink = property.sink().clone();
        let shutdown = Rc::clone(&to_control);
        notifications(
            control.notification_center(),
            control.end_editing_notification(),
            Some(control.id()),
        )
        .take_until(&deallocated(control))
        .subscribe(move |_| sink.on_next(cell.get()), move || shutdown.dispose())
    } else {
        Subscription::empty()
    };

    tracing::debug!(control = %control.id(), ?options, "two-way binding established");
    Subscription::from_many([
        Subscription::new(move || to_control.dispose()),
        to_variable,
        end_edit,
    ])
}

/// `control.bind_two_way(&variable)` for controls with a natural text
/// property.
pub trait TwoWayBind<T> {
    fn bind_two_way(&self, variable: &Variable<T>) -> Subscription;
}

impl<K: TextInputKind> TwoWayBind<String> for Rc<TextInputItem<K>> {
    fn bind_two_way(&self, variable: &Variable<String>) -> Subscription {
        bind_two_way(self, &self.rx().text(), variable, BindOptions::default())
    }
}
