#![forbid(unsafe_code)]

//! Integration tests for two-way binding between text inputs and variables.
//!
//! Covers:
//! - Round trip in both directions, with no echo into the control
//! - Updates dropped while editing, then reconciled when editing ends
//! - Equality suppression on the control → variable edge
//! - The "" → "abc" → "abcd" → end-of-edit walkthrough

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use bindkit_core::{NotificationCenter, TextFieldItem};
use bindkit_runtime::{BindOptions, ReactiveExt, TwoWayBind, Variable, bind_two_way};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn field() -> Rc<TextFieldItem> {
    Rc::new(TextFieldItem::with_center(NotificationCenter::new()))
}

#[test]
fn round_trip_without_echo() {
    init_tracing();
    let field = field();
    let name = Variable::new(String::new());
    let _binding = field.bind_two_way(&name);

    name.set("from model".to_string());
    assert_eq!(field.text(), "from model");

    let writes = field.programmatic_write_count();
    field.type_text("from user");
    assert_eq!(name.get(), "from user");
    assert_eq!(
        field.programmatic_write_count(),
        writes,
        "user input must not be echoed back into the field"
    );
}

#[test]
fn updates_while_editing_are_dropped_then_reconciled() {
    init_tracing();
    let field = field();
    let name = Variable::new("v0".to_string());
    let _binding = field.bind_two_way(&name);

    field.type_text("v0 edited");
    assert_eq!(name.get(), "v0 edited");

    name.set("remote 1".to_string());
    name.set("remote 2".to_string());
    assert_eq!(field.text(), "v0 edited");

    field.end_editing();
    assert_eq!(field.text(), "remote 2");
    assert_eq!(name.get(), "remote 2");
}

#[test]
fn equal_changes_do_not_notify_downstream() {
    init_tracing();
    let field = field();
    let name = Variable::new("x".to_string());
    let _binding = field.bind_two_way(&name);

    let notified = Rc::new(Cell::new(0u32));
    let n = Rc::clone(&notified);
    let _watch = name.subscribe(move |_| n.set(n.get() + 1));

    field.type_text("x");
    assert_eq!(notified.get(), 0);
    field.type_text("y");
    assert_eq!(notified.get(), 1);
}

#[test]
fn walkthrough_empty_abc_abcd() {
    init_tracing();
    let field = field();
    let value = Variable::new(String::new());
    let _binding = field.bind_two_way(&value);

    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let _observer = field
        .rx()
        .text()
        .subscribe(move |v| s.borrow_mut().push(v.clone()), || {});
    assert_eq!(*seen.borrow(), vec![String::new()]);

    value.set("abc".to_string());
    assert_eq!(field.text(), "abc");

    field.type_text("abcd");
    assert_eq!(value.get(), "abcd");
    assert_eq!(*seen.borrow(), vec![String::new(), "abcd".to_string()]);

    let writes = field.programmatic_write_count();
    field.end_editing();
    info!(text = %field.text(), "after end of editing");
    assert_eq!(field.text(), "abcd");
    assert_eq!(field.programmatic_write_count(), writes + 1);
}

#[test]
fn new_text_subscriber_sees_value_written_by_binding() {
    init_tracing();
    let field = field();
    let value = Variable::new(String::new());
    let _binding = field.bind_two_way(&value);

    value.set("abc".to_string());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let _late = field
        .rx()
        .text()
        .subscribe(move |v| s.borrow_mut().push(v.clone()), || {});

    assert_eq!(field.text(), "abc");
    assert_eq!(*seen.borrow(), vec!["abc".to_string()]);
}

#[test]
fn new_text_subscriber_sees_end_of_edit_reconciliation() {
    init_tracing();
    let field = field();
    let value = Variable::new(String::new());
    let _binding = field.bind_two_way(&value);

    field.type_text("draft");
    value.set("server".to_string());
    field.end_editing();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let s = Rc::clone(&seen);
    let _late = field
        .rx()
        .text()
        .subscribe(move |v| s.borrow_mut().push(v.clone()), || {});
    assert_eq!(*seen.borrow(), vec!["server".to_string()]);
}

#[test]
fn two_bindings_to_one_variable_stay_in_sync() {
    init_tracing();
    let first = field();
    let second = field();
    let shared = Variable::new(String::new());
    let _a = first.bind_two_way(&shared);
    let _b = second.bind_two_way(&shared);

    first.type_text("typed in first");
    assert_eq!(shared.get(), "typed in first");
    assert_eq!(second.text(), "typed in first");
    assert_eq!(first.value_slot().install_count(), 1);
    assert_eq!(second.value_slot().install_count(), 1);
}

#[test]
fn binding_releases_variable_after_control_drop() {
    init_tracing();
    let field = field();
    let name = Variable::new(String::new());
    let binding = bind_two_way(&field, &field.rx().text(), &name, BindOptions::default());

    drop(field);
    name.set("after drop".to_string());
    assert_eq!(name.subscriber_count(), 0);
    binding.dispose();
    assert!(binding.is_disposed());
}
