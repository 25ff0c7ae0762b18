//! Property-based invariant tests for shared control streams and two-way
//! bindings.
//!
//! **Shared streams:**
//! 1. Any number of subscribers produce exactly one slot registration.
//! 2. Every subscriber receives every interaction.
//! 3. After the last subscriber leaves, the slot is empty.
//!
//! **Two-way binding:**
//! 4. Outside an edit, the control always shows the variable's value.
//! 5. After editing ends, control and variable agree.
//! 6. User input is never echoed back into the control.

use std::cell::Cell;
use std::rc::Rc;

use bindkit_core::{Editable, Item, NotificationCenter, TextFieldItem};
use bindkit_runtime::{ReactiveExt, Subscription, TwoWayBind, Variable};
use proptest::prelude::*;

// ── Strategies ────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Step {
    Type(String),
    External(String),
    EndEditing,
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        "[a-c]{0,3}".prop_map(Step::Type),
        "[a-c]{0,3}".prop_map(Step::External),
        Just(Step::EndEditing),
    ]
}

// ── Shared streams ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn n_subscribers_one_registration(subscribers in 1usize..16, taps in 0usize..8) {
        let item = Rc::new(Item::new());
        let counts: Vec<Rc<Cell<usize>>> =
            (0..subscribers).map(|_| Rc::new(Cell::new(0))).collect();
        let subs: Vec<Subscription> = counts
            .iter()
            .map(|count| {
                let c = Rc::clone(count);
                item.rx().selected().subscribe(move || c.set(c.get() + 1), || {})
            })
            .collect();

        for _ in 0..taps {
            item.perform_selection();
        }

        prop_assert_eq!(item.select_slot().install_count(), 1);
        for count in &counts {
            prop_assert_eq!(count.get(), taps);
        }

        drop(subs);
        prop_assert!(!item.select_slot().is_installed());
    }
}

// ── Two-way binding ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn binding_converges(steps in proptest::collection::vec(step_strategy(), 0..24)) {
        let field = Rc::new(TextFieldItem::with_center(NotificationCenter::new()));
        let value = Variable::new(String::new());
        let _binding = field.bind_two_way(&value);

        for step in steps {
            let writes = field.programmatic_write_count();
            match step {
                Step::Type(text) => {
                    field.type_text(text);
                    prop_assert_eq!(field.programmatic_write_count(), writes);
                }
                Step::External(text) => value.set(text),
                Step::EndEditing => field.end_editing(),
            }
            if !field.is_editing() {
                prop_assert_eq!(field.text(), value.get());
            }
        }

        field.end_editing();
        prop_assert_eq!(field.text(), value.get());
    }
}
