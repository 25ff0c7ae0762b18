#![forbid(unsafe_code)]

//! Runtime: shared control streams and two-way bindings.
//!
//! # Role in bindkit
//! `bindkit-runtime` sits on top of `bindkit-core`. It adapts each control's
//! single callback slot into a disposable bridge, multicasts the resulting
//! events to any number of subscribers, and binds control properties to
//! observable [`Variable`]s.
//!
//! # Primary responsibilities
//! - **Bridges**: install and uninstall a control's action target.
//! - **Cache**: one shared stream per control property, completed on drop.
//! - **Extensions**: `control.rx()` sinks, properties, and events.
//! - **Two-way binding**: feedback-free synchronization with edit deferral.
//!
//! # Example
//! ```
//! use std::rc::Rc;
//! use bindkit_core::{NotificationCenter, TextFieldItem};
//! use bindkit_runtime::{TwoWayBind, Variable};
//!
//! let field = Rc::new(TextFieldItem::with_center(NotificationCenter::new()));
//! let name = Variable::new("Ada".to_string());
//! let _binding = field.bind_two_way(&name);
//! assert_eq!(field.text(), "Ada");
//!
//! field.type_text("Grace");
//! assert_eq!(name.get(), "Grace");
//! ```

pub mod reactive;

pub use reactive::{
    ActionTargetBridge, BindOptions, Binder, ControlEvent, ControlProperty, Installer, Observer,
    Reactive, ReactiveExt, Stream, Subscription, TwoWayBind, Variable, action_events,
    action_values, bind_two_way, cached_stream, deallocated, notifications,
};
