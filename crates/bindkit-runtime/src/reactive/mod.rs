#![forbid(unsafe_code)]

//! Reactive bindings for bindkit controls.
//!
//! This module turns single-slot controls into streams and binds them to
//! observable state:
//!
//! - [`ActionTargetBridge`]: occupies a control's callback slot for the
//!   lifetime of one subscription.
//! - [`cached_stream`], [`action_events`], [`action_values`]: one shared
//!   stream per (control, property), completed when the control drops.
//! - [`Variable`]: a shared, version-tracked value cell.
//! - [`bind_two_way`]: links a [`ControlProperty`] and a [`Variable`] in
//!   both directions.
//! - [`Stream`] and [`Subscription`]: the push-stream kernel underneath.
//!
//! # Architecture
//!
//! Everything is `Rc`-based and single-threaded. Controls are held weakly by
//! every stream, sink, and bridge; the only strong edges point from a
//! control to its cached streams (via the attachment table) and from a
//! subscription to whatever it keeps running.
//!
//! # Invariants
//!
//! 1. At most one bridge is installed per control interaction at a time.
//! 2. A control's cached streams complete, and release their bridge, when
//!    the control is dropped.
//! 3. Disposing any [`Subscription`] twice is a no-op the second time.
//! 4. A two-way binding never writes a user change back into the control
//!    that produced it.

pub mod action_target;
pub mod binding;
pub mod cache;
pub mod control_property;
pub mod ext;
pub mod signals;
pub mod stream;
pub mod subscription;
pub mod variable;

pub use action_target::{ActionTargetBridge, Installer};
pub use binding::{BindOptions, TwoWayBind, bind_two_way};
pub use cache::{action_events, action_values, cached_stream};
pub use control_property::{Binder, ControlEvent, ControlProperty};
pub use ext::{Reactive, ReactiveExt};
pub use signals::{deallocated, notifications};
pub use stream::{Observer, Stream};
pub use subscription::Subscription;
pub use variable::Variable;
