#![forbid(unsafe_code)]

//! Sinks, read-write properties, and events exposed for controls.

use std::rc::Rc;

use bindkit_core::{BindError, Control};

use super::stream::Stream;
use super::subscription::Subscription;

type SinkFn<T> = dyn Fn(T) -> Result<(), BindError>;

/// Write-only sink into a control.
///
/// Holds the control weakly. Writes after the control is gone are dropped.
pub struct Binder<T> {
    sink: Rc<SinkFn<T>>,
}

impl<T> Clone for Binder<T> {
    fn clone(&self) -> Self {
        Self {
            sink: Rc::clone(&self.sink),
        }
    }
}

impl<T> std::fmt::Debug for Binder<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Binder").finish_non_exhaustive()
    }
}

impl<T: 'static> Binder<T> {
    pub fn new<S: Control>(target: &Rc<S>, apply: impl Fn(&S, T) + 'static) -> Self {
        let weak = Rc::downgrade(target);
        let control = target.id();
        Self {
            sink: Rc::new(move |value| match weak.upgrade() {
                Some(target) => {
                    apply(target.as_ref(), value);
                    Ok(())
                }
                None => Err(BindError::StaleSubject { control }),
            }),
        }
    }

    /// Apply `value` to the control, reporting a control that is gone.
    pub fn try_on_next(&self, value: T) -> Result<(), BindError> {
        (self.sink)(value)
    }

    /// Apply `value` to the control. A write to a control that is gone is
    /// dropped.
    pub fn on_next(&self, value: T) {
        if let Err(err) = self.try_on_next(value) {
            tracing::debug!(%err, "dropping write");
        }
    }
}

impl<T: Clone + 'static> Stream<T> {
    /// Write every value of this stream into `binder`.
    pub fn bind_to(&self, binder: &Binder<T>) -> Subscription {
        let binder = binder.clone();
        self.subscribe_next(move |value| binder.on_next(value.clone()))
    }
}

/// Read-write observable property of a control.
///
/// `values` starts with the control's current value and continues with
/// every user-driven change; it is shared by all subscribers. Writes through
/// the sink update the control without echoing into `values`.
pub struct ControlProperty<T> {
    values: Stream<T>,
    sink: Binder<T>,
}

impl<T> Clone for ControlProperty<T> {
    fn clone(&self) -> Self {
        Self {
            values: self.values.clone(),
            sink: self.sink.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ControlProperty<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControlProperty").finish_non_exhaustive()
    }
}

impl<T: Clone + 'static> ControlProperty<T> {
    #[must_use]
    pub fn new(values: Stream<T>, sink: Binder<T>) -> Self {
        Self { values, sink }
    }

    #[must_use]
    pub fn values(&self) -> &Stream<T> {
        &self.values
    }

    #[must_use]
    pub fn sink(&self) -> &Binder<T> {
        &self.sink
    }

    /// Values after the initial one, i.e. user-driven changes only.
    #[must_use]
    pub fn changed(&self) -> Stream<T> {
        self.values.skip(1)
    }

    pub fn on_next(&self, value: T) {
        self.sink.on_next(value);
    }

    pub fn subscribe(
        &self,
        on_next: impl Fn(&T) + 'static,
        on_completed: impl FnOnce() + 'static,
    ) -> Subscription {
        self.values.subscribe(on_next, on_completed)
    }
}

/// Payload-free event fired once per interaction.
#[derive(Clone, Debug)]
pub struct ControlEvent {
    events: Stream<()>,
}

impl ControlEvent {
    #[must_use]
    pub fn new(events: Stream<()>) -> Self {
        Self { events }
    }

    #[must_use]
    pub fn events(&self) -> &Stream<()> {
        &self.events
    }

    pub fn subscribe(
        &self,
        on_event: impl Fn() + 'static,
        on_completed: impl FnOnce() + 'static,
    ) -> Subscription {
        self.events.subscribe(move |_| on_event(), on_completed)
    }
}
