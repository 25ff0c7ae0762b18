#![forbid(unsafe_code)]

//! Single-threaded push streams.
//!
//! # Design
//!
//! A [`Stream<T>`] is a cold description of how to produce values: every
//! subscription runs the producer again. [`Stream::share`] and
//! [`Stream::share_replay`] turn a cold stream into a hot, multicast one that
//! runs the producer once for any number of subscribers.
//!
//! Streams carry two events, `next` and `completed`. There is no error
//! channel; failures in this layer are lifecycle races that resolve to
//! completion.
//!
//! # Invariants
//!
//! 1. An [`Observer`] delivers nothing after it has completed.
//! 2. Emission is synchronous: `on_next` on a producer returns after every
//!    downstream callback has run.
//! 3. A shared stream holds at most one upstream subscription, established
//!    by its first subscriber and released when the last one leaves or the
//!    upstream completes.
//!
//! # Failure Modes
//!
//! - **Subscriber removed during emission**: it may still receive the value
//!   in flight (fan-out iterates over a snapshot).
//! - **Late subscriber after completion**: the shared stream reconnects and
//!   the producer decides what happens (control streams complete at once
//!   because their control is gone).

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::subscription::Subscription;

struct ObserverInner<T> {
    on_next: Box<dyn Fn(&T)>,
    on_completed: RefCell<Option<Box<dyn FnOnce()>>>,
    stopped: Cell<bool>,
}

/// Receiving end of a stream. Cloning shares the same observer.
pub struct Observer<T> {
    inner: Rc<ObserverInner<T>>,
}

impl<T> Clone for Observer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> std::fmt::Debug for Observer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observer")
            .field("stopped", &self.inner.stopped.get())
            .finish()
    }
}

impl<T> Observer<T> {
    pub fn new(on_next: impl Fn(&T) + 'static, on_completed: impl FnOnce() + 'static) -> Self {
        Self {
            inner: Rc::new(ObserverInner {
                on_next: Box::new(on_next),
                on_completed: RefCell::new(Some(Box::new(on_completed))),
                stopped: Cell::new(false),
            }),
        }
    }

    pub fn on_next(&self, value: &T) {
        if !self.inner.stopped.get() {
            (self.inner.on_next)(value);
        }
    }

    pub fn on_completed(&self) {
        if self.inner.stopped.replace(true) {
            return;
        }
        let on_completed = self.inner.on_completed.borrow_mut().take();
        if let Some(on_completed) = on_completed {
            on_completed();
        }
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.get()
    }
}

type SubscribeFn<T> = dyn Fn(Observer<T>) -> Subscription;

/// A cold, cloneable stream of `T`.
pub struct Stream<T> {
    subscribe_fn: Rc<SubscribeFn<T>>,
}

impl<T> Clone for Stream<T> {
    fn clone(&self) -> Self {
        Self {
            subscribe_fn: Rc::clone(&self.subscribe_fn),
        }
    }
}

impl<T> std::fmt::Debug for Stream<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stream").finish_non_exhaustive()
    }
}

impl<T: 'static> Stream<T> {
    /// Build a stream from a producer. The producer runs once per
    /// subscription and returns the teardown for that subscription.
    pub fn create(producer: impl Fn(Observer<T>) -> Subscription + 'static) -> Self {
        Self {
            subscribe_fn: Rc::new(producer),
        }
    }

    /// A stream that completes immediately.
    #[must_use]
    pub fn empty() -> Self {
        Self::create(|observer| {
            observer.on_completed();
            Subscription::empty()
        })
    }

    pub fn subscribe_observer(&self, observer: Observer<T>) -> Subscription {
        (self.subscribe_fn)(observer)
    }

    pub fn subscribe(
        &self,
        on_next: impl Fn(&T) + 'static,
        on_completed: impl FnOnce() + 'static,
    ) -> Subscription {
        self.subscribe_observer(Observer::new(on_next, on_completed))
    }

    pub fn subscribe_next(&self, on_next: impl Fn(&T) + 'static) -> Subscription {
        self.subscribe(on_next, || {})
    }

    pub fn map<U: 'static>(&self, f: impl Fn(&T) -> U + 'static) -> Stream<U> {
        let source = self.clone();
        let f = Rc::new(f);
        Stream::create(move |observer: Observer<U>| {
            let f = Rc::clone(&f);
            let down = observer.clone();
            source.subscribe(
                move |value| down.on_next(&f(value)),
                move || observer.on_completed(),
            )
        })
    }

    pub fn filter(&self, predicate: impl Fn(&T) -> bool + 'static) -> Stream<T> {
        let source = self.clone();
        let predicate = Rc::new(predicate);
        Stream::create(move |observer: Observer<T>| {
            let predicate = Rc::clone(&predicate);
            let down = observer.clone();
            source.subscribe(
                move |value| {
                    if predicate(value) {
                        down.on_next(value);
                    }
                },
                move || observer.on_completed(),
            )
        })
    }

    /// Drop the first `count` values of every subscription.
    pub fn skip(&self, count: usize) -> Stream<T> {
        let source = self.clone();
        Stream::create(move |observer: Observer<T>| {
            let remaining = Cell::new(count);
            let down = observer.clone();
            source.subscribe(
                move |value| match remaining.get() {
                    0 => down.on_next(value),
                    n => remaining.set(n - 1),
                },
                move || observer.on_completed(),
            )
        })
    }

    /// Mirror this stream until `trigger` emits its first value, then
    /// complete and release the upstream subscription.
    pub fn take_until<U: 'static>(&self, trigger: &Stream<U>) -> Stream<T> {
        let source = self.clone();
        let trigger = trigger.clone();
        Stream::create(move |observer: Observer<T>| {
            let upstream: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

            let stop_observer = observer.clone();
            let stop_upstream = Rc::clone(&upstream);
            let trigger_sub = trigger.subscribe_next(move |_| {
                stop_observer.on_completed();
                let upstream = stop_upstream.borrow_mut().take();
                drop(upstream);
            });
            if observer.is_stopped() {
                return trigger_sub;
            }

            let trigger_sub = Rc::new(trigger_sub);
            let done_trigger = Rc::clone(&trigger_sub);
            let down = observer.clone();
            let done_observer = observer.clone();
            let sub = source.subscribe(
                move |value| down.on_next(value),
                move || {
                    done_observer.on_completed();
                    done_trigger.dispose();
                },
            );
            if observer.is_stopped() {
                drop(sub);
            } else {
                *upstream.borrow_mut() = Some(sub);
            }

            Subscription::new(move || {
                let upstream = upstream.borrow_mut().take();
                drop(upstream);
                trigger_sub.dispose();
            })
        })
    }
}

struct SharedState<T> {
    observers: Vec<(u64, Observer<T>)>,
    next_id: u64,
    /// Most recent value, kept only when replaying.
    latest: Option<T>,
    replay: bool,
    connection: Option<Subscription>,
    connecting: bool,
    /// Bumped on every upstream completion.
    epoch: u64,
}

impl<T: Clone + 'static> Stream<T> {
    /// Multicast this stream without replay: subscribers only see values
    /// emitted after they subscribed.
    ///
    /// The upstream is subscribed when the first subscriber arrives and
    /// released when the last one leaves. After the upstream completes, the
    /// next subscriber reconnects.
    #[must_use]
    pub fn share(&self) -> Stream<T> {
        self.multicast(false)
    }

    /// Like [`share`](Self::share), and also replay the most recent value to
    /// late subscribers. The replay buffer is cleared with the connection.
    #[must_use]
    pub fn share_replay(&self) -> Stream<T> {
        self.multicast(true)
    }

    fn multicast(&self, replay: bool) -> Stream<T> {
        let source = self.clone();
        let state = Rc::new(RefCell::new(SharedState {
            observers: Vec::new(),
            next_id: 0,
            latest: None,
            replay,
            connection: None,
            connecting: false,
            epoch: 0,
        }));
        Stream::create(move |observer: Observer<T>| {
            let (id, replayed, needs_connect) = {
                let mut shared = state.borrow_mut();
                let id = shared.next_id;
                shared.next_id += 1;
                shared.observers.push((id, observer.clone()));
                let needs_connect = shared.connection.is_none() && !shared.connecting;
                (id, shared.latest.clone(), needs_connect)
            };
            if let Some(value) = replayed {
                observer.on_next(&value);
            }
            if needs_connect {
                connect(&source, &state);
            }
            let state = Rc::downgrade(&state);
            Subscription::new(move || {
                if let Some(state) = state.upgrade() {
                    remove_observer(&state, id);
                }
            })
        })
    }
}

fn connect<T: Clone + 'static>(source: &Stream<T>, state: &Rc<RefCell<SharedState<T>>>) {
    let epoch = {
        let mut shared = state.borrow_mut();
        shared.connecting = true;
        shared.epoch
    };

    let next_state: Weak<RefCell<SharedState<T>>> = Rc::downgrade(state);
    let done_state = Rc::downgrade(state);
    let connection = source.subscribe(
        move |value: &T| {
            let Some(state) = next_state.upgrade() else {
                return;
            };
            let observers: Vec<Observer<T>> = {
                let mut shared = state.borrow_mut();
                if shared.replay {
                    shared.latest = Some(value.clone());
                }
                shared.observers.iter().map(|(_, o)| o.clone()).collect()
            };
            for observer in &observers {
                observer.on_next(value);
            }
        },
        move || {
            let Some(state) = done_state.upgrade() else {
                return;
            };
            let (observers, connection) = {
                let mut shared = state.borrow_mut();
                shared.latest = None;
                shared.epoch += 1;
                (
                    std::mem::take(&mut shared.observers),
                    shared.connection.take(),
                )
            };
            for (_, observer) in &observers {
                observer.on_completed();
            }
            drop(connection);
        },
    );

    let stale = {
        let mut shared = state.borrow_mut();
        shared.connecting = false;
        if shared.epoch != epoch || shared.observers.is_empty() {
            shared.latest = None;
            Some(connection)
        } else {
            shared.connection = Some(connection);
            None
        }
    };
    drop(stale);
}

fn remove_observer<T>(state: &Rc<RefCell<SharedState<T>>>, id: u64) {
    let connection = {
        let mut shared = state.borrow_mut();
        shared.observers.retain(|(oid, _)| *oid != id);
        if shared.observers.is_empty() && !shared.connecting {
            shared.latest = None;
            shared.connection.take()
        } else {
            None
        }
    };
    drop(connection);
}
