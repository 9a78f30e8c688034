#![forbid(unsafe_code)]

//! Shared, version-tracked observable values with change notification.
//!
//! # Design
//!
//! [`Observable<T>`] wraps a value in `Rc<RefCell<..>>` for single-threaded
//! shared ownership. Subscribers are stored as `Weak` callbacks and pruned
//! lazily during notification; [`Subscription`] is the RAII guard that keeps
//! a callback alive and detaches it on drop.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per mutation that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op (no version
//!    bump, no notifications).
//! 4. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 5. Notification is re-entrancy safe: a callback may read or set any
//!    observable, including the one notifying it.
//!
//! # Failure Modes
//!
//! - **Callback panics**: the panic propagates to whoever called `set()`.
//!   The value and version updates have already been applied; remaining
//!   subscribers for that cycle are not invoked.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Holder that keeps a subscriber callback alive while its
/// [`Subscription`] exists.
struct CallbackSlot<T> {
    callback: Box<dyn Fn(&T)>,
}

struct ObservableInner<T> {
    value: T,
    /// Monotonically increasing, bumped on each value change.
    version: u64,
    /// Weak references; a dead entry means its subscription was dropped.
    subscribers: Vec<Weak<CallbackSlot<T>>>,
}

/// A shared, observable value with synchronous reads.
///
/// Cloning an `Observable` creates a new handle to the **same** inner
/// state; `set()` through any handle notifies all subscribers.
pub struct Observable<T> {
    inner: Rc<RefCell<ObservableInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create an observable seeded with `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ObservableInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Current value, cloned.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Access the current value by reference without cloning.
    ///
    /// # Panics
    ///
    /// Panics if the closure calls `set()` on the same observable
    /// (re-entrant borrow).
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Set the value, notifying subscribers in registration order.
    ///
    /// Setting a value equal to the current one is a no-op.
    pub fn set(&self, value: T) {
        let callbacks: Vec<Rc<CallbackSlot<T>>> = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value.clone();
            inner.version += 1;
            // Prune dead entries while collecting the live ones, so the
            // borrow is released before any callback runs.
            inner.subscribers.retain(|weak| weak.upgrade().is_some());
            inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect()
        };
        for slot in callbacks {
            (slot.callback)(&value);
        }
    }

    /// Register a change callback. The callback stays registered as long
    /// as the returned [`Subscription`] is alive.
    ///
    /// The callback is **not** invoked with the current value; only future
    /// changes are delivered.
    #[must_use]
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let slot = Rc::new(CallbackSlot {
            callback: Box::new(callback),
        });
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&slot));
        Subscription { _keepalive: slot }
    }

    /// Number of value changes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Live subscriber count (dead entries not yet pruned are excluded).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|weak| weak.upgrade().is_some())
            .count()
    }
}

/// RAII guard for a subscriber callback.
///
/// Dropping the guard releases the callback; the observable prunes the
/// dead entry lazily on its next notification.
pub struct Subscription {
    _keepalive: Rc<dyn std::any::Any>,
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Subscription")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
