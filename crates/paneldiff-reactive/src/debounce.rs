#![forbid(unsafe_code)]

//! Quiescence-window debouncing for observable values.
//!
//! [`Debounced`] holds a pending emission until its source has been
//! quiet for a configured window. Any source change inside the window
//! restarts the timer, so a burst of rapid changes collapses into a
//! single downstream emission reflecting the settled value.
//!
//! Time is cooperative: the host loop calls [`tick`](Debounced::tick)
//! with elapsed wall time (the same convention as animation ticking).
//! There are no threads and no timers of our own.
//!
//! # Invariants
//!
//! 1. Only the latest pending emission fires; intermediate values are
//!    never published downstream.
//! 2. The published value is read from the source **at fire time**, not
//!    captured when the change arrived.
//! 3. With no pending change, `tick` is a no-op.
//! 4. A source change resets accumulated quiet time to zero.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use crate::observable::{Observable, Subscription};

#[derive(Debug, Default)]
struct DebounceState {
    pending: bool,
    quiet: Duration,
}

/// A debounced view of an observable.
///
/// The output observable is seeded with the source's value at
/// construction and thereafter updated only after the source has been
/// quiet for the configured window.
pub struct Debounced<T> {
    source: Observable<T>,
    output: Observable<T>,
    window: Duration,
    state: Rc<RefCell<DebounceState>>,
    _sub: Subscription,
}

impl<T: Clone + PartialEq + 'static> Debounced<T> {
    /// Debounce `source` with the given quiescence `window`.
    #[must_use]
    pub fn new(source: &Observable<T>, window: Duration) -> Self {
        let state = Rc::new(RefCell::new(DebounceState::default()));
        let sub = {
            let state = Rc::clone(&state);
            source.subscribe(move |_| {
                let mut state = state.borrow_mut();
                state.pending = true;
                state.quiet = Duration::ZERO;
            })
        };
        Self {
            source: source.clone(),
            output: Observable::new(source.get()),
            window,
            state,
            _sub: sub,
        }
    }

    /// Advance the quiet timer by `elapsed`, firing the pending emission
    /// if the window has been reached.
    pub fn tick(&self, elapsed: Duration) {
        let fire = {
            let mut state = self.state.borrow_mut();
            if !state.pending {
                return;
            }
            state.quiet = state.quiet.saturating_add(elapsed);
            if state.quiet < self.window {
                return;
            }
            state.pending = false;
            state.quiet = Duration::ZERO;
            true
        };
        // Borrow released before notifying: downstream callbacks may
        // re-enter tick() or mutate the source.
        if fire {
            tracing::trace!(window_ms = self.window.as_millis() as u64, "debounce fired");
            self.output.set(self.source.get());
        }
    }

    /// Whether a source change is waiting out the quiescence window.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending
    }

    /// The debounced output observable.
    #[must_use]
    pub fn output(&self) -> &Observable<T> {
        &self.output
    }

    /// The configured quiescence window.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Debounced<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Debounced")
            .field("window", &self.window)
            .field("pending", &state.pending)
            .field("quiet", &state.quiet)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
