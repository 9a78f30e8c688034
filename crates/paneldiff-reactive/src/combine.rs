#![forbid(unsafe_code)]

//! Combining combinators: latest-of-N, map, and latest-of-a-pair.
//!
//! Each combinator owns the subscriptions that feed its output
//! observable. Dropping the combinator severs the pipeline: the output
//! keeps its last value but never updates again.
//!
//! Sources here are behavior-style (always hold a current value), so
//! combining does not need to buffer emissions; on any upstream change
//! the combinator re-reads every source synchronously and publishes the
//! joined value.

use crate::observable::{Observable, Subscription};

/// Latest value of every source in a homogeneous slice, joined into a
/// `Vec` in slice order.
pub struct CombineLatest<T> {
    output: Observable<Vec<T>>,
    _subs: Vec<Subscription>,
}

impl<T: Clone + PartialEq + 'static> CombineLatest<T> {
    /// Join `sources` into one observable of their latest values.
    ///
    /// The output is seeded with the sources' current values. An empty
    /// slice yields an output that never changes.
    #[must_use]
    pub fn new(sources: &[Observable<T>]) -> Self {
        let output = Observable::new(sources.iter().map(Observable::get).collect::<Vec<T>>());

        let owned: Vec<Observable<T>> = sources.to_vec();
        let subs = sources
            .iter()
            .map(|source| {
                let output = output.clone();
                let owned = owned.clone();
                source.subscribe(move |_| {
                    output.set(owned.iter().map(Observable::get).collect());
                })
            })
            .collect();

        Self {
            output,
            _subs: subs,
        }
    }

    /// The joined output observable.
    #[must_use]
    pub fn output(&self) -> &Observable<Vec<T>> {
        &self.output
    }
}

/// A derived observable: `f` applied to the source's latest value.
pub struct Mapped<U> {
    output: Observable<U>,
    _sub: Subscription,
}

impl<U: Clone + PartialEq + 'static> Mapped<U> {
    /// Derive an observable from `source` through `f`.
    ///
    /// The output is seeded with `f(current)` and refreshed on every
    /// source change.
    #[must_use]
    pub fn new<T: Clone + PartialEq + 'static>(
        source: &Observable<T>,
        f: impl Fn(&T) -> U + 'static,
    ) -> Self {
        let output = Observable::new(source.with(&f));
        let sub = {
            let output = output.clone();
            source.subscribe(move |v| output.set(f(v)))
        };
        Self { output, _sub: sub }
    }

    /// The derived output observable.
    #[must_use]
    pub fn output(&self) -> &Observable<U> {
        &self.output
    }

    /// Split into the output observable and the subscription keeping it
    /// fed. The output stops updating once the subscription is dropped.
    #[must_use]
    pub fn into_parts(self) -> (Observable<U>, Subscription) {
        (self.output, self._sub)
    }
}

/// Latest values of two heterogeneous observables, joined into a tuple.
///
/// Refreshes when **either** side changes (combine-latest semantics,
/// not sample-on-left).
pub struct CombinedPair<A, B> {
    output: Observable<(A, B)>,
    _subs: [Subscription; 2],
}

impl<A, B> CombinedPair<A, B>
where
    A: Clone + PartialEq + 'static,
    B: Clone + PartialEq + 'static,
{
    /// Join `a` and `b` into one observable of their latest values.
    #[must_use]
    pub fn new(a: &Observable<A>, b: &Observable<B>) -> Self {
        let output = Observable::new((a.get(), b.get()));

        let sub_a = {
            let output = output.clone();
            let (left, right) = (a.clone(), b.clone());
            a.subscribe(move |_| output.set((left.get(), right.get())))
        };
        let sub_b = {
            let output = output.clone();
            let (left, right) = (a.clone(), b.clone());
            b.subscribe(move |_| output.set((left.get(), right.get())))
        };

        Self {
            output,
            _subs: [sub_a, sub_b],
        }
    }

    /// The joined output observable.
    #[must_use]
    pub fn output(&self) -> &Observable<(A, B)> {
        &self.output
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
