#![forbid(unsafe_code)]

//! Single-threaded reactive primitives for paneldiff.
//!
//! This crate provides the observable-value abstraction and the small
//! set of stateful combinators the unsaved-changes pipeline is built
//! from:
//!
//! - [`Observable`]: a shared, version-tracked value with change
//!   notification via subscriber callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`CombineLatest`]: latest values of N homogeneous sources.
//! - [`Mapped`]: a derived observable.
//! - [`CombinedPair`]: latest values of two heterogeneous sources.
//! - [`Debounced`]: quiescence-window debouncing, driven by
//!   cooperative `tick(Duration)` calls from the host loop.
//!
//! # Concurrency model
//!
//! Everything here is single-threaded and event-driven. `Rc<RefCell<..>>`
//! holds shared state; emissions are delivered synchronously, in
//! registration order, on the caller's stack. The only deferral
//! mechanism is the debounce timer, and it is advanced explicitly by
//! the host.

pub mod combine;
pub mod debounce;
pub mod observable;

pub use combine::{CombineLatest, CombinedPair, Mapped};
pub use debounce::Debounced;
pub use observable::{Observable, Subscription};
