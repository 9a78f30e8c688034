#![forbid(unsafe_code)]

//! Unsaved-changes tracking for embeddable panels.
//!
//! A panel registers a [`ComparatorSet`] describing its tracked fields
//! (live value stream, setter, optional custom equality per field) and
//! calls [`start_tracking_unsaved_changes`] with its id, its parent
//! container, and a deserializer for the parent's serialized state.
//! The returned [`UnsavedChangesTracker`] exposes:
//!
//! - `unsaved_changes()`: an observable diff — `None` when the panel
//!   matches its last-saved snapshot, otherwise exactly the differing
//!   fields;
//! - `reset()`: push every tracked field back to its saved value;
//! - `tick(elapsed)`: advance the debounce timer from the host loop;
//! - `cleanup()`: tear the pipeline down.
//!
//! Degenerate situations (no comparators, no parent, parent without
//! the last-saved-state capability) are not errors: they yield a
//! default tracker whose diff is permanently `None`.

pub mod comparators;
pub mod panel;
pub mod tracker;

pub use comparators::{ComparatorSet, EqualityFn, FieldComparator, SetterFn, run_comparators};
pub use panel::{
    LastSavedStateSource, PanelId, PanelState, SerializedPanelState, SnapshotCapability,
};
pub use tracker::{
    TrackerConfig, UnsavedChangesTracker, start_tracking_unsaved_changes,
    start_tracking_unsaved_changes_with,
};
