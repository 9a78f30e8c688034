#![forbid(unsafe_code)]

//! Paneldiff public facade crate.
//!
//! This crate provides the stable, ergonomic surface area for users.

pub mod prelude {
    pub use paneldiff_reactive as reactive;
    pub use paneldiff_tracker as tracker;

    pub use paneldiff_reactive::{Observable, Subscription};
    pub use paneldiff_tracker::{
        ComparatorSet, FieldComparator, LastSavedStateSource, PanelId, PanelState,
        SerializedPanelState, SnapshotCapability, TrackerConfig, UnsavedChangesTracker,
        start_tracking_unsaved_changes, start_tracking_unsaved_changes_with,
    };
}
