#![forbid(unsafe_code)]

//! Live unsaved-changes tracking for one panel.
//!
//! [`start_tracking_unsaved_changes`] wires the tracked field streams
//! and the parent's last-saved snapshot into one reactive pipeline:
//!
//! ```text
//! field streams ─▶ combine_latest ─▶ debounce ─▶ keyed map ─┐
//!                                                           ├─▶ diff ─▶ unsaved_changes
//! parent snapshot ─▶ deserialize ───────────────────────────┘
//! ```
//!
//! Field-stream bursts are debounced: only the settled state after the
//! quiescence window is diffed. A snapshot emission (a save completing)
//! recomputes immediately; the debounce sits only on the field side.
//!
//! # Invariants
//!
//! 1. The published diff always replaces the previous one, never merges.
//! 2. Degenerate inputs (no comparators, no parent, no capability)
//!    yield a default tracker whose diff is permanently `None` and
//!    whose operations are no-ops.
//! 3. After [`cleanup`](UnsavedChangesTracker::cleanup), the last
//!    published diff stays readable but frozen.
//!
//! # Failure Modes
//!
//! - **Comparator or setter panics**: propagates to the caller driving
//!   the emission (a `set` or a `tick`); not caught here.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use paneldiff_reactive::{CombineLatest, CombinedPair, Debounced, Mapped, Observable, Subscription};
use tracing::{debug, trace};

use crate::comparators::{ComparatorSet, run_comparators};
use crate::panel::{LastSavedStateSource, PanelId, PanelState, SerializedPanelState, SnapshotCapability};

/// Tracker tuning knobs.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Quiescence window for coalescing field-stream bursts.
    /// Default: 100ms.
    pub debounce_window: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            debounce_window: Duration::from_millis(100),
        }
    }
}

/// The live subscriptions and combinators feeding the diff. Dropped as
/// a unit on cleanup.
struct Pipeline<V> {
    /// Bridges the parent's serialized stream through the deserializer.
    _snapshot_bridge: Subscription,
    _combined: CombineLatest<V>,
    debounced: Debounced<Vec<V>>,
    _keyed: Mapped<PanelState<V>>,
    _pair: CombinedPair<PanelState<V>, Option<PanelState<V>>>,
    _recompute: Subscription,
}

/// Handle to a panel's unsaved-changes pipeline.
pub struct UnsavedChangesTracker<V> {
    unsaved_changes: Observable<Option<PanelState<V>>>,
    snapshot: Option<Observable<Option<PanelState<V>>>>,
    comparators: Rc<ComparatorSet<V>>,
    pipeline: RefCell<Option<Pipeline<V>>>,
}

impl<V: Clone + PartialEq + 'static> UnsavedChangesTracker<V> {
    /// The default tracker: diff permanently `None`, every operation a
    /// no-op. Returned for all degenerate construction paths.
    fn inert(comparators: ComparatorSet<V>) -> Self {
        Self {
            unsaved_changes: Observable::new(None),
            snapshot: None,
            comparators: Rc::new(comparators),
            pipeline: RefCell::new(None),
        }
    }

    /// The live diff: `None` when current state matches the last-saved
    /// snapshot, otherwise exactly the differing fields.
    #[must_use]
    pub fn unsaved_changes(&self) -> &Observable<Option<PanelState<V>>> {
        &self.unsaved_changes
    }

    /// Push every tracked field back to its last-saved value.
    ///
    /// The snapshot is read once, then fanned out to all setters; there
    /// is no atomicity across fields. With no saved snapshot, setters
    /// receive `None`. Setter side effects flow through the normal
    /// live-update path and clear the diff on the next quiescence
    /// window.
    pub fn reset(&self) {
        let saved = self.snapshot.as_ref().and_then(Observable::get);
        debug!(
            fields = self.comparators.len(),
            has_snapshot = saved.is_some(),
            "resetting panel state to last-saved values"
        );
        for (name, comparator) in self.comparators.iter() {
            (comparator.set)(saved.as_ref().and_then(|s| s.get(name).cloned()));
        }
    }

    /// Advance the debounce timer. The host event loop drives this with
    /// elapsed wall time; a no-op on the default tracker and after
    /// cleanup.
    pub fn tick(&self, elapsed: Duration) {
        if let Some(pipeline) = self.pipeline.borrow().as_ref() {
            pipeline.debounced.tick(elapsed);
        }
    }

    /// Tear down the pipeline, releasing every subscription. The last
    /// published diff stays readable but no longer updates. Calling
    /// this twice is a no-op the second time.
    pub fn cleanup(&self) {
        if self.pipeline.borrow_mut().take().is_some() {
            debug!("unsaved-changes tracker torn down");
        }
    }

    /// Whether the tracker has a live pipeline (false for the default
    /// tracker and after cleanup).
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.pipeline.borrow().is_some()
    }
}

impl<V: std::fmt::Debug> std::fmt::Debug for UnsavedChangesTracker<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnsavedChangesTracker")
            .field("fields", &self.comparators.len())
            .field("active", &self.pipeline.borrow().is_some())
            .finish()
    }
}

/// Start tracking a panel's unsaved changes with the default
/// [`TrackerConfig`].
///
/// `deserialize` turns the parent's serialized representation into the
/// live state shape. See [`start_tracking_unsaved_changes_with`].
#[must_use]
pub fn start_tracking_unsaved_changes<V: Clone + PartialEq + 'static>(
    panel_id: &PanelId,
    parent: Option<&dyn LastSavedStateSource>,
    comparators: ComparatorSet<V>,
    deserialize: impl Fn(&SerializedPanelState) -> PanelState<V> + 'static,
) -> UnsavedChangesTracker<V> {
    start_tracking_unsaved_changes_with(
        TrackerConfig::default(),
        panel_id,
        parent,
        comparators,
        deserialize,
    )
}

/// Start tracking a panel's unsaved changes.
///
/// Degenerate inputs short-circuit to the default tracker before any
/// subscription is built: an empty comparator set, an absent parent,
/// or a parent that reports [`SnapshotCapability::Unsupported`] for
/// this panel.
#[must_use]
pub fn start_tracking_unsaved_changes_with<V: Clone + PartialEq + 'static>(
    config: TrackerConfig,
    panel_id: &PanelId,
    parent: Option<&dyn LastSavedStateSource>,
    comparators: ComparatorSet<V>,
    deserialize: impl Fn(&SerializedPanelState) -> PanelState<V> + 'static,
) -> UnsavedChangesTracker<V> {
    if comparators.is_empty() {
        debug!(panel = %panel_id, "no comparators; unsaved-changes tracking disabled");
        return UnsavedChangesTracker::inert(comparators);
    }

    let Some(parent) = parent else {
        debug!(panel = %panel_id, "no parent container; unsaved-changes tracking disabled");
        return UnsavedChangesTracker::inert(comparators);
    };
    let serialized = match parent.last_saved_state(panel_id) {
        SnapshotCapability::Supported(stream) => stream,
        SnapshotCapability::Unsupported => {
            debug!(panel = %panel_id, "parent does not supply last-saved state; tracking disabled");
            return UnsavedChangesTracker::inert(comparators);
        }
    };

    // Bridge the serialized snapshot stream through the deserializer
    // once; everything downstream consumes the typed stream.
    let (snapshot, snapshot_bridge) = Mapped::new(&serialized, move |s: &Option<SerializedPanelState>| {
        s.as_ref().map(&deserialize)
    })
    .into_parts();

    let comparators = Rc::new(comparators);
    let keys: Vec<String> = comparators.keys().cloned().collect();
    let sources: Vec<Observable<V>> = comparators
        .iter()
        .map(|(_, comparator)| comparator.value.clone())
        .collect();

    debug!(
        panel = %panel_id,
        fields = keys.len(),
        window_ms = config.debounce_window.as_millis() as u64,
        "unsaved-changes tracking started"
    );

    // Initial diff against the snapshot's value at construction time.
    let unsaved_changes = Observable::new(run_comparators(
        &comparators,
        snapshot.get().as_ref(),
        &comparators.current_values(),
    ));

    let combined = CombineLatest::new(&sources);
    let debounced = Debounced::new(combined.output(), config.debounce_window);
    let keyed = Mapped::new(debounced.output(), move |values: &Vec<V>| {
        keys.iter()
            .cloned()
            .zip(values.iter().cloned())
            .collect::<PanelState<V>>()
    });
    let pair = CombinedPair::new(keyed.output(), &snapshot);

    let recompute = {
        let comparators = Rc::clone(&comparators);
        let unsaved_changes = unsaved_changes.clone();
        pair.output()
            .subscribe(move |(current, saved): &(PanelState<V>, Option<PanelState<V>>)| {
                let diff = run_comparators(&comparators, saved.as_ref(), current);
                trace!(
                    changed = diff.as_ref().map_or(0, |d| d.len()),
                    "unsaved-changes diff recomputed"
                );
                unsaved_changes.set(diff);
            })
    };

    UnsavedChangesTracker {
        unsaved_changes,
        snapshot: Some(snapshot),
        comparators,
        pipeline: RefCell::new(Some(Pipeline {
            _snapshot_bridge: snapshot_bridge,
            _combined: combined,
            debounced,
            _keyed: keyed,
            _pair: pair,
            _recompute: recompute,
        })),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
