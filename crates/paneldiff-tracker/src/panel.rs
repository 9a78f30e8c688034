#![forbid(unsafe_code)]

//! Panel identity, serialized state, and the parent-container
//! capability for supplying last-saved snapshots.

use paneldiff_reactive::Observable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque identifier for a child panel inside a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(String);

impl PanelId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PanelId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A panel's full or partial state, keyed by field name.
///
/// `BTreeMap` keeps field order deterministic regardless of insertion
/// order.
pub type PanelState<V> = BTreeMap<String, V>;

/// The parent container's serialized representation of a child's saved
/// state. Trackers never interpret this directly; a caller-supplied
/// deserializer turns it into a typed [`PanelState`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedPanelState {
    pub raw_state: serde_json::Value,
}

impl SerializedPanelState {
    #[must_use]
    pub fn new(raw_state: serde_json::Value) -> Self {
        Self { raw_state }
    }
}

/// Result of probing a parent container for last-saved-state support.
///
/// A tagged result rather than a nullable stream, so the degenerate
/// path is explicit at the type level. `Supported` carrying a stream
/// whose current value is `None` means "tracking is supported but
/// nothing has been saved yet for this child" — a distinct condition
/// from `Unsupported`.
pub enum SnapshotCapability {
    /// The parent tracks this child; here is its last-saved-state stream.
    Supported(Observable<Option<SerializedPanelState>>),
    /// The parent is absent, lacks the capability, or has no record of
    /// this child.
    Unsupported,
}

impl std::fmt::Debug for SnapshotCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Supported(_) => f.write_str("SnapshotCapability::Supported"),
            Self::Unsupported => f.write_str("SnapshotCapability::Unsupported"),
        }
    }
}

/// Capability of a parent container to supply last-saved snapshots for
/// its children.
pub trait LastSavedStateSource {
    /// Probe for the last-saved-state stream of the child `panel_id`.
    fn last_saved_state(&self, panel_id: &PanelId) -> SnapshotCapability;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn panel_id_roundtrip() {
        let id = PanelId::new("panel-1");
        assert_eq!(id.as_str(), "panel-1");
        assert_eq!(id.to_string(), "panel-1");
        assert_eq!(PanelId::from("panel-1"), id);
    }

    #[test]
    fn panel_id_serde_is_transparent() {
        let id = PanelId::new("abc");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc\"");
        let back: PanelId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn serialized_state_roundtrip() {
        let state = SerializedPanelState::new(json!({"title": "A", "span": 3}));
        let json = serde_json::to_string(&state).unwrap();
        let back: SerializedPanelState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn capability_debug_names_variant() {
        let supported = SnapshotCapability::Supported(Observable::new(None));
        assert_eq!(format!("{supported:?}"), "SnapshotCapability::Supported");
        assert_eq!(
            format!("{:?}", SnapshotCapability::Unsupported),
            "SnapshotCapability::Unsupported"
        );
    }
}
