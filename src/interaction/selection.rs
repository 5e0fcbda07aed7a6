use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Opacity of rows that are not part of an active selection.
pub const MIN_OPACITY: f64 = 0.3;
/// Opacity of selected rows, and of every row when nothing is selected.
pub const MAX_OPACITY: f64 = 1.0;
/// Duration of the opacity transition after a selection change.
pub const SELECTION_TRANSITION: Duration = Duration::from_millis(200);

/// Opaque host-issued token identifying a data point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectionId(String);

impl SelectionId {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Ticket for a selection call whose result arrives later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRequest {
    pub generation: u64,
    pub identity: SelectionId,
    pub multi_select: bool,
}

impl SelectionRequest {
    #[must_use]
    pub fn new(generation: u64, identity: SelectionId, multi_select: bool) -> Self {
        Self {
            generation,
            identity,
            multi_select,
        }
    }
}

/// Tracks which selection result is current.
///
/// Only the most recently observed request may resolve; a reply carrying an
/// older generation is ignored, as is any reply that arrives after a clear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionTracker {
    latest: Option<u64>,
    selected: Vec<SelectionId>,
}

impl SelectionTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn latest_generation(&self) -> Option<u64> {
        self.latest
    }

    #[must_use]
    pub fn selected(&self) -> &[SelectionId] {
        &self.selected
    }

    /// Marks `request` as the one whose result should be applied.
    pub fn observe(&mut self, request: &SelectionRequest) {
        self.latest = Some(request.generation);
    }

    /// Applies a host result. Returns `false` when `generation` is stale.
    pub fn resolve(&mut self, generation: u64, selected: Vec<SelectionId>) -> bool {
        if self.latest != Some(generation) {
            return false;
        }
        self.selected = selected;
        true
    }

    /// Clears the selection and invalidates any in-flight request.
    pub fn clear(&mut self) {
        self.latest = None;
        self.selected.clear();
    }

    #[must_use]
    pub fn is_selected(&self, identity: &SelectionId) -> bool {
        self.selected.contains(identity)
    }

    #[must_use]
    pub fn opacity_for(&self, identity: &SelectionId) -> f64 {
        if self.selected.is_empty() || self.is_selected(identity) {
            MAX_OPACITY
        } else {
            MIN_OPACITY
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_OPACITY, MIN_OPACITY, SelectionId, SelectionRequest, SelectionTracker};

    fn request(generation: u64, key: &str) -> SelectionRequest {
        SelectionRequest::new(generation, SelectionId::new(key), false)
    }

    #[test]
    fn nothing_selected_means_full_opacity() {
        let tracker = SelectionTracker::new();
        assert_eq!(tracker.opacity_for(&SelectionId::new("a")), MAX_OPACITY);
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut tracker = SelectionTracker::new();
        let first = request(1, "a");
        let second = request(2, "b");
        tracker.observe(&first);
        tracker.observe(&second);

        assert!(tracker.resolve(second.generation, vec![SelectionId::new("b")]));
        assert!(!tracker.resolve(first.generation, vec![SelectionId::new("a")]));

        assert_eq!(tracker.opacity_for(&SelectionId::new("b")), MAX_OPACITY);
        assert_eq!(tracker.opacity_for(&SelectionId::new("a")), MIN_OPACITY);
    }

    #[test]
    fn clear_invalidates_in_flight_requests() {
        let mut tracker = SelectionTracker::new();
        let pending = request(7, "a");
        tracker.observe(&pending);
        tracker.clear();
        assert!(!tracker.resolve(pending.generation, vec![SelectionId::new("a")]));
        assert!(tracker.selected().is_empty());
        assert_eq!(tracker.latest_generation(), None);
    }
}
