pub mod scheduler;
pub mod selection;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{LocateMode, Sample};

pub use scheduler::{DEFAULT_TRACKER_DEBOUNCE, Debouncer, TimerHandle, TimerQueue};
pub use selection::{
    MAX_OPACITY, MIN_OPACITY, SELECTION_TRANSITION, SelectionId, SelectionRequest,
    SelectionTracker,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionMode {
    Idle,
    Panning,
}

/// Sample committed by a tracker lookup, with its plot-local position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnap {
    pub sample: Sample,
    pub x: f64,
    pub y: f64,
}

/// Hover tracker state exposed to host applications.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TrackerState {
    pub visible: bool,
    pub pointer_x: f64,
    pub pointer_y: f64,
    pub snap: Option<TrackerSnap>,
}

/// Pointer position waiting for the debounce delay before a lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingLookup {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone)]
pub struct InteractionState {
    mode: InteractionMode,
    locate_mode: LocateMode,
    tracker: TrackerState,
    lookups: Debouncer<PendingLookup>,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(DEFAULT_TRACKER_DEBOUNCE)
    }
}

impl InteractionState {
    #[must_use]
    pub fn new(debounce: Duration) -> Self {
        Self {
            mode: InteractionMode::Idle,
            locate_mode: LocateMode::default(),
            tracker: TrackerState::default(),
            lookups: Debouncer::new(debounce),
        }
    }

    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn locate_mode(&self) -> LocateMode {
        self.locate_mode
    }

    pub fn set_locate_mode(&mut self, mode: LocateMode) {
        self.locate_mode = mode;
    }

    #[must_use]
    pub fn tracker(&self) -> TrackerState {
        self.tracker
    }

    #[must_use]
    pub fn has_pending_lookup(&self) -> bool {
        self.lookups.is_pending()
    }

    /// Records the pointer and restarts the lookup delay. No lookup is
    /// scheduled while a drag is in progress.
    pub fn on_pointer_move(&mut self, now: Duration, x: f64, y: f64) {
        self.tracker.visible = true;
        self.tracker.pointer_x = x;
        self.tracker.pointer_y = y;
        if self.mode == InteractionMode::Idle {
            self.lookups.call(now, PendingLookup { x, y });
        }
    }

    pub fn on_pointer_leave(&mut self) {
        self.lookups.cancel();
        self.tracker = TrackerState::default();
    }

    /// Returns the pointer position once the lookup delay has elapsed.
    pub fn take_due_lookup(&mut self, now: Duration) -> Option<PendingLookup> {
        self.lookups.poll(now)
    }

    pub fn set_snap(&mut self, snap: Option<TrackerSnap>) {
        self.tracker.snap = snap;
    }

    /// Enters drag mode and drops any pending tracker lookup.
    pub fn on_pan_start(&mut self) {
        self.mode = InteractionMode::Panning;
        self.lookups.cancel();
    }

    pub fn on_pan_end(&mut self) {
        self.mode = InteractionMode::Idle;
    }
}
