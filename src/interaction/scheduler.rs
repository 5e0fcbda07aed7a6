//! Cancellable delayed work driven by a host clock.
//!
//! Nothing here spawns threads or sleeps. The host passes a monotonic `now`
//! on every event and calls [`TimerQueue::fire_due`] (or
//! [`Debouncer::poll`]) to collect the actions whose delay has elapsed.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Pointer-move coalescing delay used by the hover tracker.
pub const DEFAULT_TRACKER_DEBOUNCE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct ScheduledTimer<A> {
    handle: TimerHandle,
    due: Duration,
    action: A,
}

/// Ordered set of pending delayed actions.
#[derive(Debug, Clone)]
pub struct TimerQueue<A> {
    next_id: u64,
    pending: Vec<ScheduledTimer<A>>,
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<A> TimerQueue<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `action` to become due at `now + delay`.
    pub fn schedule(&mut self, now: Duration, delay: Duration, action: A) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        let due = now.saturating_add(delay);
        // Keep `pending` sorted by (due, handle) so firing order is deterministic.
        let index = self
            .pending
            .partition_point(|timer| (timer.due, timer.handle) <= (due, handle));
        self.pending.insert(
            index,
            ScheduledTimer {
                handle,
                due,
                action,
            },
        );
        handle
    }

    /// Cancels a pending timer. Returns `false` when it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.pending.iter().position(|timer| timer.handle == handle) {
            Some(index) => {
                self.pending.remove(index);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|timer| timer.handle == handle)
    }

    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.first().map(|timer| timer.due)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Removes and returns every action due at or before `now`, earliest first.
    pub fn fire_due(&mut self, now: Duration) -> Vec<A> {
        let split = self.pending.partition_point(|timer| timer.due <= now);
        self.pending
            .drain(..split)
            .map(|timer| timer.action)
            .collect()
    }
}

/// Cancel-and-restart wrapper: only the latest call survives the delay.
#[derive(Debug, Clone)]
pub struct Debouncer<A> {
    delay: Duration,
    queue: TimerQueue<A>,
    pending: Option<TimerHandle>,
}

impl<A> Debouncer<A> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            queue: TimerQueue::new(),
            pending: None,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending action with `action`, due `delay` after `now`.
    pub fn call(&mut self, now: Duration, action: A) -> TimerHandle {
        self.cancel();
        let handle = self.queue.schedule(now, self.delay, action);
        self.pending = Some(handle);
        handle
    }

    /// Drops the pending action, if any.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => self.queue.cancel(handle),
            None => false,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the pending action once its delay has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<A> {
        let fired = self.queue.fire_due(now).pop();
        if fired.is_some() {
            self.pending = None;
        }
        fired
    }
}

impl<A> Default for Debouncer<A> {
    fn default() -> Self {
        Self::new(DEFAULT_TRACKER_DEBOUNCE)
    }
}
