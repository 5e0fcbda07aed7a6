use tracing::trace;

use crate::interaction::{SelectionId, SelectionRequest};

/// Host service that owns the cross-visual selection.
///
/// `select` hands back a ticket right away; the host later reports the
/// resulting selection through the chart's `on_selection_resolved`, quoting
/// the ticket's generation. Generations must increase with every call.
pub trait SelectionManager {
    fn select(&mut self, identity: SelectionId, multi_select: bool) -> SelectionRequest;
    fn clear(&mut self);
}

/// In-process selection manager that queues requests for the host to drain.
#[derive(Debug, Default)]
pub struct QueuedSelectionManager {
    next_generation: u64,
    outbox: Vec<SelectionRequest>,
    clear_count: usize,
}

impl QueuedSelectionManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests issued since the last drain, oldest first.
    pub fn drain_requests(&mut self) -> Vec<SelectionRequest> {
        std::mem::take(&mut self.outbox)
    }

    #[must_use]
    pub fn clear_count(&self) -> usize {
        self.clear_count
    }
}

impl SelectionManager for QueuedSelectionManager {
    fn select(&mut self, identity: SelectionId, multi_select: bool) -> SelectionRequest {
        self.next_generation += 1;
        let request = SelectionRequest::new(self.next_generation, identity, multi_select);
        trace!(
            generation = request.generation,
            identity = request.identity.as_str(),
            multi_select,
            "selection requested"
        );
        self.outbox.push(request.clone());
        request
    }

    fn clear(&mut self) {
        self.outbox.clear();
        self.clear_count += 1;
    }
}
