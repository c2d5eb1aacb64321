//! Events emitted after a commit is published.
//!
//! - The cache emits events
//! - The sink decides what they mean
//! - Recovery emits nothing

use parking_lot::Mutex;

use crate::graph::ChangeSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageEvent {
    /// A staged change set became visible to readers.
    Published {
        summary: ChangeSummary,
        persisted: bool,
    },
}

/// Receives storage events.
///
/// Called on the staging worker that published the change, after the new
/// snapshot is visible.
pub trait StorageEventSink: Send + Sync {
    fn emit(&self, event: StorageEvent);
}

/// Discards all events.
#[derive(Debug, Default)]
pub struct NullSink;

impl StorageEventSink for NullSink {
    fn emit(&self, _event: StorageEvent) {}
}

/// Records events for assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<StorageEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<StorageEvent> {
        self.events.lock().clone()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl StorageEventSink for RecordingSink {
    fn emit(&self, event: StorageEvent) {
        self.events.lock().push(event);
    }
}
