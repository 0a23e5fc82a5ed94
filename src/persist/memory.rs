use crate::event::ParkingEvent;

use super::{EventStore, StorageResult};

/// Volatile event log for tests and examples.
#[derive(Debug, Default, Clone)]
pub struct MemoryEventStore {
    events: Vec<ParkingEvent>,
}

impl MemoryEventStore {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log pre-seeded with `events` in the given order.
    pub fn with_events(events: Vec<ParkingEvent>) -> Self {
        Self { events }
    }
}

impl EventStore for MemoryEventStore {
    fn append(&mut self, event: &ParkingEvent) -> StorageResult<()> {
        self.events.push(event.clone());
        Ok(())
    }

    fn read_all(&self) -> StorageResult<Vec<ParkingEvent>> {
        Ok(self.events.clone())
    }
}
