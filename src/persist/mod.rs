/// CSV text-file event log.
pub mod csv_log;
/// In-memory event log.
pub mod memory;
/// SQLite-backed event journal.
pub mod sqlite;

use crate::event::ParkingEvent;

/// Failure of the underlying storage medium.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// File system read or write failed.
    #[error("event log i/o failed: {0}")]
    Io(#[from] std::io::Error),
    /// SQLite reported an error.
    #[error("event journal database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Append-only sequence of parking events.
pub trait EventStore: Send {
    /// Durably writes `event` after every event already stored.
    fn append(&mut self, event: &ParkingEvent) -> StorageResult<()>;

    /// Returns every stored event in append order.
    fn read_all(&self) -> StorageResult<Vec<ParkingEvent>>;
}

fn warn_malformed(source: &str, position: usize, event: &ParkingEvent) {
    if event.recorded_at.instant().is_none() {
        tracing::warn!(
            source,
            position,
            plate = %event.plate,
            iso_timestamp = %event.recorded_at.iso,
            "unparseable timestamp; record kept but never treated as latest"
        );
    }
}
