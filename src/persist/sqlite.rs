//! SQLite-backed append-only event journal.

use std::path::Path;

use rusqlite::{Connection, params};

use crate::{
    event::{ParkingEvent, RecordedAt},
    types::Status,
};

use super::{EventStore, StorageResult, warn_malformed};

/// SQLite implementation of [`crate::persist::EventStore`].
///
/// Rows carry the same six fields as the CSV log plus an autoincrement `seq`
/// that fixes append order.
pub struct SqliteEventJournal {
    conn: Connection,
}

impl SqliteEventJournal {
    /// Opens or creates a journal at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory journal.
    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Number of stored events.
    pub fn len(&self) -> StorageResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM events", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// True when nothing has been appended yet.
    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl EventStore for SqliteEventJournal {
    fn append(&mut self, event: &ParkingEvent) -> StorageResult<()> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO events(plate, date, time, iso_timestamp, status, slot) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                event.plate,
                event.recorded_at.date,
                event.recorded_at.time,
                event.recorded_at.iso,
                event.status.as_str(),
                event.slot,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn read_all(&self) -> StorageResult<Vec<ParkingEvent>> {
        let mut stmt = self.conn.prepare(
            "SELECT plate, date, time, iso_timestamp, status, slot FROM events ORDER BY seq ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let status: String = row.get(4)?;
            Ok(ParkingEvent {
                plate: row.get(0)?,
                recorded_at: RecordedAt {
                    date: row.get(1)?,
                    time: row.get(2)?,
                    iso: row.get(3)?,
                },
                status: Status::parse(&status),
                slot: row.get(5)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            let event = row?;
            warn_malformed("sqlite", out.len(), &event);
            out.push(event);
        }
        tracing::debug!(count = out.len(), "read event journal");
        Ok(out)
    }
}
