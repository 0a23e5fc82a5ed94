//! Parking event record and its line encoding.

use chrono::NaiveDateTime;

use crate::types::{SlotNumber, Status};

/// Header line of the CSV event log.
pub const LOG_HEADER: &str = "plate,date,time,iso_timestamp,status,slot";

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Wall-clock stamp of an event in the three textual forms the log stores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordedAt {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM:SS`.
    pub time: String,
    /// Full ISO-8601 timestamp; the only form used for ordering.
    pub iso: String,
}

impl RecordedAt {
    /// Renders all three forms from one instant.
    pub fn from_datetime(at: NaiveDateTime) -> Self {
        Self {
            date: at.format("%Y-%m-%d").to_string(),
            time: at.format("%H:%M:%S").to_string(),
            iso: at.format(ISO_FORMAT).to_string(),
        }
    }

    /// Parsed ISO timestamp, `None` when the stored text is malformed.
    pub fn instant(&self) -> Option<NaiveDateTime> {
        self.iso.trim().parse().ok()
    }

    /// Ordering key; malformed timestamps sort before every real one.
    pub fn sort_key(&self) -> NaiveDateTime {
        self.instant().unwrap_or(NaiveDateTime::MIN)
    }
}

/// One immutable entry or exit in the log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParkingEvent {
    /// Normalized plate.
    pub plate: String,
    /// When the event was recorded.
    pub recorded_at: RecordedAt,
    /// Entry or exit.
    pub status: Status,
    /// Slot text as stored; see [`ParkingEvent::slot_number`].
    pub slot: String,
}

impl ParkingEvent {
    /// Builds a fresh event with a canonical slot number.
    pub fn new(plate: impl Into<String>, at: NaiveDateTime, status: Status, slot: SlotNumber) -> Self {
        Self {
            plate: plate.into(),
            recorded_at: RecordedAt::from_datetime(at),
            status,
            slot: slot.to_string(),
        }
    }

    /// Slot number when the stored text is all digits.
    pub fn slot_number(&self) -> Option<SlotNumber> {
        parse_slot(&self.slot)
    }

    /// True for `IN` events.
    pub fn is_in(&self) -> bool {
        self.status == Status::In
    }

    /// Encodes the event as one CSV line without the trailing newline.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.plate,
            self.recorded_at.date,
            self.recorded_at.time,
            self.recorded_at.iso,
            self.status,
            self.slot,
        )
    }

    /// Decodes one CSV line. Never fails: missing trailing fields read as empty
    /// and malformed values are kept verbatim for audit.
    pub fn from_line(line: &str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut fields = line.split(',');
        let mut next = || fields.next().unwrap_or("").to_string();

        let plate = next();
        let date = next();
        let time = next();
        let iso = next();
        let status = Status::parse(&next());
        let slot = next();

        Self {
            plate,
            recorded_at: RecordedAt { date, time, iso },
            status,
            slot,
        }
    }
}

/// Parses slot text made only of ASCII digits.
pub fn parse_slot(raw: &str) -> Option<SlotNumber> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
