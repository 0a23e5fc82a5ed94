use chrono::NaiveDateTime;
use hashbrown::{HashMap, HashSet};

use crate::{
    event::ParkingEvent,
    types::{PlateState, SlotNumber},
};

/// Latest event per plate, derived from a full event sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Occupancy {
    latest: HashMap<String, ParkingEvent>,
}

/// Derives the latest event per plate from `events` in append order.
///
/// The maximum timestamp wins; on equal timestamps the later-appended event
/// wins. Malformed timestamps sort before everything else.
pub fn resolve(events: &[ParkingEvent]) -> Occupancy {
    let mut best: HashMap<String, (NaiveDateTime, &ParkingEvent)> = HashMap::new();

    for event in events {
        let ts = event.recorded_at.sort_key();
        best.entry(normalize_plate(&event.plate))
            .and_modify(|current| {
                if ts >= current.0 {
                    *current = (ts, event);
                }
            })
            .or_insert((ts, event));
    }

    Occupancy {
        latest: best
            .into_iter()
            .map(|(plate, (_, event))| (plate, event.clone()))
            .collect(),
    }
}

/// Slots held by plates whose latest event is `IN` with a numeric slot.
pub fn occupied_slots(occupancy: &Occupancy) -> HashSet<SlotNumber> {
    occupancy
        .latest
        .values()
        .filter(|event| event.is_in())
        .filter_map(ParkingEvent::slot_number)
        .collect()
}

/// Trims and uppercases user or stored plate text.
pub fn normalize_plate(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

impl Occupancy {
    /// Latest event for `plate`, matched case-insensitively.
    pub fn latest(&self, plate: &str) -> Option<&ParkingEvent> {
        self.latest.get(&normalize_plate(plate))
    }

    /// Derived state of `plate`.
    pub fn state_of(&self, plate: &str) -> PlateState {
        match self.latest(plate) {
            Some(event) if event.is_in() => PlateState::Inside,
            _ => PlateState::Outside,
        }
    }

    /// True when the latest event of `plate` is `IN`.
    pub fn is_inside(&self, plate: &str) -> bool {
        self.state_of(plate) == PlateState::Inside
    }

    /// Number of plates currently inside.
    pub fn inside_count(&self) -> usize {
        self.latest.values().filter(|event| event.is_in()).count()
    }

    /// Latest events ordered by normalized plate.
    pub fn sorted_by_plate(&self) -> Vec<&ParkingEvent> {
        let mut rows: Vec<(&String, &ParkingEvent)> = self.latest.iter().collect();
        rows.sort_by(|a, b| a.0.cmp(b.0));
        rows.into_iter().map(|(_, event)| event).collect()
    }
}
