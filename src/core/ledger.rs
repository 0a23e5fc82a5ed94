use chrono::NaiveDate;

use crate::{
    clock::{Clock, SystemClock},
    event::ParkingEvent,
    persist::EventStore,
    types::{PlateState, SlotNumber, Status},
};

use super::{
    resolver::{Occupancy, occupied_slots, resolve},
    rules::{self, LedgerResult},
};

/// Occupancy of a single slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotStatus {
    /// Slot number.
    pub slot: SlotNumber,
    /// True when a plate inside holds this slot.
    pub occupied: bool,
}

/// Supervisor summary for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyReport {
    /// Reported day.
    pub day: NaiveDate,
    /// Configured slot count.
    pub capacity: u32,
    /// Plates currently inside.
    pub inside: usize,
    /// Free slots, never negative.
    pub slots_left: usize,
    /// Events stamped with `day`, in chronological order.
    pub events: Vec<ParkingEvent>,
}

/// Entry/exit state machine over an append-only [`EventStore`].
///
/// Every operation reads the full log and re-derives [`Occupancy`]; appends
/// are the last step of an action, so a rejected request writes nothing.
pub struct ParkingLedger {
    store: Box<dyn EventStore>,
    clock: Box<dyn Clock>,
    capacity: u32,
}

impl ParkingLedger {
    /// Ledger stamping events with the local wall clock.
    pub fn new(store: Box<dyn EventStore>, capacity: u32) -> Self {
        Self::with_clock(store, capacity, Box::new(SystemClock))
    }

    /// Ledger with an explicit time source.
    pub fn with_clock(store: Box<dyn EventStore>, capacity: u32, clock: Box<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            capacity,
        }
    }

    /// Configured slot count.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Raw event sequence in append order.
    pub fn events(&self) -> LedgerResult<Vec<ParkingEvent>> {
        Ok(self.store.read_all()?)
    }

    /// Freshly derived occupancy.
    pub fn occupancy(&self) -> LedgerResult<Occupancy> {
        Ok(resolve(&self.events()?))
    }

    /// Derived state of one plate.
    pub fn state_of(&self, plate: &str) -> LedgerResult<PlateState> {
        Ok(self.occupancy()?.state_of(plate))
    }

    /// Fails with `CapacityExceeded` when no slot is free.
    pub fn ensure_vacancy(&self) -> LedgerResult<()> {
        rules::check_capacity(&self.occupancy()?, self.capacity)
    }

    /// Runs the entry checks that precede slot selection and returns the
    /// normalized plate.
    pub fn admissible_plate(&self, plate_raw: &str) -> LedgerResult<String> {
        let occupancy = self.occupancy()?;
        rules::check_capacity(&occupancy, self.capacity)?;
        let plate = rules::validate_plate(plate_raw)?;
        rules::check_not_inside(&occupancy, &plate)?;
        Ok(plate)
    }

    /// Validates and appends an `IN` event.
    pub fn record_entry(&mut self, plate_raw: &str, slot_raw: &str) -> LedgerResult<ParkingEvent> {
        let occupancy = self.occupancy()?;
        let (plate, slot) = rules::check_entry(&occupancy, self.capacity, plate_raw, slot_raw)
            .inspect_err(|err| tracing::debug!(plate = plate_raw, slot = slot_raw, %err, "entry rejected"))?;

        let event = ParkingEvent::new(plate, self.clock.now(), Status::In, slot);
        self.store.append(&event)?;
        tracing::info!(plate = %event.plate, slot, "entry recorded");
        Ok(event)
    }

    /// Validates and appends an `OUT` event.
    pub fn record_exit(&mut self, plate_raw: &str, slot_raw: &str) -> LedgerResult<ParkingEvent> {
        let occupancy = self.occupancy()?;
        let (plate, slot) = rules::check_exit(&occupancy, plate_raw, slot_raw)
            .inspect_err(|err| tracing::debug!(plate = plate_raw, slot = slot_raw, %err, "exit rejected"))?;

        let event = ParkingEvent::new(plate, self.clock.now(), Status::Out, slot);
        self.store.append(&event)?;
        tracing::info!(plate = %event.plate, slot, "exit recorded");
        Ok(event)
    }

    /// Every slot `1..=capacity` with its occupancy.
    pub fn slot_availability(&self) -> LedgerResult<Vec<SlotStatus>> {
        let occupied = occupied_slots(&self.occupancy()?);
        Ok((1..=self.capacity)
            .map(|slot| SlotStatus {
                slot,
                occupied: occupied.contains(&slot),
            })
            .collect())
    }

    /// Latest event per plate, sorted by plate.
    pub fn latest_by_plate(&self) -> LedgerResult<Vec<ParkingEvent>> {
        Ok(self
            .occupancy()?
            .sorted_by_plate()
            .into_iter()
            .cloned()
            .collect())
    }

    /// Summary for `day` from a single read of the log.
    pub fn daily_report(&self, day: NaiveDate) -> LedgerResult<DailyReport> {
        let events = self.events()?;
        let inside = resolve(&events).inside_count();
        let day_text = day.format("%Y-%m-%d").to_string();

        let mut todays: Vec<ParkingEvent> = events
            .into_iter()
            .filter(|event| event.recorded_at.date == day_text)
            .collect();
        todays.sort_by_key(|event| event.recorded_at.sort_key());

        Ok(DailyReport {
            day,
            capacity: self.capacity,
            inside,
            slots_left: (self.capacity as usize).saturating_sub(inside),
            events: todays,
        })
    }

    /// [`ParkingLedger::daily_report`] for the clock's current date.
    pub fn report_for_today(&self) -> LedgerResult<DailyReport> {
        self.daily_report(self.clock.now().date())
    }
}
