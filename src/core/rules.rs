use hashbrown::HashSet;

use crate::{
    persist::StorageError,
    types::{MAX_PLATE_LEN, SlotNumber},
};

use super::resolver::{Occupancy, normalize_plate};

/// Rejection of an entry/exit request, or a storage failure underneath it.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Plate is empty, longer than ten characters, or has characters outside `A-Z0-9-`.
    #[error("invalid plate {0:?}: use 1-10 chars, letters/digits/-")]
    InvalidPlate(String),
    /// Slot text is not a plain decimal number.
    #[error("slot must be a number, got {0:?}")]
    InvalidSlotFormat(String),
    /// Slot number outside `1..=capacity`.
    #[error("slot {slot} out of range 1-{capacity}")]
    SlotOutOfRange {
        /// Requested slot.
        slot: SlotNumber,
        /// Configured slot count.
        capacity: u32,
    },
    /// Another plate currently holds the slot.
    #[error("slot {0} is already occupied")]
    SlotOccupied(SlotNumber),
    /// Exit slot differs from the slot recorded at entry.
    #[error("slot mismatch: {plate} is recorded in slot {recorded}")]
    SlotMismatch {
        /// Plate attempting to exit.
        plate: String,
        /// Slot text on the plate's latest entry.
        recorded: String,
    },
    /// Plate's latest event is already `IN`.
    #[error("{0} is already inside")]
    AlreadyInside(String),
    /// Plate has no events or its latest event is not `IN`.
    #[error("{0} is not currently inside")]
    NotInside(String),
    /// Every slot is taken.
    #[error("parking full: all {capacity} slots are taken")]
    CapacityExceeded {
        /// Configured slot count.
        capacity: u32,
    },
    /// The event store failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl LedgerError {
    /// True for rejections that leave the ledger untouched and can be retried
    /// with different input.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Storage(_))
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Normalizes `raw` and checks length and alphabet.
pub fn validate_plate(raw: &str) -> LedgerResult<String> {
    let plate = normalize_plate(raw);
    let len = plate.chars().count();
    let alphabet_ok = plate
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-');

    if (1..=MAX_PLATE_LEN).contains(&len) && alphabet_ok {
        Ok(plate)
    } else {
        Err(LedgerError::InvalidPlate(raw.trim().to_string()))
    }
}

/// Parses slot input made of plain digits.
///
/// Digit strings too long for [`SlotNumber`] saturate to its maximum, so they
/// fail the range or match check rather than the format check.
pub fn parse_slot_input(raw: &str) -> LedgerResult<SlotNumber> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LedgerError::InvalidSlotFormat(raw.to_string()));
    }
    Ok(raw.parse().unwrap_or(SlotNumber::MAX))
}

/// Fails when every slot is already taken.
pub fn check_capacity(occupancy: &Occupancy, capacity: u32) -> LedgerResult<()> {
    if occupancy.inside_count() >= capacity as usize {
        return Err(LedgerError::CapacityExceeded { capacity });
    }
    Ok(())
}

/// Fails when `plate` is already inside.
pub fn check_not_inside(occupancy: &Occupancy, plate: &str) -> LedgerResult<()> {
    if occupancy.is_inside(plate) {
        return Err(LedgerError::AlreadyInside(plate.to_string()));
    }
    Ok(())
}

/// Fails unless `slot` lies in `1..=capacity`.
pub fn check_slot_range(slot: SlotNumber, capacity: u32) -> LedgerResult<()> {
    if slot == 0 || slot > capacity {
        return Err(LedgerError::SlotOutOfRange { slot, capacity });
    }
    Ok(())
}

/// Fails when `slot` is in `occupied`.
pub fn check_slot_free(occupied: &HashSet<SlotNumber>, slot: SlotNumber) -> LedgerResult<()> {
    if occupied.contains(&slot) {
        return Err(LedgerError::SlotOccupied(slot));
    }
    Ok(())
}

/// Checks an entry request; returns the normalized plate and slot.
///
/// Order: capacity, plate format, double entry, slot format and range, slot
/// already taken.
pub fn check_entry(
    occupancy: &Occupancy,
    capacity: u32,
    plate_raw: &str,
    slot_raw: &str,
) -> LedgerResult<(String, SlotNumber)> {
    check_capacity(occupancy, capacity)?;
    let plate = validate_plate(plate_raw)?;
    check_not_inside(occupancy, &plate)?;
    let slot = parse_slot_input(slot_raw)?;
    check_slot_range(slot, capacity)?;
    check_slot_free(&super::resolver::occupied_slots(occupancy), slot)?;
    Ok((plate, slot))
}

/// Checks an exit request; returns the normalized plate and slot.
///
/// Order: plate format, slot format, plate inside, slot matches entry.
pub fn check_exit(
    occupancy: &Occupancy,
    plate_raw: &str,
    slot_raw: &str,
) -> LedgerResult<(String, SlotNumber)> {
    let plate = validate_plate(plate_raw)?;
    let slot = parse_slot_input(slot_raw)?;

    let latest = occupancy
        .latest(&plate)
        .filter(|event| event.is_in())
        .ok_or_else(|| LedgerError::NotInside(plate.clone()))?;

    if latest.slot_number() != Some(slot) {
        return Err(LedgerError::SlotMismatch {
            plate,
            recorded: latest.slot.clone(),
        });
    }
    Ok((plate, slot))
}
