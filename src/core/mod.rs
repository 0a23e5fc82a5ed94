//! Occupancy derivation, validation rules and the ledger state machine.

/// Entry/exit state machine and supervisor read models.
pub mod ledger;
/// Latest-event-per-plate derivation.
pub mod resolver;
/// Plate/slot validation and the ledger error taxonomy.
pub mod rules;
