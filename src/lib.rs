//! Single-site vehicle parking ledger over an append-only event log.
//!
//! Current occupancy is never stored: every operation reads the whole log and
//! derives the latest event per plate.
//!
//! # Examples
//!
//! In-memory usage with [`core::ledger::ParkingLedger`]:
//! ```
//! use parkledger::{
//!     core::{ledger::ParkingLedger, rules::LedgerError},
//!     persist::memory::MemoryEventStore,
//!     types::PlateState,
//! };
//!
//! let mut ledger = ParkingLedger::new(Box::new(MemoryEventStore::new()), 20);
//! ledger.record_entry("abc-1", "5").expect("entry");
//! assert_eq!(ledger.state_of("ABC-1").expect("state"), PlateState::Inside);
//!
//! let err = ledger.record_entry("XYZ-9", "5").unwrap_err();
//! assert!(matches!(err, LedgerError::SlotOccupied(5)));
//! ```
//!
//! File-backed usage driven by configuration:
//! ```no_run
//! use parkledger::config::LedgerConfig;
//!
//! let config = LedgerConfig::load(None).expect("config");
//! let mut ledger = config.open_ledger().expect("open log");
//! ledger.record_entry("KA-01", "3").expect("entry");
//! let report = ledger.report_for_today().expect("report");
//! println!("{} of {} slots free", report.slots_left, report.capacity);
//! ```
#![deny(missing_docs)]

/// Role gate collaborator and credential table.
pub mod auth;
/// Interactive attendant/supervisor menus.
pub mod cli;
/// Time sources for new events.
pub mod clock;
/// Configuration loading.
pub mod config;
/// Occupancy resolver, validation rules and ledger.
pub mod core;
/// Parking event record and line format.
pub mod event;
/// Event store abstraction and backends.
pub mod persist;
/// Shared primitive types and enums.
pub mod types;
