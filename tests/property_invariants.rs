use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use parkledger::{
    clock::SteppingClock,
    core::{
        ledger::ParkingLedger,
        resolver::{occupied_slots, resolve},
    },
    persist::memory::MemoryEventStore,
    types::PlateState,
};

const PLATES: [&str; 6] = ["AA", "bb-1", "C9", "DD-42", "E", "ee_2"];

#[derive(Debug, Clone)]
enum Action {
    Enter { plate: usize, slot: u32 },
    Exit { plate: usize, slot: u32 },
}

fn action_strategy() -> impl Strategy<Value = Action> {
    prop_oneof![
        (0..PLATES.len(), 0u32..8).prop_map(|(plate, slot)| Action::Enter { plate, slot }),
        (0..PLATES.len(), 0u32..8).prop_map(|(plate, slot)| Action::Exit { plate, slot }),
    ]
}

fn plate_valid(raw: &str) -> bool {
    !raw.contains('_')
}

proptest! {
    #[test]
    fn ledger_matches_slot_model_and_never_overbooks(
        capacity in 1u32..6,
        step_secs in 0i64..2,
        actions in prop::collection::vec(action_strategy(), 1..120),
    ) {
        let start = NaiveDate::from_ymd_opt(2025, 5, 5)
            .and_then(|d| d.and_hms_opt(6, 0, 0))
            .expect("valid datetime");
        // A zero step stamps every event identically; append order must decide.
        let mut ledger = ParkingLedger::with_clock(
            Box::new(MemoryEventStore::new()),
            capacity,
            Box::new(SteppingClock::new(start, Duration::seconds(step_secs))),
        );
        let mut model: BTreeMap<String, u32> = BTreeMap::new();
        let mut transitions: BTreeMap<String, Vec<PlateState>> = BTreeMap::new();

        for action in actions {
            match action {
                Action::Enter { plate, slot } => {
                    let raw = PLATES[plate];
                    let key = raw.to_ascii_uppercase();
                    let expect_ok = (model.len() as u32) < capacity
                        && plate_valid(raw)
                        && !model.contains_key(&key)
                        && (1..=capacity).contains(&slot)
                        && !model.values().any(|s| *s == slot);

                    let result = ledger.record_entry(raw, &slot.to_string());
                    prop_assert_eq!(result.is_ok(), expect_ok, "enter {} {}: {:?}", raw, slot, result);
                    if result.is_ok() {
                        model.insert(key.clone(), slot);
                        transitions.entry(key).or_default().push(PlateState::Inside);
                    }
                }
                Action::Exit { plate, slot } => {
                    let raw = PLATES[plate];
                    let key = raw.to_ascii_uppercase();
                    let expect_ok = plate_valid(raw) && model.get(&key) == Some(&slot);

                    let result = ledger.record_exit(raw, &slot.to_string());
                    prop_assert_eq!(result.is_ok(), expect_ok, "exit {} {}: {:?}", raw, slot, result);
                    if result.is_ok() {
                        model.remove(&key);
                        transitions.entry(key).or_default().push(PlateState::Outside);
                    }
                }
            }

            let occupancy = ledger.occupancy().expect("occupancy");
            let occupied = occupied_slots(&occupancy);
            prop_assert!(occupied.len() <= capacity as usize);
            prop_assert_eq!(occupied.len(), occupancy.inside_count());
            prop_assert_eq!(occupancy.inside_count(), model.len());
        }

        for (plate, states) in &transitions {
            for (i, state) in states.iter().enumerate() {
                let expected = if i % 2 == 0 { PlateState::Inside } else { PlateState::Outside };
                prop_assert_eq!(*state, expected, "plate {} transition {}", plate, i);
            }
            let current = ledger.state_of(plate).expect("state");
            let expected = if model.contains_key(plate) { PlateState::Inside } else { PlateState::Outside };
            prop_assert_eq!(current, expected);
        }

        let events = ledger.events().expect("events");
        prop_assert_eq!(resolve(&events), resolve(&events));
    }
}
