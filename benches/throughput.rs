use chrono::{Duration, NaiveDate};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use parkledger::{
    clock::SteppingClock,
    core::{
        ledger::ParkingLedger,
        resolver::{occupied_slots, resolve},
    },
    event::ParkingEvent,
    persist::memory::MemoryEventStore,
    types::Status,
};

fn synthetic_log(n: usize, plates: usize) -> Vec<ParkingEvent> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .expect("valid datetime");
    (0..n)
        .map(|i| {
            let plate = format!("P-{}", i % plates);
            let status = if (i / plates) % 2 == 0 { Status::In } else { Status::Out };
            let slot = (i % plates) as u32 + 1;
            ParkingEvent::new(plate, start + Duration::seconds(i as i64), status, slot)
        })
        .collect()
}

fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");
    for n in [100usize, 10_000usize, 100_000usize] {
        let events = synthetic_log(n, 200);
        group.bench_with_input(BenchmarkId::from_parameter(n), &events, |b, events| {
            b.iter(|| occupied_slots(&resolve(events)).len());
        });
    }
    group.finish();
}

fn bench_entry_exit_cycle(c: &mut Criterion) {
    c.bench_function("ledger_entry_exit_1k", |b| {
        b.iter(|| {
            let start = NaiveDate::from_ymd_opt(2025, 1, 1)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .expect("valid datetime");
            let mut ledger = ParkingLedger::with_clock(
                Box::new(MemoryEventStore::new()),
                50,
                Box::new(SteppingClock::new(start, Duration::seconds(1))),
            );
            for i in 0..500u32 {
                let plate = format!("B-{i}");
                let slot = (i % 50 + 1).to_string();
                ledger.record_entry(&plate, &slot).expect("entry");
                ledger.record_exit(&plate, &slot).expect("exit");
            }
        });
    });
}

criterion_group!(benches, bench_resolve, bench_entry_exit_cycle);
criterion_main!(benches);
