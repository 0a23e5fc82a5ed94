use std::io::{self, Write};

use crate::{
    core::ledger::{DailyReport, SlotStatus},
    event::ParkingEvent,
};

pub fn slot_table(out: &mut impl Write, slots: &[SlotStatus]) -> io::Result<()> {
    writeln!(out, "\nSlot Status:")?;
    for s in slots {
        let label = if s.occupied { "OCCUPIED" } else { "AVAILABLE" };
        writeln!(out, "Slot {}: {label}", s.slot)?;
    }
    Ok(())
}

pub fn latest_list(out: &mut impl Write, latest: &[ParkingEvent]) -> io::Result<()> {
    writeln!(out, "\nLatest per plate:")?;
    if latest.is_empty() {
        writeln!(out, "(no vehicles recorded)")?;
    }
    for e in latest {
        writeln!(
            out,
            "{:10} {:10} {:4} slot={}",
            e.plate, e.recorded_at.date, e.status.as_str(), e.slot
        )?;
    }
    Ok(())
}

pub fn daily_report(out: &mut impl Write, report: &DailyReport) -> io::Result<()> {
    writeln!(out, "\nReport for {}", report.day.format("%Y-%m-%d"))?;
    writeln!(out, "Capacity: {}", report.capacity)?;
    writeln!(out, "Cars inside: {}", report.inside)?;
    writeln!(out, "Slots left: {}", report.slots_left)?;
    writeln!(out, "Entries today:")?;
    for e in &report.events {
        writeln!(out, "{} {} {} slot={}", e.recorded_at.iso, e.plate, e.status, e.slot)?;
    }
    Ok(())
}
