//! Time sources for stamping events.

use std::sync::Mutex;

use chrono::{Duration, Local, NaiveDateTime};

/// Supplies the timestamp recorded on new events.
pub trait Clock: Send {
    /// Current local time.
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Deterministic clock that advances by a fixed step on every read.
#[derive(Debug)]
pub struct SteppingClock {
    next: Mutex<NaiveDateTime>,
    step: Duration,
}

impl SteppingClock {
    /// Starts at `start`, advancing `step` after each [`Clock::now`] call.
    pub fn new(start: NaiveDateTime, step: Duration) -> Self {
        Self {
            next: Mutex::new(start),
            step,
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> NaiveDateTime {
        let mut next = self.next.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let now = *next;
        *next = now + self.step;
        now
    }
}
