use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::Cell;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to a settable instant, for deterministic tests and replays.
#[derive(Debug)]
pub struct FixedClock {
    now: Cell<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> FixedClock {
        FixedClock {
            now: Cell::new(now),
        }
    }

    pub fn at_millis(millis: i64) -> FixedClock {
        FixedClock::new(Utc.timestamp_millis_opt(millis).single().unwrap_or_else(Utc::now))
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.get()
    }
}

impl<'a, C: Clock + ?Sized> Clock for &'a C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

pub type RecordId = u64;

/// Hands out ids derived from the clock's millisecond reading. Two
/// allocations in the same millisecond still get distinct, increasing ids.
#[derive(Debug, Default)]
pub struct IdSource {
    last: RecordId,
}

impl IdSource {
    pub fn new() -> IdSource {
        IdSource { last: 0 }
    }

    /// Ensures every future id is strictly greater than `floor`.
    pub fn reserve(&mut self, floor: RecordId) {
        if floor > self.last {
            self.last = floor;
        }
    }

    pub fn next(&mut self, now: DateTime<Utc>) -> RecordId {
        let millis = now.timestamp_millis().max(0) as RecordId;
        let id = if millis > self.last {
            millis
        } else {
            self.last + 1
        };
        self.last = id;
        id
    }
}
