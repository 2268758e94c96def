use chrono::{Local, NaiveDateTime};

/// Current local wall-clock time (naive, as written to the order book)
pub fn now_local() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Source of "now" for everything time-dependent in the order model.
///
/// Production code uses [`SystemClock`]; tests pin time with [`FixedClock`]
/// so classification and schedule checks are deterministic.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        now_local()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
