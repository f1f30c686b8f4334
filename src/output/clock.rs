//! Wall-clock source for timestamps.

use chrono::{Local, NaiveDateTime};

/// Source of the current local time.
pub trait Clock {
    /// Current local time.
    fn now(&self) -> NaiveDateTime;
}

/// The system's local clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
