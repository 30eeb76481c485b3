use chrono::{Local, NaiveDate};

/// Source of "today" for date defaults, summaries and recurrence.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Real-time clock backed by the local system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to one date, for deterministic runs.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
