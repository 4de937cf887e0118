//! Calendar source for the once-per-day gate.

use chrono::{NaiveDate, Utc};

/// Supplies "today" as a UTC calendar date.
///
/// The run ledger compares stored dates against this, so tests inject a
/// fixed clock to cross day boundaries without waiting for them.
pub trait Clock: Send + Sync {
    /// Today's date in UTC.
    fn today(&self) -> NaiveDate;
}

/// Wall-clock [`Clock`] backed by [`chrono::Utc`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}
