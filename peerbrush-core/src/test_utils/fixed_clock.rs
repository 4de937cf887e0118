//! FixedClock: a settable calendar for crossing day boundaries in tests.

use crate::clock::Clock;
use chrono::{Days, NaiveDate};
use std::sync::Mutex;

/// A [`Clock`] that reports whatever date it was last set to.
pub struct FixedClock {
    today: Mutex<NaiveDate>,
}

impl FixedClock {
    /// Start at `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: Mutex::new(today),
        }
    }

    /// Start at a `YYYY-MM-DD` date.
    ///
    /// # Panics
    ///
    /// Panics if `date` is not a valid ISO date.
    pub fn on(date: &str) -> Self {
        Self::new(date.parse().expect("FixedClock::on takes YYYY-MM-DD"))
    }

    /// Jump to `today`.
    pub fn set(&self, today: NaiveDate) {
        *self.today.lock().unwrap() = today;
    }

    /// Move forward by `days` days.
    pub fn advance_days(&self, days: u64) {
        let mut today = self.today.lock().unwrap();
        *today = today
            .checked_add_days(Days::new(days))
            .expect("date out of range");
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        *self.today.lock().unwrap()
    }
}
