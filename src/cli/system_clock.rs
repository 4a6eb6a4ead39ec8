use chrono::{DateTime, Local, NaiveDate, Utc};

use fintrack_core::Clock;

/// Wall clock; `today` follows the local calendar so new entries default to
/// the date the user sees.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}
