use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use nowcast_core::Clock;

/// Wall clock in a fixed time zone
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Clock in the zone the forecast query asks the provider to use
    pub fn provider() -> Self {
        Self::new(chrono_tz::Europe::Moscow)
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}
