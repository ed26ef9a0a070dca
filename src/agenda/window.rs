use chrono::{DateTime, Duration, TimeZone, Utc};

pub const WINDOW_HOURS: i64 = 48;
pub const MAX_RESULTS: u32 = 10;

#[cfg_attr(test, mockall::automock)]
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct RealClock;

impl Clock for RealClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The `[since, until)` range events are fetched for.
#[derive(Debug, Clone)]
pub struct EventWindow<TZ: TimeZone> {
    pub since: DateTime<TZ>,
    pub until: DateTime<TZ>,
}

impl<TZ: TimeZone> EventWindow<TZ> {
    pub fn from_clock<C: Clock>(clock: &C, tz: &TZ) -> Self {
        let since = clock.now().with_timezone(tz);
        let until = since.clone() + Duration::hours(WINDOW_HOURS);

        Self { since, until }
    }

    pub fn since_rfc3339(&self) -> String {
        self.since.to_utc().to_rfc3339()
    }

    pub fn until_rfc3339(&self) -> String {
        self.until.to_utc().to_rfc3339()
    }
}
