use chrono::{DateTime, Utc};
use std::time::Instant;

/// Time source for the engine: a monotonic instant for rate limiting and a
/// wall-clock timestamp for `lastUpdated`.
pub trait Clock {
    fn now(&self) -> Instant;

    fn utc_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
