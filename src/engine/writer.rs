use std::time::{Duration, Instant};

/// Rate limiter for write-through to the session store.
///
/// A write requested after `min_interval` has passed goes out immediately.
/// Earlier requests are coalesced into one deferred write that becomes due
/// once the interval has elapsed.
#[derive(Debug, Clone)]
pub struct DebouncedWriter {
    min_interval: Duration,
    last_write: Option<Instant>,
    pending: bool,
}

impl DebouncedWriter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_write: None,
            pending: false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Record a write request. Returns `true` if the caller should write now.
    pub fn request(&mut self, now: Instant) -> bool {
        if self.window_open(now) {
            self.mark_written(now);
            true
        } else {
            self.pending = true;
            false
        }
    }

    /// Returns `true` if a deferred write has become due.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.pending && self.window_open(now) {
            self.mark_written(now);
            true
        } else {
            false
        }
    }

    /// Returns `true` if a deferred write exists, regardless of the interval.
    pub fn take_pending(&mut self, now: Instant) -> bool {
        if self.pending {
            self.mark_written(now);
            true
        } else {
            false
        }
    }

    /// Time left until the deferred write is due, if one is waiting.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        if !self.pending {
            return None;
        }
        let elapsed = self
            .last_write
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(self.min_interval);
        Some(self.min_interval.saturating_sub(elapsed))
    }

    fn window_open(&self, now: Instant) -> bool {
        match self.last_write {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
        }
    }

    fn mark_written(&mut self, now: Instant) {
        self.last_write = Some(now);
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn first_request_writes_immediately() {
        let mut writer = DebouncedWriter::new(SECOND);
        assert!(writer.request(Instant::now()));
        assert!(!writer.is_pending());
    }

    #[test]
    fn burst_is_coalesced_into_one_deferred_write() {
        let t0 = Instant::now();
        let mut writer = DebouncedWriter::new(SECOND);
        assert!(writer.request(t0));
        assert!(!writer.request(t0 + Duration::from_millis(100)));
        assert!(!writer.request(t0 + Duration::from_millis(200)));
        assert!(writer.is_pending());

        assert!(!writer.poll(t0 + Duration::from_millis(900)));
        assert!(writer.poll(t0 + SECOND));
        assert!(!writer.poll(t0 + Duration::from_millis(1500)));
    }

    #[test]
    fn time_until_due_counts_down() {
        let t0 = Instant::now();
        let mut writer = DebouncedWriter::new(SECOND);
        assert_eq!(writer.time_until_due(t0), None);
        writer.request(t0);
        writer.request(t0 + Duration::from_millis(400));
        assert_eq!(
            writer.time_until_due(t0 + Duration::from_millis(400)),
            Some(Duration::from_millis(600))
        );
        assert_eq!(writer.time_until_due(t0 + SECOND * 2), Some(Duration::ZERO));
    }

    #[test]
    fn take_pending_ignores_interval() {
        let t0 = Instant::now();
        let mut writer = DebouncedWriter::new(SECOND);
        writer.request(t0);
        writer.request(t0);
        assert!(writer.take_pending(t0));
        assert!(!writer.take_pending(t0));
    }

    #[test]
    fn instances_are_independent() {
        let t0 = Instant::now();
        let mut a = DebouncedWriter::new(SECOND);
        let mut b = DebouncedWriter::new(SECOND);
        assert!(a.request(t0));
        assert!(b.request(t0));
    }
}
