// src/sensor/scheduler.rs

/// Wraparound-safe interval timer over a 32-bit millisecond counter.
///
/// When the counter is seen below the reference (it wrapped, or the clock
/// glitched) the reference restarts at the current time. That costs one
/// shortened interval and never yields a huge bogus elapsed value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Scheduler {
    interval_ms: u32,
    reference_ms: u32,
}

impl Scheduler {
    /// Starts timing from `now_ms`.
    pub const fn new(interval_ms: u32, now_ms: u32) -> Self {
        Scheduler {
            interval_ms,
            reference_ms: now_ms,
        }
    }

    pub const fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub const fn reference_ms(&self) -> u32 {
        self.reference_ms
    }

    /// Time since the reference, or `None` after a wrap (the reference is
    /// moved to `now_ms` in that case).
    pub fn elapsed(&mut self, now_ms: u32) -> Option<u32> {
        if now_ms >= self.reference_ms {
            Some(now_ms - self.reference_ms)
        } else {
            debug!("clock went from {} to {}, restarting interval", self.reference_ms, now_ms);
            self.reference_ms = now_ms;
            None
        }
    }

    /// Whether a tick is due at `now_ms`. A due tick moves the reference to `now_ms`.
    pub fn poll(&mut self, now_ms: u32) -> bool {
        match self.elapsed(now_ms) {
            Some(elapsed) if elapsed >= self.interval_ms => {
                self.reference_ms = now_ms;
                true
            }
            _ => false,
        }
    }

    /// Restarts the interval at `now_ms`.
    pub fn reset(&mut self, now_ms: u32) {
        self.reference_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_due_before_interval() {
        let mut scheduler = Scheduler::new(10_000, 1_000);
        assert!(!scheduler.poll(1_000));
        assert!(!scheduler.poll(10_999));
        assert_eq!(scheduler.reference_ms(), 1_000);
    }

    #[test]
    fn test_due_at_interval_and_rearms() {
        let mut scheduler = Scheduler::new(10_000, 1_000);
        assert!(scheduler.poll(11_000));
        assert_eq!(scheduler.reference_ms(), 11_000);
        assert!(!scheduler.poll(11_001));
        assert!(scheduler.poll(25_000));
    }

    #[test]
    fn test_wraparound_resets_reference() {
        let mut scheduler = Scheduler::new(10_000, u32::MAX - 10);
        assert_eq!(scheduler.elapsed(5), None);
        assert_eq!(scheduler.reference_ms(), 5);

        let mut scheduler = Scheduler::new(10_000, u32::MAX - 10);
        assert!(!scheduler.poll(5));
        assert_eq!(scheduler.reference_ms(), 5);
        assert!(!scheduler.poll(10_004));
        assert!(scheduler.poll(10_005));
    }

    #[test]
    fn test_reset() {
        let mut scheduler = Scheduler::new(2_000, 0);
        scheduler.reset(1_500);
        assert_eq!(scheduler.elapsed(2_000), Some(500));
        assert_eq!(scheduler.interval_ms(), 2_000);
    }
}
