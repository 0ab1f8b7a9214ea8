use std::time::{Duration, Instant};

/// A coarse interval timer: `ringing` reports whether the interval has
/// elapsed since the last `reset`. Used for ping cadence and other
/// low-frequency housekeeping.
pub struct Timer {
    duration: Duration,
    last: Instant,
}

impl Timer {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            last: Instant::now(),
        }
    }

    pub fn ringing(&self) -> bool {
        self.last.elapsed() >= self.duration
    }

    pub fn reset(&mut self) {
        self.last = Instant::now();
    }
}
