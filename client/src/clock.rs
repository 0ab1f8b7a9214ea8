use std::sync::atomic::{AtomicU8, Ordering};

use scenelink_shared::TimeBucket;

/// The process-wide synchronized time byte.
///
/// The host tick advances it once per frame interval; an incoming SYNC
/// message overwrites it outright. Everything the protocol does is keyed by
/// this byte taken modulo `timesteps`.
pub struct SyncClock {
    bucket: AtomicU8,
    timesteps: u16,
}

impl SyncClock {
    pub fn new(timesteps: u16) -> Self {
        Self {
            bucket: AtomicU8::new(0),
            timesteps: timesteps.clamp(1, 256),
        }
    }

    pub fn timesteps(&self) -> u16 {
        self.timesteps
    }

    pub fn current(&self) -> TimeBucket {
        self.bucket.load(Ordering::Acquire)
    }

    /// Steps to the next bucket, wrapping at `timesteps`.
    pub fn advance(&self) {
        let next = (u16::from(self.current()) + 1) % self.timesteps;
        self.bucket.store(next as TimeBucket, Ordering::Release);
    }

    /// Clock alignment: adopt a sender's announced time byte.
    pub fn set(&self, time: TimeBucket) {
        let reduced = u16::from(time) % self.timesteps;
        self.bucket.store(reduced as TimeBucket, Ordering::Release);
    }

    /// The bucket `delta` slots away from `base`, wrapping in either
    /// direction. Used for the delayed-unlock insert (positive delta) and
    /// the drain cursor (negative delta).
    pub fn offset(&self, base: TimeBucket, delta: i16) -> TimeBucket {
        let timesteps = i32::from(self.timesteps);
        let shifted = (i32::from(base) + i32::from(delta)) % timesteps;
        ((shifted + timesteps) % timesteps) as TimeBucket
    }
}
