/// Synchronization timing parameters shared by the sender, the receiver,
/// and the clock.
///
/// The drain and unlock delays started life as empirically-tuned constants;
/// they are plain fields here so a host can adjust them without touching
/// the protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SyncConfig {
    pub frame_rate: u8,
    /// How many buckets behind the live clock the drain tick consumes.
    pub drain_delay: u8,
    /// How many buckets an incoming unlock is held back in the ring buffer,
    /// so in-flight updates for the object clear before it becomes visible.
    pub unlock_delay: u8,
    /// Undo/redo history cap, oldest-first eviction.
    pub max_history: usize,
    timesteps: u16,
}

impl SyncConfig {
    pub fn new(frame_rate: u8) -> Self {
        let frame_rate = frame_rate.max(1);
        // Largest multiple of the frame rate that fits in the one-byte time
        // bucket, so the wrap of the bucket byte lands on a cycle boundary.
        let timesteps = (256 / u16::from(frame_rate)) * u16::from(frame_rate);
        Self {
            frame_rate,
            drain_delay: frame_rate / 10,
            unlock_delay: frame_rate / 4,
            max_history: 100,
            timesteps,
        }
    }

    /// Number of discrete time slots per synchronization cycle.
    pub fn timesteps(&self) -> u16 {
        self.timesteps
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new(60)
    }
}
