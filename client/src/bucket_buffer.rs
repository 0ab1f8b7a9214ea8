use std::mem;

use scenelink_shared::{ObjectId, ParamUpdate, SceneId, TimeBucket};

/// One buffered, not-yet-visible wire event.
#[derive(Clone, Debug, PartialEq)]
pub enum BufferedEvent {
    /// Packed value deltas from one frame, applied in arrival order.
    ParameterUpdate(Vec<ParamUpdate>),
    /// A delayed unlock, held back so in-flight updates for the object
    /// clear before the unlock becomes visible.
    Unlock {
        scene_id: SceneId,
        object_id: ObjectId,
    },
}

/// The time-indexed ring of event lists, one slot per bucket.
///
/// The receiver thread appends, the drain tick takes a whole slot; the
/// owner wraps the ring in the single coarse mutex both sides share.
/// Draining empties the slot, so each bucket is consumed exactly once per
/// cycle.
pub struct BucketBuffer {
    buckets: Vec<Vec<BufferedEvent>>,
}

impl BucketBuffer {
    pub fn new(timesteps: u16) -> Self {
        let timesteps = timesteps.clamp(1, 256);
        Self {
            buckets: vec![Vec::new(); usize::from(timesteps)],
        }
    }

    pub fn timesteps(&self) -> u16 {
        self.buckets.len() as u16
    }

    /// Appends into the slot for `bucket`, reduced modulo `timesteps`.
    pub fn push(&mut self, bucket: TimeBucket, event: BufferedEvent) {
        let slot = usize::from(bucket) % self.buckets.len();
        self.buckets[slot].push(event);
    }

    /// Takes everything buffered for `bucket`, leaving the slot empty.
    pub fn drain(&mut self, bucket: TimeBucket) -> Vec<BufferedEvent> {
        let slot = usize::from(bucket) % self.buckets.len();
        mem::take(&mut self.buckets[slot])
    }

    pub fn len_at(&self, bucket: TimeBucket) -> usize {
        let slot = usize::from(bucket) % self.buckets.len();
        self.buckets[slot].len()
    }

    /// Total events buffered across every slot.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        for slot in &mut self.buckets {
            slot.clear();
        }
    }
}
