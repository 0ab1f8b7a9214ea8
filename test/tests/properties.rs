//! Property coverage for the pieces with wraparound arithmetic and
//! self-describing wire walks.

use proptest::prelude::*;

use scenelink_client::{BucketBuffer, BufferedEvent, SyncClock};
use scenelink_shared::{Message, MessagePayload, ParamAddress, ParamUpdate};

proptest! {
    // inserting at any bucket byte and draining at the same byte consumes
    // the event for every ring size, including the degenerate single-slot
    // ring, without ever indexing out of range
    #[test]
    fn bucket_insert_and_drain_agree_for_any_ring_size(
        timesteps in 1u16..=256,
        bucket in any::<u8>(),
    ) {
        let mut buffer = BucketBuffer::new(timesteps);
        buffer.push(bucket, BufferedEvent::Unlock { scene_id: 1, object_id: 1 });
        prop_assert_eq!(buffer.drain(bucket).len(), 1);
        prop_assert!(buffer.is_empty());
    }

    // draining one full cycle behind an insert lands on the same slot
    #[test]
    fn full_cycle_offset_is_identity(
        timesteps in 1u16..=256,
        bucket in any::<u8>(),
    ) {
        let clock = SyncClock::new(timesteps);
        clock.set(bucket);
        let current = clock.current();
        let full_cycle = timesteps as i16;
        prop_assert_eq!(clock.offset(current, -full_cycle), current);
    }

    // stepping forward then backward by the same delta is a no-op
    #[test]
    fn offset_round_trips(
        timesteps in 1u16..=256,
        bucket in any::<u8>(),
        delta in -2000i16..=2000,
    ) {
        let clock = SyncClock::new(timesteps);
        clock.set(bucket);
        let current = clock.current();
        prop_assert_eq!(clock.offset(clock.offset(current, delta), -delta), current);
    }

    // any packed update list survives framing, whatever the payload sizes
    #[test]
    fn packed_update_frames_round_trip(
        sender_id in any::<u8>(),
        time_bucket in any::<u8>(),
        entries in prop::collection::vec(
            (any::<u8>(), any::<i16>(), any::<i16>(), prop::collection::vec(any::<u8>(), 0..64)),
            0..8,
        ),
    ) {
        let updates = entries
            .into_iter()
            .map(|(scene_id, object_id, param_id, payload)| {
                ParamUpdate::new(ParamAddress::new(scene_id, object_id, param_id), payload)
            })
            .collect::<Vec<_>>();
        let message = Message::new(
            sender_id,
            time_bucket,
            MessagePayload::ParameterUpdate(updates),
        );
        let frame = message.to_bytes().unwrap();
        prop_assert_eq!(Message::from_bytes(&frame).unwrap(), message);
    }
}
