use std::sync::Arc;

use log::warn;

use scenelink_shared::{
    ClientId, Message, MessagePayload, ObjectId, ParamAddress, ParamUpdate, PublishSocket,
    SceneId, TransportError,
};

use crate::clock::SyncClock;

/// DATAHUB sub-type for join/leave announcements.
pub const DATAHUB_CONNECTION_STATUS: u8 = 0;

/// Encodes local, already-applied mutations into framed messages and
/// publishes them on the broadcast channel.
///
/// Control messages and value updates queue until `flush`, which runs once
/// per host tick; queued value updates coalesce into a single packed frame,
/// and queueing the same parameter twice in one tick keeps only the last
/// value. Publishing is fire-and-forget: no acknowledgment, no retry.
pub struct UpdateSender {
    sender_id: ClientId,
    clock: Arc<SyncClock>,
    publisher: Box<dyn PublishSocket>,
    pending_control: Vec<MessagePayload>,
    pending_updates: Vec<ParamUpdate>,
    pending_rpc: Vec<ParamUpdate>,
}

impl UpdateSender {
    pub fn new(
        sender_id: ClientId,
        clock: Arc<SyncClock>,
        mut publisher: Box<dyn PublishSocket>,
    ) -> Result<Self, TransportError> {
        publisher.connect()?;
        Ok(Self {
            sender_id,
            clock,
            publisher,
            pending_control: Vec::new(),
            pending_updates: Vec::new(),
            pending_rpc: Vec::new(),
        })
    }

    /// Queues one encoded parameter value for the next flush.
    pub fn queue_encoded(&mut self, address: ParamAddress, payload: Vec<u8>, is_rpc: bool) {
        if payload.len() > usize::from(u8::MAX) {
            warn!(
                "parameter {address:?} encodes to {} bytes, over the wire limit; dropped",
                payload.len()
            );
            return;
        }
        let pending = if is_rpc {
            &mut self.pending_rpc
        } else {
            &mut self.pending_updates
        };
        // last write within a tick wins
        if let Some(existing) = pending.iter_mut().find(|update| update.address == address) {
            existing.payload = payload;
        } else {
            pending.push(ParamUpdate::new(address, payload));
        }
    }

    pub fn queue_lock(&mut self, scene_id: SceneId, object_id: ObjectId, locked: bool) {
        self.pending_control.push(MessagePayload::Lock {
            scene_id,
            object_id,
            locked,
        });
    }

    pub fn queue_reset(&mut self, scene_id: SceneId, object_id: ObjectId) {
        self.pending_control.push(MessagePayload::ResetObject {
            scene_id,
            object_id,
        });
    }

    pub fn queue_undo_redo(&mut self, address: ParamAddress) {
        self.pending_control
            .push(MessagePayload::UndoRedoAdd { address });
    }

    /// Broadcasts the current clock byte for peers to align on.
    pub fn send_sync(&mut self) {
        self.publish_now(MessagePayload::Sync {
            time: self.clock.current(),
        });
    }

    pub fn send_ping(&mut self) {
        self.publish_now(MessagePayload::Ping);
    }

    /// Join/leave announcement for peer bookkeeping.
    pub fn announce(&mut self, status: bool) {
        self.publish_now(MessagePayload::DataHub {
            hub_kind: DATAHUB_CONNECTION_STATUS,
            status,
            client_id: self.sender_id,
        });
    }

    /// Asks peers to re-broadcast the state they are editing.
    pub fn request_resend(&mut self) {
        self.publish_now(MessagePayload::ResendUpdate);
    }

    pub fn has_pending(&self) -> bool {
        !self.pending_control.is_empty()
            || !self.pending_updates.is_empty()
            || !self.pending_rpc.is_empty()
    }

    /// Publishes everything queued since the last flush: control frames in
    /// queue order, then one packed value-update frame, then one RPC frame.
    pub fn flush(&mut self) {
        for payload in std::mem::take(&mut self.pending_control) {
            self.publish_now(payload);
        }
        if !self.pending_updates.is_empty() {
            let updates = std::mem::take(&mut self.pending_updates);
            self.publish_now(MessagePayload::ParameterUpdate(updates));
        }
        if !self.pending_rpc.is_empty() {
            let updates = std::mem::take(&mut self.pending_rpc);
            self.publish_now(MessagePayload::Rpc(updates));
        }
    }

    fn publish_now(&mut self, payload: MessagePayload) {
        let message = Message::new(self.sender_id, self.clock.current(), payload);
        match message.to_bytes() {
            Ok(frame) => {
                // lossy transport; a failed send is a dropped packet
                if self.publisher.send(&frame).is_err() {
                    warn!("broadcast of {:?} frame failed", message.kind());
                }
            }
            Err(err) => warn!("unframeable {:?} message dropped: {err}", message.kind()),
        }
    }

    pub fn disconnect(&mut self) {
        self.publisher.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use scenelink_shared::{MessageKind, SendError};

    #[derive(Clone, Default)]
    struct RecordingSocket {
        frames: Arc<Mutex<Vec<Vec<u8>>>>,
    }

    impl PublishSocket for RecordingSocket {
        fn connect(&mut self) -> Result<(), TransportError> {
            Ok(())
        }

        fn send(&self, payload: &[u8]) -> Result<(), SendError> {
            self.frames.lock().unwrap().push(payload.to_vec());
            Ok(())
        }

        fn disconnect(&mut self) {}
    }

    fn sender_with_socket() -> (UpdateSender, Arc<Mutex<Vec<Vec<u8>>>>) {
        let socket = RecordingSocket::default();
        let frames = socket.frames.clone();
        let clock = Arc::new(SyncClock::new(240));
        let sender = UpdateSender::new(7, clock, Box::new(socket)).unwrap();
        (sender, frames)
    }

    fn kinds(frames: &Arc<Mutex<Vec<Vec<u8>>>>) -> Vec<MessageKind> {
        frames
            .lock()
            .unwrap()
            .iter()
            .map(|frame| Message::from_bytes(frame).unwrap().kind())
            .collect()
    }

    #[test]
    fn updates_coalesce_into_one_frame_per_flush() {
        let (mut sender, frames) = sender_with_socket();
        sender.queue_encoded(ParamAddress::new(1, 5, 0), vec![0; 12], false);
        sender.queue_encoded(ParamAddress::new(1, 5, 1), vec![0; 16], false);
        sender.flush();

        let frames = frames.lock().unwrap();
        assert_eq!(frames.len(), 1);
        let message = Message::from_bytes(&frames[0]).unwrap();
        let MessagePayload::ParameterUpdate(updates) = message.payload else {
            panic!("expected a parameter update frame");
        };
        assert_eq!(updates.len(), 2);
        assert_eq!(message.sender_id, 7);
    }

    #[test]
    fn last_write_per_tick_wins() {
        let (mut sender, frames) = sender_with_socket();
        let address = ParamAddress::new(1, 5, 0);
        sender.queue_encoded(address, 1.0f32.to_le_bytes().to_vec(), false);
        sender.queue_encoded(address, 2.0f32.to_le_bytes().to_vec(), false);
        sender.flush();

        let frames = frames.lock().unwrap();
        let message = Message::from_bytes(&frames[0]).unwrap();
        let MessagePayload::ParameterUpdate(updates) = message.payload else {
            panic!("expected a parameter update frame");
        };
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].payload, 2.0f32.to_le_bytes().to_vec());
    }

    #[test]
    fn control_frames_precede_value_frames() {
        let (mut sender, frames) = sender_with_socket();
        sender.queue_encoded(ParamAddress::new(1, 5, 0), vec![1], false);
        sender.queue_lock(1, 5, true);
        sender.queue_encoded(ParamAddress::new(1, 9, 0), vec![2], true);
        sender.flush();

        assert_eq!(
            kinds(&frames),
            vec![
                MessageKind::Lock,
                MessageKind::ParameterUpdate,
                MessageKind::Rpc
            ]
        );
        assert!(!sender.has_pending());
    }

    #[test]
    fn oversized_payload_is_dropped_at_queue_time() {
        let (mut sender, frames) = sender_with_socket();
        sender.queue_encoded(ParamAddress::new(1, 5, 0), vec![0; 300], false);
        sender.flush();

        assert!(frames.lock().unwrap().is_empty());
    }

    #[test]
    fn frames_carry_the_current_time_bucket() {
        let socket = RecordingSocket::default();
        let frames = socket.frames.clone();
        let clock = Arc::new(SyncClock::new(240));
        for _ in 0..12 {
            clock.advance();
        }
        let mut sender = UpdateSender::new(7, clock, Box::new(socket)).unwrap();
        sender.send_ping();

        let frames = frames.lock().unwrap();
        let message = Message::from_bytes(&frames[0]).unwrap();
        assert_eq!(message.time_bucket, 12);
    }
}
