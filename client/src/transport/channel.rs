use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use scenelink_shared::{
    PublishSocket, RecvError, SendError, SubscribeSocket, TransportError,
};

/// An in-process broadcast bus joining the socket pairs of every client in
/// one process.
///
/// Each published frame fans out to every subscriber, the publisher's own
/// subscriber included, exactly as a broker socket would deliver it;
/// receivers drop their own frames by sender id.
#[derive(Clone, Default)]
pub struct ChannelHub {
    subscribers: Arc<Mutex<Vec<Sender<Vec<u8>>>>>,
}

impl ChannelHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publisher(&self) -> ChannelPublisher {
        ChannelPublisher {
            hub: self.clone(),
            connected: false,
        }
    }

    pub fn subscriber(&self) -> ChannelSubscriber {
        ChannelSubscriber {
            hub: self.clone(),
            receiver: None,
        }
    }

    fn broadcast(&self, payload: &[u8]) {
        let mut subscribers = self.subscribers.lock().expect("hub lock poisoned");
        // a closed receiver means its client disconnected; prune it
        subscribers.retain(|subscriber| subscriber.send(payload.to_vec()).is_ok());
    }
}

/// Publish half of the hub's socket pair.
pub struct ChannelPublisher {
    hub: ChannelHub,
    connected: bool,
}

impl PublishSocket for ChannelPublisher {
    fn connect(&mut self) -> Result<(), TransportError> {
        self.connected = true;
        Ok(())
    }

    fn send(&self, payload: &[u8]) -> Result<(), SendError> {
        if !self.connected {
            return Err(SendError);
        }
        self.hub.broadcast(payload);
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }
}

/// Subscribe half of the hub's socket pair.
pub struct ChannelSubscriber {
    hub: ChannelHub,
    receiver: Option<Receiver<Vec<u8>>>,
}

impl SubscribeSocket for ChannelSubscriber {
    fn connect(&mut self) -> Result<(), TransportError> {
        Ok(())
    }

    fn subscribe(&mut self) -> Result<(), TransportError> {
        let (sender, receiver) = unbounded();
        self.hub
            .subscribers
            .lock()
            .map_err(|_| TransportError::ConnectFailed {
                reason: "hub lock poisoned".to_string(),
            })?
            .push(sender);
        self.receiver = Some(receiver);
        Ok(())
    }

    fn try_receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, RecvError> {
        let Some(receiver) = &self.receiver else {
            return Err(RecvError);
        };
        match receiver.recv_timeout(timeout) {
            Ok(frame) => Ok(Some(frame)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(RecvError),
        }
    }

    fn disconnect(&mut self) {
        // dropping the receiver closes the channel; the hub prunes the
        // matching sender on its next broadcast
        self.receiver = None;
    }
}
