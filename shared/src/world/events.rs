use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::types::ParamAddress;
use crate::world::parameter::ParamValue;

/// One change notification: a parameter was written and now holds `value`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamEvent {
    pub address: ParamAddress,
    pub value: ParamValue,
}

/// In-process fan-out of parameter change notifications.
///
/// Downstream layers (rendering, UI) subscribe and receive every change on
/// their own channel; dropping the receiver unsubscribes. Subscription is a
/// handle the subscriber owns, so fan-out order never depends on who
/// registered first.
#[derive(Default)]
pub struct ParamEventBus {
    senders: Vec<Sender<ParamEvent>>,
}

impl ParamEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<ParamEvent> {
        let (sender, receiver) = unbounded();
        self.senders.push(sender);
        receiver
    }

    /// Delivers the event to every live subscriber, pruning closed ones.
    pub fn publish(&mut self, event: ParamEvent) {
        self.senders
            .retain(|sender| sender.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.senders.len()
    }
}
