use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{info, warn};

use scenelink_shared::{
    ClientId, Message, MessagePayload, ObjectId, ParamAddress, ParamEvent, ParamEventBus,
    ParamUpdate, SceneId, SceneRegistry, SubscribeSocket, SyncConfig,
};

use crate::bucket_buffer::{BucketBuffer, BufferedEvent};
use crate::clock::SyncClock;
use crate::ledger::HistoryLedger;
use crate::peers::PeerRegistry;

/// Lifecycle of the dedicated receive thread.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiverState {
    Stopped,
    Starting,
    Running,
    Stopping,
}

impl ReceiverState {
    fn to_byte(self) -> u8 {
        match self {
            ReceiverState::Stopped => 0,
            ReceiverState::Starting => 1,
            ReceiverState::Running => 2,
            ReceiverState::Stopping => 3,
        }
    }

    fn from_byte(byte: u8) -> Self {
        match byte {
            1 => ReceiverState::Starting,
            2 => ReceiverState::Running,
            3 => ReceiverState::Stopping,
            _ => ReceiverState::Stopped,
        }
    }
}

/// Everything the receive thread and the drain tick share.
#[derive(Clone)]
pub(crate) struct ReceiverContext {
    pub client_id: ClientId,
    pub config: SyncConfig,
    pub clock: Arc<SyncClock>,
    pub registry: Arc<Mutex<SceneRegistry>>,
    pub ledger: Arc<Mutex<HistoryLedger>>,
    pub buffer: Arc<Mutex<BucketBuffer>>,
    pub peers: Arc<Mutex<PeerRegistry>>,
    pub events: Arc<Mutex<ParamEventBus>>,
    pub resend_requested: Arc<AtomicBool>,
}

/// Pulls frames off the subscribe socket on a dedicated thread and routes
/// them: immediate kinds apply inline, value updates land in the bucket
/// ring until the drain tick consumes their slot.
pub struct UpdateReceiver {
    context: ReceiverContext,
    state: Arc<AtomicU8>,
    running: Arc<AtomicBool>,
    poll_timeout: Duration,
    thread: Option<JoinHandle<()>>,
}

impl UpdateReceiver {
    pub(crate) fn new(context: ReceiverContext, poll_timeout: Duration) -> Self {
        Self {
            context,
            state: Arc::new(AtomicU8::new(ReceiverState::Stopped.to_byte())),
            running: Arc::new(AtomicBool::new(false)),
            // a prompt poll keeps the stop signal observable
            poll_timeout: poll_timeout.min(Duration::from_secs(1)),
            thread: None,
        }
    }

    pub fn state(&self) -> ReceiverState {
        ReceiverState::from_byte(self.state.load(Ordering::Acquire))
    }

    /// Spawns the receive loop. The socket connects and subscribes on the
    /// new thread, then polls with a bounded timeout until stopped.
    pub fn start(&mut self, mut subscriber: Box<dyn SubscribeSocket>) {
        if self.thread.is_some() {
            warn!("receive loop already started");
            return;
        }
        self.state
            .store(ReceiverState::Starting.to_byte(), Ordering::Release);
        self.running.store(true, Ordering::Release);

        let context = self.context.clone();
        let state = self.state.clone();
        let running = self.running.clone();
        let poll_timeout = self.poll_timeout;

        self.thread = Some(thread::spawn(move || {
            if let Err(err) = subscriber.connect().and_then(|_| subscriber.subscribe()) {
                warn!("receive channel failed to open: {err}");
                state.store(ReceiverState::Stopped.to_byte(), Ordering::Release);
                return;
            }
            state.store(ReceiverState::Running.to_byte(), Ordering::Release);

            while running.load(Ordering::Acquire) {
                match subscriber.try_receive(poll_timeout) {
                    Ok(Some(frame)) => dispatch(&context, &frame),
                    Ok(None) => {}
                    Err(_) => {
                        // a receive fault during shutdown is expected noise
                        if running.load(Ordering::Acquire) {
                            warn!("receive channel failed, stopping loop");
                        }
                        break;
                    }
                }
            }

            state.store(ReceiverState::Stopping.to_byte(), Ordering::Release);
            subscriber.disconnect();
            state.store(ReceiverState::Stopped.to_byte(), Ordering::Release);
            info!("receive loop stopped");
        }));
    }

    /// Clears the running flag and joins the thread; the loop exits on its
    /// next poll timeout at the latest.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                warn!("receive thread panicked before join");
            }
        }
        self.state
            .store(ReceiverState::Stopped.to_byte(), Ordering::Release);
    }

    /// Drains the bucket due at the current synchronized time and applies
    /// everything buffered in it, in arrival order.
    ///
    /// The drain cursor trails the live clock by the configured delay so
    /// frames jittered across neighboring ticks still land in time. The
    /// whole pass holds the ring mutex, so a slot is consumed exactly once
    /// and appends wait for the pass to finish.
    pub fn tick(&self) {
        let context = &self.context;
        let drain_bucket = context.clock.offset(
            context.clock.current(),
            -i16::from(context.config.drain_delay),
        );

        let mut buffer = context.buffer.lock().expect("bucket ring lock poisoned");
        for event in buffer.drain(drain_bucket) {
            match event {
                BufferedEvent::Unlock {
                    scene_id,
                    object_id,
                } => {
                    let mut registry = context.registry.lock().expect("registry lock poisoned");
                    match registry.object_mut(scene_id, object_id) {
                        Some(object) => object.locked = false,
                        None => warn!("unlock for unknown object ({scene_id}, {object_id})"),
                    }
                }
                BufferedEvent::ParameterUpdate(updates) => apply_updates(context, &updates),
            }
        }
    }

    /// True once per RESENDUPDATE received; the caller services it by
    /// re-queueing the state it is editing.
    pub fn take_resend_request(&self) -> bool {
        self.context.resend_requested.swap(false, Ordering::AcqRel)
    }

    pub fn pending_event_count(&self) -> usize {
        self.context
            .buffer
            .lock()
            .expect("bucket ring lock poisoned")
            .len()
    }

    pub fn pending_count_at(&self, bucket: u8) -> usize {
        self.context
            .buffer
            .lock()
            .expect("bucket ring lock poisoned")
            .len_at(bucket)
    }
}

/// Routes one received frame. Frames from this client's own publisher come
/// back around on the broadcast bus and are ignored here.
fn dispatch(context: &ReceiverContext, frame: &[u8]) {
    let message = match Message::from_bytes(frame) {
        Ok(message) => message,
        Err(err) => {
            warn!("dropping undecodable frame: {err}");
            return;
        }
    };
    if message.sender_id == context.client_id {
        return;
    }

    match message.payload {
        // clock alignment, applied inline rather than buffered
        MessagePayload::Sync { time } => context.clock.set(time),
        MessagePayload::Lock {
            scene_id,
            object_id,
            locked: true,
        } => {
            let mut registry = context.registry.lock().expect("registry lock poisoned");
            match registry.object_mut(scene_id, object_id) {
                Some(object) => object.locked = true,
                None => warn!("lock for unknown object ({scene_id}, {object_id})"),
            }
        }
        MessagePayload::Lock {
            scene_id,
            object_id,
            locked: false,
        } => {
            // held back so in-flight updates the lock was guarding drain
            // before the unlock becomes visible
            let bucket = context.clock.offset(
                context.clock.current(),
                i16::from(context.config.unlock_delay),
            );
            context
                .buffer
                .lock()
                .expect("bucket ring lock poisoned")
                .push(
                    bucket,
                    BufferedEvent::Unlock {
                        scene_id,
                        object_id,
                    },
                );
        }
        MessagePayload::ResetObject {
            scene_id,
            object_id,
        } => apply_reset(context, scene_id, object_id),
        MessagePayload::UndoRedoAdd { address } => {
            // informs history only; live state is untouched
            let value = {
                let registry = context.registry.lock().expect("registry lock poisoned");
                registry.resolve(address).map(|p| p.value().clone())
            };
            match value {
                Some(value) => context
                    .ledger
                    .lock()
                    .expect("ledger lock poisoned")
                    .add_step(address, value),
                None => warn!("history step for unknown parameter {address:?}"),
            }
        }
        MessagePayload::DataHub {
            status, client_id, ..
        } => {
            if client_id != context.client_id {
                let mut peers = context.peers.lock().expect("peer registry lock poisoned");
                if status {
                    peers.mark_joined(client_id);
                } else {
                    peers.mark_left(client_id);
                }
            }
        }
        MessagePayload::Ping => {
            context
                .peers
                .lock()
                .expect("peer registry lock poisoned")
                .mark_seen(message.sender_id);
        }
        MessagePayload::ResendUpdate => {
            context.resend_requested.store(true, Ordering::Release);
        }
        // fire-and-forget: applied on arrival, never buffered or recorded
        MessagePayload::Rpc(updates) => apply_updates(context, &updates),
        MessagePayload::ParameterUpdate(updates) => {
            context
                .buffer
                .lock()
                .expect("bucket ring lock poisoned")
                .push(message.time_bucket, BufferedEvent::ParameterUpdate(updates));
        }
    }
}

/// Walks packed update entries field by field and deserializes each payload
/// directly into its parameter. Consecutive entries addressing one object
/// reuse a single map resolution (the one-slot object cache). An unknown
/// address or bad payload skips that field only.
fn apply_updates(context: &ReceiverContext, updates: &[ParamUpdate]) {
    let mut applied = Vec::new();
    {
        let mut registry = context.registry.lock().expect("registry lock poisoned");
        let mut index = 0;
        while index < updates.len() {
            let scene_id = updates[index].address.scene_id;
            let object_id = updates[index].address.object_id;
            let Some(object) = registry.object_mut(scene_id, object_id) else {
                warn!("update for unknown object ({scene_id}, {object_id}), field skipped");
                index += 1;
                continue;
            };
            while index < updates.len()
                && updates[index].address.scene_id == scene_id
                && updates[index].address.object_id == object_id
            {
                let update = &updates[index];
                index += 1;
                let Some(parameter) = object.parameter_mut(update.address.param_id) else {
                    warn!("update for unknown parameter {:?}, field skipped", update.address);
                    continue;
                };
                if parameter.apply_payload(&update.payload).is_err() {
                    warn!("malformed payload for {:?}, field skipped", update.address);
                    continue;
                }
                applied.push(ParamEvent {
                    address: update.address,
                    value: parameter.value().clone(),
                });
            }
        }
    }
    if !applied.is_empty() {
        let mut events = context.events.lock().expect("event bus lock poisoned");
        for event in applied {
            events.publish(event);
        }
    }
}

/// Returns every parameter of the object to its default and purges the
/// object's history.
fn apply_reset(context: &ReceiverContext, scene_id: SceneId, object_id: ObjectId) {
    let mut emitted = Vec::new();
    {
        let mut registry = context.registry.lock().expect("registry lock poisoned");
        let Some(object) = registry.object_mut(scene_id, object_id) else {
            warn!("reset for unknown object ({scene_id}, {object_id})");
            return;
        };
        object.reset_all();
        for parameter in object.parameters() {
            emitted.push(ParamEvent {
                address: ParamAddress::new(scene_id, object_id, parameter.id()),
                value: parameter.value().clone(),
            });
        }
    }
    context
        .ledger
        .lock()
        .expect("ledger lock poisoned")
        .vanish(scene_id, object_id);
    let mut events = context.events.lock().expect("event bus lock poisoned");
    for event in emitted {
        events.publish(event);
    }
}
