use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use crossbeam_channel::Receiver;
use log::info;

use scenelink_shared::{
    ClientId, ObjectId, ParamAddress, ParamEvent, ParamEventBus, ParamObjectDescriptor,
    ParamValue, ParameterObject, PublishSocket, SceneId, SceneRegistry, SubscribeSocket, Timer,
    TransportError, WorldError,
};

use crate::bucket_buffer::BucketBuffer;
use crate::clock::SyncClock;
use crate::config::ClientConfig;
use crate::ledger::HistoryLedger;
use crate::peers::PeerRegistry;
use crate::receiver::{ReceiverContext, ReceiverState, UpdateReceiver};
use crate::sender::UpdateSender;

/// One peer in a collaborative editing session.
///
/// The client owns the registry, the undo/redo ledger, and the clock, and
/// wires the host frame tick through the sender and receiver. Local edits
/// go through [`SceneClient::set_parameter`]; peer edits arrive via the
/// receive thread and become visible when their time bucket drains.
pub struct SceneClient {
    client_id: ClientId,
    config: ClientConfig,
    clock: Arc<SyncClock>,
    registry: Arc<Mutex<SceneRegistry>>,
    ledger: Arc<Mutex<HistoryLedger>>,
    events: Arc<Mutex<ParamEventBus>>,
    peers: Arc<Mutex<PeerRegistry>>,
    sender: UpdateSender,
    receiver: UpdateReceiver,
    ping_timer: Timer,
    /// Objects this client currently holds the lock on.
    self_locked: HashSet<(SceneId, ObjectId)>,
    stopped: bool,
}

impl SceneClient {
    /// Connects the publish half, spawns the receive loop on the subscribe
    /// half, and announces this peer on the bus.
    pub fn new(
        config: ClientConfig,
        publisher: Box<dyn PublishSocket>,
        subscriber: Box<dyn SubscribeSocket>,
    ) -> Result<Self, TransportError> {
        let client_id = config.client_id.unwrap_or_else(|| fastrand::u8(1..));
        let clock = Arc::new(SyncClock::new(config.sync.timesteps()));
        let registry = Arc::new(Mutex::new(SceneRegistry::new()));
        let ledger = Arc::new(Mutex::new(HistoryLedger::new(config.sync.max_history)));
        let buffer = Arc::new(Mutex::new(BucketBuffer::new(config.sync.timesteps())));
        let peers = Arc::new(Mutex::new(PeerRegistry::new()));
        let events = Arc::new(Mutex::new(ParamEventBus::new()));

        let mut sender = UpdateSender::new(client_id, clock.clone(), publisher)?;

        let context = ReceiverContext {
            client_id,
            config: config.sync,
            clock: clock.clone(),
            registry: registry.clone(),
            ledger: ledger.clone(),
            buffer,
            peers: peers.clone(),
            events: events.clone(),
            resend_requested: Arc::new(AtomicBool::new(false)),
        };
        let mut receiver = UpdateReceiver::new(context, config.poll_timeout);
        receiver.start(subscriber);

        sender.announce(true);
        info!("client {client_id} joined the session");

        Ok(Self {
            client_id,
            ping_timer: Timer::new(config.ping_interval),
            config,
            clock,
            registry,
            ledger,
            events,
            peers,
            sender,
            receiver,
            self_locked: HashSet::new(),
            stopped: false,
        })
    }

    pub fn client_id(&self) -> ClientId {
        self.client_id
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn current_bucket(&self) -> u8 {
        self.clock.current()
    }

    pub fn timesteps(&self) -> u16 {
        self.clock.timesteps()
    }

    pub fn receiver_state(&self) -> ReceiverState {
        self.receiver.state()
    }

    /// The live parameter model. Hold the guard briefly; the receive thread
    /// applies peer edits through the same lock.
    pub fn registry(&self) -> Arc<Mutex<SceneRegistry>> {
        self.registry.clone()
    }

    /// A channel of per-parameter change notifications for downstream
    /// rendering or UI layers.
    pub fn subscribe_events(&self) -> Receiver<ParamEvent> {
        self.events.lock().expect("event bus lock poisoned").subscribe()
    }

    pub fn peers(&self) -> Vec<ClientId> {
        self.peers.lock().expect("peer registry lock poisoned").peers()
    }

    /// Buffered, not-yet-visible events across all buckets.
    pub fn pending_event_count(&self) -> usize {
        self.receiver.pending_event_count()
    }

    pub fn pending_count_at(&self, bucket: u8) -> usize {
        self.receiver.pending_count_at(bucket)
    }

    pub fn history_len(&self) -> usize {
        self.ledger.lock().expect("ledger lock poisoned").len()
    }

    /// Registers an editable object in the local model. The scene-graph
    /// builder calls this while instantiating a decoded scene, and editor
    /// code calls it when an entity is created dynamically.
    pub fn register_object(&self, object: ParameterObject) {
        self.registry
            .lock()
            .expect("registry lock poisoned")
            .insert(object);
    }

    /// Rebuilds parameter objects from decoded snapshot descriptors.
    pub fn adopt_descriptors(&self, descriptors: &[ParamObjectDescriptor]) {
        self.registry
            .lock()
            .expect("registry lock poisoned")
            .adopt_descriptors(descriptors);
    }

    /// Applies one host frame: advance the clock, drain the due bucket,
    /// service housekeeping, publish everything queued this tick.
    pub fn tick(&mut self) {
        self.clock.advance();
        self.receiver.tick();
        if self.receiver.take_resend_request() {
            self.requeue_locked_objects();
        }
        if self.ping_timer.ringing() {
            self.sender.send_ping();
            self.ping_timer.reset();
        }
        self.sender.flush();
    }

    /// Local edit entry point: writes the value into the model, notifies
    /// subscribers, and queues the wire update for this tick's flush.
    /// History is recorded separately by [`SceneClient::commit_parameter`]
    /// when the manipulation ends.
    pub fn set_parameter(
        &mut self,
        address: ParamAddress,
        value: ParamValue,
    ) -> Result<(), WorldError> {
        let (payload, is_rpc) = {
            let mut registry = self.registry.lock().expect("registry lock poisoned");
            let object = registry
                .object_mut(address.scene_id, address.object_id)
                .ok_or(WorldError::UnknownObject {
                    scene_id: address.scene_id,
                    object_id: address.object_id,
                })?;
            let parameter =
                object
                    .parameter_mut(address.param_id)
                    .ok_or(WorldError::UnknownParameter {
                        scene_id: address.scene_id,
                        object_id: address.object_id,
                        param_id: address.param_id,
                    })?;
            parameter.set(value.clone())?;
            (parameter.encode_payload(), parameter.is_rpc)
        };
        self.sender.queue_encoded(address, payload, is_rpc);
        self.events
            .lock()
            .expect("event bus lock poisoned")
            .publish(ParamEvent { address, value });
        Ok(())
    }

    /// Records the parameter's current value as an undo step and tells
    /// peers to record it too. Called once at the end of a manipulation,
    /// not per delta.
    pub fn commit_parameter(&mut self, address: ParamAddress) -> Result<(), WorldError> {
        let value = {
            let registry = self.registry.lock().expect("registry lock poisoned");
            registry
                .resolve(address)
                .ok_or(WorldError::UnknownParameter {
                    scene_id: address.scene_id,
                    object_id: address.object_id,
                    param_id: address.param_id,
                })?
                .value()
                .clone()
        };
        self.ledger
            .lock()
            .expect("ledger lock poisoned")
            .add_step(address, value);
        self.sender.queue_undo_redo(address);
        Ok(())
    }

    /// Attempts to take the edit lock. Returns `false` when a peer already
    /// holds it; holding the lock is a domain condition, not an error, and
    /// the caller decides what to do about contention.
    pub fn try_lock_object(
        &mut self,
        scene_id: SceneId,
        object_id: ObjectId,
    ) -> Result<bool, WorldError> {
        {
            let mut registry = self.registry.lock().expect("registry lock poisoned");
            let object = registry
                .object_mut(scene_id, object_id)
                .ok_or(WorldError::UnknownObject {
                    scene_id,
                    object_id,
                })?;
            if object.locked && !self.self_locked.contains(&(scene_id, object_id)) {
                return Ok(false);
            }
            object.locked = true;
        }
        self.self_locked.insert((scene_id, object_id));
        self.sender.queue_lock(scene_id, object_id, true);
        Ok(true)
    }

    /// Releases an edit lock this client holds. The local flag clears at
    /// once; peers clear theirs only after the delayed unlock drains, so
    /// updates still in flight stay guarded.
    pub fn unlock_object(
        &mut self,
        scene_id: SceneId,
        object_id: ObjectId,
    ) -> Result<(), WorldError> {
        if !self.self_locked.remove(&(scene_id, object_id)) {
            return Ok(());
        }
        {
            let mut registry = self.registry.lock().expect("registry lock poisoned");
            let object = registry
                .object_mut(scene_id, object_id)
                .ok_or(WorldError::UnknownObject {
                    scene_id,
                    object_id,
                })?;
            object.locked = false;
        }
        self.sender.queue_lock(scene_id, object_id, false);
        Ok(())
    }

    /// Steps history back one entry and broadcasts the restored value.
    pub fn undo(&mut self) -> Option<ParamAddress> {
        let address = {
            let mut registry = self.registry.lock().expect("registry lock poisoned");
            let mut ledger = self.ledger.lock().expect("ledger lock poisoned");
            ledger.undo(&mut registry)?
        };
        self.broadcast_current_value(address);
        Some(address)
    }

    /// Steps history forward one entry and broadcasts the restored value.
    pub fn redo(&mut self) -> Option<ParamAddress> {
        let address = {
            let mut registry = self.registry.lock().expect("registry lock poisoned");
            let mut ledger = self.ledger.lock().expect("ledger lock poisoned");
            ledger.redo(&mut registry)?
        };
        self.broadcast_current_value(address);
        Some(address)
    }

    /// Resets one object to defaults, purges its history, and propagates
    /// the reset to peers.
    pub fn reset_object(
        &mut self,
        scene_id: SceneId,
        object_id: ObjectId,
    ) -> Result<(), WorldError> {
        let emitted = {
            let mut registry = self.registry.lock().expect("registry lock poisoned");
            let object = registry
                .object_mut(scene_id, object_id)
                .ok_or(WorldError::UnknownObject {
                    scene_id,
                    object_id,
                })?;
            object.reset_all();
            object
                .parameters()
                .iter()
                .map(|parameter| ParamEvent {
                    address: ParamAddress::new(scene_id, object_id, parameter.id()),
                    value: parameter.value().clone(),
                })
                .collect::<Vec<_>>()
        };
        self.ledger
            .lock()
            .expect("ledger lock poisoned")
            .vanish(scene_id, object_id);
        self.sender.queue_reset(scene_id, object_id);
        let mut events = self.events.lock().expect("event bus lock poisoned");
        for event in emitted {
            events.publish(event);
        }
        Ok(())
    }

    /// Resets every object in the model, purging all history and queueing
    /// one reset message per object. Safe to call repeatedly.
    pub fn reset_scene(&mut self) {
        let addresses = {
            let registry = self.registry.lock().expect("registry lock poisoned");
            registry.addresses()
        };
        for (scene_id, object_id) in addresses {
            // objects cannot vanish between the snapshot and here; the
            // receive thread only mutates values
            let _ = self.reset_object(scene_id, object_id);
        }
    }

    /// Broadcasts the current clock byte so peers align on it.
    pub fn broadcast_sync(&mut self) {
        self.sender.send_sync();
    }

    /// Asks peers to re-broadcast the state they are editing.
    pub fn request_resend(&mut self) {
        self.sender.request_resend();
    }

    /// Announces departure, stops the receive loop, and releases sockets.
    /// Must complete even if the bus is already gone.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        self.sender.announce(false);
        self.receiver.stop();
        self.sender.disconnect();
        info!("client {} left the session", self.client_id);
    }

    fn broadcast_current_value(&mut self, address: ParamAddress) {
        let restored = {
            let registry = self.registry.lock().expect("registry lock poisoned");
            registry
                .resolve(address)
                .map(|parameter| (parameter.encode_payload(), parameter.value().clone()))
        };
        let Some((payload, value)) = restored else {
            return;
        };
        self.sender.queue_encoded(address, payload, false);
        self.events
            .lock()
            .expect("event bus lock poisoned")
            .publish(ParamEvent { address, value });
    }

    /// RESENDUPDATE service: re-queue every parameter of every object this
    /// client is editing.
    fn requeue_locked_objects(&mut self) {
        let queued = {
            let registry = self.registry.lock().expect("registry lock poisoned");
            let mut queued = Vec::new();
            for &(scene_id, object_id) in &self.self_locked {
                let Some(object) = registry.object(scene_id, object_id) else {
                    continue;
                };
                for parameter in object.parameters() {
                    queued.push((
                        ParamAddress::new(scene_id, object_id, parameter.id()),
                        parameter.encode_payload(),
                        parameter.is_rpc,
                    ));
                }
            }
            queued
        };
        for (address, payload, is_rpc) in queued {
            self.sender.queue_encoded(address, payload, is_rpc);
        }
    }
}

impl Drop for SceneClient {
    fn drop(&mut self) {
        self.stop();
    }
}
