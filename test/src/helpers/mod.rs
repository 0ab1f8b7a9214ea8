use std::thread;
use std::time::{Duration, Instant};

use scenelink_client::transport::channel::ChannelHub;
use scenelink_client::{ClientConfig, SceneClient};
use scenelink_shared::{
    ClientId, ParamAddress, ParamValue, ParameterObject, SyncConfig,
};

/// Builds a client joined to the hub with a fixed id and frame rate, and a
/// short poll timeout so tests shut down quickly.
pub fn connected_client(hub: &ChannelHub, client_id: ClientId, frame_rate: u8) -> SceneClient {
    let config = ClientConfig {
        client_id: Some(client_id),
        sync: SyncConfig::new(frame_rate),
        poll_timeout: Duration::from_millis(20),
        ping_interval: Duration::from_millis(50),
    };
    SceneClient::new(
        config,
        Box::new(hub.publisher()),
        Box::new(hub.subscriber()),
    )
    .expect("client connects")
}

/// Registers the standard test object `(scene 1, object 5)`: a transform
/// pair plus a float cell at parameter id 2.
pub fn seed_test_object(client: &SceneClient) {
    let mut object = ParameterObject::new(1, 5, "cube");
    object.add_parameter(ParamValue::Vec3([0.0; 3]));
    object.add_parameter(ParamValue::Quat([0.0, 0.0, 0.0, 1.0]));
    object.add_parameter(ParamValue::Float(0.0));
    client.register_object(object);
}

pub fn read_param(client: &SceneClient, address: ParamAddress) -> Option<ParamValue> {
    let registry = client.registry();
    let registry = registry.lock().unwrap();
    registry.resolve(address).map(|p| p.value().clone())
}

pub fn object_locked(client: &SceneClient, scene_id: u8, object_id: i16) -> bool {
    let registry = client.registry();
    let registry = registry.lock().unwrap();
    registry
        .object(scene_id, object_id)
        .map(|object| object.locked)
        .unwrap_or(false)
}

pub fn tick_n(client: &mut SceneClient, ticks: usize) {
    for _ in 0..ticks {
        client.tick();
    }
}

/// Polls until the condition holds or the timeout passes. The receive
/// threads run free, so assertions on cross-client state go through this.
pub fn wait_until(mut condition: impl FnMut() -> bool, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    condition()
}

pub const WAIT: Duration = Duration::from_secs(2);
