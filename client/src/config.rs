use std::time::Duration;

use scenelink_shared::{ClientId, SyncConfig};

/// Host-facing configuration for one peer.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Wire identity of this peer. `None` picks a random non-zero id.
    pub client_id: Option<ClientId>,
    pub sync: SyncConfig,
    /// How long the receive loop blocks per poll. Must stay well under a
    /// second so a stop signal is observed promptly.
    pub poll_timeout: Duration,
    pub ping_interval: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            client_id: None,
            sync: SyncConfig::default(),
            poll_timeout: Duration::from_millis(500),
            ping_interval: Duration::from_secs(1),
        }
    }
}
