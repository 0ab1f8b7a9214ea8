use std::collections::HashMap;
use std::time::{Duration, Instant};

use scenelink_shared::ClientId;

/// Liveness bookkeeping for every other client heard on the bus, fed by
/// DATAHUB announcements and refreshed by pings.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    peers: HashMap<ClientId, Instant>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_joined(&mut self, client_id: ClientId) {
        self.peers.insert(client_id, Instant::now());
    }

    pub fn mark_left(&mut self, client_id: ClientId) {
        self.peers.remove(&client_id);
    }

    /// Refreshes the last-seen stamp, admitting peers that never announced.
    pub fn mark_seen(&mut self, client_id: ClientId) {
        self.peers.insert(client_id, Instant::now());
    }

    pub fn contains(&self, client_id: ClientId) -> bool {
        self.peers.contains_key(&client_id)
    }

    pub fn peers(&self) -> Vec<ClientId> {
        let mut ids: Vec<_> = self.peers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Drops peers not heard from within `max_age`.
    pub fn prune(&mut self, max_age: Duration) {
        self.peers.retain(|_, last_seen| last_seen.elapsed() <= max_age);
    }
}
