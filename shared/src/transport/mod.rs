//! The transport boundary. The core only requires a lossy, best-effort
//! publish/subscribe primitive; reliability is whatever the bus provides.
//! Implementations live with the client (in-process channel hub) or in host
//! integrations (broker sockets).

mod error;

use std::time::Duration;

pub use error::{RecvError, SendError, TransportError};

/// Broadcast half of a channel's socket pair.
pub trait PublishSocket: Send {
    fn connect(&mut self) -> Result<(), TransportError>;

    /// Fire-and-forget broadcast of one framed message.
    fn send(&self, payload: &[u8]) -> Result<(), SendError>;

    /// Releases the socket. Must succeed even if the peer already vanished;
    /// implementations swallow teardown races.
    fn disconnect(&mut self);
}

/// Subscribe half of a channel's socket pair.
pub trait SubscribeSocket: Send {
    fn connect(&mut self) -> Result<(), TransportError>;

    fn subscribe(&mut self) -> Result<(), TransportError>;

    /// Timed blocking receive. Returns `Ok(None)` on timeout, so a receive
    /// loop can observe its stop signal between polls.
    fn try_receive(&mut self, timeout: Duration) -> Result<Option<Vec<u8>>, RecvError>;

    /// Releases the socket; swallows teardown races like
    /// [`PublishSocket::disconnect`].
    fn disconnect(&mut self);
}
