use thiserror::Error;

/// The send half failed; the frame is lost (the transport is lossy, so
/// callers treat this the same as a dropped packet).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendError;

/// The receive half failed in a way that is not a timeout (e.g. the bus is
/// gone).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecvError;

/// Errors raised while establishing or configuring a socket pair
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("failed to connect transport socket: {reason}")]
    ConnectFailed { reason: String },

    #[error("socket used before connect")]
    NotConnected,
}
