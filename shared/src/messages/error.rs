use scenelink_serde::SerdeErr;
use thiserror::Error;

/// Errors that can occur while framing or parsing wire messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// The frame is shorter than the three-byte routing header
    #[error("frame of {len} bytes is too short to carry a message header")]
    MissingHeader { len: usize },

    /// Byte 2 does not name a known message type. A newer peer may be on
    /// the bus; the frame is dropped, not fatal
    #[error("unknown message kind ordinal {kind}")]
    UnknownKind { kind: u8 },

    /// A parameter payload cannot be described by the one-byte length field
    #[error("parameter payload of {len} bytes exceeds the 255-byte wire limit")]
    PayloadTooLarge { len: usize },

    /// The frame ended in the middle of a payload field
    #[error("frame truncated mid-payload")]
    Truncated,
}

impl From<SerdeErr> for MessageError {
    fn from(_: SerdeErr) -> Self {
        MessageError::Truncated
    }
}
