use scenelink_serde::{ByteReader, ByteWriter};

use crate::messages::error::MessageError;
use crate::types::{ClientId, ObjectId, ParamAddress, SceneId, TimeBucket};

/// Wire-level message type, byte 2 of every frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    ParameterUpdate,
    Lock,
    Sync,
    Ping,
    ResendUpdate,
    UndoRedoAdd,
    ResetObject,
    DataHub,
    Rpc,
}

impl MessageKind {
    pub fn to_byte(self) -> u8 {
        match self {
            MessageKind::ParameterUpdate => 0,
            MessageKind::Lock => 1,
            MessageKind::Sync => 2,
            MessageKind::Ping => 3,
            MessageKind::ResendUpdate => 4,
            MessageKind::UndoRedoAdd => 5,
            MessageKind::ResetObject => 6,
            MessageKind::DataHub => 7,
            MessageKind::Rpc => 8,
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(MessageKind::ParameterUpdate),
            1 => Some(MessageKind::Lock),
            2 => Some(MessageKind::Sync),
            3 => Some(MessageKind::Ping),
            4 => Some(MessageKind::ResendUpdate),
            5 => Some(MessageKind::UndoRedoAdd),
            6 => Some(MessageKind::ResetObject),
            7 => Some(MessageKind::DataHub),
            8 => Some(MessageKind::Rpc),
            _ => None,
        }
    }
}

/// One packed entry of a PARAMETERUPDATE or RPC frame. Entries are
/// self-describing: a receiver walks the list with no external indexing,
/// reading `length` payload bytes per entry until the frame ends.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamUpdate {
    pub address: ParamAddress,
    pub payload: Vec<u8>,
}

impl ParamUpdate {
    pub fn new(address: ParamAddress, payload: Vec<u8>) -> Self {
        Self { address, payload }
    }
}

/// The decoded, type-specific payload of a frame.
#[derive(Clone, Debug, PartialEq)]
pub enum MessagePayload {
    /// Batched value deltas; buffered by time bucket on receive.
    ParameterUpdate(Vec<ParamUpdate>),
    /// Lock (applied on arrival) or unlock (delayed by the receiver).
    Lock {
        scene_id: SceneId,
        object_id: ObjectId,
        locked: bool,
    },
    /// Clock alignment: set the local time byte to `time` on arrival.
    Sync { time: TimeBucket },
    Ping,
    /// Ask every peer to re-broadcast the state it is editing.
    ResendUpdate,
    /// A peer recorded a history step for this parameter.
    UndoRedoAdd { address: ParamAddress },
    ResetObject {
        scene_id: SceneId,
        object_id: ObjectId,
    },
    /// Peer-liveness / administrative signal.
    DataHub {
        hub_kind: u8,
        status: bool,
        client_id: ClientId,
    },
    /// Same layout as ParameterUpdate, but applied on arrival and never
    /// recorded.
    Rpc(Vec<ParamUpdate>),
}

impl MessagePayload {
    pub fn kind(&self) -> MessageKind {
        match self {
            MessagePayload::ParameterUpdate(_) => MessageKind::ParameterUpdate,
            MessagePayload::Lock { .. } => MessageKind::Lock,
            MessagePayload::Sync { .. } => MessageKind::Sync,
            MessagePayload::Ping => MessageKind::Ping,
            MessagePayload::ResendUpdate => MessageKind::ResendUpdate,
            MessagePayload::UndoRedoAdd { .. } => MessageKind::UndoRedoAdd,
            MessagePayload::ResetObject { .. } => MessageKind::ResetObject,
            MessagePayload::DataHub { .. } => MessageKind::DataHub,
            MessagePayload::Rpc(_) => MessageKind::Rpc,
        }
    }
}

/// A framed wire message: sender byte, time-bucket byte, kind ordinal,
/// payload.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    pub sender_id: ClientId,
    pub time_bucket: TimeBucket,
    pub payload: MessagePayload,
}

impl Message {
    pub fn new(sender_id: ClientId, time_bucket: TimeBucket, payload: MessagePayload) -> Self {
        Self {
            sender_id,
            time_bucket,
            payload,
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.payload.kind()
    }

    /// Frames the message for the wire. The only failure is a parameter
    /// payload too large for its one-byte length field.
    pub fn to_bytes(&self) -> Result<Vec<u8>, MessageError> {
        let mut writer = ByteWriter::new();
        writer.write_u8(self.sender_id);
        writer.write_u8(self.time_bucket);
        writer.write_u8(self.kind().to_byte());

        match &self.payload {
            MessagePayload::ParameterUpdate(updates) | MessagePayload::Rpc(updates) => {
                for update in updates {
                    let len = update.payload.len();
                    if len > usize::from(u8::MAX) {
                        return Err(MessageError::PayloadTooLarge { len });
                    }
                    writer.write_u8(update.address.scene_id);
                    writer.write_i16(update.address.object_id);
                    writer.write_i16(update.address.param_id);
                    writer.write_u8(len as u8);
                    writer.write_bytes(&update.payload);
                }
            }
            MessagePayload::Lock {
                scene_id,
                object_id,
                locked,
            } => {
                writer.write_u8(*scene_id);
                writer.write_i16(*object_id);
                writer.write_bool(*locked);
            }
            MessagePayload::Sync { time } => {
                writer.write_u8(*time);
            }
            MessagePayload::Ping | MessagePayload::ResendUpdate => {}
            MessagePayload::UndoRedoAdd { address } => {
                writer.write_u8(address.scene_id);
                writer.write_i16(address.object_id);
                writer.write_i16(address.param_id);
            }
            MessagePayload::ResetObject {
                scene_id,
                object_id,
            } => {
                writer.write_u8(*scene_id);
                writer.write_i16(*object_id);
            }
            MessagePayload::DataHub {
                hub_kind,
                status,
                client_id,
            } => {
                writer.write_u8(*hub_kind);
                writer.write_bool(*status);
                writer.write_u8(*client_id);
            }
        }

        Ok(writer.to_bytes())
    }

    /// Parses one received frame.
    pub fn from_bytes(frame: &[u8]) -> Result<Self, MessageError> {
        if frame.len() < 3 {
            return Err(MessageError::MissingHeader { len: frame.len() });
        }
        let sender_id = frame[0];
        let time_bucket = frame[1];
        let kind =
            MessageKind::from_byte(frame[2]).ok_or(MessageError::UnknownKind { kind: frame[2] })?;
        let mut reader = ByteReader::new(&frame[3..]);

        let payload = match kind {
            MessageKind::ParameterUpdate => {
                MessagePayload::ParameterUpdate(read_updates(&mut reader)?)
            }
            MessageKind::Rpc => MessagePayload::Rpc(read_updates(&mut reader)?),
            MessageKind::Lock => MessagePayload::Lock {
                scene_id: reader.read_u8()?,
                object_id: reader.read_i16()?,
                locked: reader.read_bool()?,
            },
            MessageKind::Sync => MessagePayload::Sync {
                time: reader.read_u8()?,
            },
            MessageKind::Ping => MessagePayload::Ping,
            MessageKind::ResendUpdate => MessagePayload::ResendUpdate,
            MessageKind::UndoRedoAdd => MessagePayload::UndoRedoAdd {
                address: ParamAddress::new(
                    reader.read_u8()?,
                    reader.read_i16()?,
                    reader.read_i16()?,
                ),
            },
            MessageKind::ResetObject => MessagePayload::ResetObject {
                scene_id: reader.read_u8()?,
                object_id: reader.read_i16()?,
            },
            MessageKind::DataHub => MessagePayload::DataHub {
                hub_kind: reader.read_u8()?,
                status: reader.read_bool()?,
                client_id: reader.read_u8()?,
            },
        };

        Ok(Message {
            sender_id,
            time_bucket,
            payload,
        })
    }
}

/// Walks packed `(address, length, payload)` entries until the frame ends.
fn read_updates(reader: &mut ByteReader) -> Result<Vec<ParamUpdate>, MessageError> {
    let mut updates = Vec::new();
    while !reader.is_empty() {
        let address = ParamAddress::new(reader.read_u8()?, reader.read_i16()?, reader.read_i16()?);
        let len = reader.read_u8()?;
        let payload = reader.read_bytes(usize::from(len))?.to_vec();
        updates.push(ParamUpdate::new(address, payload));
    }
    Ok(updates)
}
