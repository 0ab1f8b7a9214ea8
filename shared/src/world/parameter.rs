use scenelink_serde::{ByteReader, ByteWriter, Serde, SerdeErr};

use crate::types::ParamId;
use crate::world::error::WorldError;

/// Discriminates the value layouts a parameter can carry. The tag values
/// are the 4-byte kind ids written into parameter-object descriptors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Quat,
    Color,
    Str,
}

impl ParamKind {
    pub fn tag(&self) -> i32 {
        match self {
            ParamKind::Bool => 0,
            ParamKind::Int => 1,
            ParamKind::Float => 2,
            ParamKind::Vec2 => 3,
            ParamKind::Vec3 => 4,
            ParamKind::Vec4 => 5,
            ParamKind::Quat => 6,
            ParamKind::Color => 7,
            ParamKind::Str => 8,
        }
    }

    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(ParamKind::Bool),
            1 => Some(ParamKind::Int),
            2 => Some(ParamKind::Float),
            3 => Some(ParamKind::Vec2),
            4 => Some(ParamKind::Vec3),
            5 => Some(ParamKind::Vec4),
            6 => Some(ParamKind::Quat),
            7 => Some(ParamKind::Color),
            8 => Some(ParamKind::Str),
            _ => None,
        }
    }

    /// The neutral value a freshly built parameter of this kind holds.
    pub fn default_value(&self) -> ParamValue {
        match self {
            ParamKind::Bool => ParamValue::Bool(false),
            ParamKind::Int => ParamValue::Int(0),
            ParamKind::Float => ParamValue::Float(0.0),
            ParamKind::Vec2 => ParamValue::Vec2([0.0; 2]),
            ParamKind::Vec3 => ParamValue::Vec3([0.0; 3]),
            ParamKind::Vec4 => ParamValue::Vec4([0.0; 4]),
            ParamKind::Quat => ParamValue::Quat([0.0, 0.0, 0.0, 1.0]),
            ParamKind::Color => ParamValue::Color([0.0, 0.0, 0.0, 1.0]),
            ParamKind::Str => ParamValue::Str(String::new()),
        }
    }
}

impl Serde for ParamKind {
    fn ser(&self, writer: &mut ByteWriter) {
        self.tag().ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        ParamKind::from_tag(i32::de(reader)?).ok_or(SerdeErr)
    }
}

/// A typed parameter value. The raw-bytes encoding is not self-describing:
/// the receiver resolves the target parameter first and decodes against its
/// kind, which keeps per-field wire overhead at a single length byte.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    Quat([f32; 4]),
    Color([f32; 4]),
    Str(String),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Bool(_) => ParamKind::Bool,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Vec2(_) => ParamKind::Vec2,
            ParamValue::Vec3(_) => ParamKind::Vec3,
            ParamValue::Vec4(_) => ParamKind::Vec4,
            ParamValue::Quat(_) => ParamKind::Quat,
            ParamValue::Color(_) => ParamKind::Color,
            ParamValue::Str(_) => ParamKind::Str,
        }
    }

    /// Flattens the value into the raw payload bytes of a parameter-update
    /// entry. The message layer prepends the one-byte length.
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        match self {
            ParamValue::Bool(value) => writer.write_bool(*value),
            ParamValue::Int(value) => writer.write_i32(*value),
            ParamValue::Float(value) => writer.write_f32(*value),
            ParamValue::Vec2(values) => values.ser(&mut writer),
            ParamValue::Vec3(values) => values.ser(&mut writer),
            ParamValue::Vec4(values) | ParamValue::Quat(values) | ParamValue::Color(values) => {
                values.ser(&mut writer)
            }
            // the length byte already delimits the run, so no inner prefix
            ParamValue::Str(value) => writer.write_bytes(value.as_bytes()),
        }
        writer.to_bytes()
    }

    /// Rebuilds a value of the given kind from raw payload bytes. A payload
    /// whose length does not match the kind's layout is an error.
    pub fn decode(kind: ParamKind, payload: &[u8]) -> Result<Self, SerdeErr> {
        let mut reader = ByteReader::new(payload);
        let value = match kind {
            ParamKind::Bool => ParamValue::Bool(reader.read_bool()?),
            ParamKind::Int => ParamValue::Int(reader.read_i32()?),
            ParamKind::Float => ParamValue::Float(reader.read_f32()?),
            ParamKind::Vec2 => ParamValue::Vec2(<[f32; 2]>::de(&mut reader)?),
            ParamKind::Vec3 => ParamValue::Vec3(<[f32; 3]>::de(&mut reader)?),
            ParamKind::Vec4 => ParamValue::Vec4(<[f32; 4]>::de(&mut reader)?),
            ParamKind::Quat => ParamValue::Quat(<[f32; 4]>::de(&mut reader)?),
            ParamKind::Color => ParamValue::Color(<[f32; 4]>::de(&mut reader)?),
            ParamKind::Str => {
                let bytes = reader.read_bytes(reader.remaining())?;
                ParamValue::Str(String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr)?)
            }
        };
        if !reader.is_empty() {
            return Err(SerdeErr);
        }
        Ok(value)
    }
}

/// Interpolation behavior of an animation key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyType {
    Step,
    Linear,
    Bezier,
}

/// One animation key: a value pinned to a point on the timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Key {
    pub time: f32,
    pub key_type: KeyType,
    pub value: ParamValue,
}

/// A typed value cell, addressed by its index within the owning object's
/// parameter list.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    id: ParamId,
    kind: ParamKind,
    value: ParamValue,
    default: ParamValue,
    /// RPC parameters fire and forget: their updates apply on arrival and
    /// are never buffered or recorded in history.
    pub is_rpc: bool,
    pub is_animated: bool,
    pub keys: Vec<Key>,
}

impl Parameter {
    pub fn new(id: ParamId, value: ParamValue) -> Self {
        Self {
            id,
            kind: value.kind(),
            default: value.clone(),
            value,
            is_rpc: false,
            is_animated: false,
            keys: Vec::new(),
        }
    }

    pub fn rpc(id: ParamId, value: ParamValue) -> Self {
        let mut parameter = Self::new(id, value);
        parameter.is_rpc = true;
        parameter
    }

    pub fn id(&self) -> ParamId {
        self.id
    }

    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    pub fn value(&self) -> &ParamValue {
        &self.value
    }

    pub fn default_value(&self) -> &ParamValue {
        &self.default
    }

    /// Writes a new value into the cell. The cell keeps its kind for life;
    /// a mismatched write is refused.
    pub fn set(&mut self, value: ParamValue) -> Result<(), WorldError> {
        if value.kind() != self.kind {
            return Err(WorldError::KindMismatch {
                expected: self.kind,
                found: value.kind(),
            });
        }
        self.value = value;
        Ok(())
    }

    /// Returns the cell to its default value, dropping any animation keys.
    pub fn reset(&mut self) {
        self.value = self.default.clone();
        self.is_animated = false;
        self.keys.clear();
    }

    pub fn encode_payload(&self) -> Vec<u8> {
        self.value.encode()
    }

    /// Deserializes an incoming payload directly into the cell.
    pub fn apply_payload(&mut self, payload: &[u8]) -> Result<(), SerdeErr> {
        self.value = ParamValue::decode(self.kind, payload)?;
        Ok(())
    }
}
