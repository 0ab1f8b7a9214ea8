use scenelink_serde::{ByteReader, ByteWriter, Serde, SerdeErr};

use crate::types::{ObjectId, SceneId};
use crate::world::parameter::ParamKind;

/// Wire description of one dynamic parameter object: enough for a
/// receiving peer to rebuild the object with default-valued parameters of
/// the right kinds. Carried in the header block, after the fixed header
/// fields.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamObjectDescriptor {
    pub scene_id: SceneId,
    pub object_id: ObjectId,
    pub name: String,
    pub param_kinds: Vec<ParamKind>,
    pub rpc_flags: Vec<bool>,
}

impl Serde for ParamObjectDescriptor {
    fn ser(&self, writer: &mut ByteWriter) {
        self.scene_id.ser(writer);
        self.object_id.ser(writer);
        self.name.ser(writer);
        self.param_kinds.ser(writer);
        self.rpc_flags.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            scene_id: SceneId::de(reader)?,
            object_id: ObjectId::de(reader)?,
            name: String::de(reader)?,
            param_kinds: Vec::de(reader)?,
            rpc_flags: Vec::de(reader)?,
        })
    }
}
