use scenelink_serde::{ByteReader, ByteWriter, Serde, SerdeErr};

/// One material record: shader source reference, texture bindings (indices
/// into the snapshot's texture list, with per-binding uv offset/scale pairs)
/// and the raw shader property table. `shader_config` is a one-byte-per-
/// element boolean run, as everywhere on the wire.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialPackage {
    pub kind: i32,
    pub name: String,
    pub src: String,
    pub texture_ids: Vec<i32>,
    pub texture_offsets: Vec<f32>,
    pub texture_scales: Vec<f32>,
    pub shader_config: Vec<bool>,
    pub shader_property_ids: Vec<i32>,
    pub shader_property_data: Vec<u8>,
}

impl Serde for MaterialPackage {
    fn ser(&self, writer: &mut ByteWriter) {
        self.kind.ser(writer);
        self.name.ser(writer);
        self.src.ser(writer);
        self.texture_ids.ser(writer);
        self.texture_offsets.ser(writer);
        self.texture_scales.ser(writer);
        self.shader_config.ser(writer);
        self.shader_property_ids.ser(writer);
        self.shader_property_data.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            kind: i32::de(reader)?,
            name: String::de(reader)?,
            src: String::de(reader)?,
            texture_ids: Vec::de(reader)?,
            texture_offsets: Vec::de(reader)?,
            texture_scales: Vec::de(reader)?,
            shader_config: Vec::de(reader)?,
            shader_property_ids: Vec::de(reader)?,
            shader_property_data: Vec::de(reader)?,
        })
    }
}
