use scenelink_serde::{ByteReader, ByteWriter, Serde, SerdeErr};

/// One texture payload. Like geometries, textures are deduplicated during
/// snapshot assembly by `source_id` and referenced by list index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TexturePackage {
    pub source_id: i32,
    pub width: i32,
    pub height: i32,
    pub format: i32,
    pub data: Vec<u8>,
}

impl Serde for TexturePackage {
    fn ser(&self, writer: &mut ByteWriter) {
        self.source_id.ser(writer);
        self.width.ser(writer);
        self.height.ser(writer);
        self.format.ser(writer);
        self.data.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            source_id: i32::de(reader)?,
            width: i32::de(reader)?,
            height: i32::de(reader)?,
            format: i32::de(reader)?,
            data: Vec::de(reader)?,
        })
    }
}
