use scenelink_serde::{ByteReader, ByteWriter, Serde, SerdeErr};

/// Rig detail for one skinned character: bone and skeleton id mappings plus
/// the rest-pose transforms, as flat runs (3 floats per bone position and
/// scale, 4 per rotation). `root_id` keys the package to its CHARACTER node.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CharacterPackage {
    pub root_id: i32,
    pub bone_mapping: Vec<i32>,
    pub skeleton_mapping: Vec<i32>,
    pub bone_positions: Vec<f32>,
    pub bone_rotations: Vec<f32>,
    pub bone_scales: Vec<f32>,
}

impl Serde for CharacterPackage {
    fn ser(&self, writer: &mut ByteWriter) {
        self.root_id.ser(writer);
        self.bone_mapping.ser(writer);
        self.skeleton_mapping.ser(writer);
        self.bone_positions.ser(writer);
        self.bone_rotations.ser(writer);
        self.bone_scales.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            root_id: i32::de(reader)?,
            bone_mapping: Vec::de(reader)?,
            skeleton_mapping: Vec::de(reader)?,
            bone_positions: Vec::de(reader)?,
            bone_rotations: Vec::de(reader)?,
            bone_scales: Vec::de(reader)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let character = CharacterPackage {
            root_id: 4,
            bone_mapping: vec![0, 1, 2, -1],
            skeleton_mapping: vec![4, 5, 6],
            bone_positions: vec![0.0; 9],
            bone_rotations: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            bone_scales: vec![1.0; 6],
        };
        let mut writer = ByteWriter::new();
        character.ser(&mut writer);
        let bytes = writer.to_bytes();
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(CharacterPackage::de(&mut reader).unwrap(), character);
    }
}
