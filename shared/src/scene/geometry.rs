use scenelink_serde::{ByteReader, ByteWriter, Serde, SerdeErr};

/// One mesh payload. Nodes reference geometries by list index; a source
/// mesh shared by many nodes is interned once (see
/// [`crate::scene::snapshot::SceneSnapshot::intern_geometry`]) and
/// `source_id` is the identity that dedup keys on.
///
/// Vertices, normals and uvs are flat float runs (3, 3 and 2 components
/// per vertex); bone weights run 4 per vertex, parallel to bone indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GeometryPackage {
    pub source_id: i32,
    pub vertices: Vec<f32>,
    pub indices: Vec<i32>,
    pub normals: Vec<f32>,
    pub uvs: Vec<f32>,
    pub bone_weights: Vec<f32>,
    pub bone_indices: Vec<i32>,
}

impl Serde for GeometryPackage {
    fn ser(&self, writer: &mut ByteWriter) {
        self.source_id.ser(writer);
        self.vertices.ser(writer);
        self.indices.ser(writer);
        self.normals.ser(writer);
        self.uvs.ser(writer);
        self.bone_weights.ser(writer);
        self.bone_indices.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            source_id: i32::de(reader)?,
            vertices: Vec::de(reader)?,
            indices: Vec::de(reader)?,
            normals: Vec::de(reader)?,
            uvs: Vec::de(reader)?,
            bone_weights: Vec::de(reader)?,
            bone_indices: Vec::de(reader)?,
        })
    }
}
