use scenelink_serde::{ByteReader, ByteWriter, Serde, SerdeErr};

// 4-byte node-kind tags, written ahead of every node record.
const KIND_GROUP: i32 = 0;
const KIND_GEO: i32 = 1;
const KIND_LIGHT: i32 = 2;
const KIND_CAMERA: i32 = 3;
const KIND_SKINNED_MESH: i32 = 4;
const KIND_CHARACTER: i32 = 5;

/// Fields every node kind carries, in fixed layout order.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeCommon {
    pub name: String,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    /// How many of the following nodes in the list are children of this
    /// one; the list is a flattened depth-first walk of the graph.
    pub child_count: i32,
    pub editable: bool,
}

impl NodeCommon {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: [0.0; 3],
            rotation: [0.0, 0.0, 0.0, 1.0],
            scale: [1.0, 1.0, 1.0],
            child_count: 0,
            editable: false,
        }
    }
}

impl Serde for NodeCommon {
    fn ser(&self, writer: &mut ByteWriter) {
        self.name.ser(writer);
        self.position.ser(writer);
        self.rotation.ser(writer);
        self.scale.ser(writer);
        self.child_count.ser(writer);
        self.editable.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        Ok(Self {
            name: String::de(reader)?,
            position: <[f32; 3]>::de(reader)?,
            rotation: <[f32; 4]>::de(reader)?,
            scale: <[f32; 3]>::de(reader)?,
            child_count: i32::de(reader)?,
            editable: bool::de(reader)?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightKind {
    Spot,
    Directional,
    Point,
    Area,
    None,
}

impl Serde for LightKind {
    fn ser(&self, writer: &mut ByteWriter) {
        let tag: i32 = match self {
            LightKind::Spot => 0,
            LightKind::Directional => 1,
            LightKind::Point => 2,
            LightKind::Area => 3,
            LightKind::None => 4,
        };
        tag.ser(writer);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        match i32::de(reader)? {
            0 => Ok(LightKind::Spot),
            1 => Ok(LightKind::Directional),
            2 => Ok(LightKind::Point),
            3 => Ok(LightKind::Area),
            4 => Ok(LightKind::None),
            _ => Err(SerdeErr),
        }
    }
}

/// One scene-graph entry. The leading 4-byte kind tag on the wire selects
/// which fixed layout follows; there is no virtual dispatch anywhere in the
/// codec.
///
/// `geo_id` and `material_id` are indices into the snapshot's geometry and
/// material lists; `-1` means none. A CHARACTER node carries only the
/// common fields here, with its rig detail in the characters block, keyed
/// by root id.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneNode {
    Group {
        common: NodeCommon,
    },
    Geo {
        common: NodeCommon,
        geo_id: i32,
        material_id: i32,
        color: [f32; 4],
    },
    Light {
        common: NodeCommon,
        light_kind: LightKind,
        color: [f32; 3],
        intensity: f32,
        angle: f32,
        range: f32,
    },
    Camera {
        common: NodeCommon,
        fov: f32,
        aspect: f32,
        near: f32,
        far: f32,
        focal_distance: f32,
        aperture: f32,
    },
    SkinnedMesh {
        common: NodeCommon,
        geo_id: i32,
        material_id: i32,
        color: [f32; 4],
        root_bone_id: i32,
        bounds_center: [f32; 3],
        bounds_extents: [f32; 3],
        bind_poses: Vec<f32>,
        bone_ids: Vec<i32>,
    },
    Character {
        common: NodeCommon,
    },
}

impl SceneNode {
    pub fn common(&self) -> &NodeCommon {
        match self {
            SceneNode::Group { common }
            | SceneNode::Geo { common, .. }
            | SceneNode::Light { common, .. }
            | SceneNode::Camera { common, .. }
            | SceneNode::SkinnedMesh { common, .. }
            | SceneNode::Character { common } => common,
        }
    }

    pub fn kind_tag(&self) -> i32 {
        match self {
            SceneNode::Group { .. } => KIND_GROUP,
            SceneNode::Geo { .. } => KIND_GEO,
            SceneNode::Light { .. } => KIND_LIGHT,
            SceneNode::Camera { .. } => KIND_CAMERA,
            SceneNode::SkinnedMesh { .. } => KIND_SKINNED_MESH,
            SceneNode::Character { .. } => KIND_CHARACTER,
        }
    }
}

impl Serde for SceneNode {
    fn ser(&self, writer: &mut ByteWriter) {
        self.kind_tag().ser(writer);
        match self {
            SceneNode::Group { common } | SceneNode::Character { common } => {
                common.ser(writer);
            }
            SceneNode::Geo {
                common,
                geo_id,
                material_id,
                color,
            } => {
                common.ser(writer);
                geo_id.ser(writer);
                material_id.ser(writer);
                color.ser(writer);
            }
            SceneNode::Light {
                common,
                light_kind,
                color,
                intensity,
                angle,
                range,
            } => {
                common.ser(writer);
                light_kind.ser(writer);
                color.ser(writer);
                intensity.ser(writer);
                angle.ser(writer);
                range.ser(writer);
            }
            SceneNode::Camera {
                common,
                fov,
                aspect,
                near,
                far,
                focal_distance,
                aperture,
            } => {
                common.ser(writer);
                fov.ser(writer);
                aspect.ser(writer);
                near.ser(writer);
                far.ser(writer);
                focal_distance.ser(writer);
                aperture.ser(writer);
            }
            SceneNode::SkinnedMesh {
                common,
                geo_id,
                material_id,
                color,
                root_bone_id,
                bounds_center,
                bounds_extents,
                bind_poses,
                bone_ids,
            } => {
                common.ser(writer);
                geo_id.ser(writer);
                material_id.ser(writer);
                color.ser(writer);
                root_bone_id.ser(writer);
                bounds_center.ser(writer);
                bounds_extents.ser(writer);
                bind_poses.ser(writer);
                bone_ids.ser(writer);
            }
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let kind = i32::de(reader)?;
        match kind {
            KIND_GROUP => Ok(SceneNode::Group {
                common: NodeCommon::de(reader)?,
            }),
            KIND_GEO => Ok(SceneNode::Geo {
                common: NodeCommon::de(reader)?,
                geo_id: i32::de(reader)?,
                material_id: i32::de(reader)?,
                color: <[f32; 4]>::de(reader)?,
            }),
            KIND_LIGHT => Ok(SceneNode::Light {
                common: NodeCommon::de(reader)?,
                light_kind: LightKind::de(reader)?,
                color: <[f32; 3]>::de(reader)?,
                intensity: f32::de(reader)?,
                angle: f32::de(reader)?,
                range: f32::de(reader)?,
            }),
            KIND_CAMERA => Ok(SceneNode::Camera {
                common: NodeCommon::de(reader)?,
                fov: f32::de(reader)?,
                aspect: f32::de(reader)?,
                near: f32::de(reader)?,
                far: f32::de(reader)?,
                focal_distance: f32::de(reader)?,
                aperture: f32::de(reader)?,
            }),
            KIND_SKINNED_MESH => Ok(SceneNode::SkinnedMesh {
                common: NodeCommon::de(reader)?,
                geo_id: i32::de(reader)?,
                material_id: i32::de(reader)?,
                color: <[f32; 4]>::de(reader)?,
                root_bone_id: i32::de(reader)?,
                bounds_center: <[f32; 3]>::de(reader)?,
                bounds_extents: <[f32; 3]>::de(reader)?,
                bind_poses: Vec::<f32>::de(reader)?,
                bone_ids: Vec::<i32>::de(reader)?,
            }),
            KIND_CHARACTER => Ok(SceneNode::Character {
                common: NodeCommon::de(reader)?,
            }),
            _ => Err(SerdeErr),
        }
    }
}
