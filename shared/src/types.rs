pub type SceneId = u8;
pub type ObjectId = i16;
pub type ParamId = i16;
pub type ClientId = u8;
pub type TimeBucket = u8;

/// The universal addressing triple for a parameter. Every wire update and
/// every undo/redo ledger entry identifies its target by this triple.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParamAddress {
    pub scene_id: SceneId,
    pub object_id: ObjectId,
    pub param_id: ParamId,
}

impl ParamAddress {
    pub fn new(scene_id: SceneId, object_id: ObjectId, param_id: ParamId) -> Self {
        Self {
            scene_id,
            object_id,
            param_id,
        }
    }
}
