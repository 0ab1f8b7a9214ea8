use thiserror::Error;

use crate::types::{ObjectId, ParamId, SceneId};
use crate::world::parameter::ParamKind;

/// Errors that can occur when addressing or mutating the parameter model
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldError {
    /// No object is registered under this `(scene, object)` pair
    #[error("no object registered at scene {scene_id}, object {object_id}")]
    UnknownObject {
        scene_id: SceneId,
        object_id: ObjectId,
    },

    /// The object exists but has no parameter at this index
    #[error("object at scene {scene_id}, object {object_id} has no parameter {param_id}")]
    UnknownParameter {
        scene_id: SceneId,
        object_id: ObjectId,
        param_id: ParamId,
    },

    /// A value of the wrong kind was written into a typed parameter cell
    #[error("parameter holds {expected:?} but was given {found:?}")]
    KindMismatch {
        expected: ParamKind,
        found: ParamKind,
    },
}
