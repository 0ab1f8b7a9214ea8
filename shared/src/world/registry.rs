use std::collections::HashMap;

use crate::scene::descriptor::ParamObjectDescriptor;
use crate::types::{ObjectId, ParamAddress, SceneId};
use crate::world::object::ParameterObject;
use crate::world::parameter::Parameter;

/// The explicitly owned two-level map of every addressable object:
/// `scene id -> object id -> object`. One registry per client, passed by
/// reference wherever it is needed; there is no ambient global state.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    scenes: HashMap<SceneId, HashMap<ObjectId, ParameterObject>>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object under its own `(scene, object)` pair, replacing
    /// any previous occupant.
    pub fn insert(&mut self, object: ParameterObject) {
        self.scenes
            .entry(object.scene_id)
            .or_default()
            .insert(object.object_id, object);
    }

    pub fn object(&self, scene_id: SceneId, object_id: ObjectId) -> Option<&ParameterObject> {
        self.scenes.get(&scene_id)?.get(&object_id)
    }

    pub fn object_mut(
        &mut self,
        scene_id: SceneId,
        object_id: ObjectId,
    ) -> Option<&mut ParameterObject> {
        self.scenes.get_mut(&scene_id)?.get_mut(&object_id)
    }

    pub fn remove(&mut self, scene_id: SceneId, object_id: ObjectId) -> Option<ParameterObject> {
        self.scenes.get_mut(&scene_id)?.remove(&object_id)
    }

    pub fn resolve(&self, address: ParamAddress) -> Option<&Parameter> {
        self.object(address.scene_id, address.object_id)?
            .parameter(address.param_id)
    }

    pub fn resolve_mut(&mut self, address: ParamAddress) -> Option<&mut Parameter> {
        self.object_mut(address.scene_id, address.object_id)?
            .parameter_mut(address.param_id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &ParameterObject> {
        self.scenes.values().flat_map(|scene| scene.values())
    }

    pub fn objects_mut(&mut self) -> impl Iterator<Item = &mut ParameterObject> {
        self.scenes.values_mut().flat_map(|scene| scene.values_mut())
    }

    /// The `(scene, object)` pairs of every registered object.
    pub fn addresses(&self) -> Vec<(SceneId, ObjectId)> {
        self.objects()
            .map(|object| (object.scene_id, object.object_id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.scenes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every object in one scene. Used on scene teardown.
    pub fn clear_scene(&mut self, scene_id: SceneId) {
        self.scenes.remove(&scene_id);
    }

    /// Instantiates objects from decoded snapshot descriptors, each with
    /// default-valued parameters of the described kinds. This is the
    /// callback surface a scene-graph builder uses after decoding.
    pub fn adopt_descriptors(&mut self, descriptors: &[ParamObjectDescriptor]) {
        for descriptor in descriptors {
            let mut object =
                ParameterObject::new(descriptor.scene_id, descriptor.object_id, &descriptor.name);
            for (index, kind) in descriptor.param_kinds.iter().enumerate() {
                let is_rpc = descriptor.rpc_flags.get(index).copied().unwrap_or(false);
                if is_rpc {
                    object.add_rpc_parameter(kind.default_value());
                } else {
                    object.add_parameter(kind.default_value());
                }
            }
            self.insert(object);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::parameter::{ParamKind, ParamValue};

    #[test]
    fn insert_and_resolve() {
        let mut registry = SceneRegistry::new();
        registry.insert(ParameterObject::spatial(1, 5, "cube"));

        let parameter = registry.resolve(ParamAddress::new(1, 5, 0)).unwrap();
        assert_eq!(parameter.kind(), ParamKind::Vec3);
        assert!(registry.resolve(ParamAddress::new(1, 6, 0)).is_none());
        assert!(registry.resolve(ParamAddress::new(2, 5, 0)).is_none());
    }

    #[test]
    fn insert_replaces_the_previous_occupant() {
        let mut registry = SceneRegistry::new();
        registry.insert(ParameterObject::new(1, 5, "old"));
        registry.insert(ParameterObject::spatial(1, 5, "new"));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.object(1, 5).unwrap().name, "new");
    }

    #[test]
    fn adopt_descriptors_rebuilds_objects_with_defaults() {
        let mut source = SceneRegistry::new();
        let mut object = ParameterObject::spatial(1, 3, "lamp");
        object.add_rpc_parameter(ParamValue::Bool(false));
        source.insert(object);

        let descriptors: Vec<_> = source.objects().map(|o| o.descriptor()).collect();

        let mut rebuilt = SceneRegistry::new();
        rebuilt.adopt_descriptors(&descriptors);

        let object = rebuilt.object(1, 3).unwrap();
        assert_eq!(object.name, "lamp");
        assert_eq!(object.parameters().len(), 4);
        assert!(object.parameter(3).unwrap().is_rpc);
        assert_eq!(
            object.parameter(2).unwrap().value(),
            &ParamValue::Vec3([0.0; 3])
        );
    }
}
