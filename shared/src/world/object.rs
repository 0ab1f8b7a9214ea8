use crate::scene::descriptor::ParamObjectDescriptor;
use crate::types::{ObjectId, ParamId, SceneId};
use crate::world::parameter::{ParamValue, Parameter};

/// An addressable, lockable collection of parameters. The parameter list is
/// ordered; a parameter's position in the list is its wire-level id.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterObject {
    pub scene_id: SceneId,
    pub object_id: ObjectId,
    pub name: String,
    /// Set while any peer (this client included) holds the object for
    /// editing. Checking it before mutating is the caller's job; the core
    /// only flags state.
    pub locked: bool,
    parameters: Vec<Parameter>,
}

impl ParameterObject {
    pub fn new(scene_id: SceneId, object_id: ObjectId, name: impl Into<String>) -> Self {
        Self {
            scene_id,
            object_id,
            name: name.into(),
            locked: false,
            parameters: Vec::new(),
        }
    }

    /// The standard editable transform triple: position, rotation, scale,
    /// at parameter ids 0, 1, 2.
    pub fn spatial(scene_id: SceneId, object_id: ObjectId, name: impl Into<String>) -> Self {
        let mut object = Self::new(scene_id, object_id, name);
        object.add_parameter(ParamValue::Vec3([0.0; 3]));
        object.add_parameter(ParamValue::Quat([0.0, 0.0, 0.0, 1.0]));
        object.add_parameter(ParamValue::Vec3([1.0, 1.0, 1.0]));
        object
    }

    /// Appends a parameter whose default is the given value, returning the
    /// id it was assigned.
    pub fn add_parameter(&mut self, value: ParamValue) -> ParamId {
        let id = self.parameters.len() as ParamId;
        self.parameters.push(Parameter::new(id, value));
        id
    }

    pub fn add_rpc_parameter(&mut self, value: ParamValue) -> ParamId {
        let id = self.parameters.len() as ParamId;
        self.parameters.push(Parameter::rpc(id, value));
        id
    }

    pub fn parameter(&self, id: ParamId) -> Option<&Parameter> {
        usize::try_from(id).ok().and_then(|i| self.parameters.get(i))
    }

    pub fn parameter_mut(&mut self, id: ParamId) -> Option<&mut Parameter> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.parameters.get_mut(i))
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Returns every parameter to its default.
    pub fn reset_all(&mut self) {
        for parameter in &mut self.parameters {
            parameter.reset();
        }
    }

    /// The wire description a receiving peer needs to rebuild this object
    /// with default-valued parameters.
    pub fn descriptor(&self) -> ParamObjectDescriptor {
        ParamObjectDescriptor {
            scene_id: self.scene_id,
            object_id: self.object_id,
            name: self.name.clone(),
            param_kinds: self.parameters.iter().map(|p| p.kind()).collect(),
            rpc_flags: self.parameters.iter().map(|p| p.is_rpc).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::parameter::ParamKind;

    #[test]
    fn parameter_id_is_the_list_position() {
        let mut object = ParameterObject::new(1, 5, "lamp");
        assert_eq!(object.add_parameter(ParamValue::Float(1.0)), 0);
        assert_eq!(object.add_parameter(ParamValue::Bool(false)), 1);
        assert_eq!(object.parameter(1).unwrap().kind(), ParamKind::Bool);
        assert!(object.parameter(2).is_none());
        assert!(object.parameter(-1).is_none());
    }

    #[test]
    fn spatial_object_has_the_transform_triple() {
        let object = ParameterObject::spatial(1, 5, "cube");
        assert_eq!(object.parameters().len(), 3);
        assert_eq!(object.parameter(0).unwrap().kind(), ParamKind::Vec3);
        assert_eq!(object.parameter(1).unwrap().kind(), ParamKind::Quat);
        assert_eq!(
            object.parameter(2).unwrap().value(),
            &ParamValue::Vec3([1.0, 1.0, 1.0])
        );
    }

    #[test]
    fn descriptor_mirrors_the_parameter_list() {
        let mut object = ParameterObject::spatial(2, 9, "rig");
        object.add_rpc_parameter(ParamValue::Bool(false));

        let descriptor = object.descriptor();
        assert_eq!(descriptor.scene_id, 2);
        assert_eq!(descriptor.object_id, 9);
        assert_eq!(descriptor.param_kinds.len(), 4);
        assert_eq!(descriptor.rpc_flags, vec![false, false, false, true]);
    }
}
