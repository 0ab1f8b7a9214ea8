use crate::scene::character::CharacterPackage;
use crate::scene::descriptor::ParamObjectDescriptor;
use crate::scene::geometry::GeometryPackage;
use crate::scene::material::MaterialPackage;
use crate::scene::node::SceneNode;
use crate::scene::texture::TexturePackage;
use crate::types::ClientId;

/// Fixed fields at the front of the header block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneHeader {
    pub sender_id: ClientId,
    pub frame_rate: u8,
    pub light_intensity_scale: f32,
}

impl Default for SceneHeader {
    fn default() -> Self {
        Self {
            sender_id: 0,
            frame_rate: 60,
            light_intensity_scale: 1.0,
        }
    }
}

/// The complete, codec-serializable representation of a scene at one point
/// in time: a header plus six ordered category lists.
///
/// A snapshot is transient. It is assembled from the live scene on demand
/// (for send or save) and consumed once to rebuild a scene (on receive or
/// load); call [`SceneSnapshot::clear`] after either direction of
/// conversion.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneSnapshot {
    pub header: SceneHeader,
    pub descriptors: Vec<ParamObjectDescriptor>,
    pub nodes: Vec<SceneNode>,
    pub geometries: Vec<GeometryPackage>,
    pub characters: Vec<CharacterPackage>,
    pub textures: Vec<TexturePackage>,
    pub materials: Vec<MaterialPackage>,
}

impl SceneSnapshot {
    pub fn new(header: SceneHeader) -> Self {
        Self {
            header,
            ..Self::default()
        }
    }

    /// Adds a geometry unless a package with the same `source_id` is
    /// already present, returning the list index to reference from nodes.
    /// A source mesh shared across many nodes thus serializes exactly once.
    pub fn intern_geometry(&mut self, geometry: GeometryPackage) -> i32 {
        if let Some(index) = self
            .geometries
            .iter()
            .position(|existing| existing.source_id == geometry.source_id)
        {
            return index as i32;
        }
        self.geometries.push(geometry);
        (self.geometries.len() - 1) as i32
    }

    /// Texture twin of [`SceneSnapshot::intern_geometry`].
    pub fn intern_texture(&mut self, texture: TexturePackage) -> i32 {
        if let Some(index) = self
            .textures
            .iter()
            .position(|existing| existing.source_id == texture.source_id)
        {
            return index as i32;
        }
        self.textures.push(texture);
        (self.textures.len() - 1) as i32
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
            && self.nodes.is_empty()
            && self.geometries.is_empty()
            && self.characters.is_empty()
            && self.textures.is_empty()
            && self.materials.is_empty()
    }

    /// Drops all content, keeping the header.
    pub fn clear(&mut self) {
        self.descriptors.clear();
        self.nodes.clear();
        self.geometries.clear();
        self.characters.clear();
        self.textures.clear();
        self.materials.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_deduplicates_by_source_id() {
        let mut snapshot = SceneSnapshot::default();

        let first = snapshot.intern_geometry(GeometryPackage {
            source_id: 10,
            ..GeometryPackage::default()
        });
        let second = snapshot.intern_geometry(GeometryPackage {
            source_id: 11,
            ..GeometryPackage::default()
        });
        let repeat = snapshot.intern_geometry(GeometryPackage {
            source_id: 10,
            ..GeometryPackage::default()
        });

        assert_eq!((first, second, repeat), (0, 1, 0));
        assert_eq!(snapshot.geometries.len(), 2);
    }

    #[test]
    fn texture_interning_matches_geometry_interning() {
        let mut snapshot = SceneSnapshot::default();
        let texture = TexturePackage {
            source_id: 3,
            ..TexturePackage::default()
        };

        assert_eq!(snapshot.intern_texture(texture.clone()), 0);
        assert_eq!(snapshot.intern_texture(texture), 0);
        assert_eq!(snapshot.textures.len(), 1);
    }

    #[test]
    fn clear_empties_every_list_but_keeps_the_header() {
        let mut snapshot = SceneSnapshot::new(SceneHeader {
            sender_id: 9,
            frame_rate: 30,
            light_intensity_scale: 2.0,
        });
        snapshot.intern_texture(TexturePackage::default());

        snapshot.clear();

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.header.sender_id, 9);
    }
}
