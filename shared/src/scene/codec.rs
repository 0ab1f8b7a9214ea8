//! Block-level encode/decode. Each snapshot category serializes to its own
//! byte block; blocks are independently sized, independently transmittable,
//! and independently decodable. A missing or malformed block costs one
//! warning and yields an empty category, never a whole-snapshot failure.

use log::warn;

use scenelink_serde::{ByteReader, ByteWriter, Serde};

use crate::scene::snapshot::{SceneHeader, SceneSnapshot};

/// The six byte blocks produced from one snapshot. When persisted they
/// conventionally carry the suffixes `.header` `.nodes` `.objects`
/// `.characters` `.textures` `.materials`; an absent file simply loads as
/// an empty block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneBlocks {
    pub header: Vec<u8>,
    pub nodes: Vec<u8>,
    pub objects: Vec<u8>,
    pub characters: Vec<u8>,
    pub textures: Vec<u8>,
    pub materials: Vec<u8>,
}

impl SceneBlocks {
    /// Total payload size across all six blocks.
    pub fn byte_size(&self) -> usize {
        self.header.len()
            + self.nodes.len()
            + self.objects.len()
            + self.characters.len()
            + self.textures.len()
            + self.materials.len()
    }
}

/// Walks each snapshot list once and flattens it into its block.
pub fn encode(snapshot: &SceneSnapshot) -> SceneBlocks {
    let mut header = ByteWriter::new();
    snapshot.header.sender_id.ser(&mut header);
    snapshot.header.frame_rate.ser(&mut header);
    snapshot.header.light_intensity_scale.ser(&mut header);
    snapshot.descriptors.ser(&mut header);

    SceneBlocks {
        header: header.to_bytes(),
        nodes: encode_list(&snapshot.nodes),
        objects: encode_list(&snapshot.geometries),
        characters: encode_list(&snapshot.characters),
        textures: encode_list(&snapshot.textures),
        materials: encode_list(&snapshot.materials),
    }
}

/// Rebuilds a snapshot from its blocks. Every category decodes on its own;
/// a bad block degrades to an empty list for that category only.
pub fn decode(blocks: &SceneBlocks) -> SceneSnapshot {
    let (header, descriptors) = decode_header(&blocks.header);
    SceneSnapshot {
        header,
        descriptors,
        nodes: decode_list(&blocks.nodes, "nodes"),
        geometries: decode_list(&blocks.objects, "objects"),
        characters: decode_list(&blocks.characters, "characters"),
        textures: decode_list(&blocks.textures, "textures"),
        materials: decode_list(&blocks.materials, "materials"),
    }
}

fn encode_list<T: Serde>(list: &[T]) -> Vec<u8> {
    let mut writer = ByteWriter::new();
    writer.write_i32(list.len() as i32);
    for record in list {
        record.ser(&mut writer);
    }
    writer.to_bytes()
}

fn decode_list<T: Serde>(block: &[u8], category: &str) -> Vec<T> {
    if block.is_empty() {
        warn!("scene block '{category}' is absent, loading an empty list");
        return Vec::new();
    }
    let mut reader = ByteReader::new(block);
    let result = (|| {
        let count = i32::de(&mut reader)?;
        if count < 0 {
            return Err(scenelink_serde::SerdeErr);
        }
        let mut list = Vec::new();
        for _ in 0..count {
            list.push(T::de(&mut reader)?);
        }
        Ok(list)
    })();
    match result {
        Ok(list) => list,
        Err(_) => {
            warn!("scene block '{category}' is malformed, loading an empty list");
            Vec::new()
        }
    }
}

fn decode_header(block: &[u8]) -> (SceneHeader, Vec<crate::ParamObjectDescriptor>) {
    if block.is_empty() {
        warn!("scene block 'header' is absent, loading defaults");
        return (SceneHeader::default(), Vec::new());
    }
    let mut reader = ByteReader::new(block);
    let result = (|| {
        let header = SceneHeader {
            sender_id: u8::de(&mut reader)?,
            frame_rate: u8::de(&mut reader)?,
            light_intensity_scale: f32::de(&mut reader)?,
        };
        let descriptors = Vec::de(&mut reader)?;
        Ok::<_, scenelink_serde::SerdeErr>((header, descriptors))
    })();
    match result {
        Ok(decoded) => decoded,
        Err(_) => {
            warn!("scene block 'header' is malformed, loading defaults");
            (SceneHeader::default(), Vec::new())
        }
    }
}
