//! # Scenelink Shared
//! Common functionality shared between scenelink peers: the addressable
//! parameter model, the scene snapshot codec, the wire message layer, and
//! the publish/subscribe transport boundary.

#![deny(trivial_numeric_casts, unused_import_braces)]

pub use scenelink_serde::{ByteReader, ByteWriter, Serde, SerdeErr};

mod backends;
mod config;
mod types;

pub mod messages;
pub mod scene;
pub mod transport;
pub mod world;

pub use backends::Timer;
pub use config::SyncConfig;
pub use messages::{
    error::MessageError,
    message::{Message, MessageKind, MessagePayload, ParamUpdate},
};
pub use scene::{
    character::CharacterPackage,
    codec::{self, SceneBlocks},
    descriptor::ParamObjectDescriptor,
    geometry::GeometryPackage,
    material::MaterialPackage,
    node::{LightKind, NodeCommon, SceneNode},
    snapshot::{SceneHeader, SceneSnapshot},
    texture::TexturePackage,
};
pub use transport::{PublishSocket, RecvError, SendError, SubscribeSocket, TransportError};
pub use types::{ClientId, ObjectId, ParamAddress, ParamId, SceneId, TimeBucket};
pub use world::{
    error::WorldError,
    events::{ParamEvent, ParamEventBus},
    object::ParameterObject,
    parameter::{Key, KeyType, ParamKind, ParamValue, Parameter},
    registry::SceneRegistry,
};
