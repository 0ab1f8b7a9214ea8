//! The scene snapshot codec: converts a [`snapshot::SceneSnapshot`] to and
//! from six category-separated byte blocks, and back, without loss,
//! independent of the in-memory scene representation.

pub mod character;
pub mod codec;
pub mod descriptor;
pub mod geometry;
pub mod material;
pub mod node;
pub mod snapshot;
pub mod texture;
