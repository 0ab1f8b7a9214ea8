//! # Scenelink Serde
//! Byte-level wire serialization shared between the scenelink crates.
//!
//! Everything on the wire is little-endian: integers are 4-byte signed,
//! floats are 4-byte IEEE-754, strings are length-prefixed ASCII byte runs,
//! and booleans occupy one byte. Variable-length fields are always preceded
//! by a 4-byte signed element count, so no field is self-delimiting.

mod error;
mod reader;
mod serde;
mod writer;

pub use error::SerdeErr;
pub use reader::ByteReader;
pub use serde::Serde;
pub use writer::ByteWriter;
