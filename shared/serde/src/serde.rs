use crate::{error::SerdeErr, reader::ByteReader, writer::ByteWriter};

/// A type that can be flattened into its wire layout and rebuilt from it.
pub trait Serde: Sized {
    fn ser(&self, writer: &mut ByteWriter);
    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr>;
}

impl Serde for u8 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_u8(*self);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_u8()
    }
}

impl Serde for bool {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_bool(*self);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_bool()
    }
}

impl Serde for i16 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_i16(*self);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_i16()
    }
}

impl Serde for i32 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_i32(*self);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_i32()
    }
}

impl Serde for f32 {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_f32(*self);
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        reader.read_f32()
    }
}

// Fixed-size float arrays are header fields, not variable arrays, so they
// carry no element count.
impl<const N: usize> Serde for [f32; N] {
    fn ser(&self, writer: &mut ByteWriter) {
        for value in self {
            writer.write_f32(*value);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let mut values = [0.0; N];
        for value in &mut values {
            *value = reader.read_f32()?;
        }
        Ok(values)
    }
}

// Length-prefixed ASCII byte run, no terminator.
impl Serde for String {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_i32(self.len() as i32);
        writer.write_bytes(self.as_bytes());
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let len = reader.read_i32()?;
        if len < 0 {
            return Err(SerdeErr);
        }
        let bytes = reader.read_bytes(len as usize)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr)
    }
}

// Variable-length array: 4-byte signed element count, then the elements.
impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut ByteWriter) {
        writer.write_i32(self.len() as i32);
        for element in self {
            element.ser(writer);
        }
    }

    fn de(reader: &mut ByteReader) -> Result<Self, SerdeErr> {
        let count = reader.read_i32()?;
        if count < 0 {
            return Err(SerdeErr);
        }
        let count = count as usize;
        // Every element occupies at least one byte, so a count exceeding the
        // remaining buffer can only come from a malformed frame. Checking up
        // front keeps a hostile count from reserving an enormous allocation.
        if count > reader.remaining() {
            return Err(SerdeErr);
        }
        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(T::de(reader)?);
        }
        Ok(elements)
    }
}
