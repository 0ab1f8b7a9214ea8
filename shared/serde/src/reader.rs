use crate::error::SerdeErr;

/// A sequential cursor over a received byte buffer.
///
/// Every read advances the cursor; running off the end of the buffer
/// returns `SerdeErr` rather than panicking, since the buffer contents are
/// untrusted network data.
pub struct ByteReader<'b> {
    buffer: &'b [u8],
    cursor: usize,
}

impl<'b> ByteReader<'b> {
    pub fn new(buffer: &'b [u8]) -> Self {
        Self { buffer, cursor: 0 }
    }

    /// Number of bytes left to read.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8, SerdeErr> {
        let byte = *self.buffer.get(self.cursor).ok_or(SerdeErr)?;
        self.cursor += 1;
        Ok(byte)
    }

    pub fn read_bool(&mut self) -> Result<bool, SerdeErr> {
        Ok(self.read_u8()? != 0)
    }

    pub fn read_i16(&mut self) -> Result<i16, SerdeErr> {
        let bytes: [u8; 2] = self.read_array()?;
        Ok(i16::from_le_bytes(bytes))
    }

    pub fn read_i32(&mut self) -> Result<i32, SerdeErr> {
        let bytes: [u8; 4] = self.read_array()?;
        Ok(i32::from_le_bytes(bytes))
    }

    pub fn read_f32(&mut self) -> Result<f32, SerdeErr> {
        let bytes: [u8; 4] = self.read_array()?;
        Ok(f32::from_le_bytes(bytes))
    }

    /// Reads `len` raw bytes, borrowing from the underlying buffer.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'b [u8], SerdeErr> {
        if len > self.remaining() {
            return Err(SerdeErr);
        }
        let slice = &self.buffer[self.cursor..self.cursor + len];
        self.cursor += len;
        Ok(slice)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], SerdeErr> {
        let slice = self.read_bytes(N)?;
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(slice);
        Ok(bytes)
    }
}
