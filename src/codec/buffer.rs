//! Byte buffer used by every serializable type.
//!
//! Fields are written back to back with no padding. Multi-byte values are
//! little endian, floats are IEEE-754 single precision.

/// Errors raised while reading serialized data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("Unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },
    #[error("Unknown pattern layer kind {0}")]
    UnknownLayerKind(u8),
    #[error("Invalid pattern layer count {0}")]
    LayerCount(u8),
    #[error("Pattern layers out of order or duplicated")]
    LayerOrder,
    #[error("Palette index {0} out of range")]
    PaletteIndex(u8),
    #[error("Pattern plane is not a unit vector")]
    PlaneNotNormal,
    #[error("{0} trailing bytes after genome")]
    TrailingBytes(usize),
}

/// Append/read cursor over a growable byte sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteBuffer {
    bytes: Vec<u8>,
    cursor: usize,
}

impl ByteBuffer {
    /// Create an empty buffer for writing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing bytes for reading from the start.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes, cursor: 0 }
    }

    /// All bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the buffer and return its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Total byte count.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if no bytes were written.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.cursor
    }

    pub fn write_u8(&mut self, value: u8) {
        self.bytes.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn read_u8(&mut self) -> Result<u8, FormatError> {
        let [b] = self.take::<1>()?;
        Ok(b)
    }

    pub fn read_u16(&mut self) -> Result<u16, FormatError> {
        Ok(u16::from_le_bytes(self.take::<2>()?))
    }

    pub fn read_f32(&mut self) -> Result<f32, FormatError> {
        Ok(f32::from_le_bytes(self.take::<4>()?))
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], FormatError> {
        let remaining = self.remaining();
        if remaining < N {
            return Err(FormatError::UnexpectedEnd {
                needed: N,
                remaining,
            });
        }

        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.cursor..self.cursor + N]);
        self.cursor += N;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_fields() {
        let mut buffer = ByteBuffer::new();
        buffer.write_u8(0xAB);
        buffer.write_u16(0xBEEF);
        buffer.write_f32(-0.75);
        assert_eq!(buffer.len(), 7);

        // Little endian on the wire
        assert_eq!(&buffer.as_bytes()[1..3], &[0xEF, 0xBE]);

        let mut reader = ByteBuffer::from_bytes(buffer.into_bytes());
        assert_eq!(reader.read_u8().unwrap(), 0xAB);
        assert_eq!(reader.read_u16().unwrap(), 0xBEEF);
        assert_eq!(reader.read_f32().unwrap(), -0.75);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_past_end() {
        let mut reader = ByteBuffer::from_bytes(vec![1, 2, 3]);
        assert_eq!(reader.read_u16().unwrap(), 0x0201);
        assert_eq!(
            reader.read_f32(),
            Err(FormatError::UnexpectedEnd {
                needed: 4,
                remaining: 1
            })
        );

        // A failed read does not move the cursor
        assert_eq!(reader.read_u8().unwrap(), 3);
    }
}
