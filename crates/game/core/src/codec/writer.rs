//! Growable little-endian state writer with length backpatching.

use super::error::{CodecError, Result};

/// Reserved 4-byte slot in a [`StateWriter`] awaiting a value.
#[must_use = "a reserved slot must be patched"]
#[derive(Debug)]
pub struct Placeholder {
    offset: usize,
}

impl Placeholder {
    /// Byte offset of the slot in the writer's buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Writer for the persisted state format.
///
/// Integers and floats are little-endian. Strings and byte arrays carry an
/// unsigned LEB128 length prefix. Frames are written as
/// ```text
/// [name: string][length: i32][payload: length bytes]
/// ```
/// where `length` is backpatched once the payload has been written.
#[derive(Clone, Debug, Default)]
pub struct StateWriter {
    buf: Vec<u8>,
}

impl StateWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Current write offset.
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Discards everything written after `position`.
    pub fn truncate(&mut self, position: usize) {
        self.buf.truncate(position);
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f32(&mut self, value: f32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_f64(&mut self, value: f64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    /// Unsigned LEB128.
    pub fn write_var_u32(&mut self, mut value: u32) {
        while value >= 0x80 {
            self.buf.push((value as u8) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_byte_array(value.as_bytes())
    }

    /// Writes raw bytes without a length prefix.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Writes bytes with a LEB128 length prefix.
    pub fn write_byte_array(&mut self, bytes: &[u8]) -> Result<()> {
        let len = u32::try_from(bytes.len())
            .map_err(|_| CodecError::InvalidLength(bytes.len() as i64))?;
        self.write_var_u32(len);
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Reserves a 4-byte slot to be filled later with [`Self::patch_i32`].
    pub fn reserve_i32(&mut self) -> Placeholder {
        let offset = self.buf.len();
        self.buf.extend_from_slice(&[0; 4]);
        Placeholder { offset }
    }

    pub fn patch_i32(&mut self, slot: Placeholder, value: i32) {
        self.buf[slot.offset..slot.offset + 4].copy_from_slice(&value.to_le_bytes());
    }

    /// Fills a reserved slot with the number of bytes written after it.
    pub fn patch_length(&mut self, slot: Placeholder) -> Result<()> {
        let written = self.buf.len() - (slot.offset + 4);
        let len = i32::try_from(written).map_err(|_| CodecError::InvalidLength(written as i64))?;
        self.patch_i32(slot, len);
        Ok(())
    }

    /// Writes one self-delimiting frame.
    ///
    /// If `body` fails, everything written for this frame (including the name)
    /// is discarded and the error is returned; the writer is left exactly as
    /// it was before the call.
    pub fn write_frame<E, F>(&mut self, name: &str, body: F) -> std::result::Result<(), E>
    where
        E: From<CodecError>,
        F: FnOnce(&mut Self) -> std::result::Result<(), E>,
    {
        let start = self.position();
        let result = self.write_str(name).map_err(E::from).and_then(|()| {
            let slot = self.reserve_i32();
            body(self)?;
            self.patch_length(slot).map_err(E::from)
        });
        if result.is_err() {
            self.truncate(start);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_u32_encoding() {
        let mut w = StateWriter::new();
        w.write_var_u32(3);
        w.write_var_u32(300);
        assert_eq!(w.as_bytes(), &[0x03, 0xAC, 0x02]);
    }

    #[test]
    fn frame_length_is_backpatched() {
        let mut w = StateWriter::new();
        w.write_frame::<CodecError, _>("Foo", |w| {
            w.write_bytes(&[0x41, 0x42]);
            Ok(())
        })
        .unwrap();

        assert_eq!(
            w.as_bytes(),
            &[3, b'F', b'o', b'o', 2, 0, 0, 0, 0x41, 0x42]
        );
    }

    #[test]
    fn failed_frame_is_rolled_back() {
        let mut w = StateWriter::new();
        w.write_i32(7);
        let result = w.write_frame::<CodecError, _>("Bad", |w| {
            w.write_bytes(&[1, 2, 3]);
            Err(CodecError::malformed("boom"))
        });

        assert!(result.is_err());
        assert_eq!(w.as_bytes(), &7i32.to_le_bytes());
    }
}
