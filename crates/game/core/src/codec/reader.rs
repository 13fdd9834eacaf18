//! Bounds-checked state reader over a byte slice.

use super::error::{CodecError, Result};

/// One `{ name; length; payload }` frame read from a [`StateReader`].
///
/// By the time a frame is returned, the parent reader is already positioned at
/// `end`. The payload is a separate reader bounded to exactly `length` bytes,
/// so whatever the consumer does with it cannot move the parent cursor.
#[derive(Debug)]
pub struct Frame<'a> {
    pub name: String,
    /// Offset of the frame's first byte (the name prefix) in the parent reader.
    pub start: usize,
    /// Offset one past the frame's last payload byte in the parent reader.
    pub end: usize,
    pub payload: StateReader<'a>,
}

impl Frame<'_> {
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

/// Reader for the persisted state format written by
/// [`StateWriter`](super::StateWriter).
///
/// Every read is bounds-checked and reports [`CodecError::Truncated`] instead
/// of panicking when the input ends early.
#[derive(Clone, Debug)]
pub struct StateReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> StateReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying input.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// True when the cursor is at the end of input.
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn set_position(&mut self, pos: usize) -> Result<()> {
        if pos > self.data.len() {
            return Err(CodecError::Truncated {
                needed: pos - self.pos,
                remaining: self.remaining(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<()> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(CodecError::Truncated {
                needed: n,
                remaining,
            });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Splits off the next `n` bytes as an independent reader.
    pub fn take(&mut self, n: usize) -> Result<StateReader<'a>> {
        self.read_bytes(n).map(StateReader::new)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(CodecError::InvalidBool(other)),
        }
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        self.read_array().map(i32::from_le_bytes)
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        self.read_array().map(i64::from_le_bytes)
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        self.read_array().map(u64::from_le_bytes)
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        self.read_array().map(f32::from_le_bytes)
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        self.read_array().map(f64::from_le_bytes)
    }

    /// Unsigned LEB128, at most five bytes.
    pub fn read_var_u32(&mut self) -> Result<u32> {
        let mut value = 0u32;
        for i in 0..5 {
            let byte = self.read_u8()?;
            let bits = u32::from(byte & 0x7F);
            if i == 4 && bits > 0x0F {
                return Err(CodecError::malformed("var_u32 overflows 32 bits"));
            }
            value |= bits << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(CodecError::malformed("var_u32 longer than 5 bytes"))
    }

    /// Reads a non-negative `i32` length prefix.
    pub fn read_len(&mut self) -> Result<usize> {
        let len = self.read_i32()?;
        usize::try_from(len).map_err(|_| CodecError::InvalidLength(i64::from(len)))
    }

    pub fn read_byte_array(&mut self) -> Result<&'a [u8]> {
        let len = self.read_var_u32()? as usize;
        self.read_bytes(len)
    }

    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_byte_array()?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| CodecError::InvalidUtf8)
    }

    /// Reads one frame header and splits off its payload.
    ///
    /// Fails only if the header itself is unreadable or the advertised length
    /// runs past the end of input; the payload content is not inspected.
    pub fn read_frame(&mut self) -> Result<Frame<'a>> {
        let start = self.pos;
        let name = self.read_string()?;
        let len = self.read_len()?;
        let payload = self.take(len)?;
        Ok(Frame {
            name,
            start,
            end: self.pos,
            payload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::StateWriter;

    #[test]
    fn reads_back_primitives() {
        let mut w = StateWriter::new();
        w.write_i32(-5);
        w.write_u64(42);
        w.write_bool(true);
        w.write_f32(1.5);
        w.write_str("héllo").unwrap();

        let bytes = w.into_bytes();
        let mut r = StateReader::new(&bytes);
        assert_eq!(r.read_i32().unwrap(), -5);
        assert_eq!(r.read_u64().unwrap(), 42);
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_f32().unwrap(), 1.5);
        assert_eq!(r.read_string().unwrap(), "héllo");
        assert!(r.is_empty());
    }

    #[test]
    fn short_input_reports_truncation() {
        let bytes = [1u8, 2];
        let mut r = StateReader::new(&bytes);
        let err = r.read_i32().unwrap_err();
        assert_eq!(
            err,
            CodecError::Truncated {
                needed: 4,
                remaining: 2
            }
        );
        // A failed read does not move the cursor.
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn frame_payload_is_isolated_from_parent() {
        let mut w = StateWriter::new();
        w.write_frame::<CodecError, _>("A", |w| {
            w.write_i32(1);
            w.write_i32(2);
            Ok(())
        })
        .unwrap();
        w.write_i32(99);

        let bytes = w.into_bytes();
        let mut r = StateReader::new(&bytes);
        let mut frame = r.read_frame().unwrap();
        assert_eq!(frame.name, "A");
        assert_eq!(frame.payload_len(), 8);
        assert_eq!(frame.payload.read_i32().unwrap(), 1);
        // Over-reading the payload fails inside the frame only.
        assert!(frame.payload.read_u64().unwrap_err().is_truncation());

        assert_eq!(r.position(), frame.end);
        assert_eq!(r.read_i32().unwrap(), 99);
    }

    #[test]
    fn negative_frame_length_is_rejected() {
        let mut w = StateWriter::new();
        w.write_str("X").unwrap();
        w.write_i32(-1);
        let bytes = w.into_bytes();

        let err = StateReader::new(&bytes).read_frame().unwrap_err();
        assert_eq!(err, CodecError::InvalidLength(-1));
    }

    #[test]
    fn oversized_var_u32_is_malformed() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
        let err = StateReader::new(&bytes).read_var_u32().unwrap_err();
        assert!(matches!(err, CodecError::Malformed(_)));
    }
}
