//! COPY binary encoding and decoding primitives.
//!
//! The format uses big-endian (network byte order) for all integers.

use crate::error::{Error, Result};
use zerocopy::FromBytes;
use zerocopy::byteorder::big_endian::{I32 as I32BE, U16 as U16BE};

/// Read 2-byte big-endian unsigned integer.
#[inline]
pub fn read_u16(data: &[u8]) -> Result<(u16, &[u8])> {
    let (value, rest) = U16BE::read_from_prefix(data).map_err(|_| Error::TruncatedField {
        expected: 2,
        remaining: data.len(),
    })?;
    Ok((value.get(), rest))
}

/// Read 4-byte big-endian signed integer.
#[inline]
pub fn read_i32(data: &[u8]) -> Result<(i32, &[u8])> {
    let (value, rest) = I32BE::read_from_prefix(data).map_err(|_| Error::TruncatedField {
        expected: 4,
        remaining: data.len(),
    })?;
    Ok((value.get(), rest))
}

/// Read fixed-length bytes.
#[inline]
pub fn read_bytes(data: &[u8], len: usize) -> Result<(&[u8], &[u8])> {
    if data.len() < len {
        return Err(Error::TruncatedField {
            expected: len,
            remaining: data.len(),
        });
    }
    Ok(data.split_at(len))
}

/// Write 2-byte big-endian unsigned integer.
#[inline]
pub fn write_u16(out: &mut Vec<u8>, value: u16) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Write 4-byte big-endian signed integer.
#[inline]
pub fn write_i32(out: &mut Vec<u8>, value: i32) {
    out.extend_from_slice(&value.to_be_bytes());
}

/// Write raw bytes.
#[inline]
pub fn write_bytes(out: &mut Vec<u8>, data: &[u8]) {
    out.extend_from_slice(data);
}

/// Write a length-prefixed field.
///
/// Fails if the payload does not fit into the signed 32-bit length prefix.
#[inline]
pub fn write_field(out: &mut Vec<u8>, data: &[u8]) -> Result<()> {
    let len = i32::try_from(data.len()).map_err(|_| Error::NumericOverflow {
        target: "field length",
        value: data.len() as i128,
    })?;
    write_i32(out, len);
    write_bytes(out, data);
    Ok(())
}

/// Write the NULL marker (length -1, no payload).
#[inline]
pub fn write_null(out: &mut Vec<u8>) {
    write_bytes(out, &super::frame::NULL_FIELD);
}

/// Field builder that back-fills the length prefix.
///
/// Lets a value stream its payload straight into the output buffer instead
/// of building an intermediate `Vec`.
pub struct FieldBuilder<'a> {
    buf: &'a mut Vec<u8>,
    start: usize,
}

impl<'a> FieldBuilder<'a> {
    /// Reserve the length prefix of a new field.
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        let start = buf.len();
        buf.extend_from_slice(&[0, 0, 0, 0]);
        Self { buf, start }
    }

    /// Get mutable access to the underlying buffer.
    pub fn buf(&mut self) -> &mut Vec<u8> {
        self.buf
    }

    /// Write raw bytes.
    pub fn write_bytes(&mut self, data: &[u8]) {
        write_bytes(self.buf, data);
    }

    /// Number of payload bytes written so far.
    pub fn len(&self) -> usize {
        self.buf.len() - self.start - 4
    }

    /// Check if no payload was written.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Finish the field and fill in the length prefix.
    pub fn finish(self) -> Result<()> {
        let len = i32::try_from(self.len()).map_err(|_| Error::NumericOverflow {
            target: "field length",
            value: self.len() as i128,
        })?;
        self.buf[self.start..self.start + 4].copy_from_slice(&len.to_be_bytes());
        Ok(())
    }

    /// Drop the payload and turn the field into NULL.
    pub fn finish_null(self) {
        self.buf.truncate(self.start);
        write_null(self.buf);
    }

    /// Discard the field, length prefix included.
    pub fn abort(self) {
        self.buf.truncate(self.start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u16() {
        let (v, rest) = read_u16(&[0x01, 0x02, 0x03]).unwrap();
        assert_eq!(v, 0x0102);
        assert_eq!(rest, &[0x03]);
    }

    #[test]
    fn test_read_i32_negative() {
        let (v, rest) = read_i32(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(v, -1);
        assert!(rest.is_empty());
    }

    #[test]
    fn test_read_short() {
        assert!(matches!(
            read_i32(&[0, 0]),
            Err(Error::TruncatedField {
                expected: 4,
                remaining: 2
            })
        ));
        assert!(read_bytes(&[1, 2], 3).is_err());
    }

    #[test]
    fn test_field_builder() {
        let mut buf = vec![0xAA];
        let mut field = FieldBuilder::new(&mut buf);
        field.write_bytes(b"abc");
        field.finish().unwrap();
        assert_eq!(buf, [0xAA, 0, 0, 0, 3, b'a', b'b', b'c']);
    }

    #[test]
    fn test_field_builder_null() {
        let mut buf = Vec::new();
        let mut field = FieldBuilder::new(&mut buf);
        field.write_bytes(b"ignored");
        field.finish_null();
        assert_eq!(buf, crate::protocol::frame::NULL_FIELD);
    }

    #[test]
    fn test_field_builder_abort() {
        let mut buf = vec![0xAA];
        let mut field = FieldBuilder::new(&mut buf);
        field.write_bytes(b"partial");
        field.abort();
        assert_eq!(buf, [0xAA]);
    }
}
