//! COPY binary payload encoder.

use crate::conversion::{ToRow, ToWireValue};
use crate::error::{Error, Result};
use crate::protocol::codec::{write_bytes, write_u16};
use crate::protocol::frame::{CopyHeader, END_MARKER, HEADER_LEN};
use zerocopy::IntoBytes;

/// Largest field count a row can declare; `0xFFFF` is the end marker.
pub const MAX_FIELDS: usize = u16::MAX as usize - 1;

/// Append one row (`u16` field count followed by the fields) to `buf`.
///
/// On error `buf` is truncated back to its length before the call, so a
/// failed row leaves no partial bytes behind. Conversion errors carry the
/// position of the offending field.
pub fn encode_row<R: ToRow + ?Sized>(row: &R, buf: &mut Vec<u8>) -> Result<()> {
    let start = buf.len();
    let result = write_row_at(row, buf);
    if result.is_err() {
        buf.truncate(start);
    }
    result
}

fn write_row_at<R: ToRow + ?Sized>(row: &R, buf: &mut Vec<u8>) -> Result<()> {
    let count = row.field_count();
    if count > MAX_FIELDS {
        return Err(Error::NumericOverflow {
            target: "field count",
            value: count as i128,
        });
    }
    write_u16(buf, count as u16);
    row.to_binary(buf)
}

/// Encode a row of heterogeneous values into a standalone byte vector.
///
/// The result has no header or end marker; combine with [`wrap_rows`] or
/// [`CopyWriter::write_encoded`].
///
/// ```
/// use zero_pgcopy::values_to_bytes;
///
/// let bytes = values_to_bytes(&[&"abc", &true, &None::<i32>]).unwrap();
/// assert_eq!(&bytes[..2], &[0, 3]);
/// ```
pub fn values_to_bytes(values: &[&dyn ToWireValue]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_row(values, &mut buf)?;
    Ok(buf)
}

/// Wrap an already encoded row body in the file header and end marker.
pub fn wrap_rows(body: &[u8]) -> Vec<u8> {
    let mut writer = CopyWriter::with_capacity(body.len());
    writer.write_encoded(body);
    writer.finish()
}

/// Encode rows into a complete payload.
///
/// ```
/// let payload = zero_pgcopy::encode_rows([("abc", true), ("", false)]).unwrap();
/// let rows: Vec<(String, bool)> = zero_pgcopy::decode_collect(&payload).unwrap();
/// assert_eq!(rows[1], (String::new(), false));
/// ```
pub fn encode_rows<I, R>(rows: I) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = R>,
    R: ToRow,
{
    let mut writer = CopyWriter::new();
    for row in rows {
        writer.write_row(&row)?;
    }
    Ok(writer.finish())
}

/// Builder for a complete COPY binary payload.
///
/// `new()` writes the header, rows are appended one by one, and `finish()`
/// appends the end marker and hands out the buffer.
#[derive(Debug, Clone)]
pub struct CopyWriter {
    buf: Vec<u8>,
    rows: usize,
}

impl CopyWriter {
    /// Create a writer with the header already written.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a writer with room for `capacity` bytes of row data.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::with_capacity(HEADER_LEN + capacity + END_MARKER.len());
        write_bytes(&mut buf, CopyHeader::new().as_bytes());
        Self { buf, rows: 0 }
    }

    /// Append a row.
    ///
    /// A failed row writes nothing; the writer stays usable.
    pub fn write_row<R: ToRow + ?Sized>(&mut self, row: &R) -> Result<()> {
        encode_row(row, &mut self.buf)?;
        self.rows += 1;
        tracing::trace!("encoded row {}: {} fields", self.rows, row.field_count());
        Ok(())
    }

    /// Append a row of heterogeneous values.
    pub fn write_values(&mut self, values: &[&dyn ToWireValue]) -> Result<()> {
        self.write_row(values)
    }

    /// Append pre-encoded row bytes verbatim.
    ///
    /// The bytes are not validated and do not count towards [`rows`](Self::rows).
    pub fn write_encoded(&mut self, rows: &[u8]) {
        write_bytes(&mut self.buf, rows);
    }

    /// Number of rows written with `write_row` / `write_values`.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Bytes written so far, header included.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if no row data follows the header.
    pub fn is_empty(&self) -> bool {
        self.buf.len() == HEADER_LEN
    }

    /// Append the end marker and return the payload.
    pub fn finish(mut self) -> Vec<u8> {
        write_bytes(&mut self.buf, &END_MARKER);
        tracing::debug!("finished COPY payload: {} rows, {} bytes", self.rows, self.buf.len());
        self.buf
    }
}

impl Default for CopyWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::{DriverValue, Valued, Valuer};
    use crate::protocol::frame::SIGNATURE;

    struct Broken;

    impl Valuer for Broken {
        fn value(&self) -> Result<DriverValue> {
            Ok(DriverValue::Float(1.5))
        }
    }

    #[test]
    fn test_empty_payload() {
        let payload = CopyWriter::new().finish();
        assert_eq!(payload.len(), HEADER_LEN + 2);
        assert_eq!(&payload[..11], &SIGNATURE);
        assert_eq!(&payload[11..HEADER_LEN], &[0; 8]);
        assert_eq!(&payload[HEADER_LEN..], &END_MARKER);
    }

    #[test]
    fn test_encode_row_bytes() {
        let mut buf = Vec::new();
        encode_row(&(7_i16, "", None::<bool>), &mut buf).unwrap();
        assert_eq!(
            buf,
            [0, 3, 0, 0, 0, 2, 0, 7, 0, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF]
        );
    }

    #[test]
    fn test_failed_row_leaves_no_bytes() {
        let mut writer = CopyWriter::new();
        writer.write_row(&(1_i32,)).unwrap();
        let before = writer.len();

        let err = writer.write_row(&("ok", Valued(Broken))).unwrap_err();
        assert_eq!(err.field_index(), Some(1));
        assert!(matches!(
            err.root(),
            Error::UnsupportedValuerResult { kind: "float" }
        ));
        assert_eq!(writer.len(), before);
        assert_eq!(writer.rows(), 1);

        writer.write_values(&[&2_i32]).unwrap();
        assert_eq!(writer.rows(), 2);
    }

    #[test]
    fn test_too_many_fields() {
        let row = vec![None::<i32>; MAX_FIELDS + 1];
        let mut buf = vec![9];
        assert!(matches!(
            encode_row(&row, &mut buf),
            Err(Error::NumericOverflow { .. })
        ));
        assert_eq!(buf, [9]);
    }

    #[test]
    fn test_wrap_rows() {
        let body = values_to_bytes(&[&"abc", &1_i64]).unwrap();
        let payload = wrap_rows(&body);
        assert_eq!(payload, encode_rows([("abc", 1_i64)]).unwrap());
    }

    #[test]
    fn test_is_empty() {
        let mut writer = CopyWriter::default();
        assert!(writer.is_empty());
        writer.write_row(&()).unwrap();
        assert!(!writer.is_empty());
        assert_eq!(writer.rows(), 1);
    }
}
