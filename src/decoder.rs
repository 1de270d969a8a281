//! COPY binary payload decoder.
//!
//! [`CopyReader`] walks a payload lazily, one [`Row`] at a time. The free
//! functions ([`decode`], [`decode_with_handler`], [`decode_collect`]) are
//! built on top of it.

use crate::error::{Error, Result};
use crate::handler::RowHandler;
use crate::opts::Opts;
use crate::protocol::codec::{read_bytes, read_i32, read_u16};
use crate::protocol::frame::{CopyHeader, END_MARKER, is_null_field};
use crate::row::{FromRow, Row};

/// Reader position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting a field count or the end marker
    Rows,
    /// End marker consumed
    Done,
    /// A row failed to parse; `data` still points at its start
    Failed,
}

/// Lazy row iterator over a COPY binary payload.
///
/// Yields `Result<Row<'a>>`. Fields borrow from the payload. After an error
/// or the end marker the iterator yields `None`.
///
/// ```
/// use zero_pgcopy::{CopyReader, encode_rows};
///
/// let payload = encode_rows([(1_i32, "one"), (2, "two")]).unwrap();
/// let mut reader = CopyReader::new(&payload).unwrap();
/// for row in reader.by_ref() {
///     let (id, name): (i32, &str) = row.unwrap().decode().unwrap();
///     assert!(id == 1 && name == "one" || id == 2 && name == "two");
/// }
/// assert_eq!(reader.finish().unwrap(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct CopyReader<'a> {
    header: &'a CopyHeader,
    data: &'a [u8],
    opts: Opts,
    state: State,
    rows: usize,
}

impl<'a> CopyReader<'a> {
    /// Validate the header and position the reader at the first row.
    pub fn new(payload: &'a [u8]) -> Result<Self> {
        Self::with_opts(payload, &Opts::default())
    }

    /// Like [`CopyReader::new`], with explicit options.
    pub fn with_opts(payload: &'a [u8], opts: &Opts) -> Result<Self> {
        let (header, data) = match CopyHeader::parse(payload) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("rejected COPY header: {}", e);
                return Err(e);
            }
        };
        tracing::debug!("accepted COPY header, {} bytes of row data", data.len());
        Ok(Self {
            header,
            data,
            opts: opts.clone(),
            state: State::Rows,
            rows: 0,
        })
    }

    /// The parsed file header.
    pub fn header(&self) -> &'a CopyHeader {
        self.header
    }

    /// Number of rows read so far.
    pub fn rows_read(&self) -> usize {
        self.rows
    }

    /// Bytes not consumed yet.
    ///
    /// After the end marker this is whatever trails the payload.
    pub fn remaining(&self) -> &'a [u8] {
        self.data
    }

    /// Returns true once the end marker was consumed.
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Read the next row.
    ///
    /// Returns `Ok(None)` at the end marker. After an error every further
    /// call returns `Ok(None)`.
    pub fn next_row(&mut self) -> Result<Option<Row<'a>>> {
        if self.state != State::Rows {
            return Ok(None);
        }
        match self.read_row() {
            Ok(Some((row, rest))) => {
                self.data = rest;
                self.rows += 1;
                tracing::trace!("row {}: {} fields", self.rows, row.len());
                Ok(Some(row))
            }
            Ok(None) => {
                self.state = State::Done;
                tracing::debug!("end of COPY data after {} rows", self.rows);
                Ok(None)
            }
            Err(e) => {
                self.state = State::Failed;
                Err(e)
            }
        }
    }

    /// Consume the remaining rows and check what follows the end marker.
    ///
    /// Returns the total number of rows. Rows not read yet are still
    /// validated, and an error that was already yielded is reported again.
    pub fn finish(mut self) -> Result<usize> {
        while self.next_row()?.is_some() {}
        if self.state == State::Failed {
            // parsing is pure, so retrying the failed row reproduces its error
            self.read_row()?;
        }
        if !self.data.is_empty() {
            if self.opts.reject_trailing_data {
                return Err(Error::TrailingData {
                    len: self.data.len(),
                });
            }
            tracing::debug!("ignoring {} trailing bytes", self.data.len());
        }
        Ok(self.rows)
    }

    /// Parse one row starting at `self.data` without committing the position.
    ///
    /// Returns `None` at the end marker, with `self.data` moved past it.
    fn read_row(&mut self) -> Result<Option<(Row<'a>, &'a [u8])>> {
        let data = self.data;
        if data.len() < 2 {
            return Err(Error::UnexpectedEof);
        }
        if data[..2] == END_MARKER {
            self.data = &data[2..];
            return Ok(None);
        }
        let (count, mut rest) = read_u16(data)?;
        let count = usize::from(count);

        if let Some(expected) = self.opts.expected_fields
            && expected != count
        {
            return Err(Error::ArityMismatch {
                expected,
                actual: count,
            });
        }

        // a field needs at least its length prefix, so a bogus count cannot
        // over-allocate
        let mut fields = Vec::with_capacity(count.min(rest.len() / 4));
        for _ in 0..count {
            let (prefix, after) = read_bytes(rest, 4)?;
            if is_null_field(prefix) {
                fields.push(None);
                rest = after;
                continue;
            }
            let (len, _) = read_i32(prefix)?;
            let len = usize::try_from(len).map_err(|_| Error::InvalidFieldLength(len))?;
            if let Some(max) = self.opts.max_field_len
                && len > max
            {
                return Err(Error::FieldTooLarge { len, max });
            }
            let (payload, after) = read_bytes(after, len)?;
            fields.push(Some(payload));
            rest = after;
        }
        Ok(Some((Row::new(fields), rest)))
    }
}

impl<'a> Iterator for CopyReader<'a> {
    type Item = Result<Row<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}

impl std::iter::FusedIterator for CopyReader<'_> {}

/// Decode a payload, invoking `on_row` for every row.
///
/// A handler error aborts decoding and is returned unchanged. Decoder errors
/// are converted with `E::from`.
///
/// ```
/// use zero_pgcopy::{decode, encode_rows};
///
/// let payload = encode_rows([("abc", Some(1_i32)), ("", None)]).unwrap();
/// let mut names = Vec::new();
/// decode(&payload, |row| {
///     let (name, _count): (String, Option<i32>) = row.decode()?;
///     names.push(name);
///     zero_pgcopy::Result::Ok(())
/// })
/// .unwrap();
/// assert_eq!(names, ["abc", ""]);
/// ```
pub fn decode<'a, E, F>(payload: &'a [u8], on_row: F) -> std::result::Result<(), E>
where
    E: From<Error>,
    F: FnMut(Row<'a>) -> std::result::Result<(), E>,
{
    decode_with_opts(payload, &Opts::default(), on_row)
}

/// Like [`decode`], with explicit options.
pub fn decode_with_opts<'a, E, F>(
    payload: &'a [u8],
    opts: &Opts,
    mut on_row: F,
) -> std::result::Result<(), E>
where
    E: From<Error>,
    F: FnMut(Row<'a>) -> std::result::Result<(), E>,
{
    let mut reader = CopyReader::with_opts(payload, opts)?;
    while let Some(row) = reader.next_row()? {
        on_row(row)?;
    }
    reader.finish()?;
    Ok(())
}

/// Decode a payload into a [`RowHandler`].
///
/// Calls `handler.row()` for each row, then `handler.end()` with the row
/// count once the end marker is reached.
pub fn decode_with_handler<H: RowHandler>(payload: &[u8], handler: &mut H) -> Result<()> {
    let mut reader = CopyReader::new(payload)?;
    while let Some(row) = reader.next_row()? {
        handler.row(row)?;
    }
    let rows = reader.finish()?;
    handler.end(rows)
}

/// Decode every row into `T`.
///
/// `T` may borrow from the payload, e.g. `(&str, Option<i32>)`.
pub fn decode_collect<'a, T: FromRow<'a>>(payload: &'a [u8]) -> Result<Vec<T>> {
    let mut reader = CopyReader::new(payload)?;
    let mut out = Vec::new();
    while let Some(row) = reader.next_row()? {
        out.push(row.decode()?);
    }
    reader.finish()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::frame::{HEADER_LEN, SIGNATURE};

    fn header() -> Vec<u8> {
        let mut buf = SIGNATURE.to_vec();
        buf.extend_from_slice(&[0; 8]);
        buf
    }

    fn payload(body: &[u8]) -> Vec<u8> {
        let mut buf = header();
        buf.extend_from_slice(body);
        buf.extend_from_slice(&END_MARKER);
        buf
    }

    #[test]
    fn test_empty_stream() {
        let data = payload(&[]);
        let mut reader = CopyReader::new(&data).unwrap();
        assert!(reader.next_row().unwrap().is_none());
        assert!(reader.is_done());
        assert_eq!(reader.finish().unwrap(), 0);
    }

    #[test]
    fn test_null_and_empty_fields() {
        let data = payload(&[0, 2, 0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]);
        let rows: Vec<_> = CopyReader::new(&data)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields(), &[None, Some(&[][..])]);
    }

    #[test]
    fn test_zero_field_row() {
        let data = payload(&[0, 0]);
        let mut calls = 0;
        decode(&data, |row| {
            assert!(row.is_empty());
            calls += 1;
            Result::Ok(())
        })
        .unwrap();
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_short_header() {
        let err = CopyReader::new(&SIGNATURE).unwrap_err();
        assert!(matches!(err, Error::MalformedHeader(_)));
    }

    #[test]
    fn test_missing_end_marker() {
        let data = header();
        let mut reader = CopyReader::new(&data).unwrap();
        assert!(matches!(reader.next_row(), Err(Error::UnexpectedEof)));
        // fused after error
        assert!(reader.next_row().unwrap().is_none());
        assert!(matches!(reader.finish(), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_dangling_count_byte() {
        let mut data = header();
        data.push(0);
        let mut reader = CopyReader::new(&data).unwrap();
        assert!(matches!(reader.next_row(), Err(Error::UnexpectedEof)));
    }

    #[test]
    fn test_truncated_length_prefix() {
        let mut data = header();
        data.extend_from_slice(&[0, 1, 0, 0]);
        let err = decode_collect::<Vec<crate::Value>>(&data).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedField {
                expected: 4,
                remaining: 2
            }
        ));
    }

    #[test]
    fn test_truncated_payload() {
        let mut data = header();
        data.extend_from_slice(&[0, 1, 0, 0, 0, 5, b'a', b'b']);
        let mut reader = CopyReader::new(&data).unwrap();
        assert!(matches!(
            reader.next_row(),
            Err(Error::TruncatedField {
                expected: 5,
                remaining: 2
            })
        ));
        assert_eq!(reader.rows_read(), 0);
        assert_eq!(reader.remaining().len(), 8);
    }

    #[test]
    fn test_invalid_negative_length() {
        let data = payload(&[0, 1, 0xFF, 0xFF, 0xFF, 0xFE]);
        let err = decode_collect::<Vec<crate::Value>>(&data).unwrap_err();
        assert!(matches!(err, Error::InvalidFieldLength(-2)));
    }

    #[test]
    fn test_huge_count_no_overallocation() {
        let data = payload(&[0xFF, 0xFE]);
        let mut reader = CopyReader::new(&data).unwrap();
        assert!(matches!(
            reader.next_row(),
            Err(Error::TruncatedField { .. })
        ));
    }

    #[test]
    fn test_max_field_len() {
        let data = payload(&[0, 1, 0, 0, 0, 3, b'a', b'b', b'c']);
        let opts = Opts {
            max_field_len: Some(2),
            ..Opts::default()
        };
        let mut reader = CopyReader::with_opts(&data, &opts).unwrap();
        assert!(matches!(
            reader.next_row(),
            Err(Error::FieldTooLarge { len: 3, max: 2 })
        ));
    }

    #[test]
    fn test_expected_fields() {
        let data = payload(&[0, 1, 0xFF, 0xFF, 0xFF, 0xFF]);
        let opts = Opts {
            expected_fields: Some(2),
            ..Opts::default()
        };
        let err = decode_with_opts(&data, &opts, |_| Result::Ok(())).unwrap_err();
        assert!(matches!(
            err,
            Error::ArityMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_trailing_data() {
        let mut data = payload(&[]);
        data.extend_from_slice(b"junk");
        assert_eq!(CopyReader::new(&data).unwrap().finish().unwrap(), 0);

        let err = CopyReader::with_opts(&data, &Opts::strict())
            .unwrap()
            .finish()
            .unwrap_err();
        assert!(matches!(err, Error::TrailingData { len: 4 }));
    }

    #[test]
    fn test_handler_error_aborts() {
        #[derive(Debug)]
        enum AppError {
            Stop,
            Copy(Error),
        }
        impl From<Error> for AppError {
            fn from(e: Error) -> Self {
                AppError::Copy(e)
            }
        }

        let data = payload(&[0, 0, 0, 0, 0, 0]);
        let mut seen = 0;
        let err = decode(&data, |_| {
            seen += 1;
            if seen == 2 {
                Err(AppError::Stop)
            } else {
                Ok(())
            }
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Stop));
        assert_eq!(seen, 2);

        let err = decode(&data[..HEADER_LEN + 1], |_| Ok::<_, AppError>(())).unwrap_err();
        assert!(matches!(err, AppError::Copy(Error::UnexpectedEof)));
    }

    #[test]
    fn test_header_accessor() {
        let data = payload(&[]);
        let reader = CopyReader::new(&data).unwrap();
        assert_eq!(reader.header().signature, SIGNATURE);
        assert_eq!(reader.header().flags.get(), 0);
    }
}
