//! Frame constants of the COPY binary format.
//!
//! ```text
//! +-----------------+-----------------+-----------------------------+------------+
//! | signature (11)  | flags (4)       | extension length (4)        | rows ...   |
//! +-----------------+-----------------+-----------------------------+------------+
//! row:   u16 field count, then per field: i32 length (-1 = NULL) + payload
//! end:   0xFFFF in place of a field count
//! ```

use zerocopy::byteorder::big_endian::U32 as U32BE;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{Error, Result};

/// `PGCOPY\n\377\r\n\0`
pub const SIGNATURE: [u8; 11] = *b"PGCOPY\n\xFF\r\n\0";

/// Flags field followed by the header extension length, both zero.
pub const HEADER_EXTENSION: [u8; 8] = [0; 8];

/// Signature plus header extension.
pub const HEADER_LEN: usize = SIGNATURE.len() + HEADER_EXTENSION.len();

/// Field length prefix of a NULL field (-1).
pub const NULL_FIELD: [u8; 4] = (-1_i32).to_be_bytes();

/// Sentinel in place of a field count marking the end of data.
pub const END_MARKER: [u8; 2] = [0xFF, 0xFF];

/// Fixed 19-byte file header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable)]
#[repr(C, packed)]
pub struct CopyHeader {
    /// Must equal [`SIGNATURE`]
    pub signature: [u8; 11],
    /// Flags field (bit 16 = OIDs included); not interpreted
    pub flags: U32BE,
    /// Length of the header extension area; not interpreted
    pub extension_len: U32BE,
}

impl CopyHeader {
    /// Header written by the encoder: signature followed by zeroed extension.
    pub const fn new() -> Self {
        Self {
            signature: SIGNATURE,
            flags: U32BE::ZERO,
            extension_len: U32BE::ZERO,
        }
    }

    /// Split a payload into its header and the row data that follows.
    ///
    /// Only the signature is validated; the extension is skipped as fixed
    /// padding.
    pub fn parse(payload: &[u8]) -> Result<(&Self, &[u8])> {
        if payload.len() < HEADER_LEN {
            return Err(Error::MalformedHeader(format!(
                "payload too short: {} < {}",
                payload.len(),
                HEADER_LEN
            )));
        }
        let (header, rest) = Self::ref_from_prefix(payload)?;
        if header.signature != SIGNATURE {
            return Err(Error::MalformedHeader("signature mismatch".into()));
        }
        Ok((header, rest))
    }
}

impl Default for CopyHeader {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns true if a 4-byte length prefix denotes NULL.
#[inline]
pub fn is_null_field(prefix: &[u8]) -> bool {
    prefix == NULL_FIELD
}
