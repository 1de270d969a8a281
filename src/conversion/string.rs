//! String type implementations (&str, String).
//!
//! Text fields are the raw UTF-8 bytes of the value; an empty string is a
//! present zero-length field, never NULL.

use crate::error::{Error, Result};
use crate::protocol::codec::write_field;

use super::{FromWireValue, ToWireValue};

impl<'a> FromWireValue<'a> for &'a str {
    fn from_binary(bytes: &'a [u8]) -> Result<Self> {
        simdutf8::compat::from_utf8(bytes)
            .map_err(|e| Error::Decode(format!("invalid UTF-8: {}", e)))
    }
}

impl FromWireValue<'_> for String {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        simdutf8::compat::from_utf8(bytes)
            .map(|s| s.to_owned())
            .map_err(|e| Error::Decode(format!("invalid UTF-8: {}", e)))
    }
}

impl ToWireValue for str {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_field(buf, self.as_bytes())
    }
}

impl ToWireValue for String {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.as_str().to_binary(buf)
    }
}
