//! Byte type implementations (`&[u8]`, `Vec<u8>`, `[u8; N]`).

use crate::error::{Error, Result};
use crate::protocol::codec::write_field;

use super::{FromWireValue, ToWireValue};

impl<'a> FromWireValue<'a> for &'a [u8] {
    fn from_binary(bytes: &'a [u8]) -> Result<Self> {
        Ok(bytes)
    }
}

impl FromWireValue<'_> for Vec<u8> {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        Ok(bytes.to_vec())
    }
}

impl<const N: usize> FromWireValue<'_> for [u8; N] {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        bytes.try_into().map_err(|_| Error::UnsupportedWidth {
            target: std::any::type_name::<Self>(),
            width: bytes.len(),
        })
    }
}

impl ToWireValue for [u8] {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_field(buf, self)
    }
}

impl ToWireValue for Vec<u8> {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.as_slice().to_binary(buf)
    }
}

impl<const N: usize> ToWireValue for [u8; N] {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_field(buf, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_borrowed_bytes() {
        let data = [1u8, 2, 3];
        let decoded = <&[u8]>::from_binary(&data).unwrap();
        assert_eq!(decoded.as_ptr(), data.as_ptr());
    }

    #[test]
    fn test_fixed_array() {
        assert_eq!(<[u8; 3]>::from_binary(&[1, 2, 3]).unwrap(), [1, 2, 3]);
        assert!(matches!(
            <[u8; 3]>::from_binary(&[1, 2]),
            Err(Error::UnsupportedWidth { width: 2, .. })
        ));
    }

    #[test]
    fn test_empty_blob_is_present() {
        let mut buf = Vec::new();
        ToWireValue::to_binary(&Vec::<u8>::new(), &mut buf).unwrap();
        assert_eq!(buf, [0, 0, 0, 0]);
        assert_eq!(Vec::<u8>::from_binary(&[]).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_encode_blob() {
        let mut buf = Vec::new();
        ToWireValue::to_binary(&[0xDE_u8, 0xAD], &mut buf).unwrap();
        assert_eq!(buf, [0, 0, 0, 2, 0xDE, 0xAD]);
    }
}
