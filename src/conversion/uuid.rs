//! UUID type implementation (uuid crate).

use crate::error::{Error, Result};
use crate::protocol::codec::write_field;

use super::{FromWireValue, ToWireValue};

impl FromWireValue<'_> for uuid::Uuid {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        uuid::Uuid::from_slice(bytes).map_err(|_| Error::UnsupportedWidth {
            target: "Uuid",
            width: bytes.len(),
        })
    }
}

impl ToWireValue for uuid::Uuid {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_field(buf, self.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_binary() {
        let bytes: [u8; 16] = [
            0xa0, 0xee, 0xbc, 0x99, 0x9c, 0x0b, 0x4e, 0xf8, 0xbb, 0x6d, 0x6b, 0xb9, 0xbd, 0x38,
            0x0a, 0x11,
        ];
        let uuid = uuid::Uuid::from_binary(&bytes).unwrap();
        assert_eq!(uuid.to_string(), "a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11");
    }

    #[test]
    fn test_uuid_roundtrip() {
        let original = uuid::Uuid::parse_str("a0eebc99-9c0b-4ef8-bb6d-6bb9bd380a11").unwrap();
        let mut buf = Vec::new();
        original.to_binary(&mut buf).unwrap();
        assert_eq!(&buf[..4], &16_i32.to_be_bytes());
        let decoded = uuid::Uuid::from_binary(&buf[4..]).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn test_uuid_width() {
        assert!(matches!(
            uuid::Uuid::from_binary(&[0; 15]),
            Err(Error::UnsupportedWidth { width: 15, .. })
        ));
    }
}
