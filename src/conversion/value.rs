//! Owned, untyped field value.

use crate::error::{Error, Result};
use crate::protocol::codec::{write_field, write_null};

use super::{FromWireValue, ToWireValue, decode_field};

/// A field copied out of a row, with its nullness preserved.
///
/// Useful when the destination types are only known later, or when rows
/// must outlive the payload buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Value {
    /// NULL field
    #[default]
    Null,
    /// Present field (possibly zero-length)
    Bytes(Vec<u8>),
}

impl Value {
    /// Returns true for a NULL field.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Raw bytes of a present field.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Null => None,
            Value::Bytes(b) => Some(b),
        }
    }

    /// Borrow as a nullable field slice.
    pub fn as_field(&self) -> Option<&[u8]> {
        self.as_bytes()
    }

    /// Decode into a typed value.
    pub fn decode<'a, T: FromWireValue<'a>>(&'a self) -> Result<T> {
        decode_field(self.as_field())
    }

    /// Decode as UTF-8 text.
    pub fn as_str(&self) -> Result<&str> {
        self.decode()
    }

    /// Decode as a boolean.
    pub fn as_bool(&self) -> Result<bool> {
        self.decode()
    }

    /// Decode as an integer of any supported width.
    pub fn as_i64(&self) -> Result<i64> {
        self.decode()
    }

    /// Decode as a float of any supported width.
    pub fn as_f64(&self) -> Result<f64> {
        self.decode()
    }
}

impl From<Option<&[u8]>> for Value {
    fn from(field: Option<&[u8]>) -> Self {
        match field {
            None => Value::Null,
            Some(bytes) => Value::Bytes(bytes.to_vec()),
        }
    }
}

impl FromWireValue<'_> for Value {
    fn from_null() -> Result<Self> {
        Ok(Value::Null)
    }

    fn from_binary(bytes: &[u8]) -> Result<Self> {
        Ok(Value::Bytes(bytes.to_vec()))
    }
}

impl ToWireValue for Value {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        match self {
            Value::Null => {
                write_null(buf);
                Ok(())
            }
            Value::Bytes(b) => write_field(buf, b),
        }
    }
}

impl TryFrom<Value> for Vec<u8> {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Null => Err(Error::NullNotAllowed { target: "Vec<u8>" }),
            Value::Bytes(b) => Ok(b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_vs_empty() {
        assert!(Value::from(None).is_null());
        let empty = Value::from(Some(&[][..]));
        assert!(!empty.is_null());
        assert_eq!(empty.as_bytes(), Some(&[][..]));
    }

    #[test]
    fn test_typed_access() {
        let v = Value::Bytes(42_i32.to_be_bytes().to_vec());
        assert_eq!(v.as_i64().unwrap(), 42);
        let v = Value::Bytes(b"abc".to_vec());
        assert_eq!(v.as_str().unwrap(), "abc");
        assert!(matches!(
            Value::Null.as_bool(),
            Err(Error::NullNotAllowed { target: "bool" })
        ));
        assert_eq!(Value::Null.decode::<Option<bool>>().unwrap(), None);
    }

    #[test]
    fn test_encode() {
        let mut buf = Vec::new();
        Value::Null.to_binary(&mut buf).unwrap();
        Value::Bytes(Vec::new()).to_binary(&mut buf).unwrap();
        assert_eq!(buf, [0xFF, 0xFF, 0xFF, 0xFF, 0, 0, 0, 0]);
    }

    #[test]
    fn test_into_vec() {
        assert_eq!(Vec::<u8>::try_from(Value::Bytes(vec![1])).unwrap(), [1]);
        assert!(Vec::<u8>::try_from(Value::Null).is_err());
    }
}
