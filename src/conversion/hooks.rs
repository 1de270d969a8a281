//! Extension hooks for types outside the built-in set.
//!
//! - [`Binary<T>`]: `T` knows its own raw byte form ([`MarshalBinary`] /
//!   [`UnmarshalBinary`])
//! - [`Valued<T>`]: `T` renders itself as a [`DriverValue`] ([`Valuer`])
//!
//! Hook output of zero length is written as NULL. A type that needs a present
//! empty field implements [`ToWireValue`] directly.

use crate::error::{Error, Result};
use crate::protocol::codec::{FieldBuilder, write_field, write_null};

use super::{FromWireValue, ToWireValue};

/// Type that can append its binary form to a buffer.
pub trait MarshalBinary {
    /// Append the raw field payload (without length prefix).
    fn marshal_binary(&self, buf: &mut Vec<u8>) -> Result<()>;
}

/// Type that can be rebuilt from its binary form.
pub trait UnmarshalBinary: Sized {
    /// Decode from the raw field payload.
    fn unmarshal_binary(bytes: &[u8]) -> Result<Self>;
}

// A missing value appends nothing and so encodes as NULL.
impl<T: MarshalBinary> MarshalBinary for Option<T> {
    fn marshal_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        match self {
            Some(v) => v.marshal_binary(buf),
            None => Ok(()),
        }
    }
}

/// Adapter routing a field through [`MarshalBinary`] / [`UnmarshalBinary`].
///
/// ```
/// use zero_pgcopy::conversion::{Binary, MarshalBinary, UnmarshalBinary};
/// use zero_pgcopy::Result;
///
/// struct Point { x: i16, y: i16 }
///
/// impl MarshalBinary for Point {
///     fn marshal_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
///         buf.extend_from_slice(&self.x.to_be_bytes());
///         buf.extend_from_slice(&self.y.to_be_bytes());
///         Ok(())
///     }
/// }
///
/// let payload = zero_pgcopy::encode_rows([(Binary(Point { x: 1, y: 2 }),)]).unwrap();
/// assert!(payload.len() > 19);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Binary<T>(pub T);

impl<T> Binary<T> {
    /// Unwrap the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: UnmarshalBinary> FromWireValue<'_> for Binary<T> {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        T::unmarshal_binary(bytes).map(Binary)
    }
}

impl<T: MarshalBinary> ToWireValue for Binary<T> {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        let mut field = FieldBuilder::new(buf);
        if let Err(e) = self.0.marshal_binary(field.buf()) {
            field.abort();
            return Err(e);
        }
        if field.is_empty() {
            field.finish_null();
            Ok(())
        } else {
            field.finish()
        }
    }
}

/// Driver-level scalar produced by a [`Valuer`].
#[derive(Debug, Clone, PartialEq)]
pub enum DriverValue {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl DriverValue {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            DriverValue::Null => "null",
            DriverValue::Bool(_) => "bool",
            DriverValue::Int(_) => "int",
            DriverValue::Float(_) => "float",
            DriverValue::Text(_) => "text",
            DriverValue::Bytes(_) => "bytes",
        }
    }
}

/// Type that renders itself as a driver-level scalar.
///
/// Only text and byte results have a wire form here; other shapes fail with
/// `Error::UnsupportedValuerResult`.
pub trait Valuer {
    /// Produce the driver value.
    fn value(&self) -> Result<DriverValue>;
}

impl<T: Valuer> Valuer for Option<T> {
    fn value(&self) -> Result<DriverValue> {
        match self {
            Some(v) => v.value(),
            None => Ok(DriverValue::Null),
        }
    }
}

/// Adapter encoding a field through [`Valuer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Valued<T>(pub T);

impl<T> Valued<T> {
    /// Unwrap the inner value.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T: Valuer> ToWireValue for Valued<T> {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        let bytes = match self.0.value()? {
            DriverValue::Null => None,
            DriverValue::Text(s) => Some(s.into_bytes()),
            DriverValue::Bytes(b) => Some(b),
            other => {
                return Err(Error::UnsupportedValuerResult { kind: other.kind() });
            }
        };
        match bytes {
            Some(b) if !b.is_empty() => write_field(buf, &b),
            _ => {
                write_null(buf);
                Ok(())
            }
        }
    }
}
