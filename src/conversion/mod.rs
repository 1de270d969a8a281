//! Field conversion between Rust types and COPY binary field bytes.
//!
//! A COPY binary stream carries no type information, so conversion is
//! directed entirely by the Rust type on the other side:
//!
//! - decoding: `FromWireValue::from_null()` / `FromWireValue::from_binary()`
//! - encoding: `ToWireValue::to_binary()` writes a length-prefixed field
//!
//! Types outside the built-in set take part by implementing the traits
//! directly, or through the [`Binary`] and [`Valued`] adapters.

mod bytes;
mod hooks;
mod primitives;
mod string;
mod value;

#[cfg(feature = "with-chrono")]
mod chrono;
#[cfg(feature = "with-time")]
mod time;
#[cfg(feature = "with-uuid")]
mod uuid;

pub use hooks::{Binary, DriverValue, MarshalBinary, UnmarshalBinary, Valued, Valuer};
pub use value::Value;

use crate::error::{Error, Result};
use crate::protocol::codec::write_null;

/// Trait for decoding field bytes into Rust types.
///
/// - `from_null()` - Handle a NULL field
/// - `from_binary()` - Decode a present field (possibly zero-length)
///
/// Implementing this trait for your own type is the custom "scan from
/// bytes" hook: it takes precedence over every generic conversion.
pub trait FromWireValue<'a>: Sized {
    /// Decode from NULL value.
    ///
    /// Default implementation returns an error. Override for types that can
    /// represent NULL (like `Option<T>`).
    fn from_null() -> Result<Self> {
        Err(Error::NullNotAllowed {
            target: std::any::type_name::<Self>(),
        })
    }

    /// Decode from field bytes.
    ///
    /// Integers are big-endian, floats are IEEE 754, etc.
    fn from_binary(bytes: &'a [u8]) -> Result<Self> {
        let _ = bytes;
        Err(Error::UnsupportedConversion {
            target: std::any::type_name::<Self>(),
        })
    }
}

/// Trait for encoding Rust values as COPY binary fields.
///
/// Implementations write length-prefixed data directly to the buffer:
/// - Int32 length followed by the value bytes, OR
/// - Int32 -1 for NULL
pub trait ToWireValue {
    /// Encode as a length-prefixed binary field.
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()>;
}

/// Trait for encoding a whole row of fields.
pub trait ToRow {
    /// Number of fields.
    fn field_count(&self) -> usize;

    /// Encode all fields to the buffer (without the field count).
    ///
    /// Errors are tagged with the position of the offending field.
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()>;
}

/// Decode a single nullable field.
#[inline]
pub fn decode_field<'a, T: FromWireValue<'a>>(field: Option<&'a [u8]>) -> Result<T> {
    match field {
        None => T::from_null(),
        Some(bytes) => T::from_binary(bytes),
    }
}

// === Option<T> - NULL handling ===

impl<'a, T: FromWireValue<'a>> FromWireValue<'a> for Option<T> {
    fn from_null() -> Result<Self> {
        Ok(None)
    }

    fn from_binary(bytes: &'a [u8]) -> Result<Self> {
        T::from_binary(bytes).map(Some)
    }
}

impl<T: ToWireValue> ToWireValue for Option<T> {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        match self {
            Some(v) => v.to_binary(buf),
            None => {
                write_null(buf);
                Ok(())
            }
        }
    }
}

// === Indirections ===

impl<'a, T: FromWireValue<'a>> FromWireValue<'a> for Box<T> {
    fn from_null() -> Result<Self> {
        T::from_null().map(Box::new)
    }

    fn from_binary(bytes: &'a [u8]) -> Result<Self> {
        T::from_binary(bytes).map(Box::new)
    }
}

impl<T: ToWireValue + ?Sized> ToWireValue for &T {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        (*self).to_binary(buf)
    }
}

impl<T: ToWireValue + ?Sized> ToWireValue for Box<T> {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        (**self).to_binary(buf)
    }
}

// === ToRow implementations ===

impl ToRow for () {
    fn field_count(&self) -> usize {
        0
    }

    fn to_binary(&self, _buf: &mut Vec<u8>) -> Result<()> {
        Ok(())
    }
}

impl<T: ToRow + ?Sized> ToRow for &T {
    fn field_count(&self) -> usize {
        (*self).field_count()
    }

    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        (*self).to_binary(buf)
    }
}

impl<T: ToWireValue> ToRow for [T] {
    fn field_count(&self) -> usize {
        self.len()
    }

    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        for (idx, value) in self.iter().enumerate() {
            value.to_binary(buf).map_err(|e| e.at_field(idx))?;
        }
        Ok(())
    }
}

impl<T: ToWireValue, const N: usize> ToRow for [T; N] {
    fn field_count(&self) -> usize {
        N
    }

    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.as_slice().to_binary(buf)
    }
}

impl<T: ToWireValue> ToRow for Vec<T> {
    fn field_count(&self) -> usize {
        self.len()
    }

    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.as_slice().to_binary(buf)
    }
}

// Tuple implementations via macro
macro_rules! impl_to_row {
    ($count:expr, $($idx:tt: $T:ident),+) => {
        impl<$($T: ToWireValue),+> ToRow for ($($T,)+) {
            fn field_count(&self) -> usize {
                $count
            }

            fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
                $(self.$idx.to_binary(buf).map_err(|e| e.at_field($idx))?;)+
                Ok(())
            }
        }
    };
}

impl_to_row!(1, 0: T0);
impl_to_row!(2, 0: T0, 1: T1);
impl_to_row!(3, 0: T0, 1: T1, 2: T2);
impl_to_row!(4, 0: T0, 1: T1, 2: T2, 3: T3);
impl_to_row!(5, 0: T0, 1: T1, 2: T2, 3: T3, 4: T4);
impl_to_row!(6, 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5);
impl_to_row!(7, 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6);
impl_to_row!(8, 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7);
impl_to_row!(9, 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8);
impl_to_row!(10, 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9);
impl_to_row!(11, 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10);
impl_to_row!(12, 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11);
impl_to_row!(13, 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11, 12: T12);
impl_to_row!(14, 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11, 12: T12, 13: T13);
impl_to_row!(15, 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11, 12: T12, 13: T13, 14: T14);
impl_to_row!(16, 0: T0, 1: T1, 2: T2, 3: T3, 4: T4, 5: T5, 6: T6, 7: T7, 8: T8, 9: T9, 10: T10, 11: T11, 12: T12, 13: T13, 14: T14, 15: T15);
