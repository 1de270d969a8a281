//! Primitive type implementations (bool, integers, floats).
//!
//! Integer destinations accept 2, 4 or 8-byte fields regardless of their own
//! width. The field is read as big-endian unsigned of its width and then
//! reinterpreted into the destination, which must be able to hold it.
//! Encoding always uses the declared width of the source type.

use crate::error::{Error, Result};
use crate::protocol::codec::{write_bytes, write_i32};

use super::{FromWireValue, ToWireValue};

// === Boolean ===

impl FromWireValue<'_> for bool {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        Ok(bytes == [0x01])
    }
}

impl ToWireValue for bool {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_i32(buf, 1);
        buf.push(u8::from(*self));
        Ok(())
    }
}

// === Integer helpers ===

/// Read a 2, 4 or 8-byte field as a big-endian unsigned integer.
fn read_unsigned(target: &'static str, bytes: &[u8]) -> Result<u64> {
    match *bytes {
        [a, b] => Ok(u16::from_be_bytes([a, b]) as u64),
        [a, b, c, d] => Ok(u32::from_be_bytes([a, b, c, d]) as u64),
        [a, b, c, d, e, f, g, h] => Ok(u64::from_be_bytes([a, b, c, d, e, f, g, h])),
        _ => Err(Error::UnsupportedWidth {
            target,
            width: bytes.len(),
        }),
    }
}

/// Write a fixed-width field: length prefix then the big-endian bytes.
#[inline]
fn write_fixed<const N: usize>(buf: &mut Vec<u8>, be_bytes: [u8; N]) {
    write_i32(buf, N as i32);
    write_bytes(buf, &be_bytes);
}

// === Integers ===

// A field as wide as the destination is reinterpreted bit for bit. Any other
// width is taken as an unsigned value that must fit the destination.
macro_rules! impl_integer {
    ($($T:ty => $wire:ty),+ $(,)?) => {
        $(
            impl FromWireValue<'_> for $T {
                fn from_binary(bytes: &[u8]) -> Result<Self> {
                    let v = read_unsigned(stringify!($T), bytes)?;
                    if bytes.len() == size_of::<$T>() {
                        return Ok(v as $T);
                    }
                    <$T>::try_from(v).map_err(|_| Error::NumericOverflow {
                        target: stringify!($T),
                        value: v as i128,
                    })
                }
            }

            impl ToWireValue for $T {
                fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
                    write_fixed(buf, (*self as $wire).to_be_bytes());
                    Ok(())
                }
            }
        )+
    };
}

// PostgreSQL has no 1-byte integer; i8 and u8 travel as INT2.
impl_integer!(
    i8 => i16,
    i16 => i16,
    i32 => i32,
    i64 => i64,
    isize => i64,
    u8 => u16,
    u16 => u16,
    u32 => u32,
    u64 => u64,
    usize => u64,
);

// === Floats ===

impl FromWireValue<'_> for f32 {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        match *bytes {
            [a, b, c, d] => Ok(f32::from_be_bytes([a, b, c, d])),
            [a, b, c, d, e, f, g, h] => Ok(f64::from_be_bytes([a, b, c, d, e, f, g, h]) as f32),
            _ => Err(Error::UnsupportedWidth {
                target: "f32",
                width: bytes.len(),
            }),
        }
    }
}

impl ToWireValue for f32 {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_fixed(buf, self.to_be_bytes());
        Ok(())
    }
}

impl FromWireValue<'_> for f64 {
    fn from_binary(bytes: &[u8]) -> Result<Self> {
        match *bytes {
            [a, b, c, d] => Ok(f32::from_be_bytes([a, b, c, d]) as f64),
            [a, b, c, d, e, f, g, h] => Ok(f64::from_be_bytes([a, b, c, d, e, f, g, h])),
            _ => Err(Error::UnsupportedWidth {
                target: "f64",
                width: bytes.len(),
            }),
        }
    }
}

impl ToWireValue for f64 {
    fn to_binary(&self, buf: &mut Vec<u8>) -> Result<()> {
        write_fixed(buf, self.to_be_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode<T: ToWireValue>(value: T) -> Vec<u8> {
        let mut buf = Vec::new();
        value.to_binary(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_bool() {
        assert!(bool::from_binary(&[0x01]).unwrap());
        assert!(!bool::from_binary(&[0x00]).unwrap());
        assert!(!bool::from_binary(&[0x02]).unwrap());
        assert!(!bool::from_binary(&[]).unwrap());
        assert_eq!(encode(true), [0, 0, 0, 1, 1]);
        assert_eq!(encode(false), [0, 0, 0, 1, 0]);
    }

    #[test]
    fn test_i64_full_range() {
        let bytes = i64::MIN.to_be_bytes();
        assert_eq!(i64::from_binary(&bytes).unwrap(), i64::MIN);
        let bytes = 0x0123_4567_89AB_CDEF_i64.to_be_bytes();
        assert_eq!(i64::from_binary(&bytes).unwrap(), 0x0123_4567_89AB_CDEF);
    }

    #[test]
    fn test_widening() {
        assert_eq!(i64::from_binary(&[0x00, 0x2A]).unwrap(), 42);
        assert_eq!(u64::from_binary(&[0xFF, 0xFF]).unwrap(), 0xFFFF);
        assert_eq!(i32::from_binary(&[0, 0, 0, 0, 0, 0, 0, 5]).unwrap(), 5);
    }

    #[test]
    fn test_narrow_field_is_unsigned() {
        assert_eq!(i64::from_binary(&[0xFF, 0xFF]).unwrap(), 65_535);
        assert_eq!(i64::from_binary(&[0xFF; 4]).unwrap(), 4_294_967_295);
        assert_eq!(i32::from_binary(&[0xFF, 0xFE]).unwrap(), 65_534);
        assert!(matches!(
            i16::from_binary(&[0, 0, 0xFF, 0xFF]),
            Err(Error::NumericOverflow {
                target: "i16",
                value: 65_535
            })
        ));
    }

    #[test]
    fn test_same_width_reinterprets() {
        assert_eq!(i16::from_binary(&[0xFF, 0xFF]).unwrap(), -1);
        assert_eq!(i32::from_binary(&(-7_i32).to_be_bytes()).unwrap(), -7);
        assert_eq!(i64::from_binary(&(-1_i64).to_be_bytes()).unwrap(), -1);
        assert_eq!(u16::from_binary(&[0xFF, 0xFE]).unwrap(), 0xFFFE);
    }

    #[test]
    fn test_overflow() {
        let err = i16::from_binary(&100_000_i32.to_be_bytes()).unwrap_err();
        assert!(matches!(
            err,
            Error::NumericOverflow {
                target: "i16",
                value: 100_000
            }
        ));
        assert!(u32::from_binary(&(-1_i64).to_be_bytes()).is_err());
        assert!(i8::from_binary(&[0x01, 0x00]).is_err());
    }

    #[test]
    fn test_unsupported_width() {
        for width in [0, 1, 3, 5, 16] {
            let bytes = vec![0u8; width];
            assert!(matches!(
                i32::from_binary(&bytes),
                Err(Error::UnsupportedWidth { .. })
            ));
            assert!(matches!(
                u64::from_binary(&bytes),
                Err(Error::UnsupportedWidth { .. })
            ));
        }
        assert!(matches!(
            f64::from_binary(&[0, 0]),
            Err(Error::UnsupportedWidth {
                target: "f64",
                width: 2
            })
        ));
    }

    #[test]
    fn test_encode_declared_width() {
        assert_eq!(encode(7_i16), [0, 0, 0, 2, 0, 7]);
        assert_eq!(encode(7_i32), [0, 0, 0, 4, 0, 0, 0, 7]);
        assert_eq!(encode(7_i64), [0, 0, 0, 8, 0, 0, 0, 0, 0, 0, 0, 7]);
        assert_eq!(encode(-2_i8), [0, 0, 0, 2, 0xFF, 0xFE]);
        assert_eq!(encode(200_u8), [0, 0, 0, 2, 0, 200]);
        assert_eq!(encode(u32::MAX), [0, 0, 0, 4, 0xFF, 0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_large_i64_not_truncated() {
        let v = 5_000_000_000_i64;
        let buf = encode(v);
        assert_eq!(&buf[..4], &8_i32.to_be_bytes());
        assert_eq!(i64::from_binary(&buf[4..]).unwrap(), v);
    }

    #[test]
    fn test_floats() {
        let buf = encode(1.5_f32);
        assert_eq!(&buf[..4], &4_i32.to_be_bytes());
        assert_eq!(f32::from_binary(&buf[4..]).unwrap(), 1.5);

        let buf = encode(std::f64::consts::PI);
        assert_eq!(&buf[..4], &8_i32.to_be_bytes());
        assert_eq!(f64::from_binary(&buf[4..]).unwrap(), std::f64::consts::PI);

        assert_eq!(f64::from_binary(&2.5_f32.to_be_bytes()).unwrap(), 2.5);
        assert_eq!(f32::from_binary(&0.25_f64.to_be_bytes()).unwrap(), 0.25);
    }
}
