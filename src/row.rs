//! Decoded rows and typed row decoding.

use crate::conversion::{FromWireValue, Value, decode_field};
use crate::error::{Error, Result};

/// One row of a COPY binary payload.
///
/// Fields borrow from the payload buffer. `None` is a NULL field, `Some(&[])`
/// is a present zero-length field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row<'a> {
    fields: Vec<Option<&'a [u8]>>,
}

impl<'a> Row<'a> {
    /// Create a row from its fields.
    pub fn new(fields: Vec<Option<&'a [u8]>>) -> Self {
        Self { fields }
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the row has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Get a field by index. `None` if out of range, `Some(None)` if NULL.
    pub fn get(&self, idx: usize) -> Option<Option<&'a [u8]>> {
        self.fields.get(idx).copied()
    }

    /// Check if the field at `idx` is NULL.
    pub fn is_null(&self, idx: usize) -> bool {
        matches!(self.get(idx), Some(None))
    }

    /// Iterate over fields.
    pub fn iter(&self) -> impl Iterator<Item = Option<&'a [u8]>> + '_ {
        self.fields.iter().copied()
    }

    /// Get all fields.
    pub fn fields(&self) -> &[Option<&'a [u8]>] {
        &self.fields
    }

    /// Take all fields.
    pub fn into_fields(self) -> Vec<Option<&'a [u8]>> {
        self.fields
    }

    /// Copy the fields out of the payload buffer.
    pub fn to_values(&self) -> Vec<Value> {
        self.iter().map(Value::from).collect()
    }

    /// Decode a single field.
    pub fn get_as<T: FromWireValue<'a>>(&self, idx: usize) -> Result<T> {
        let field = self.get(idx).ok_or(Error::ArityMismatch {
            expected: idx + 1,
            actual: self.len(),
        })?;
        decode_field(field).map_err(|e| e.at_field(idx))
    }

    /// Decode the whole row into a typed value, usually a tuple.
    pub fn decode<T: FromRow<'a>>(&self) -> Result<T> {
        T::from_fields(&self.fields)
    }

    /// Decode the row into destination slots.
    ///
    /// ```
    /// # use zero_pgcopy::Row;
    /// let row = Row::new(vec![Some(&b"abc"[..]), None]);
    /// let mut name = String::new();
    /// let mut age: Option<i32> = Some(1);
    /// row.scan((&mut name, &mut age)).unwrap();
    /// assert_eq!(name, "abc");
    /// assert_eq!(age, None);
    /// ```
    pub fn scan<S: ScanInto<'a>>(&self, dest: S) -> Result<()> {
        dest.scan_into(&self.fields)
    }
}

impl<'a> IntoIterator for Row<'a> {
    type Item = Option<&'a [u8]>;
    type IntoIter = std::vec::IntoIter<Option<&'a [u8]>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

/// Trait for decoding a row into a Rust type.
pub trait FromRow<'a>: Sized {
    /// Decode from the row's fields.
    fn from_fields(fields: &[Option<&'a [u8]>]) -> Result<Self>;
}

/// Trait for destination slots a row can be scanned into.
///
/// Implemented for tuples of `&mut T`. Every field is decoded before any
/// slot is written, so on error all slots keep their previous values.
pub trait ScanInto<'a> {
    /// Decode `fields` and store them into the slots.
    fn scan_into(self, fields: &[Option<&'a [u8]>]) -> Result<()>;
}

/// Decode `fields` into destination slots.
pub fn scan_into<'a, S: ScanInto<'a>>(fields: &[Option<&'a [u8]>], dest: S) -> Result<()> {
    dest.scan_into(fields)
}

#[inline]
fn check_arity(expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::ArityMismatch { expected, actual });
    }
    Ok(())
}

/// Implementation for empty tuple - matches rows with zero fields
impl FromRow<'_> for () {
    fn from_fields(fields: &[Option<&[u8]>]) -> Result<Self> {
        check_arity(0, fields.len())
    }
}

/// Any number of fields, copied out as untyped values
impl FromRow<'_> for Vec<Value> {
    fn from_fields(fields: &[Option<&[u8]>]) -> Result<Self> {
        Ok(fields.iter().copied().map(Value::from).collect())
    }
}

macro_rules! impl_from_row_tuple {
    ($count:literal: $($idx:tt => $T:ident),+) => {
        impl<'a, $($T: FromWireValue<'a>),+> FromRow<'a> for ($($T,)+) {
            fn from_fields(fields: &[Option<&'a [u8]>]) -> Result<Self> {
                check_arity($count, fields.len())?;
                Ok(($(
                    decode_field::<$T>(fields[$idx]).map_err(|e| e.at_field($idx))?,
                )+))
            }
        }

        impl<'a, 's, $($T: FromWireValue<'a>),+> ScanInto<'a> for ($(&'s mut $T,)+) {
            fn scan_into(self, fields: &[Option<&'a [u8]>]) -> Result<()> {
                let values = <($($T,)+) as FromRow<'a>>::from_fields(fields)?;
                $(*self.$idx = values.$idx;)+
                Ok(())
            }
        }
    };
}

impl_from_row_tuple!(1: 0 => T1);
impl_from_row_tuple!(2: 0 => T1, 1 => T2);
impl_from_row_tuple!(3: 0 => T1, 1 => T2, 2 => T3);
impl_from_row_tuple!(4: 0 => T1, 1 => T2, 2 => T3, 3 => T4);
impl_from_row_tuple!(5: 0 => T1, 1 => T2, 2 => T3, 3 => T4, 4 => T5);
impl_from_row_tuple!(6: 0 => T1, 1 => T2, 2 => T3, 3 => T4, 4 => T5, 5 => T6);
impl_from_row_tuple!(7: 0 => T1, 1 => T2, 2 => T3, 3 => T4, 4 => T5, 5 => T6, 6 => T7);
impl_from_row_tuple!(8: 0 => T1, 1 => T2, 2 => T3, 3 => T4, 4 => T5, 5 => T6, 6 => T7, 7 => T8);
impl_from_row_tuple!(9: 0 => T1, 1 => T2, 2 => T3, 3 => T4, 4 => T5, 5 => T6, 6 => T7, 7 => T8, 8 => T9);
impl_from_row_tuple!(10: 0 => T1, 1 => T2, 2 => T3, 3 => T4, 4 => T5, 5 => T6, 6 => T7, 7 => T8, 8 => T9, 9 => T10);
impl_from_row_tuple!(11: 0 => T1, 1 => T2, 2 => T3, 3 => T4, 4 => T5, 5 => T6, 6 => T7, 7 => T8, 8 => T9, 9 => T10, 10 => T11);
impl_from_row_tuple!(12: 0 => T1, 1 => T2, 2 => T3, 3 => T4, 4 => T5, 5 => T6, 6 => T7, 7 => T8, 8 => T9, 9 => T10, 10 => T11, 11 => T12);
impl_from_row_tuple!(13: 0 => T1, 1 => T2, 2 => T3, 3 => T4, 4 => T5, 5 => T6, 6 => T7, 7 => T8, 8 => T9, 9 => T10, 10 => T11, 11 => T12, 12 => T13);
impl_from_row_tuple!(14: 0 => T1, 1 => T2, 2 => T3, 3 => T4, 4 => T5, 5 => T6, 6 => T7, 7 => T8, 8 => T9, 9 => T10, 10 => T11, 11 => T12, 12 => T13, 13 => T14);
impl_from_row_tuple!(15: 0 => T1, 1 => T2, 2 => T3, 3 => T4, 4 => T5, 5 => T6, 6 => T7, 7 => T8, 8 => T9, 9 => T10, 10 => T11, 11 => T12, 12 => T13, 13 => T14, 14 => T15);
impl_from_row_tuple!(16: 0 => T1, 1 => T2, 2 => T3, 3 => T4, 4 => T5, 5 => T6, 6 => T7, 7 => T8, 8 => T9, 9 => T10, 10 => T11, 11 => T12, 12 => T13, 13 => T14, 14 => T15, 15 => T16);
