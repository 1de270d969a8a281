//! Row handlers for [`decode_with_handler`](crate::decode_with_handler).

use crate::error::Result;
use crate::row::{FromRow, Row};

/// Handler for decoded COPY rows.
///
/// Callback pattern: `row*` → `end`. An error from either callback aborts
/// decoding and is returned to the caller.
pub trait RowHandler {
    /// Called for each row.
    fn row(&mut self, row: Row<'_>) -> Result<()>;

    /// Called after the end marker with the number of rows.
    fn end(&mut self, rows: usize) -> Result<()> {
        let _ = rows;
        Ok(())
    }
}

/// A handler that discards rows and only counts them.
#[derive(Debug, Default)]
pub struct CountHandler {
    rows: usize,
    fields: usize,
    nulls: usize,
}

impl CountHandler {
    /// Create a new count handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of rows seen.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get the number of fields seen across all rows.
    pub fn fields(&self) -> usize {
        self.fields
    }

    /// Get the number of NULL fields seen.
    pub fn nulls(&self) -> usize {
        self.nulls
    }
}

impl RowHandler for CountHandler {
    fn row(&mut self, row: Row<'_>) -> Result<()> {
        self.rows += 1;
        self.fields += row.len();
        self.nulls += row.iter().filter(Option::is_none).count();
        Ok(())
    }
}

/// Handler that collects typed rows.
///
/// # Example
///
/// ```
/// use zero_pgcopy::{decode_with_handler, encode_rows, CollectHandler};
///
/// let payload = encode_rows([(1_i32, "alice"), (2, "bob")]).unwrap();
/// let mut handler: CollectHandler<(i32, String)> = CollectHandler::new();
/// decode_with_handler(&payload, &mut handler).unwrap();
/// for (id, name) in handler.into_rows() {
///     println!("{}: {}", id, name);
/// }
/// ```
#[derive(Debug, Default)]
pub struct CollectHandler<T> {
    rows: Vec<T>,
}

impl<T> CollectHandler<T> {
    /// Create a new collect handler.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Get collected rows.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Take collected rows.
    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }

    /// Get the number of collected rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if no rows were collected.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: for<'a> FromRow<'a>> RowHandler for CollectHandler<T> {
    fn row(&mut self, row: Row<'_>) -> Result<()> {
        let typed_row = row.decode::<T>()?;
        self.rows.push(typed_row);
        Ok(())
    }
}

/// Handler that collects only the first row.
///
/// Later rows are still validated for framing but not converted.
#[derive(Debug, Default)]
pub struct FirstRowHandler<T> {
    row: Option<T>,
}

impl<T> FirstRowHandler<T> {
    /// Create a new first row handler.
    pub fn new() -> Self {
        Self { row: None }
    }

    /// Get the first row if present.
    pub fn get(&self) -> Option<&T> {
        self.row.as_ref()
    }

    /// Take the first row.
    pub fn into_row(self) -> Option<T> {
        self.row
    }
}

impl<T: for<'a> FromRow<'a>> RowHandler for FirstRowHandler<T> {
    fn row(&mut self, row: Row<'_>) -> Result<()> {
        if self.row.is_none() {
            let typed_row = row.decode::<T>()?;
            self.row = Some(typed_row);
        }
        Ok(())
    }
}
