//! A zero-copy codec for the PostgreSQL COPY binary format.
//!
//! # Features
//!
//! - **Zero-copy decoding**: Row fields borrow straight from the payload buffer
//! - **Explicit nullness**: NULL is `None`, an empty field is `Some(&[])`
//! - **Typed rows**: Decode rows into tuples or scan them into existing slots
//! - **Sans-I/O**: Pure transforms over byte buffers, usable with any transport
//!
//! # Example
//!
//! ```
//! use zero_pgcopy::{CopyWriter, decode};
//!
//! fn main() -> zero_pgcopy::Result<()> {
//!     let mut writer = CopyWriter::new();
//!     writer.write_row(&("abc", true, None::<i32>))?;
//!     writer.write_values(&[&"", &false, &Some(vec![1_u8, 2, 3, 4, 5])])?;
//!     let payload = writer.finish();
//!
//!     decode(&payload, |row| {
//!         let mut name = String::new();
//!         let mut flag = false;
//!         let mut blob: Option<Vec<u8>> = None;
//!         row.scan((&mut name, &mut flag, &mut blob))?;
//!         println!("{:?} {} {:?}", name, flag, blob);
//!         Ok(())
//!     })
//! }
//! ```

pub mod conversion;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod handler;
pub mod opts;
pub mod protocol;
pub mod row;

pub use conversion::{FromWireValue, ToRow, ToWireValue, Value};
pub use decoder::{CopyReader, decode, decode_collect, decode_with_handler, decode_with_opts};
pub use encoder::{CopyWriter, encode_row, encode_rows, values_to_bytes, wrap_rows};
pub use error::{Error, Result};
pub use handler::{CollectHandler, CountHandler, FirstRowHandler, RowHandler};
pub use opts::Opts;
pub use row::{FromRow, Row, ScanInto, scan_into};
