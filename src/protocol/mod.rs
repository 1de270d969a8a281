//! COPY binary wire format.
//!
//! # Structure
//!
//! - `frame`: Fixed byte sequences framing a COPY binary payload
//! - `codec`: Low-level big-endian read/write primitives

pub mod codec;
pub mod frame;

pub use frame::{CopyHeader, END_MARKER, HEADER_LEN, NULL_FIELD, SIGNATURE};
