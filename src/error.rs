//! Error types for zero-pgcopy.

use thiserror::Error;

/// Result type for zero-pgcopy operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for zero-pgcopy.
#[derive(Debug, Error)]
pub enum Error {
    /// Payload is shorter than the header or does not start with the COPY signature
    #[error("malformed COPY header: {0}")]
    MalformedHeader(String),

    /// Stream ended without the end-of-data marker
    #[error("unexpected end of COPY data: missing end marker")]
    UnexpectedEof,

    /// A field length prefix or payload runs past the end of the buffer
    #[error("truncated field: expected {expected} bytes, {remaining} remaining")]
    TruncatedField {
        /// Bytes the frame declared
        expected: usize,
        /// Bytes actually left in the buffer
        remaining: usize,
    },

    /// Field length prefix is negative but not the NULL marker
    #[error("invalid field length: {0}")]
    InvalidFieldLength(i32),

    /// Field length exceeds the configured maximum
    #[error("field length {len} exceeds maximum {max}")]
    FieldTooLarge {
        /// Declared field length
        len: usize,
        /// Configured maximum
        max: usize,
    },

    /// Number of destinations differs from the number of fields in the row
    #[error("arity mismatch: expected {expected} fields, row has {actual}")]
    ArityMismatch {
        /// Number of destinations
        expected: usize,
        /// Number of fields in the row
        actual: usize,
    },

    /// NULL field routed to a destination that cannot hold NULL
    #[error("cannot convert NULL to {target}")]
    NullNotAllowed {
        /// Destination type name
        target: &'static str,
    },

    /// Field width is not one the destination type accepts
    #[error("unsupported field width {width} for {target}")]
    UnsupportedWidth {
        /// Destination type name
        target: &'static str,
        /// Field length in bytes
        width: usize,
    },

    /// Decoded integer does not fit into the destination type
    #[error("value {value} does not fit into {target}")]
    NumericOverflow {
        /// Destination type name
        target: &'static str,
        /// The value that did not fit
        value: i128,
    },

    /// No conversion exists between the field and the requested type
    #[error("unsupported conversion to {target}")]
    UnsupportedConversion {
        /// Requested type name
        target: &'static str,
    },

    /// A `Valuer` produced a value shape that has no wire representation
    #[error("unsupported valuer result: {kind}")]
    UnsupportedValuerResult {
        /// Kind of the produced value
        kind: &'static str,
    },

    /// Bytes were found after the end marker
    #[error("{len} trailing bytes after end marker")]
    TrailingData {
        /// Number of trailing bytes
        len: usize,
    },

    /// Field content could not be decoded (invalid UTF-8, hook failure, ...)
    #[error("decode error: {0}")]
    Decode(String),

    /// Conversion failed at a specific field position
    #[error("field {index}: {source}")]
    Field {
        /// Zero-based field position in the row
        index: usize,
        /// Underlying conversion error
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap this error with the field position it occurred at.
    pub fn at_field(self, index: usize) -> Self {
        Error::Field {
            index,
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, skipping field position wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Field { source, .. } => source.root(),
            other => other,
        }
    }

    /// Field position of the error, if it was raised while converting a field.
    pub fn field_index(&self) -> Option<usize> {
        match self {
            Error::Field { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// Returns true if the error means the payload framing itself is broken.
    ///
    /// Rows produced before a frame error may be incomplete.
    pub fn is_frame_error(&self) -> bool {
        matches!(
            self.root(),
            Error::MalformedHeader(_)
                | Error::UnexpectedEof
                | Error::TruncatedField { .. }
                | Error::InvalidFieldLength(_)
                | Error::FieldTooLarge { .. }
                | Error::TrailingData { .. }
        )
    }
}

impl<Src: std::fmt::Debug, Dst: std::fmt::Debug + ?Sized>
    From<zerocopy::error::CastError<Src, Dst>> for Error
{
    fn from(err: zerocopy::error::CastError<Src, Dst>) -> Self {
        Error::MalformedHeader(format!("zerocopy cast error: {err:?}"))
    }
}
