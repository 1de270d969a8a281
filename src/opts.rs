//! Decoder options.

use no_panic::no_panic;

/// Options for reading a COPY binary payload.
#[derive(Debug, Clone)]
pub struct Opts {
    /// Fail with `Error::TrailingData` when bytes follow the end marker.
    ///
    /// Default: `false`
    pub reject_trailing_data: bool,

    /// Largest accepted field length in bytes.
    ///
    /// Default: `None`
    pub max_field_len: Option<usize>,

    /// Number of fields every row must have (the column count of the COPY).
    ///
    /// Default: `None`
    pub expected_fields: Option<usize>,
}

impl Default for Opts {
    #[no_panic]
    fn default() -> Self {
        Self {
            reject_trailing_data: false,
            max_field_len: None,
            expected_fields: None,
        }
    }
}

impl Opts {
    /// Strict options: reject trailing data after the end marker.
    pub fn strict() -> Self {
        Self {
            reject_trailing_data: true,
            ..Self::default()
        }
    }
}
