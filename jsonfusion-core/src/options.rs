//! Per-call options, passed explicitly by the caller rather than kept as
//! global state.
//!
//! A plain, `Copy`able builder struct with a `Default` impl, not an
//! environment variable or config file — this is a library, not a service.

/// Options controlling [`crate::record::read_record`] and the generic
/// `Schema::read_from` dispatch.
#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    /// If `true`, an object key with no matching field is
    /// [`crate::error::ErrorCode::ExcessField`]. If `false` (the default),
    /// unknown keys are skipped with no error.
    pub strict_unknown_fields: bool,
    /// Run field/annotated validators as values are read. Default `true`:
    /// validators run immediately after a leaf value is read or a
    /// container is closed.
    pub validate_on_parse: bool,
    /// Maximum nesting depth for recursive descent (records, sequences,
    /// maps, and `skip_value`). Exceeding it is
    /// [`crate::error::ErrorCode::SkipStackOverflow`].
    pub max_depth: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        ReadOptions {
            strict_unknown_fields: false,
            validate_on_parse: true,
            max_depth: crate::path::DEFAULT_MAX_DEPTH,
        }
    }
}

/// Options controlling `Schema::write_to` dispatch and format-specific
/// writers.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Pretty-print containers with newlines and indentation (JSON writer
    /// only; CBOR ignores this).
    pub pretty: bool,
    /// Run field/annotated validators before writing. Default `false`:
    /// a library-wide, opt-in setting.
    pub validate_on_serialize: bool,
    /// Cap on significant digits for floating-point formatting (JSON writer only).
    pub max_digits: u8,
}

impl Default for WriteOptions {
    fn default() -> Self {
        WriteOptions {
            pretty: false,
            validate_on_serialize: false,
            max_digits: 17,
        }
    }
}

impl WriteOptions {
    /// A `WriteOptions` with `pretty` enabled, everything else default.
    pub fn pretty() -> Self {
        WriteOptions {
            pretty: true,
            ..Default::default()
        }
    }
}
