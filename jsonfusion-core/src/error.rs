//! Error taxonomy shared by every reader, writer and the dispatch engine.
//!
//! A stable, flat error code enum plus a byte offset and JSON-path, so any
//! caller can render a diagnostic without reaching into format-specific
//! internals.

#[cfg(feature = "alloc")]
use alloc::string::String;

use core::fmt;

use crate::path::JsonPath;

/// Stable error codes, grouped into structural, capacity, typing, and
/// semantic failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Structural
    /// The byte stream ended before a value was fully read.
    UnexpectedEndOfData,
    /// Trailing non-whitespace bytes remained after the root value.
    ExcessCharacters,
    /// A number token did not conform to the wire format's number grammar.
    IllformedNumber,
    /// A `null` token was malformed.
    IllformedNull,
    /// A boolean token was malformed.
    IllformedBool,
    /// A string token was malformed (bad escape, unterminated, control byte).
    IllformedString,
    /// An array container was malformed.
    IllformedArray,
    /// A map/object container was malformed.
    IllformedObject,

    // Capacity
    /// A fixed-capacity sequence or string received more elements/bytes than it can hold.
    FixedContainerOverflow,
    /// A [`crate::wire_sink::WireSink`] ran out of capacity while capturing.
    WireSinkOverflow,
    /// Skip or capture recursion exceeded the configured nesting limit.
    SkipStackOverflow,

    // Typing
    /// Expected `null`, found something else.
    NonNull,
    /// Expected a JSON/CBOR boolean, found something else.
    NonBool,
    /// The wire token at this position cannot be read as any numeric storage type.
    WrongJsonForNumber,
    /// Expected a string, found something else.
    NonString,
    /// Expected an array, found something else.
    NonArray,
    /// Expected a map/object, found something else.
    NonObject,
    /// The numeric value does not fit in the target storage type.
    NumericOutOfRange,
    /// A floating-point token was read into an integer storage type.
    FloatInIntegerStorage,

    // Semantic
    /// A `null` was found for a field whose type is not [`crate::category::Category::Optional`].
    NullInNonOptional,
    /// An unknown object key was rejected because strict mode is enabled.
    ExcessField,
    /// A required field's key never appeared.
    MissingField,
    /// The same object key appeared more than once.
    DuplicateKey,
    /// A validator rejected the value.
    SchemaValidationError,

    /// The wire format does not support the requested operation (e.g. CBOR
    /// indefinite-length strings on read, v1).
    NotImplemented,
    /// Failure from the caller-owned byte sink/source (out-parameter buffer too small, etc).
    Io,
}

impl ErrorCode {
    /// Stable, dotted string form (`"json::missing_field"`-style), suitable
    /// for machine consumption.
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorCode::UnexpectedEndOfData => "unexpected-end-of-data",
            ErrorCode::ExcessCharacters => "excess-characters",
            ErrorCode::IllformedNumber => "illformed-number",
            ErrorCode::IllformedNull => "illformed-null",
            ErrorCode::IllformedBool => "illformed-bool",
            ErrorCode::IllformedString => "illformed-string",
            ErrorCode::IllformedArray => "illformed-array",
            ErrorCode::IllformedObject => "illformed-object",
            ErrorCode::FixedContainerOverflow => "fixed-container-overflow",
            ErrorCode::WireSinkOverflow => "wire-sink-overflow",
            ErrorCode::SkipStackOverflow => "skip-stack-overflow",
            ErrorCode::NonNull => "non-null",
            ErrorCode::NonBool => "non-bool",
            ErrorCode::WrongJsonForNumber => "wrong-json-for-number",
            ErrorCode::NonString => "non-string",
            ErrorCode::NonArray => "non-array",
            ErrorCode::NonObject => "non-object",
            ErrorCode::NumericOutOfRange => "numeric-out-of-range",
            ErrorCode::FloatInIntegerStorage => "float-in-integer-storage",
            ErrorCode::NullInNonOptional => "null-in-non-optional",
            ErrorCode::ExcessField => "excess-field",
            ErrorCode::MissingField => "missing-field",
            ErrorCode::DuplicateKey => "duplicate-key",
            ErrorCode::SchemaValidationError => "schema-validation-error",
            ErrorCode::NotImplemented => "not-implemented",
            ErrorCode::Io => "io",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned by every fallible reader, writer, and dispatch operation.
///
/// Carries enough information for [`crate::CodecError::to_string`]-style
/// rendering: the error code, the byte offset it occurred at, and the
/// JSON-path of the field being processed.
#[derive(Debug, Clone)]
pub struct CodecError {
    /// What went wrong.
    pub code: ErrorCode,
    /// Byte offset into the input (parse) or output (serialize) at the time of failure.
    pub offset: usize,
    /// Path from the document root to the field being processed.
    pub path: JsonPath,
    /// Optional free-form detail (e.g. which validator failed, or the offending byte).
    #[cfg(feature = "alloc")]
    pub message: Option<String>,
}

impl CodecError {
    /// Construct an error at the given offset with an empty path; dispatch
    /// fills the path in as it unwinds.
    pub fn new(code: ErrorCode, offset: usize) -> Self {
        CodecError {
            code,
            offset,
            path: JsonPath::root(),
            #[cfg(feature = "alloc")]
            message: None,
        }
    }

    /// Attach a path to an existing error, replacing whatever was there.
    pub fn with_path(mut self, path: JsonPath) -> Self {
        self.path = path;
        self
    }

    /// Attach `path` only if this error doesn't already carry a deeper one.
    /// Used at every point a lower-level error (no path of its own) crosses
    /// into code that knows the current path, without clobbering a path a
    /// nested call already attached.
    pub fn with_path_if_root(self, path: &JsonPath) -> Self {
        if self.path.is_root() {
            self.with_path(path.clone())
        } else {
            self
        }
    }

    /// Attach a free-form message.
    #[cfg(feature = "alloc")]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {} at offset {}", self.code, self.offset)?;
        if !self.path.is_root() {
            write!(f, " ({})", self.path)?;
        }
        #[cfg(feature = "alloc")]
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodecError {}

/// Convenience alias used throughout the reader/writer/dispatch surface.
pub type CodecResult<T> = Result<T, CodecError>;
