//! The abstract writer contract every wire-format writer satisfies,
//! symmetric to [`crate::reader::Reader`].

use crate::error::CodecResult;
use crate::number::Number;
use crate::reader::ContainerFrame;
use crate::wire_sink::SinkReader;

/// Size hint passed to `write_string_begin`/`write_array_begin`/
/// `write_map_begin`: either an exact length (CBOR definite-length framing)
/// or "unknown" (CBOR indefinite-length, or JSON, which has no up-front
/// length at all).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeHint {
    /// The exact element/byte count.
    Exact(usize),
    /// Not known ahead of time.
    Unknown,
}

impl SizeHint {
    /// The exact count, if known.
    pub fn exact(&self) -> Option<usize> {
        match self {
            SizeHint::Exact(n) => Some(*n),
            SizeHint::Unknown => None,
        }
    }
}

/// Every writer adapts some byte sink to this contract. Object-safe, so the
/// dispatch engine holds a `&mut dyn Writer` and the same field table drives
/// JSON, CBOR, or any future format.
pub trait Writer {
    /// Bytes written so far, for diagnostics.
    fn offset(&self) -> usize;

    /// Write `null`.
    fn write_null(&mut self) -> CodecResult<()>;

    /// Write a boolean.
    fn write_bool(&mut self, v: bool) -> CodecResult<()>;

    /// Write a number in the format's idiomatic encoding for its concrete kind.
    fn write_number(&mut self, n: Number) -> CodecResult<()>;

    /// Begin a string value. `size_hint` is an exact length for formats that
    /// need it up front (CBOR definite strings); [`SizeHint::Unknown`]
    /// requests indefinite-length encoding where the format supports it
    /// (CBOR indefinite strings, or JSON, where it's simply ignored).
    fn write_string_begin(&mut self, size_hint: SizeHint) -> CodecResult<()>;

    /// Write one chunk of a string's bytes (already valid UTF-8). JSON
    /// escapes control characters and the two delimiters here; non-ASCII is
    /// passed through as UTF-8.
    fn write_string_chunk(&mut self, data: &[u8]) -> CodecResult<()>;

    /// End a string value.
    fn write_string_end(&mut self) -> CodecResult<()>;

    /// Convenience one-call form of `write_string_begin`/`_chunk`/`_end`.
    fn write_string(&mut self, s: &str) -> CodecResult<()> {
        self.write_string_begin(SizeHint::Exact(s.len()))?;
        self.write_string_chunk(s.as_bytes())?;
        self.write_string_end()
    }

    /// Begin an array of `size` elements (`SizeHint::Unknown` for an
    /// indefinite-length/streamed array).
    fn write_array_begin(&mut self, size: SizeHint) -> CodecResult<ContainerFrame>;

    /// Begin a map of `size` entries.
    fn write_map_begin(&mut self, size: SizeHint) -> CodecResult<ContainerFrame>;

    /// End an array, validating that the written element count matches what
    /// `write_array_begin` promised (for definite-length encodings).
    fn write_array_end(&mut self, frame: ContainerFrame) -> CodecResult<()>;

    /// End a map, symmetric to `write_array_end`.
    fn write_map_end(&mut self, frame: ContainerFrame) -> CodecResult<()>;

    /// Called *between* elements/entries, not after each one.
    fn advance_after_value(&mut self, frame: &mut ContainerFrame) -> CodecResult<()>;

    /// Between a map's key and its value.
    fn move_to_value(&mut self, frame: &mut ContainerFrame) -> CodecResult<()>;

    /// Emit an integer-valued map key in the format's idiomatic form.
    fn write_key_as_index(&mut self, idx: i64) -> CodecResult<()>;

    /// Emit a [`crate::wire_sink::WireSink`]'s captured bytes verbatim as a
    /// single value.
    fn output_from_sink(&mut self, sink: &dyn SinkReader) -> CodecResult<()>;
}
