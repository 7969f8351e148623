//! The abstract reader contract every wire-format reader satisfies,
//! expressed as an object-safe Rust trait.

use crate::error::CodecResult;
use crate::number::{Number, NumberKind};
use crate::wire_sink::SinkWriter;

/// Outcome of an operation that may legitimately not match the current wire
/// token (e.g. trying to read `null` when the token is actually a number).
/// The third possible outcome, a malformed token, is represented by the
/// surrounding `CodecResult`'s `Err` arm rather than a variant here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matched<T> {
    /// The token matched and was consumed; cursor advanced.
    Yes(T),
    /// The token is of a different kind; the cursor is unchanged.
    No,
}

impl<T> Matched<T> {
    /// True for the `Yes` arm.
    pub fn is_match(&self) -> bool {
        matches!(self, Matched::Yes(_))
    }

    /// Unwrap into `Option<T>`.
    pub fn into_option(self) -> Option<T> {
        match self {
            Matched::Yes(v) => Some(v),
            Matched::No => None,
        }
    }
}

/// Outcome of `read_string_chunk`: how many bytes were written into the
/// caller's buffer, and whether the string is now fully consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringChunk {
    /// Bytes written into the caller's buffer this call.
    pub bytes_written: usize,
    /// `true` once the closing delimiter (or definite-length end, for CBOR)
    /// has been consumed. A chunk that exactly fills the caller's buffer and
    /// is immediately followed by the closing delimiter must still report
    /// `done = true`.
    pub done: bool,
}

/// A small stack-owned struct a reader mutates to track progress through one
/// array or map. `remaining = None` means "unknown in advance" (CBOR
/// indefinite-length, or any DOM-backed iterator) and the reader must be
/// asked via `advance_after_value`'s `has_value` result instead of counting
/// down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ContainerFrame {
    /// Elements/entries not yet produced, if known up front.
    pub remaining: Option<usize>,
    /// How many elements/entries have been produced so far.
    pub consumed: usize,
}

impl ContainerFrame {
    /// A frame for a container whose length is known.
    pub fn definite(len: usize) -> Self {
        ContainerFrame {
            remaining: Some(len),
            consumed: 0,
        }
    }

    /// A frame for a container whose length is discovered by iterating
    /// (JSON containers, CBOR indefinite-length containers).
    pub fn indefinite() -> Self {
        ContainerFrame {
            remaining: None,
            consumed: 0,
        }
    }
}

/// Every reader adapts some byte source to this contract. Scalar and
/// structural methods report one of `ok`/`no_match`/`error` where
/// applicable (`Matched<T>` inside a `CodecResult`); iteration methods
/// additionally report whether another element/entry follows.
///
/// Object-safe by construction (no generic methods, no `Self` return types)
/// so the dispatch engine in [`crate::record`] can hold a `&mut dyn Reader`
/// and the same field table works against JSON, CBOR, or any future format.
pub trait Reader {
    /// Current byte offset, for error reporting.
    fn offset(&self) -> usize;

    /// Try to read `null`. `Matched::No` leaves the cursor unchanged so the
    /// caller can fall through to reading the wrapped type (`Optional<V>`).
    fn try_read_null(&mut self) -> CodecResult<Matched<()>>;

    /// Read a boolean.
    fn read_bool(&mut self) -> CodecResult<Matched<bool>>;

    /// Read a number, narrowed and range-checked against `kind`.
    fn read_number(&mut self, kind: NumberKind) -> CodecResult<Matched<Number>>;

    /// Fill up to `out.len()` bytes of a string value, decoding escapes/
    /// surrogate pairs into UTF-8 as it goes. The reader keeps internal
    /// state across calls so a value longer than the caller's buffer streams
    /// across several calls; a multi-byte UTF-8 sequence split by a call
    /// boundary is buffered internally and flushed on the next call.
    fn read_string_chunk(&mut self, out: &mut [u8]) -> CodecResult<Matched<StringChunk>>;

    /// Read a map key meant to be used as an integer (for integer-keyed
    /// maps): as a string for textual formats, or as an integer directly for
    /// binary ones. Returned as `i64`; the dispatcher range-checks against
    /// the declared key type the same way it range-checks `read_number`.
    fn read_key_as_index(&mut self) -> CodecResult<Matched<i64>>;

    /// Begin an array. The returned frame is threaded through
    /// `advance_after_value`/`skip_value` for the rest of the container.
    fn read_array_begin(&mut self) -> CodecResult<Matched<ContainerFrame>>;

    /// Begin a map.
    fn read_map_begin(&mut self) -> CodecResult<Matched<ContainerFrame>>;

    /// Between elements (arrays) or entries (maps): consume a separator if
    /// the format has one, and report whether another element/entry follows.
    fn advance_after_value(&mut self, frame: &mut ContainerFrame) -> CodecResult<bool>;

    /// Between a map's key and its value (no-op for formats with no
    /// key/value separator, e.g. CBOR).
    fn move_to_value(&mut self, frame: &mut ContainerFrame) -> CodecResult<()>;

    /// Consume and discard an arbitrary value, bounded by `max_depth`
    /// (reported as [`crate::error::ErrorCode::SkipStackOverflow`] if exceeded).
    fn skip_value(&mut self, max_depth: usize) -> CodecResult<()>;

    /// Equivalent to `skip_value`, except the skipped bytes are appended to
    /// `sink` as they're consumed. For byte-iterator formats this is the raw
    /// byte run.
    fn capture_to_sink(&mut self, sink: &mut dyn SinkWriter, max_depth: usize) -> CodecResult<()>;

    /// Verify the input is fully consumed. Textual formats allow trailing
    /// whitespace; binary formats require strict EOF.
    fn finish(&mut self) -> CodecResult<()>;
}

/// Helper built on top of [`Reader::read_string_chunk`]: assemble a complete
/// string into a caller-provided growable buffer. Used by map/record key
/// reading and by any `String`-typed field, so every format only has to
/// implement the chunked primitive once.
#[cfg(feature = "alloc")]
pub fn read_full_string(
    reader: &mut dyn Reader,
    out: &mut alloc::string::String,
) -> CodecResult<Matched<()>> {
    let mut buf = [0u8; 256];
    loop {
        match reader.read_string_chunk(&mut buf)? {
            Matched::No if out.is_empty() => return Ok(Matched::No),
            Matched::No => {
                // Shouldn't happen mid-string, but don't silently truncate.
                return Ok(Matched::No);
            }
            Matched::Yes(chunk) => {
                // Safety of this byte-reinterpretation is the same guarantee
                // `read_string_chunk` already makes: it only ever emits
                // complete, valid UTF-8 to the caller.
                out.push_str(core::str::from_utf8(&buf[..chunk.bytes_written]).unwrap_or(""));
                if chunk.done {
                    return Ok(Matched::Yes(()));
                }
            }
        }
    }
}
