//! Opaque byte-buffer capture for arbitrary sub-documents.
//!
//! A capacity constant paired with an orthogonal growable flag: fixed
//! inline storage by default, with an explicit opt-in to grow on the heap
//! up to the same cap.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use crate::error::{CodecError, CodecResult, ErrorCode};

enum Storage<const CAP: usize> {
    /// Backed by an inline `[u8; CAP]` array: no heap allocation, hard cap at `CAP`.
    Inline { buf: [u8; CAP], len: usize },
    /// Backed by a `Vec<u8>` that may grow up to `CAP` bytes total.
    #[cfg(feature = "alloc")]
    Growable(Vec<u8>),
}

/// A byte buffer that captures an arbitrary sub-document opaquely, for later
/// replay through any writer of the *same* wire format. It carries no
/// cross-format semantics: the captured bytes mean nothing outside the
/// format that produced them.
///
/// A record field declared with this type is filled by a reader's
/// `capture_to_sink` and replayed by a writer's `output_from_sink`, giving
/// O(1) capture regardless of the sub-document's size — the reader never
/// walks into the sub-document's structure, it just records the byte run
/// (or, for a DOM-backed format, a node handle; out of scope here since the
/// DOM-backed YAML backend is an external collaborator).
pub struct WireSink<const CAP: usize> {
    storage: Storage<CAP>,
}

impl<const CAP: usize> WireSink<CAP> {
    /// A sink backed by an inline `[u8; CAP]` buffer. `write` fails once `CAP`
    /// bytes have been written.
    pub fn new() -> Self {
        WireSink {
            storage: Storage::Inline {
                buf: [0u8; CAP],
                len: 0,
            },
        }
    }

    /// A sink backed by a heap buffer that may grow up to `CAP` bytes total.
    #[cfg(feature = "alloc")]
    pub fn new_growable() -> Self {
        WireSink {
            storage: Storage::Growable(Vec::new()),
        }
    }

    /// Empty the sink without changing its growable/inline mode.
    pub fn clear(&mut self) {
        match &mut self.storage {
            Storage::Inline { len, .. } => *len = 0,
            #[cfg(feature = "alloc")]
            Storage::Growable(v) => v.clear(),
        }
    }

    /// Append `bytes`. Returns `false` (and writes nothing) if the sink would
    /// exceed its capacity.
    #[must_use]
    pub fn write(&mut self, bytes: &[u8]) -> bool {
        match &mut self.storage {
            Storage::Inline { buf, len } => {
                if *len + bytes.len() > CAP {
                    return false;
                }
                buf[*len..*len + bytes.len()].copy_from_slice(bytes);
                *len += bytes.len();
                true
            }
            #[cfg(feature = "alloc")]
            Storage::Growable(v) => {
                if v.len() + bytes.len() > CAP {
                    return false;
                }
                v.extend_from_slice(bytes);
                true
            }
        }
    }

    /// Append `bytes`, converting a capacity overflow into a
    /// [`crate::error::ErrorCode::WireSinkOverflow`] at the given offset.
    pub fn write_checked(&mut self, bytes: &[u8], offset: usize) -> CodecResult<()> {
        if self.write(bytes) {
            Ok(())
        } else {
            Err(CodecError::new(ErrorCode::WireSinkOverflow, offset))
        }
    }

    /// Copy up to `n` bytes starting at `offset` into `out`. Returns `false`
    /// if the requested range exceeds `current_size()`.
    pub fn read(&self, out: &mut [u8], n: usize, offset: usize) -> bool {
        let data = self.data();
        if offset + n > data.len() || out.len() < n {
            return false;
        }
        out[..n].copy_from_slice(&data[offset..offset + n]);
        true
    }

    /// The captured bytes.
    pub fn data(&self) -> &[u8] {
        match &self.storage {
            Storage::Inline { buf, len } => &buf[..*len],
            #[cfg(feature = "alloc")]
            Storage::Growable(v) => v.as_slice(),
        }
    }

    /// Number of bytes currently captured.
    pub fn current_size(&self) -> usize {
        self.data().len()
    }

    /// The sink's capacity (`CAP`), regardless of inline/growable mode.
    pub const fn max_size(&self) -> usize {
        CAP
    }
}

impl<const CAP: usize> Default for WireSink<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

/// Object-safe sink target for `Reader::capture_to_sink`, implemented by
/// every [`WireSink`] regardless of its `CAP`.
pub trait SinkWriter {
    /// Append bytes, returning `false` on overflow (mirrors [`WireSink::write`]).
    fn sink_write(&mut self, bytes: &[u8]) -> bool;
}

impl<const CAP: usize> SinkWriter for WireSink<CAP> {
    fn sink_write(&mut self, bytes: &[u8]) -> bool {
        self.write(bytes)
    }
}

/// Object-safe sink source for `Writer::output_from_sink`.
pub trait SinkReader {
    /// The captured bytes, verbatim.
    fn sink_bytes(&self) -> &[u8];
}

impl<const CAP: usize> SinkReader for WireSink<CAP> {
    fn sink_bytes(&self) -> &[u8] {
        self.data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonfusion_testhelpers::test;

    #[test]
    fn inline_sink_rejects_overflow() {
        let mut sink = WireSink::<4>::new();
        assert!(sink.write(b"abcd"));
        assert!(!sink.write(b"e"));
        assert_eq!(sink.data(), b"abcd");
    }

    #[test]
    fn growable_sink_caps_at_max() {
        let mut sink = WireSink::<8>::new_growable();
        assert!(sink.write(b"1234"));
        assert!(sink.write(b"5678"));
        assert!(!sink.write(b"9"));
        assert_eq!(sink.current_size(), 8);
    }

    #[test]
    fn read_with_offset() {
        let mut sink = WireSink::<16>::new();
        sink.write(b"hello world");
        let mut out = [0u8; 5];
        assert!(sink.read(&mut out, 5, 6));
        assert_eq!(&out, b"world");
    }
}
