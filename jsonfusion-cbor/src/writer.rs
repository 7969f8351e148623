//! CBOR writer (RFC 8949): smallest-width integer/length encoding, and the
//! rest of the `Writer` contract.
//!
//! A header-then-body emission built on CBOR's major-type +
//! additional-info header (RFC 8949 §3).

use alloc::vec::Vec;

use jsonfusion_core::error::CodecResult;
use jsonfusion_core::number::Number;
use jsonfusion_core::reader::ContainerFrame;
use jsonfusion_core::wire_sink::SinkReader;
use jsonfusion_core::writer::{SizeHint, Writer};

const MAJOR_UINT: u8 = 0;
const MAJOR_NEGINT: u8 = 1;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;
const MAJOR_SIMPLE: u8 = 7;

const BREAK: u8 = 0xFF;

/// CBOR writer over an in-memory growable buffer.
///
/// Unlike [`crate::reader::CborReader`], this writer needs no close-byte
/// stack: `write_array_end`/`write_map_end` receive the exact
/// [`ContainerFrame`] `write_array_begin`/`write_map_begin` handed out, so
/// whether to emit a trailing `0xFF` break is a property of that value, not
/// of mutable writer state.
pub struct CborWriter {
    buf: Vec<u8>,
    /// Set while streaming chunks of an indefinite-length text string; each
    /// `write_string_chunk` call then emits its own definite-length
    /// sub-string header rather than raw bytes (RFC 8949 §3.2.3).
    indefinite_string: bool,
}

impl CborWriter {
    /// An empty writer.
    pub fn new() -> Self {
        CborWriter {
            buf: Vec::new(),
            indefinite_string: false,
        }
    }

    /// Consume the writer, returning the bytes written so far.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// Borrow the bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Write a major-type header with the smallest additional-info width
    /// that can hold `value`.
    fn write_header(&mut self, major: u8, value: u64) {
        let top = major << 5;
        if value < 24 {
            self.buf.push(top | value as u8);
        } else if let Ok(v) = u8::try_from(value) {
            self.buf.push(top | 24);
            self.buf.push(v);
        } else if let Ok(v) = u16::try_from(value) {
            self.buf.push(top | 25);
            self.buf.extend_from_slice(&v.to_be_bytes());
        } else if let Ok(v) = u32::try_from(value) {
            self.buf.push(top | 26);
            self.buf.extend_from_slice(&v.to_be_bytes());
        } else {
            self.buf.push(top | 27);
            self.buf.extend_from_slice(&value.to_be_bytes());
        }
    }

    fn write_indefinite_header(&mut self, major: u8) {
        self.buf.push((major << 5) | 31);
    }
}

impl Default for CborWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for CborWriter {
    fn offset(&self) -> usize {
        self.buf.len()
    }

    fn write_null(&mut self) -> CodecResult<()> {
        self.buf.push((MAJOR_SIMPLE << 5) | 22);
        Ok(())
    }

    fn write_bool(&mut self, v: bool) -> CodecResult<()> {
        self.buf.push((MAJOR_SIMPLE << 5) | if v { 21 } else { 20 });
        Ok(())
    }

    fn write_number(&mut self, n: Number) -> CodecResult<()> {
        match n {
            Number::UInt(v) => self.write_header(MAJOR_UINT, v),
            Number::Int(v) if v >= 0 => self.write_header(MAJOR_UINT, v as u64),
            Number::Int(v) => {
                let n = (-(v as i128) - 1) as u64;
                self.write_header(MAJOR_NEGINT, n);
            }
            Number::Float(f) => {
                self.buf.push((MAJOR_SIMPLE << 5) | 27);
                self.buf.extend_from_slice(&f.to_be_bytes());
            }
        }
        crate::trace!("cbor writer: number {:?}", n);
        Ok(())
    }

    fn write_string_begin(&mut self, size_hint: SizeHint) -> CodecResult<()> {
        match size_hint.exact() {
            Some(len) => {
                self.indefinite_string = false;
                self.write_header(MAJOR_TEXT, len as u64);
            }
            None => {
                self.indefinite_string = true;
                self.write_indefinite_header(MAJOR_TEXT);
            }
        }
        Ok(())
    }

    fn write_string_chunk(&mut self, data: &[u8]) -> CodecResult<()> {
        if self.indefinite_string {
            self.write_header(MAJOR_TEXT, data.len() as u64);
        }
        self.buf.extend_from_slice(data);
        Ok(())
    }

    fn write_string_end(&mut self) -> CodecResult<()> {
        if self.indefinite_string {
            self.buf.push(BREAK);
            self.indefinite_string = false;
        }
        Ok(())
    }

    fn write_array_begin(&mut self, size: SizeHint) -> CodecResult<ContainerFrame> {
        match size.exact() {
            Some(len) => {
                self.write_header(MAJOR_ARRAY, len as u64);
                Ok(ContainerFrame::definite(len))
            }
            None => {
                self.write_indefinite_header(MAJOR_ARRAY);
                Ok(ContainerFrame::indefinite())
            }
        }
    }

    fn write_map_begin(&mut self, size: SizeHint) -> CodecResult<ContainerFrame> {
        match size.exact() {
            Some(len) => {
                self.write_header(MAJOR_MAP, len as u64);
                Ok(ContainerFrame::definite(len))
            }
            None => {
                self.write_indefinite_header(MAJOR_MAP);
                Ok(ContainerFrame::indefinite())
            }
        }
    }

    fn write_array_end(&mut self, frame: ContainerFrame) -> CodecResult<()> {
        if frame.remaining.is_none() {
            self.buf.push(BREAK);
        }
        Ok(())
    }

    fn write_map_end(&mut self, frame: ContainerFrame) -> CodecResult<()> {
        if frame.remaining.is_none() {
            self.buf.push(BREAK);
        }
        Ok(())
    }

    fn advance_after_value(&mut self, _frame: &mut ContainerFrame) -> CodecResult<()> {
        // No separator bytes in CBOR; the element count was already baked
        // into the header written by `write_array_begin`/`write_map_begin`.
        Ok(())
    }

    fn move_to_value(&mut self, _frame: &mut ContainerFrame) -> CodecResult<()> {
        Ok(())
    }

    fn write_key_as_index(&mut self, idx: i64) -> CodecResult<()> {
        if idx >= 0 {
            self.write_header(MAJOR_UINT, idx as u64);
        } else {
            let n = (-(idx as i128) - 1) as u64;
            self.write_header(MAJOR_NEGINT, n);
        }
        Ok(())
    }

    fn output_from_sink(&mut self, sink: &dyn SinkReader) -> CodecResult<()> {
        self.buf.extend_from_slice(sink.sink_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonfusion_testhelpers::test;
    use jsonfusion_core::writer::Writer as _;

    #[test]
    fn writes_small_uint_as_single_byte() {
        let mut w = CborWriter::new();
        w.write_number(Number::UInt(5)).unwrap();
        assert_eq!(w.into_bytes(), [0x05]);
    }

    #[test]
    fn writes_negative_one_as_0x20() {
        let mut w = CborWriter::new();
        w.write_number(Number::Int(-1)).unwrap();
        assert_eq!(w.into_bytes(), [0x20]);
    }

    #[test]
    fn writes_1000_with_uint16_header() {
        let mut w = CborWriter::new();
        w.write_number(Number::UInt(1000)).unwrap();
        assert_eq!(w.into_bytes(), [0x19, 0x03, 0xE8]);
    }

    #[test]
    fn writes_definite_length_string() {
        let mut w = CborWriter::new();
        w.write_string("hi").unwrap();
        assert_eq!(w.into_bytes(), [0x62, b'h', b'i']);
    }

    #[test]
    fn writes_indefinite_length_map_with_break() {
        let mut w = CborWriter::new();
        let frame = w.write_map_begin(SizeHint::Unknown).unwrap();
        w.write_map_end(frame).unwrap();
        assert_eq!(w.into_bytes(), [0xBF, 0xFF]);
    }

    #[test]
    fn writes_definite_length_array_header_only() {
        let mut w = CborWriter::new();
        let mut frame = w.write_array_begin(SizeHint::Exact(2)).unwrap();
        w.write_number(Number::UInt(1)).unwrap();
        w.advance_after_value(&mut frame).unwrap();
        w.write_number(Number::UInt(2)).unwrap();
        w.write_array_end(frame).unwrap();
        assert_eq!(w.into_bytes(), [0x82, 0x01, 0x02]);
    }

    #[test]
    fn writes_integer_map_key_directly_not_as_string() {
        let mut w = CborWriter::new();
        w.write_key_as_index(-2).unwrap();
        assert_eq!(w.into_bytes(), [0x21]);
    }
}
