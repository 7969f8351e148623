//! Append-only JSON writer.
//!
//! A byte-buffer-plus-indent-tracking writer built directly against
//! `jsonfusion_core::writer::Writer`.

use alloc::string::String;
use alloc::vec::Vec;

use jsonfusion_core::error::{CodecError, CodecResult, ErrorCode};
use jsonfusion_core::number::Number;
use jsonfusion_core::options::WriteOptions;
use jsonfusion_core::reader::ContainerFrame;
use jsonfusion_core::wire_sink::SinkReader;
use jsonfusion_core::writer::{SizeHint, Writer};

/// JSON writer appending to an internal `Vec<u8>` buffer. Construct with
/// [`JsonWriter::new`] (compact) or [`JsonWriter::with_options`] (e.g. for
/// pretty-print mode), then hand `&mut writer` to any `Schema::write_to`
/// call.
pub struct JsonWriter {
    buf: Vec<u8>,
    options: WriteOptions,
    indent: usize,
    frame_stack: Vec<u8>,
}

const INDENT_WIDTH: usize = 2;

impl JsonWriter {
    /// A writer with default (compact) options.
    pub fn new() -> Self {
        JsonWriter::with_options(WriteOptions::default())
    }

    /// A writer honoring the given [`WriteOptions`]. `max_digits` is not
    /// currently wired through to `ryu`'s formatting (it always emits the
    /// shortest round-trippable representation); a future change could clamp
    /// to fewer significant digits if a caller needs lossy truncation.
    pub fn with_options(options: WriteOptions) -> Self {
        JsonWriter {
            buf: Vec::new(),
            options,
            indent: 0,
            frame_stack: Vec::new(),
        }
    }

    /// Consume the writer, returning the bytes written so far.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    /// The bytes written so far, without consuming the writer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    fn write_indent_newline(&mut self) {
        if !self.options.pretty {
            return;
        }
        self.buf.push(b'\n');
        for _ in 0..self.indent * INDENT_WIDTH {
            self.buf.push(b' ');
        }
    }

    fn escape_and_write_str_bytes(&mut self, data: &[u8]) {
        let mut start = 0;
        for (i, &b) in data.iter().enumerate() {
            let escape: &[u8] = match b {
                b'"' => b"\\\"",
                b'\\' => b"\\\\",
                0x08 => b"\\b",
                0x0C => b"\\f",
                b'\n' => b"\\n",
                b'\r' => b"\\r",
                b'\t' => b"\\t",
                0x00..=0x1F => {
                    self.buf.extend_from_slice(&data[start..i]);
                    let mut hex = [0u8; 6];
                    hex.copy_from_slice(b"\\u0000");
                    let hi = b >> 4;
                    let lo = b & 0xF;
                    hex[4] = hex_digit(hi);
                    hex[5] = hex_digit(lo);
                    self.buf.extend_from_slice(&hex);
                    start = i + 1;
                    continue;
                }
                _ => continue,
            };
            self.buf.extend_from_slice(&data[start..i]);
            self.buf.extend_from_slice(escape);
            start = i + 1;
        }
        self.buf.extend_from_slice(&data[start..]);
    }
}

fn hex_digit(v: u8) -> u8 {
    match v {
        0..=9 => b'0' + v,
        _ => b'a' + (v - 10),
    }
}

impl Default for JsonWriter {
    fn default() -> Self {
        JsonWriter::new()
    }
}

impl Writer for JsonWriter {
    fn offset(&self) -> usize {
        self.buf.len()
    }

    fn write_null(&mut self) -> CodecResult<()> {
        self.buf.extend_from_slice(b"null");
        Ok(())
    }

    fn write_bool(&mut self, v: bool) -> CodecResult<()> {
        self.buf
            .extend_from_slice(if v { b"true" } else { b"false" });
        Ok(())
    }

    fn write_number(&mut self, n: Number) -> CodecResult<()> {
        match n {
            Number::Int(i) => {
                let mut buf = itoa::Buffer::new();
                self.buf.extend_from_slice(buf.format(i).as_bytes());
            }
            Number::UInt(u) => {
                let mut buf = itoa::Buffer::new();
                self.buf.extend_from_slice(buf.format(u).as_bytes());
            }
            Number::Float(f) => {
                if !f.is_finite() {
                    return Err(CodecError::new(ErrorCode::IllformedNumber, self.offset())
                        .with_message("JSON cannot represent NaN or infinite values"));
                }
                let mut buf = ryu::Buffer::new();
                self.buf.extend_from_slice(buf.format(f).as_bytes());
            }
        }
        Ok(())
    }

    fn write_string_begin(&mut self, _size_hint: SizeHint) -> CodecResult<()> {
        self.buf.push(b'"');
        Ok(())
    }

    fn write_string_chunk(&mut self, data: &[u8]) -> CodecResult<()> {
        self.escape_and_write_str_bytes(data);
        Ok(())
    }

    fn write_string_end(&mut self) -> CodecResult<()> {
        self.buf.push(b'"');
        Ok(())
    }

    fn write_array_begin(&mut self, size: SizeHint) -> CodecResult<ContainerFrame> {
        self.buf.push(b'[');
        self.frame_stack.push(b']');
        self.indent += 1;
        let frame = match size.exact() {
            Some(n) => ContainerFrame::definite(n),
            None => ContainerFrame::indefinite(),
        };
        if size.exact() != Some(0) {
            self.write_indent_newline();
        }
        Ok(frame)
    }

    fn write_map_begin(&mut self, size: SizeHint) -> CodecResult<ContainerFrame> {
        self.buf.push(b'{');
        self.frame_stack.push(b'}');
        self.indent += 1;
        let frame = match size.exact() {
            Some(n) => ContainerFrame::definite(n),
            None => ContainerFrame::indefinite(),
        };
        if size.exact() != Some(0) {
            self.write_indent_newline();
        }
        Ok(frame)
    }

    fn write_array_end(&mut self, _frame: ContainerFrame) -> CodecResult<()> {
        self.indent -= 1;
        let close = self
            .frame_stack
            .pop()
            .ok_or_else(|| CodecError::new(ErrorCode::IllformedArray, self.offset()))?;
        if self.buf.last() != Some(&b'[') {
            self.write_indent_newline();
        }
        self.buf.push(close);
        Ok(())
    }

    fn write_map_end(&mut self, _frame: ContainerFrame) -> CodecResult<()> {
        self.indent -= 1;
        let close = self
            .frame_stack
            .pop()
            .ok_or_else(|| CodecError::new(ErrorCode::IllformedObject, self.offset()))?;
        if self.buf.last() != Some(&b'{') {
            self.write_indent_newline();
        }
        self.buf.push(close);
        Ok(())
    }

    fn advance_after_value(&mut self, _frame: &mut ContainerFrame) -> CodecResult<()> {
        self.buf.push(b',');
        self.write_indent_newline();
        Ok(())
    }

    fn move_to_value(&mut self, _frame: &mut ContainerFrame) -> CodecResult<()> {
        self.buf.push(b':');
        if self.options.pretty {
            self.buf.push(b' ');
        }
        Ok(())
    }

    fn write_key_as_index(&mut self, idx: i64) -> CodecResult<()> {
        let mut buf = itoa::Buffer::new();
        self.write_string(buf.format(idx))
    }

    fn output_from_sink(&mut self, sink: &dyn SinkReader) -> CodecResult<()> {
        self.buf.extend_from_slice(sink.sink_bytes());
        Ok(())
    }
}

/// Pretty-print a complete, already-written compact document's worth of
/// bytes is not supported here; pretty-printing is decided once, up front,
/// via [`JsonWriter::with_options`] — a write-time option, not a
/// post-processing pass.
pub fn format_number_as_string(n: Number) -> String {
    let mut w = JsonWriter::new();
    let _ = w.write_number(n);
    String::from_utf8(w.into_bytes()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonfusion_testhelpers::test;

    #[test]
    fn writes_compact_object() {
        let mut w = JsonWriter::new();
        let mut frame = w.write_map_begin(SizeHint::Exact(2)).unwrap();
        w.write_string("a").unwrap();
        w.move_to_value(&mut frame).unwrap();
        w.write_number(Number::Int(1)).unwrap();
        w.advance_after_value(&mut frame).unwrap();
        w.write_string("b").unwrap();
        w.move_to_value(&mut frame).unwrap();
        w.write_bool(true).unwrap();
        w.write_map_end(frame).unwrap();
        assert_eq!(w.into_bytes(), br#"{"a":1,"b":true}"#);
    }

    #[test]
    fn writes_pretty_array() {
        let mut w = JsonWriter::with_options(WriteOptions::pretty());
        let mut frame = w.write_array_begin(SizeHint::Exact(2)).unwrap();
        w.write_number(Number::Int(1)).unwrap();
        w.advance_after_value(&mut frame).unwrap();
        w.write_number(Number::Int(2)).unwrap();
        w.write_array_end(frame).unwrap();
        assert_eq!(w.into_bytes(), b"[\n  1,\n  2\n]");
    }

    #[test]
    fn writes_empty_array_without_newlines() {
        let mut w = JsonWriter::with_options(WriteOptions::pretty());
        let frame = w.write_array_begin(SizeHint::Exact(0)).unwrap();
        w.write_array_end(frame).unwrap();
        assert_eq!(w.into_bytes(), b"[]");
    }

    #[test]
    fn escapes_control_characters_and_quotes() {
        let mut w = JsonWriter::new();
        w.write_string("a\"\\\n\x01b").unwrap();
        assert_eq!(w.into_bytes(), br#""a\"\\\n\u0001b""#);
    }

    #[test]
    fn rejects_non_finite_float() {
        let mut w = JsonWriter::new();
        let err = w.write_number(Number::Float(f64::NAN)).unwrap_err();
        assert_eq!(err.code, ErrorCode::IllformedNumber);
    }

    #[test]
    fn key_as_index_is_a_quoted_decimal_string() {
        let mut w = JsonWriter::new();
        w.write_key_as_index(-7).unwrap();
        assert_eq!(w.into_bytes(), br#""-7""#);
    }
}
