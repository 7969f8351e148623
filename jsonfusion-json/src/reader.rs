//! Byte-iterator JSON reader.
//!
//! A single pass over a borrowed `&[u8]`, combining tokenizing and
//! interpreting into one traversal: `jsonfusion_core::reader::Reader`
//! already gives the dispatcher everything it needs (try-semantics,
//! chunked strings, container frames) without a separate
//! token-materialization layer.

use alloc::vec::Vec;

use jsonfusion_core::error::{CodecError, CodecResult, ErrorCode};
use jsonfusion_core::number::{Number, NumberKind};
use jsonfusion_core::reader::{ContainerFrame, Matched, Reader, StringChunk};
use jsonfusion_core::wire_sink::SinkWriter;

use crate::{trace};

/// JSON reader over a borrowed byte slice. The whole document lives in
/// memory (no async/streaming I/O), so `capture_to_sink` can record a
/// skipped value's byte range directly instead of threading a filler
/// functor through the skip traversal.
pub struct JsonReader<'a> {
    input: &'a [u8],
    pos: usize,
    /// Close byte (`]` or `}`) for each currently-open container, innermost
    /// last. Recursive descent guarantees the top entry always matches the
    /// frame the next `advance_after_value`/`move_to_value` call concerns.
    frame_stack: Vec<u8>,
    /// `true` while mid-string (the opening quote has been consumed but not
    /// the closing one) across a run of `read_string_chunk` calls.
    in_string: bool,
    /// UTF-8 bytes decoded but not yet handed to the caller, because the
    /// previous `read_string_chunk` call's buffer ran out of room
    /// mid-codepoint.
    pending: [u8; 4],
    pending_len: u8,
}

impl<'a> JsonReader<'a> {
    /// Build a reader over `input`. Does not allocate until a container is opened.
    pub fn new(input: &'a [u8]) -> Self {
        JsonReader {
            input,
            pos: 0,
            frame_stack: Vec::new(),
            in_string: false,
            pending: [0; 4],
            pending_len: 0,
        }
    }

    fn skip_ws(&mut self) {
        while let Some(&b) = self.input.get(self.pos) {
            match b {
                b' ' | b'\t' | b'\n' | b'\r' => self.pos += 1,
                _ => break,
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn err(&self, code: ErrorCode) -> CodecError {
        CodecError::new(code, self.pos)
    }

    fn try_consume_literal(&mut self, lit: &[u8]) -> bool {
        if self.input[self.pos..].starts_with(lit) {
            self.pos += lit.len();
            true
        } else {
            false
        }
    }

    /// Find the end (exclusive) of a number token starting at `self.pos`,
    /// validating RFC 8259 grammar as it goes: optional `-`, an integer part
    /// with no leading zero on multi-digit integers, an optional `.digits`
    /// fraction, an optional `[eE][+-]?digits` exponent.
    fn scan_number(&self) -> CodecResult<(usize, bool)> {
        let start = self.pos;
        let mut i = start;
        let bytes = self.input;
        let mut is_float = false;

        if bytes.get(i) == Some(&b'-') {
            i += 1;
        }
        let int_start = i;
        match bytes.get(i) {
            Some(b'0') => {
                i += 1;
                if matches!(bytes.get(i), Some(b'0'..=b'9')) {
                    return Err(CodecError::new(ErrorCode::IllformedNumber, start));
                }
            }
            Some(b'1'..=b'9') => {
                i += 1;
                while matches!(bytes.get(i), Some(b'0'..=b'9')) {
                    i += 1;
                }
            }
            _ => return Err(CodecError::new(ErrorCode::IllformedNumber, start)),
        }
        if i == int_start {
            return Err(CodecError::new(ErrorCode::IllformedNumber, start));
        }

        if bytes.get(i) == Some(&b'.') {
            is_float = true;
            i += 1;
            let frac_start = i;
            while matches!(bytes.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
            if i == frac_start {
                return Err(CodecError::new(ErrorCode::IllformedNumber, start));
            }
        }

        if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
            is_float = true;
            i += 1;
            if matches!(bytes.get(i), Some(b'+') | Some(b'-')) {
                i += 1;
            }
            let exp_start = i;
            while matches!(bytes.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
            if i == exp_start {
                return Err(CodecError::new(ErrorCode::IllformedNumber, start));
            }
        }

        Ok((i, is_float))
    }

    /// Write bytes into the caller's `out` buffer, overflowing into
    /// `self.pending` if `out` doesn't have room for all of them. Returns
    /// `true` if everything was written to `out` (no overflow).
    fn push_bytes(&mut self, bytes: &[u8], out: &mut [u8], out_pos: &mut usize) -> bool {
        let room = out.len() - *out_pos;
        let take = room.min(bytes.len());
        out[*out_pos..*out_pos + take].copy_from_slice(&bytes[..take]);
        *out_pos += take;
        if take < bytes.len() {
            let leftover = &bytes[take..];
            self.pending[..leftover.len()].copy_from_slice(leftover);
            self.pending_len = leftover.len() as u8;
            false
        } else {
            true
        }
    }

    fn decode_escape(&mut self) -> CodecResult<[u8; 4]> {
        // `\` already consumed; self.pos points at the escape-kind byte.
        let kind = self
            .input
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.err(ErrorCode::UnexpectedEndOfData))?;
        self.pos += 1;
        let mut buf = [0u8; 4];
        let ch = match kind {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let high = self.read_hex4()?;
                if (0xD800..=0xDBFF).contains(&high) {
                    if self.input.get(self.pos) != Some(&b'\\')
                        || self.input.get(self.pos + 1) != Some(&b'u')
                    {
                        return Err(self.err(ErrorCode::IllformedString));
                    }
                    self.pos += 2;
                    let low = self.read_hex4()?;
                    if !(0xDC00..=0xDFFF).contains(&low) {
                        return Err(self.err(ErrorCode::IllformedString));
                    }
                    let scalar =
                        0x10000u32 + ((high as u32 - 0xD800) << 10) + (low as u32 - 0xDC00);
                    let c = char::from_u32(scalar)
                        .ok_or_else(|| self.err(ErrorCode::IllformedString))?;
                    let n = c.encode_utf8(&mut buf).len();
                    return Ok(pad4(&buf[..n]));
                }
                if (0xDC00..=0xDFFF).contains(&high) {
                    // Lone low surrogate: not representable.
                    return Err(self.err(ErrorCode::IllformedString));
                }
                char::from_u32(high as u32).ok_or_else(|| self.err(ErrorCode::IllformedString))?
            }
            _ => return Err(self.err(ErrorCode::IllformedString)),
        };
        let n = ch.encode_utf8(&mut buf).len();
        Ok(pad4(&buf[..n]))
    }

    fn read_hex4(&mut self) -> CodecResult<u16> {
        let bytes = self
            .input
            .get(self.pos..self.pos + 4)
            .ok_or_else(|| self.err(ErrorCode::UnexpectedEndOfData))?;
        let s = core::str::from_utf8(bytes).map_err(|_| self.err(ErrorCode::IllformedString))?;
        let v = u16::from_str_radix(s, 16).map_err(|_| self.err(ErrorCode::IllformedString))?;
        self.pos += 4;
        Ok(v)
    }

    /// Skip (and optionally capture) one value starting at `self.pos`
    /// (after leading whitespace), bounded by `max_depth`. Returns the byte
    /// range `[start, end)` of the value, post-whitespace.
    fn skip_value_span(&mut self, max_depth: usize) -> CodecResult<(usize, usize)> {
        self.skip_ws();
        let start = self.pos;
        self.skip_value_inner(0, max_depth)?;
        Ok((start, self.pos))
    }

    fn skip_value_inner(&mut self, depth: usize, max_depth: usize) -> CodecResult<()> {
        if depth > max_depth {
            return Err(self.err(ErrorCode::SkipStackOverflow));
        }
        self.skip_ws();
        match self.peek() {
            Some(b'"') => self.skip_string(),
            Some(b'{') => {
                self.pos += 1;
                self.skip_ws();
                if self.peek() == Some(b'}') {
                    self.pos += 1;
                    return Ok(());
                }
                loop {
                    self.skip_ws();
                    self.skip_string()?;
                    self.skip_ws();
                    if self.peek() != Some(b':') {
                        return Err(self.err(ErrorCode::IllformedObject));
                    }
                    self.pos += 1;
                    self.skip_value_inner(depth + 1, max_depth)?;
                    self.skip_ws();
                    match self.peek() {
                        Some(b',') => {
                            self.pos += 1;
                        }
                        Some(b'}') => {
                            self.pos += 1;
                            return Ok(());
                        }
                        _ => return Err(self.err(ErrorCode::IllformedObject)),
                    }
                }
            }
            Some(b'[') => {
                self.pos += 1;
                self.skip_ws();
                if self.peek() == Some(b']') {
                    self.pos += 1;
                    return Ok(());
                }
                loop {
                    self.skip_value_inner(depth + 1, max_depth)?;
                    self.skip_ws();
                    match self.peek() {
                        Some(b',') => {
                            self.pos += 1;
                        }
                        Some(b']') => {
                            self.pos += 1;
                            return Ok(());
                        }
                        _ => return Err(self.err(ErrorCode::IllformedArray)),
                    }
                }
            }
            Some(b't') => {
                if self.try_consume_literal(b"true") {
                    Ok(())
                } else {
                    Err(self.err(ErrorCode::IllformedBool))
                }
            }
            Some(b'f') => {
                if self.try_consume_literal(b"false") {
                    Ok(())
                } else {
                    Err(self.err(ErrorCode::IllformedBool))
                }
            }
            Some(b'n') => {
                if self.try_consume_literal(b"null") {
                    Ok(())
                } else {
                    Err(self.err(ErrorCode::IllformedNull))
                }
            }
            Some(b'-') | Some(b'0'..=b'9') => {
                let (end, _) = self.scan_number()?;
                self.pos = end;
                Ok(())
            }
            Some(_) => Err(self.err(ErrorCode::UnexpectedEndOfData)),
            None => Err(self.err(ErrorCode::UnexpectedEndOfData)),
        }
    }

    /// Skips over a string without decoding it, used when a value is being
    /// discarded rather than materialized. `memchr::memchr2` jumps straight
    /// to the next quote-or-backslash instead of branching byte by byte over
    /// plain text runs.
    fn skip_string(&mut self) -> CodecResult<()> {
        if self.peek() != Some(b'"') {
            return Err(self.err(ErrorCode::IllformedString));
        }
        self.pos += 1;
        loop {
            match memchr::memchr2(b'"', b'\\', &self.input[self.pos..]) {
                None => return Err(self.err(ErrorCode::UnexpectedEndOfData)),
                Some(rel) => {
                    if let Some(bad) = self.input[self.pos..self.pos + rel]
                        .iter()
                        .position(|&b| b <= 0x1F)
                    {
                        self.pos += bad;
                        return Err(self.err(ErrorCode::IllformedString));
                    }
                    self.pos += rel;
                }
            }
            match self.peek() {
                None => return Err(self.err(ErrorCode::UnexpectedEndOfData)),
                Some(b'"') => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(b'\\') => {
                    self.pos += 1;
                    if self.peek().is_none() {
                        return Err(self.err(ErrorCode::UnexpectedEndOfData));
                    }
                    if self.peek() == Some(b'u') {
                        self.pos += 1;
                        self.read_hex4()?;
                    } else {
                        self.pos += 1;
                    }
                }
                Some(b) if b <= 0x1F => return Err(self.err(ErrorCode::IllformedString)),
                Some(_) => self.pos += 1,
            }
        }
    }
}

/// Zero-pad `bytes` (1-4 long) into a fixed `[u8;4]`, keeping `bytes.len()`
/// implicit in the caller (the caller re-slices by its own known length).
fn pad4(bytes: &[u8]) -> [u8; 4] {
    let mut out = [0u8; 4];
    out[..bytes.len()].copy_from_slice(bytes);
    out
}

impl<'a> Reader for JsonReader<'a> {
    fn offset(&self) -> usize {
        self.pos
    }

    fn try_read_null(&mut self) -> CodecResult<Matched<()>> {
        let save = self.pos;
        self.skip_ws();
        if self.try_consume_literal(b"null") {
            Ok(Matched::Yes(()))
        } else {
            self.pos = save;
            Ok(Matched::No)
        }
    }

    fn read_bool(&mut self) -> CodecResult<Matched<bool>> {
        let save = self.pos;
        self.skip_ws();
        if self.try_consume_literal(b"true") {
            Ok(Matched::Yes(true))
        } else if self.try_consume_literal(b"false") {
            Ok(Matched::Yes(false))
        } else {
            self.pos = save;
            Ok(Matched::No)
        }
    }

    fn read_number(&mut self, kind: NumberKind) -> CodecResult<Matched<Number>> {
        let save = self.pos;
        self.skip_ws();
        match self.peek() {
            Some(b'-') | Some(b'0'..=b'9') => {}
            _ => {
                self.pos = save;
                return Ok(Matched::No);
            }
        }
        let start = self.pos;
        let (end, is_float) = self.scan_number()?;
        let text = core::str::from_utf8(&self.input[start..end])
            .map_err(|_| self.err(ErrorCode::IllformedNumber))?;
        self.pos = end;

        let number = if is_float {
            let value: f64 = lexical_parse_float::FromLexical::from_lexical(text.as_bytes())
                .map_err(|_| CodecError::new(ErrorCode::IllformedNumber, start))?;
            Number::Float(value)
        } else if text.starts_with('-') {
            let value: i64 = lexical_parse_integer::FromLexical::from_lexical(text.as_bytes())
                .map_err(|_| CodecError::new(ErrorCode::NumericOutOfRange, start))?;
            Number::Int(value)
        } else {
            let value: u64 = lexical_parse_integer::FromLexical::from_lexical(text.as_bytes())
                .map_err(|_| CodecError::new(ErrorCode::NumericOutOfRange, start))?;
            Number::UInt(value)
        };
        trace!("json reader: number {:?} as {}", number, kind.name());
        Ok(Matched::Yes(number))
    }

    fn read_string_chunk(&mut self, out: &mut [u8]) -> CodecResult<Matched<StringChunk>> {
        let mut out_pos = 0usize;

        if self.pending_len > 0 {
            let n = self.pending_len as usize;
            let leftover = self.pending;
            self.pending_len = 0;
            if !self.push_bytes(&leftover[..n], out, &mut out_pos) {
                // out was smaller than the whole pending run; push_bytes
                // already re-buffered the remainder into self.pending.
                return Ok(Matched::Yes(StringChunk {
                    bytes_written: out_pos,
                    done: false,
                }));
            }
        }

        if !self.in_string {
            let save = self.pos;
            self.skip_ws();
            if self.peek() != Some(b'"') {
                self.pos = save;
                return Ok(Matched::No);
            }
            self.pos += 1;
            self.in_string = true;
        }

        while out_pos < out.len() {
            match self.peek() {
                None => return Err(self.err(ErrorCode::UnexpectedEndOfData)),
                Some(b'"') => {
                    self.pos += 1;
                    self.in_string = false;
                    return Ok(Matched::Yes(StringChunk {
                        bytes_written: out_pos,
                        done: true,
                    }));
                }
                Some(b'\\') => {
                    self.pos += 1;
                    let decoded = self.decode_escape()?;
                    let len = utf8_len(decoded[0]);
                    if !self.push_bytes(&decoded[..len], out, &mut out_pos) {
                        return Ok(Matched::Yes(StringChunk {
                            bytes_written: out_pos,
                            done: false,
                        }));
                    }
                }
                Some(b) if b <= 0x1F => return Err(self.err(ErrorCode::IllformedString)),
                Some(b) => {
                    let run_len = utf8_len(b);
                    let end = (self.pos + run_len).min(self.input.len());
                    let bytes = &self.input[self.pos..end];
                    self.pos = end;
                    if !self.push_bytes(bytes, out, &mut out_pos) {
                        return Ok(Matched::Yes(StringChunk {
                            bytes_written: out_pos,
                            done: false,
                        }));
                    }
                }
            }
        }

        // `out` is exactly full; still report `done` if the very next byte
        // closes the string.
        let done = self.peek() == Some(b'"');
        if done {
            self.pos += 1;
            self.in_string = false;
        }
        Ok(Matched::Yes(StringChunk {
            bytes_written: out_pos,
            done,
        }))
    }

    fn read_key_as_index(&mut self) -> CodecResult<Matched<i64>> {
        let mut key = alloc::string::String::new();
        match jsonfusion_core::reader::read_full_string(self, &mut key)? {
            Matched::Yes(()) => {}
            Matched::No => return Ok(Matched::No),
        }
        match key.parse::<i64>() {
            Ok(v) => Ok(Matched::Yes(v)),
            Err(_) => Err(self.err(ErrorCode::WrongJsonForNumber)),
        }
    }

    fn read_array_begin(&mut self) -> CodecResult<Matched<ContainerFrame>> {
        let save = self.pos;
        self.skip_ws();
        if self.peek() == Some(b'[') {
            self.pos += 1;
            self.frame_stack.push(b']');
            Ok(Matched::Yes(ContainerFrame::indefinite()))
        } else {
            self.pos = save;
            Ok(Matched::No)
        }
    }

    fn read_map_begin(&mut self) -> CodecResult<Matched<ContainerFrame>> {
        let save = self.pos;
        self.skip_ws();
        if self.peek() == Some(b'{') {
            self.pos += 1;
            self.frame_stack.push(b'}');
            Ok(Matched::Yes(ContainerFrame::indefinite()))
        } else {
            self.pos = save;
            Ok(Matched::No)
        }
    }

    fn advance_after_value(&mut self, frame: &mut ContainerFrame) -> CodecResult<bool> {
        let close = *self
            .frame_stack
            .last()
            .ok_or_else(|| self.err(ErrorCode::IllformedArray))?;
        self.skip_ws();
        if frame.consumed == 0 {
            if self.peek() == Some(close) {
                self.pos += 1;
                self.frame_stack.pop();
                return Ok(false);
            }
            frame.consumed += 1;
            return Ok(true);
        }
        match self.peek() {
            Some(b',') => {
                self.pos += 1;
                frame.consumed += 1;
                Ok(true)
            }
            Some(c) if c == close => {
                self.pos += 1;
                self.frame_stack.pop();
                Ok(false)
            }
            _ => {
                let code = if close == b']' {
                    ErrorCode::IllformedArray
                } else {
                    ErrorCode::IllformedObject
                };
                Err(self.err(code))
            }
        }
    }

    fn move_to_value(&mut self, _frame: &mut ContainerFrame) -> CodecResult<()> {
        self.skip_ws();
        if self.peek() != Some(b':') {
            return Err(self.err(ErrorCode::IllformedObject));
        }
        self.pos += 1;
        Ok(())
    }

    fn skip_value(&mut self, max_depth: usize) -> CodecResult<()> {
        self.skip_value_span(max_depth).map(|_| ())
    }

    fn capture_to_sink(&mut self, sink: &mut dyn SinkWriter, max_depth: usize) -> CodecResult<()> {
        let (start, end) = self.skip_value_span(max_depth)?;
        if !sink.sink_write(&self.input[start..end]) {
            return Err(self.err(ErrorCode::WireSinkOverflow));
        }
        Ok(())
    }

    fn finish(&mut self) -> CodecResult<()> {
        self.skip_ws();
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(self.err(ErrorCode::ExcessCharacters))
        }
    }
}

/// Length of the UTF-8 sequence starting with byte `b`, per the standard
/// leading-byte bit patterns. JSON strings are required to be valid UTF-8
/// once decoded, so a malformed leading byte here would already have been
/// rejected at the `str::from_utf8` boundary for the input as a whole; this
/// is only used to find run boundaries for the pass-through (no-escape) path.
fn utf8_len(b: u8) -> usize {
    if b & 0x80 == 0 {
        1
    } else if b & 0xE0 == 0xC0 {
        2
    } else if b & 0xF0 == 0xE0 {
        3
    } else {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonfusion_testhelpers::test;
    use jsonfusion_core::reader::read_full_string;

    fn read_string(input: &[u8]) -> alloc::string::String {
        let mut r = JsonReader::new(input);
        let mut out = alloc::string::String::new();
        read_full_string(&mut r, &mut out).unwrap();
        out
    }

    #[test]
    fn decodes_plain_string() {
        assert_eq!(read_string(br#""hello""#), "hello");
    }

    #[test]
    fn decodes_escape_sequences() {
        assert_eq!(read_string(br#""a\nb\tc""#), "a\nb\tc");
    }

    #[test]
    fn decodes_surrogate_pair_escape() {
        // S5: U+1F600 GRINNING FACE, written as a high/low surrogate escape pair.
        assert_eq!(read_string(br#""\uD83D\uDE00""#), "\u{1F600}");
    }

    #[test]
    fn decodes_unescaped_multibyte_utf8() {
        assert_eq!(read_string("\"\u{1F600}\"".as_bytes()), "\u{1F600}");
    }

    #[test]
    fn rejects_unescaped_control_byte() {
        let mut r = JsonReader::new(b"\"a\x01b\"");
        let mut out = alloc::string::String::new();
        let err = read_full_string(&mut r, &mut out).unwrap_err();
        assert_eq!(err.code, ErrorCode::IllformedString);
    }

    #[test]
    fn number_lexer_rejects_leading_zero() {
        let mut r = JsonReader::new(b"012");
        let err = r.read_number(NumberKind::I32).unwrap_err();
        assert_eq!(err.code, ErrorCode::IllformedNumber);
    }

    #[test]
    fn number_lexer_accepts_negative_float() {
        let mut r = JsonReader::new(b"-3.25e1");
        let n = r.read_number(NumberKind::F64).unwrap().into_option().unwrap();
        assert_eq!(n, Number::Float(-32.5));
    }

    #[test]
    fn array_begin_reports_no_match_on_object() {
        let mut r = JsonReader::new(b"{}");
        assert_eq!(r.read_array_begin().unwrap(), Matched::No);
        // Cursor unchanged: still at the `{`.
        assert_eq!(r.offset(), 0);
    }

    #[test]
    fn finish_allows_trailing_whitespace() {
        let mut r = JsonReader::new(b"null   ");
        r.try_read_null().unwrap();
        assert!(r.finish().is_ok());
    }

    #[test]
    fn finish_rejects_trailing_garbage() {
        let mut r = JsonReader::new(b"null x");
        r.try_read_null().unwrap();
        assert_eq!(r.finish().unwrap_err().code, ErrorCode::ExcessCharacters);
    }
}
