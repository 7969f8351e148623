//! CBOR byte-iterator reader (RFC 8949).
//!
//! A major-type-byte dispatch over CBOR's major-type + additional-info
//! header (RFC 8949 §3).

use jsonfusion_core::error::{CodecError, CodecResult, ErrorCode};
use jsonfusion_core::number::{Number, NumberKind};
use jsonfusion_core::reader::{ContainerFrame, Matched, Reader, StringChunk};
use jsonfusion_core::wire_sink::SinkWriter;

const MAJOR_UINT: u8 = 0;
const MAJOR_NEGINT: u8 = 1;
const MAJOR_BYTES: u8 = 2;
const MAJOR_TEXT: u8 = 3;
const MAJOR_ARRAY: u8 = 4;
const MAJOR_MAP: u8 = 5;
const MAJOR_TAG: u8 = 6;
const MAJOR_SIMPLE: u8 = 7;

const BREAK: u8 = 0xFF;

/// CBOR reader over a borrowed byte slice.
pub struct CborReader<'a> {
    input: &'a [u8],
    pos: usize,
    /// Bytes remaining in the text string currently being streamed out via
    /// `read_string_chunk`, if any. CBOR definite-length strings are the
    /// only form this reader supports on read (indefinite-length text
    /// strings report `not-implemented`), so one remaining-length counter
    /// is all chunking state requires.
    string_remaining: Option<usize>,
}

impl<'a> CborReader<'a> {
    /// Build a reader over `input`.
    pub fn new(input: &'a [u8]) -> Self {
        CborReader {
            input,
            pos: 0,
            string_remaining: None,
        }
    }

    fn err(&self, code: ErrorCode) -> CodecError {
        CodecError::new(code, self.pos)
    }

    fn peek_header(&self) -> Option<(u8, u8)> {
        self.input.get(self.pos).map(|&b| (b >> 5, b & 0x1F))
    }

    /// Read the argument value for a header whose additional-info nibble is
    /// `info` (the header byte itself has already been consumed). `31` is
    /// rejected here; callers for array/map/string headers check for it
    /// before calling this.
    fn read_arg(&mut self, info: u8) -> CodecResult<u64> {
        match info {
            0..=23 => Ok(info as u64),
            24 => self.read_be::<1>().map(|v| v[0] as u64),
            25 => Ok(u16::from_be_bytes(self.read_be::<2>()?) as u64),
            26 => Ok(u32::from_be_bytes(self.read_be::<4>()?) as u64),
            27 => Ok(u64::from_be_bytes(self.read_be::<8>()?)),
            _ => Err(self.err(ErrorCode::IllformedNumber)),
        }
    }

    fn read_be<const N: usize>(&mut self) -> CodecResult<[u8; N]> {
        let bytes = self
            .input
            .get(self.pos..self.pos + N)
            .ok_or_else(|| self.err(ErrorCode::UnexpectedEndOfData))?;
        self.pos += N;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    /// Consume one full header byte and, for a non-31 additional-info
    /// nibble, its trailing argument bytes. Returns `(major, info, value)`;
    /// `value` is meaningless when `info == 31` (indefinite-length marker).
    fn read_header(&mut self) -> CodecResult<(u8, u8, u64)> {
        let byte = self
            .input
            .get(self.pos)
            .copied()
            .ok_or_else(|| self.err(ErrorCode::UnexpectedEndOfData))?;
        self.pos += 1;
        let major = byte >> 5;
        let info = byte & 0x1F;
        if info == 31 {
            return Ok((major, info, 0));
        }
        if (28..=30).contains(&info) {
            return Err(self.err(ErrorCode::IllformedNumber));
        }
        let value = self.read_arg(info)?;
        Ok((major, info, value))
    }

    fn decode_float(&mut self, info: u8) -> CodecResult<f64> {
        match info {
            25 => {
                let bits = u16::from_be_bytes(self.read_be::<2>()?);
                Ok(half::f16::from_bits(bits).to_f64())
            }
            26 => Ok(f32::from_be_bytes(self.read_be::<4>()?) as f64),
            27 => Ok(f64::from_be_bytes(self.read_be::<8>()?)),
            _ => Err(self.err(ErrorCode::IllformedNumber)),
        }
    }

    /// Skip one definite or indefinite-length string (major 2 or 3), not
    /// including its header, which the caller has already consumed.
    fn skip_string_body(&mut self, major: u8, info: u8) -> CodecResult<()> {
        if info == 31 {
            loop {
                if self.input.get(self.pos) == Some(&BREAK) {
                    self.pos += 1;
                    return Ok(());
                }
                let (sub_major, sub_info, _) = self.read_header()?;
                if sub_major != major || sub_info == 31 {
                    return Err(self.err(ErrorCode::IllformedString));
                }
                let len = self.read_arg(sub_info)? as usize;
                self.advance_by(len)?;
            }
        } else {
            let len = self.read_arg(info)? as usize;
            self.advance_by(len)
        }
    }

    fn advance_by(&mut self, len: usize) -> CodecResult<()> {
        if self.pos + len > self.input.len() {
            return Err(self.err(ErrorCode::UnexpectedEndOfData));
        }
        self.pos += len;
        Ok(())
    }

    fn skip_value_inner(&mut self, depth: usize, max_depth: usize) -> CodecResult<()> {
        if depth > max_depth {
            return Err(self.err(ErrorCode::SkipStackOverflow));
        }
        let (major, info, _) = self.read_header()?;
        match major {
            MAJOR_UINT | MAJOR_NEGINT => {
                if info == 31 {
                    return Err(self.err(ErrorCode::IllformedNumber));
                }
                Ok(())
            }
            MAJOR_BYTES | MAJOR_TEXT => self.skip_string_body(major, info),
            MAJOR_ARRAY => {
                if info == 31 {
                    loop {
                        if self.input.get(self.pos) == Some(&BREAK) {
                            self.pos += 1;
                            return Ok(());
                        }
                        self.skip_value_inner(depth + 1, max_depth)?;
                    }
                } else {
                    let len = self.read_arg(info)?;
                    for _ in 0..len {
                        self.skip_value_inner(depth + 1, max_depth)?;
                    }
                    Ok(())
                }
            }
            MAJOR_MAP => {
                if info == 31 {
                    loop {
                        if self.input.get(self.pos) == Some(&BREAK) {
                            self.pos += 1;
                            return Ok(());
                        }
                        self.skip_value_inner(depth + 1, max_depth)?;
                        self.skip_value_inner(depth + 1, max_depth)?;
                    }
                } else {
                    let len = self.read_arg(info)?;
                    for _ in 0..len {
                        self.skip_value_inner(depth + 1, max_depth)?;
                        self.skip_value_inner(depth + 1, max_depth)?;
                    }
                    Ok(())
                }
            }
            // Tags are excluded from this format's supported subset; a tag
            // byte anywhere is unsupported rather than transparently
            // unwrapped.
            MAJOR_TAG => Err(self.err(ErrorCode::NotImplemented)),
            MAJOR_SIMPLE => match info {
                20 | 21 | 22 | 23 => Ok(()),
                25 | 26 | 27 => self.decode_float(info).map(|_| ()),
                _ => Err(self.err(ErrorCode::IllformedNumber)),
            },
            _ => Err(self.err(ErrorCode::UnexpectedEndOfData)),
        }
    }
}

impl<'a> Reader for CborReader<'a> {
    fn offset(&self) -> usize {
        self.pos
    }

    fn try_read_null(&mut self) -> CodecResult<Matched<()>> {
        match self.peek_header() {
            Some((MAJOR_SIMPLE, 22)) => {
                self.pos += 1;
                Ok(Matched::Yes(()))
            }
            _ => Ok(Matched::No),
        }
    }

    fn read_bool(&mut self) -> CodecResult<Matched<bool>> {
        match self.peek_header() {
            Some((MAJOR_SIMPLE, 20)) => {
                self.pos += 1;
                Ok(Matched::Yes(false))
            }
            Some((MAJOR_SIMPLE, 21)) => {
                self.pos += 1;
                Ok(Matched::Yes(true))
            }
            _ => Ok(Matched::No),
        }
    }

    fn read_number(&mut self, kind: NumberKind) -> CodecResult<Matched<Number>> {
        let Some((major, info)) = self.peek_header() else {
            return Ok(Matched::No);
        };
        let number = match major {
            MAJOR_UINT => {
                if info == 31 {
                    return Err(self.err(ErrorCode::IllformedNumber));
                }
                let (_, _, value) = self.read_header()?;
                Number::UInt(value)
            }
            MAJOR_NEGINT => {
                if info == 31 {
                    return Err(self.err(ErrorCode::IllformedNumber));
                }
                let (_, _, value) = self.read_header()?;
                let signed = -1i128 - value as i128;
                let signed = i64::try_from(signed)
                    .map_err(|_| self.err(ErrorCode::NumericOutOfRange))?;
                Number::Int(signed)
            }
            MAJOR_SIMPLE if matches!(info, 25 | 26 | 27) => {
                self.pos += 1;
                Number::Float(self.decode_float(info)?)
            }
            _ => return Ok(Matched::No),
        };
        crate::trace!("cbor reader: number {:?} as {}", number, kind.name());
        Ok(Matched::Yes(number))
    }

    fn read_string_chunk(&mut self, out: &mut [u8]) -> CodecResult<Matched<StringChunk>> {
        if self.string_remaining.is_none() {
            match self.peek_header() {
                Some((MAJOR_TEXT, info)) => {
                    if info == 31 {
                        crate::trace!("cbor reader: indefinite-length text string, not implemented");
                        return Err(self.err(ErrorCode::NotImplemented));
                    }
                    let (_, _, len) = self.read_header()?;
                    self.string_remaining = Some(len as usize);
                }
                _ => return Ok(Matched::No),
            }
        }

        let remaining = self.string_remaining.unwrap_or(0);
        let take = remaining.min(out.len());
        if self.pos + take > self.input.len() {
            return Err(self.err(ErrorCode::UnexpectedEndOfData));
        }
        out[..take].copy_from_slice(&self.input[self.pos..self.pos + take]);
        self.pos += take;
        let left = remaining - take;
        self.string_remaining = if left == 0 { None } else { Some(left) };
        Ok(Matched::Yes(StringChunk {
            bytes_written: take,
            done: left == 0,
        }))
    }

    fn read_key_as_index(&mut self) -> CodecResult<Matched<i64>> {
        match self.peek_header() {
            Some((MAJOR_UINT, _)) => {
                let (_, _, value) = self.read_header()?;
                i64::try_from(value)
                    .map(Matched::Yes)
                    .map_err(|_| self.err(ErrorCode::NumericOutOfRange))
            }
            Some((MAJOR_NEGINT, _)) => {
                let (_, _, value) = self.read_header()?;
                let signed = -1i128 - value as i128;
                i64::try_from(signed)
                    .map(Matched::Yes)
                    .map_err(|_| self.err(ErrorCode::NumericOutOfRange))
            }
            _ => Ok(Matched::No),
        }
    }

    fn read_array_begin(&mut self) -> CodecResult<Matched<ContainerFrame>> {
        match self.peek_header() {
            Some((MAJOR_ARRAY, 31)) => {
                self.pos += 1;
                crate::trace!("cbor reader: indefinite-length array begin at {}", self.pos);
                Ok(Matched::Yes(ContainerFrame::indefinite()))
            }
            Some((MAJOR_ARRAY, _)) => {
                let (_, _, len) = self.read_header()?;
                Ok(Matched::Yes(ContainerFrame::definite(len as usize)))
            }
            _ => Ok(Matched::No),
        }
    }

    fn read_map_begin(&mut self) -> CodecResult<Matched<ContainerFrame>> {
        match self.peek_header() {
            Some((MAJOR_MAP, 31)) => {
                self.pos += 1;
                crate::trace!("cbor reader: indefinite-length map begin at {}", self.pos);
                Ok(Matched::Yes(ContainerFrame::indefinite()))
            }
            Some((MAJOR_MAP, _)) => {
                let (_, _, len) = self.read_header()?;
                Ok(Matched::Yes(ContainerFrame::definite(len as usize)))
            }
            _ => Ok(Matched::No),
        }
    }

    fn advance_after_value(&mut self, frame: &mut ContainerFrame) -> CodecResult<bool> {
        match frame.remaining {
            Some(total) => {
                if frame.consumed < total {
                    frame.consumed += 1;
                    Ok(true)
                } else {
                    Ok(false)
                }
            }
            None => {
                if self.input.get(self.pos) == Some(&BREAK) {
                    self.pos += 1;
                    crate::trace!("cbor reader: indefinite-length break at {}", self.pos);
                    Ok(false)
                } else {
                    frame.consumed += 1;
                    Ok(true)
                }
            }
        }
    }

    fn move_to_value(&mut self, _frame: &mut ContainerFrame) -> CodecResult<()> {
        Ok(())
    }

    fn skip_value(&mut self, max_depth: usize) -> CodecResult<()> {
        crate::trace!("cbor reader: skip entry at {}", self.pos);
        self.skip_value_inner(0, max_depth)
    }

    fn capture_to_sink(&mut self, sink: &mut dyn SinkWriter, max_depth: usize) -> CodecResult<()> {
        crate::trace!("cbor reader: capture-to-sink entry at {}", self.pos);
        let start = self.pos;
        self.skip_value_inner(0, max_depth)?;
        if !sink.sink_write(&self.input[start..self.pos]) {
            return Err(self.err(ErrorCode::WireSinkOverflow));
        }
        Ok(())
    }

    fn finish(&mut self) -> CodecResult<()> {
        if self.pos == self.input.len() {
            Ok(())
        } else {
            Err(self.err(ErrorCode::ExcessCharacters))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonfusion_testhelpers::test;

    #[test]
    fn reads_smallest_width_uint16() {
        let mut r = CborReader::new(&[0x19, 0x03, 0xE8]);
        let n = r.read_number(NumberKind::I32).unwrap().into_option().unwrap();
        assert_eq!(n, Number::UInt(1000));
    }

    #[test]
    fn reads_single_byte_negative() {
        // S6: -1 decodes from `0x20`.
        let mut r = CborReader::new(&[0x20]);
        let n = r.read_number(NumberKind::I32).unwrap().into_option().unwrap();
        assert_eq!(n, Number::Int(-1));
    }

    #[test]
    fn reads_half_float() {
        // 1.5 as binary16: 0x3E00.
        let mut r = CborReader::new(&[0xF9, 0x3E, 0x00]);
        let n = r.read_number(NumberKind::F64).unwrap().into_option().unwrap();
        assert_eq!(n, Number::Float(1.5));
    }

    #[test]
    fn reserved_additional_info_31_on_integer_majors_is_rejected() {
        // 0x1F: major 0 (uint), ai 31 is reserved, not "indefinite" - ai 31
        // only means something on array/map/string major types.
        let mut r = CborReader::new(&[0x1F]);
        let err = r.read_number(NumberKind::I32).unwrap_err();
        assert_eq!(err.code, ErrorCode::IllformedNumber);

        // 0x3F: major 1 (negint), same reserved ai.
        let mut r = CborReader::new(&[0x3F]);
        let err = r.read_number(NumberKind::I32).unwrap_err();
        assert_eq!(err.code, ErrorCode::IllformedNumber);
    }

    #[test]
    fn indefinite_length_text_string_is_not_implemented() {
        let mut r = CborReader::new(&[0x7F, 0xFF]);
        let mut buf = [0u8; 16];
        let err = r.read_string_chunk(&mut buf).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotImplemented);
    }

    #[test]
    fn reads_indefinite_length_map_with_break() {
        // { } indefinite: 0xBF, 0xFF.
        let mut r = CborReader::new(&[0xBF, 0xFF]);
        let mut frame = r.read_map_begin().unwrap().into_option().unwrap();
        assert!(!r.advance_after_value(&mut frame).unwrap());
    }
}
