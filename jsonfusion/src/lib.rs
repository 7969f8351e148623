//! Public API facade for JsonFusion.
//!
//! `from_str`/`from_slice`/`to_string`-style free functions: thin wrappers
//! that own a format-specific reader or writer and drive
//! [`jsonfusion_core::Schema::read_from`]/`write_to` against it, returning
//! a result struct instead of propagating a `Result` up through `?`.
//! Errors surface only through the `ParseResult`/`SerializeResult`
//! returned by the top-level call — no panics, no process termination, no
//! global error state — which a plain `Result<T, CodecError>` already
//! gives you in Rust, but the named result types are kept so other
//! language bindings of this codec have a matching, documented vocabulary.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
use alloc::string::String;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use jsonfusion_core::error::CodecError;
use jsonfusion_core::options::{ReadOptions, WriteOptions};
use jsonfusion_core::path::JsonPath;
use jsonfusion_core::reader::Reader;
use jsonfusion_core::schema::Schema;
use jsonfusion_core::writer::Writer;

#[cfg(feature = "alloc")]
use jsonfusion_core::record::RecordSchema;

/// Outcome of a top-level parse call: either a populated value, or an
/// error carrying the code, byte offset and [`JsonPath`] of the failure.
/// The dispatcher short-circuits on the first error and leaves no
/// partially-built value behind to accidentally consume.
#[derive(Debug)]
pub struct ParseResult<T> {
    value: Option<T>,
    error: Option<CodecError>,
}

impl<T> ParseResult<T> {
    fn ok(value: T) -> Self {
        ParseResult {
            value: Some(value),
            error: None,
        }
    }

    fn err(error: CodecError) -> Self {
        ParseResult {
            value: None,
            error: Some(error),
        }
    }

    /// `true` if parsing succeeded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The error, if parsing failed.
    pub fn error(&self) -> Option<&CodecError> {
        self.error.as_ref()
    }

    /// Convert into a plain `Result`, the idiomatic Rust shape for the rest
    /// of a caller's `?`-based code to consume.
    pub fn into_result(self) -> Result<T, CodecError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self
                .value
                .expect("ParseResult without an error always carries a value")),
        }
    }
}

/// Outcome of a top-level serialize call, symmetric to [`ParseResult`].
#[derive(Debug)]
pub struct SerializeResult {
    bytes: Option<Vec<u8>>,
    error: Option<CodecError>,
}

impl SerializeResult {
    fn ok(bytes: Vec<u8>) -> Self {
        SerializeResult {
            bytes: Some(bytes),
            error: None,
        }
    }

    fn err(error: CodecError) -> Self {
        SerializeResult {
            bytes: None,
            error: Some(error),
        }
    }

    /// `true` if serialization succeeded.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// The error, if serialization failed.
    pub fn error(&self) -> Option<&CodecError> {
        self.error.as_ref()
    }

    /// Convert into a plain `Result`.
    pub fn into_result(self) -> Result<Vec<u8>, CodecError> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self
                .bytes
                .expect("SerializeResult without an error always carries bytes")),
        }
    }
}

/// Read one value of `T` from an already-constructed reader, driving
/// whichever wire format `reader` implements.
pub fn parse_with_reader<T: Schema>(reader: &mut dyn Reader) -> ParseResult<T> {
    let mut path = JsonPath::root();
    match T::read_from(reader, &mut path) {
        Ok(value) => match reader.finish() {
            Ok(()) => ParseResult::ok(value),
            Err(e) => ParseResult::err(e.with_path_if_root(&path)),
        },
        // `path` has unwound back to root by the time `read_from` returns;
        // only fill it in if `e` didn't already capture a deeper one.
        Err(e) => ParseResult::err(e.with_path_if_root(&path)),
    }
}

/// Write one value of `T` to an already-constructed writer.
pub fn serialize_with_writer<T: Schema>(
    value: &T,
    writer: &mut dyn Writer,
) -> Result<(), CodecError> {
    let mut path = JsonPath::root();
    value.write_to(writer, &mut path).map_err(|e| e.with_path_if_root(&path))
}

/// Read one value of `T` from a record type's field table directly,
/// honoring `options` (unknown-key strictness, max depth) for the record
/// being read. Unlike [`parse_with_reader`]/[`Schema::read_from`], this
/// bypasses the blanket `Schema` impl's hardcoded [`ReadOptions::default`]
/// — the escape hatch for callers who need non-default unknown-field
/// handling at the top level of the document.
#[cfg(feature = "alloc")]
pub fn parse_record_with_options<T: RecordSchema>(
    reader: &mut dyn Reader,
    options: ReadOptions,
) -> ParseResult<T> {
    let mut path = JsonPath::root();
    match jsonfusion_core::record::read_record(reader, &mut path, options) {
        Ok(value) => match reader.finish() {
            Ok(()) => ParseResult::ok(value),
            Err(e) => ParseResult::err(e.with_path_if_root(&path)),
        },
        Err(e) => ParseResult::err(e.with_path_if_root(&path)),
    }
}

/// Write one record directly through [`jsonfusion_core::record::write_record`],
/// symmetric to [`parse_record_with_options`].
#[cfg(feature = "alloc")]
pub fn serialize_record_with_options<T: RecordSchema>(
    value: &T,
    writer: &mut dyn Writer,
    options: WriteOptions,
) -> Result<(), CodecError> {
    let mut path = JsonPath::root();
    jsonfusion_core::record::write_record(value, writer, &mut path, options)
        .map_err(|e| e.with_path_if_root(&path))
}

#[cfg(all(feature = "json", feature = "alloc"))]
mod json_facade {
    use super::*;
    use jsonfusion_json::JsonReader;
    use jsonfusion_json::JsonWriter;

    /// Parse `bytes` as JSON into `T`.
    pub fn parse<T: Schema>(bytes: &[u8]) -> ParseResult<T> {
        let mut reader = JsonReader::new(bytes);
        super::parse_with_reader(&mut reader)
    }

    /// Serialize `value` to JSON bytes using default [`WriteOptions`].
    pub fn serialize<T: Schema>(value: &T) -> SerializeResult {
        serialize_with_options(value, WriteOptions::default())
    }

    /// Serialize `value` to JSON bytes, honoring `options` (pretty-printing,
    /// float digit precision).
    pub fn serialize_with_options<T: Schema>(value: &T, options: WriteOptions) -> SerializeResult {
        let mut writer = JsonWriter::with_options(options);
        match super::serialize_with_writer(value, &mut writer) {
            Ok(()) => SerializeResult::ok(writer.into_bytes()),
            Err(e) => SerializeResult::err(e),
        }
    }
}

#[cfg(all(feature = "json", feature = "alloc"))]
pub use json_facade::{parse, serialize, serialize_with_options};

#[cfg(all(feature = "cbor", feature = "alloc"))]
mod cbor_facade {
    use super::*;
    use jsonfusion_cbor::CborReader;
    use jsonfusion_cbor::CborWriter;

    /// Parse `bytes` as CBOR into `T`.
    pub fn parse_cbor<T: Schema>(bytes: &[u8]) -> ParseResult<T> {
        let mut reader = CborReader::new(bytes);
        super::parse_with_reader(&mut reader)
    }

    /// Serialize `value` to CBOR bytes.
    pub fn serialize_cbor<T: Schema>(value: &T) -> SerializeResult {
        let mut writer = CborWriter::new();
        match super::serialize_with_writer(value, &mut writer) {
            Ok(()) => SerializeResult::ok(writer.into_bytes()),
            Err(e) => SerializeResult::err(e),
        }
    }
}

#[cfg(all(feature = "cbor", feature = "alloc"))]
pub use cbor_facade::{parse_cbor, serialize_cbor};

/// Render a [`CodecError`] the way a CLI-like consumer is expected to:
/// `When parsing <json-path>, error <code>: '...<before><sentinel><after>
/// ...'`, with a `window` byte radius around the failure offset in
/// `source` and `sentinel` marking the exact byte. `window`/`sentinel` are
/// parameterized here since the rendering convention is a caller choice,
/// not a wire-format one; [`render_parse_error_default`] picks the
/// conventional ±40 bytes and `😖`.
#[cfg(feature = "alloc")]
pub fn render_parse_error(error: &CodecError, source: &[u8], window: usize, sentinel: char) -> String {
    use core::fmt::Write;

    let offset = error.offset.min(source.len());
    let start = offset.saturating_sub(window);
    let end = (offset + window).min(source.len());

    let before = String::from_utf8_lossy(&source[start..offset]);
    let after = String::from_utf8_lossy(&source[offset..end]);

    let mut out = String::new();
    let _ = write!(
        out,
        "When parsing {}, error {}: '...{before}{sentinel}{after}...'",
        error.path, error.code
    );
    out
}

/// The conventional rendering: ±40 bytes, `😖` sentinel.
#[cfg(feature = "alloc")]
pub fn render_parse_error_default(error: &CodecError, source: &[u8]) -> String {
    render_parse_error(error, source, 40, '😖')
}

#[cfg(test)]
#[cfg(all(feature = "json", feature = "alloc"))]
mod tests {
    use super::*;
    use jsonfusion_testhelpers::test;

    #[derive(Default, PartialEq, Debug)]
    struct Point {
        x: i32,
        y: i32,
    }

    fn point_fields() -> &'static [jsonfusion_core::field::FieldDescriptor<Point>] {
        use jsonfusion_core::path::PathGuard;
        &[
            jsonfusion_core::field::FieldDescriptor {
                name: "x",
                key: "x",
                required: true,
                validators: &[],
                read: |rec, reader, path, _opts| {
                    let _guard = PathGuard::field(path, "x");
                    rec.x = Schema::read_from(reader, path)?;
                    Ok(())
                },
                write: |rec, writer, path, _opts| {
                    let _guard = PathGuard::field(path, "x");
                    rec.x.write_to(writer, path)
                },
            },
            jsonfusion_core::field::FieldDescriptor {
                name: "y",
                key: "y",
                required: true,
                validators: &[],
                read: |rec, reader, path, _opts| {
                    let _guard = PathGuard::field(path, "y");
                    rec.y = Schema::read_from(reader, path)?;
                    Ok(())
                },
                write: |rec, writer, path, _opts| {
                    let _guard = PathGuard::field(path, "y");
                    rec.y.write_to(writer, path)
                },
            },
        ]
    }

    impl jsonfusion_core::record::RecordSchema for Point {
        fn fields() -> &'static [jsonfusion_core::field::FieldDescriptor<Self>] {
            point_fields()
        }
    }

    #[test]
    fn parses_and_serializes_a_record() {
        let result: ParseResult<Point> = parse(br#"{"x":1,"y":2}"#);
        assert!(result.is_ok());
        let point = result.into_result().unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });

        let out = serialize(&point);
        assert!(out.is_ok());
        assert_eq!(out.into_result().unwrap(), br#"{"x":1,"y":2}"#);
    }

    #[test]
    fn missing_field_error_renders_with_path_and_sentinel() {
        let source = br#"{"x":1}"#;
        let result: ParseResult<Point> = parse(source);
        assert!(!result.is_ok());
        let error = result.error().unwrap();
        let rendered = render_parse_error_default(error, source);
        assert!(rendered.starts_with("When parsing $"));
        assert!(rendered.contains('😖'));
    }
}
