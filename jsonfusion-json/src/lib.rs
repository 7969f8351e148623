//! JSON reader/writer for JsonFusion.
//!
//! A `Reader`/`Writer`-style pair plus free facade functions, built around
//! `jsonfusion_core`'s object-safe [`jsonfusion_core::reader::Reader`]/
//! [`jsonfusion_core::writer::Writer`] traits.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod reader;
mod writer;

pub use reader::JsonReader;
pub use writer::JsonWriter;

/// Emits a `tracing::trace!` call when the `tracing` feature is enabled,
/// and is otherwise compiled out entirely. Mirrors the optional logging
/// pattern `jsonfusion_core`'s dependents are expected to follow.
#[macro_export]
macro_rules! trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!($($arg)*);
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = ($($arg)*,);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonfusion_testhelpers::test;
    use jsonfusion_core::reader::{Matched, Reader};
    use jsonfusion_core::writer::{SizeHint, Writer};

    #[test]
    fn reader_and_writer_round_trip_a_bool() {
        let mut w = JsonWriter::new();
        w.write_bool(true).unwrap();
        let out = w.into_bytes();
        assert_eq!(out, b"true");

        let mut r = JsonReader::new(&out);
        assert_eq!(r.read_bool().unwrap(), Matched::Yes(true));
        r.finish().unwrap();
    }

    #[test]
    fn reader_and_writer_round_trip_an_array() {
        let mut w = JsonWriter::new();
        let mut frame = w.write_array_begin(SizeHint::Exact(2)).unwrap();
        w.write_number(jsonfusion_core::number::Number::Int(1))
            .unwrap();
        w.advance_after_value(&mut frame).unwrap();
        w.write_number(jsonfusion_core::number::Number::Int(2))
            .unwrap();
        w.write_array_end(frame).unwrap();
        let out = w.into_bytes();
        assert_eq!(out, b"[1,2]");

        let mut r = JsonReader::new(&out);
        let mut frame = r.read_array_begin().unwrap().into_option().unwrap();
        let mut values = alloc::vec::Vec::new();
        while r.advance_after_value(&mut frame).unwrap() {
            values.push(
                r.read_number(jsonfusion_core::number::NumberKind::I32)
                    .unwrap()
                    .into_option()
                    .unwrap(),
            );
        }
        assert_eq!(
            values,
            alloc::vec![
                jsonfusion_core::number::Number::UInt(1),
                jsonfusion_core::number::Number::UInt(2)
            ]
        );
        r.finish().unwrap();
    }
}
