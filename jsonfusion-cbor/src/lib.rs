//! CBOR (RFC 8949) reader/writer for JsonFusion.
//!
//! A major-type/additional-info framing split — a byte-at-a-time header
//! decode feeding a length-or-indefinite body loop — that swaps in a
//! different wire codec without touching the schema/validation layer at
//! all.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod reader;
mod writer;

pub use reader::CborReader;
pub use writer::CborWriter;

/// See `jsonfusion_json::trace` for the rationale; duplicated here rather
/// than shared because each format crate is meant to compile standalone.
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
    use jsonfusion_core::number::Number;
    use jsonfusion_core::reader::{Matched, Reader};
    use jsonfusion_core::writer::Writer;

    #[test]
    fn round_trips_a_negative_integer() {
        // S6: -1 encodes as `0x20`.
        let mut w = CborWriter::new();
        w.write_number(Number::Int(-1)).unwrap();
        assert_eq!(w.into_bytes(), [0x20]);

        let mut r = CborReader::new(&[0x20]);
        let n = r
            .read_number(jsonfusion_core::number::NumberKind::I32)
            .unwrap();
        assert_eq!(n, Matched::Yes(Number::Int(-1)));
    }

    #[test]
    fn round_trips_a_smallest_width_integer() {
        // S6: 1000 encodes with a uint16 header, `0x19 0x03 0xE8`.
        let mut w = CborWriter::new();
        w.write_number(Number::UInt(1000)).unwrap();
        assert_eq!(w.into_bytes(), [0x19, 0x03, 0xE8]);
    }
}
