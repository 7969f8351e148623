//! Concrete literal-input scenarios specific to the CBOR wire format, run
//! end to end through a derived record the same way `jsonfusion-json`'s
//! `tests/scenarios.rs` exercises JSON.

use jsonfusion_cbor::{CborReader, CborWriter};
use jsonfusion_core::error::CodecError;
use jsonfusion_core::path::JsonPath;
use jsonfusion_core::reader::{ContainerFrame, Matched, Reader};
use jsonfusion_core::schema::Schema;
use jsonfusion_core::wire_sink::WireSink;
use jsonfusion_core::writer::{SizeHint, Writer};
use jsonfusion_derive::Schema;
use jsonfusion_testhelpers::test;

fn read<T: Schema>(bytes: &[u8]) -> Result<T, CodecError> {
    let mut reader = CborReader::new(bytes);
    let mut path = JsonPath::root();
    let value = T::read_from(&mut reader, &mut path)?;
    reader.finish()?;
    Ok(value)
}

fn write<T: Schema>(value: &T) -> Vec<u8> {
    let mut writer = CborWriter::new();
    let mut path = JsonPath::root();
    value.write_to(&mut writer, &mut path).unwrap();
    writer.into_bytes()
}

#[derive(Schema, PartialEq, Debug, Default)]
struct App {
    app: String,
    ver: i32,
}

#[test]
fn record_roundtrips_through_cbor() {
    let v = App {
        app: "x".into(),
        ver: 3,
    };
    let bytes = write(&v);
    let back: App = read(&bytes).unwrap();
    assert_eq!(back, v);
}

#[derive(Schema, PartialEq, Debug, Default)]
struct Motor {
    #[jsonfusion(range(min = 10, max = 10000))]
    loop_hz: f64,
}

#[test]
fn validator_failure_reports_path_over_cbor() {
    // 5.0 encoded as a CBOR double: major 7, ai 27.
    let mut w = CborWriter::new();
    let mut frame = w.write_map_begin(SizeHint::Exact(1)).unwrap();
    w.write_string("loop_hz").unwrap();
    w.move_to_value(&mut frame).unwrap();
    w.write_number(jsonfusion_core::number::Number::Float(5.0))
        .unwrap();
    w.write_map_end(frame).unwrap();

    let err = read::<Motor>(&w.into_bytes()).unwrap_err();
    assert_eq!(
        err.code,
        jsonfusion_core::error::ErrorCode::SchemaValidationError
    );
    assert_eq!(err.path.to_display_string(), "$.loop_hz");
}

#[derive(Schema, PartialEq, Debug, Default)]
struct WithBlob {
    name: String,
    blob: WireSink<1024>,
}

#[test]
fn wire_sink_capture_and_replay_over_cbor() {
    // {"name": "a", "blob": {"k": [1, 2, 3]}} hand-assembled as CBOR.
    let mut w = CborWriter::new();
    let mut top = w.write_map_begin(SizeHint::Exact(2)).unwrap();
    w.write_string("name").unwrap();
    w.move_to_value(&mut top).unwrap();
    w.write_string("a").unwrap();
    w.advance_after_value(&mut top).unwrap();
    w.write_string("blob").unwrap();
    w.move_to_value(&mut top).unwrap();
    let mut blob = w.write_map_begin(SizeHint::Exact(1)).unwrap();
    w.write_string("k").unwrap();
    w.move_to_value(&mut blob).unwrap();
    let mut arr = w.write_array_begin(SizeHint::Exact(3)).unwrap();
    w.write_number(jsonfusion_core::number::Number::UInt(1)).unwrap();
    w.advance_after_value(&mut arr).unwrap();
    w.write_number(jsonfusion_core::number::Number::UInt(2)).unwrap();
    w.advance_after_value(&mut arr).unwrap();
    w.write_number(jsonfusion_core::number::Number::UInt(3)).unwrap();
    w.write_array_end(arr).unwrap();
    w.write_map_end(blob).unwrap();
    w.write_map_end(top).unwrap();
    let bytes = w.into_bytes();

    let v: WithBlob = read(&bytes).unwrap();
    assert_eq!(v.name, "a");

    // Re-serializing must reproduce the captured sub-document's bytes
    // verbatim, not just an equivalent re-encoding.
    assert_eq!(write(&v), bytes);
}

#[test]
fn indefinite_length_map_write_read_symmetry() {
    // Write a 3-entry map with an unknown size hint (CBOR indefinite-length
    // framing, closed with the 0xFF break byte), then read it back and
    // confirm all three entries survive.
    let mut w = CborWriter::new();
    let mut frame = w.write_map_begin(SizeHint::Unknown).unwrap();
    for (index, (key, value)) in [("a", 1i64), ("b", 2), ("c", 3)].into_iter().enumerate() {
        if index > 0 {
            w.advance_after_value(&mut frame).unwrap();
        }
        w.write_string(key).unwrap();
        w.move_to_value(&mut frame).unwrap();
        w.write_number(jsonfusion_core::number::Number::Int(value))
            .unwrap();
    }
    w.write_map_end(frame).unwrap();
    let bytes = w.into_bytes();
    assert_eq!(bytes[0], 0xBF, "indefinite-length map marker");
    assert_eq!(*bytes.last().unwrap(), 0xFF, "break byte closes the map");

    let mut r = CborReader::new(&bytes);
    let mut frame: ContainerFrame = r.read_map_begin().unwrap().into_option().unwrap();
    let mut entries = Vec::new();
    while r.advance_after_value(&mut frame).unwrap() {
        let mut key = String::new();
        match jsonfusion_core::reader::read_full_string(&mut r, &mut key).unwrap() {
            Matched::Yes(()) => {}
            Matched::No => panic!("expected a string key"),
        }
        r.move_to_value(&mut frame).unwrap();
        let value = r
            .read_number(jsonfusion_core::number::NumberKind::I64)
            .unwrap()
            .into_option()
            .unwrap()
            .exact_i64();
        entries.push((key, value));
    }
    r.finish().unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].0, "a");
    assert_eq!(entries[1].0, "b");
    assert_eq!(entries[2].0, "c");
}

#[test]
fn cbor_integer_width_selection_through_writer_trait() {
    let bytes = write(&1000i32);
    assert_eq!(bytes, [0x19, 0x03, 0xE8]);
    let back: i32 = read(&bytes).unwrap();
    assert_eq!(back, 1000);

    let bytes = write(&-1i32);
    assert_eq!(bytes, [0x20]);
    let back: i32 = read(&bytes).unwrap();
    assert_eq!(back, -1);
}
