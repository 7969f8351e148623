//! Exercises `#[derive(Schema)]`-generated code directly against
//! `jsonfusion_core`'s trait machinery, without going through any wire
//! format (those round trips live in `jsonfusion-json`'s own test suite).
//! Compiles a handful of representative structs and checks the generated
//! `fields()` table and `Default` impl do what the attributes asked for.

use jsonfusion_core::field::FieldDescriptor;
use jsonfusion_core::record::RecordSchema;
use jsonfusion_derive::Schema;
use jsonfusion_testhelpers::test;

#[derive(Schema, PartialEq, Debug)]
struct Motor {
    name: String,
    #[jsonfusion(range(min = 10, max = 10000))]
    loop_hz: f64,
}

#[test]
fn plain_fields_are_required_and_keyed_by_name() {
    let fields = Motor::fields();
    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "name");
    assert_eq!(fields[0].key, "name");
    assert!(fields[0].required);
    assert!(fields[0].validators.is_empty());

    assert_eq!(fields[1].name, "loop_hz");
    assert!(fields[1].required);
    assert_eq!(fields[1].validators.len(), 1);
}

#[derive(Schema, PartialEq, Debug)]
struct Controller {
    #[jsonfusion(key = "ctl_name", max_length = 64)]
    name: String,
    nickname: Option<String>,
}

#[test]
fn option_fields_are_not_required_and_key_can_be_renamed() {
    let fields = Controller::fields();
    assert_eq!(fields[0].key, "ctl_name");
    assert!(fields[0].required);
    assert_eq!(fields[1].name, "nickname");
    assert!(!fields[1].required);
}

#[derive(Schema, PartialEq, Debug)]
#[jsonfusion(not_required(serial))]
struct Board {
    serial: String,
    revision: u32,
}

#[test]
fn struct_level_not_required_overrides_a_non_option_field() {
    let fields = Board::fields();
    assert_eq!(fields[0].name, "serial");
    assert!(!fields[0].required);
    assert_eq!(fields[1].name, "revision");
    assert!(fields[1].required);
}

#[derive(Schema, PartialEq, Debug)]
struct WithCache {
    value: i32,
    #[jsonfusion(not_json)]
    cached_double: i64,
}

#[test]
fn not_json_fields_are_excluded_from_the_table() {
    assert_eq!(WithCache::fields().len(), 1);
    assert_eq!(WithCache::fields()[0].name, "value");
}

#[test]
fn generated_default_fills_every_field_including_not_json_ones() {
    let w = WithCache::default();
    assert_eq!(w.value, 0);
    assert_eq!(w.cached_double, 0);
}

#[derive(Schema, PartialEq, Debug, Default)]
struct Position {
    x: f64,
    y: f64,
}

#[derive(Schema, PartialEq, Debug)]
struct Frame {
    #[jsonfusion(as_array)]
    origin: Option<Position>,
}

#[test]
fn as_array_field_requires_option_of_record() {
    let fields = Frame::fields();
    assert_eq!(fields.len(), 1);
    assert!(!fields[0].required);
}

#[test]
fn field_descriptor_is_generic_over_its_owning_record() {
    fn assert_send<T: Send>() {}
    // FieldDescriptor's fn-pointer fields carry no captured state, so the
    // whole table is plain data - no Send/Sync bound needed on Rec itself,
    // but the table for a concrete Rec should still be usable from a plain
    // function like this one.
    let _fields: &'static [FieldDescriptor<Motor>] = Motor::fields();
    assert_send::<&'static [FieldDescriptor<Motor>]>();
}
