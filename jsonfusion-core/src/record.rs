//! The generic record dispatch engine: the single place key lookup,
//! unknown-key handling, duplicate-key detection and required-field
//! tracking are implemented, shared by every record type in the program.
//!
//! A field-table-driven struct loop built around
//! [`crate::field::FieldDescriptor`]'s safe function pointers rather than
//! unsafe offset-based writes.

use crate::category::Category;
use crate::error::{CodecError, CodecResult, ErrorCode};
use crate::field::FieldDescriptor;
use crate::options::{ReadOptions, WriteOptions};
use crate::path::{JsonPath, PathGuard};
use crate::reader::{read_full_string, Matched, Reader};
use crate::schema::Schema;
use crate::writer::{SizeHint, Writer};

/// Implemented by `#[derive(Schema)]` for every record (struct) type.
/// `fields()` is the static table [`read_record`]/[`write_record`] drive;
/// `Default` supplies the starting value that fields are filled into one
/// key at a time, in whatever order they arrive on the wire.
pub trait RecordSchema: Sized + Default {
    /// This record's fields, in declaration order. Declaration order is
    /// significant for [`read_record_as_array`]/[`write_record_as_array`]
    /// (the `as_array` field option) even though ordinary key-based record
    /// dispatch doesn't depend on it.
    fn fields() -> &'static [FieldDescriptor<Self>];
}

impl<T: RecordSchema> Schema for T {
    const CATEGORY: Category = Category::Record;

    fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
        read_record(reader, path, ReadOptions::default())
    }

    fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
        write_record(self, writer, path, WriteOptions::default())
    }
}

/// Read one record by object/map key, honoring `options` for unknown-key
/// and depth behavior.
pub fn read_record<Rec: RecordSchema>(
    reader: &mut dyn Reader,
    path: &mut JsonPath,
    options: ReadOptions,
) -> CodecResult<Rec> {
    let mut frame = match reader.read_map_begin().map_err(|e| e.with_path_if_root(path))? {
        Matched::Yes(f) => f,
        Matched::No => {
            return Err(CodecError::new(ErrorCode::NonObject, reader.offset()).with_path(path.clone()))
        }
    };

    let fields = Rec::fields();
    let mut instance = Rec::default();
    let mut seen = alloc::vec![false; fields.len()];

    loop {
        let has_entry = reader.advance_after_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
        if !has_entry {
            break;
        }

        let mut key = alloc::string::String::new();
        match read_full_string(reader, &mut key).map_err(|e| e.with_path_if_root(path))? {
            Matched::Yes(()) => {}
            Matched::No => {
                return Err(CodecError::new(ErrorCode::NonString, reader.offset()).with_path(path.clone()))
            }
        }
        reader.move_to_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;

        match fields.iter().position(|f| f.key == key) {
            Some(index) => {
                if seen[index] {
                    return Err(CodecError::new(ErrorCode::DuplicateKey, reader.offset())
                        .with_path(path.clone()));
                }
                seen[index] = true;
                (fields[index].read)(&mut instance, reader, path, options)?;
            }
            None if options.strict_unknown_fields => {
                return Err(CodecError::new(ErrorCode::ExcessField, reader.offset())
                    .with_path(path.clone()));
            }
            None => {
                crate::trace!("record: unknown key {:?}, skipping", key);
                reader.skip_value(options.max_depth).map_err(|e| e.with_path_if_root(path))?;
            }
        }
    }

    for (index, field) in fields.iter().enumerate() {
        if field.required && !seen[index] {
            let _guard = PathGuard::field(path, field.name);
            return Err(CodecError::new(ErrorCode::MissingField, reader.offset())
                .with_path(path.clone()));
        }
    }

    Ok(instance)
}

/// Write one record as an object/map keyed by each field's declared key.
/// `options.validate_on_serialize` gates whether each field's validators
/// run before it's written.
pub fn write_record<Rec: RecordSchema>(
    record: &Rec,
    writer: &mut dyn Writer,
    path: &mut JsonPath,
    options: WriteOptions,
) -> CodecResult<()> {
    let fields = Rec::fields();
    let mut frame = writer
        .write_map_begin(SizeHint::Exact(fields.len()))
        .map_err(|e| e.with_path_if_root(path))?;

    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            writer.advance_after_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
        }
        writer.write_string(field.key).map_err(|e| e.with_path_if_root(path))?;
        writer.move_to_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
        (field.write)(record, writer, path, options)?;
    }

    writer.write_map_end(frame).map_err(|e| e.with_path_if_root(path))
}

/// Read one record as a positional array of its fields' values, in
/// declaration order — the `as_array` field option's counterpart: it
/// serializes an Optional-of-record as a heterogeneous array of the
/// record's field values, and this mirrors that on parse. Trailing fields
/// with no corresponding element keep their `Default` value unless marked
/// required.
pub fn read_record_as_array<Rec: RecordSchema>(
    reader: &mut dyn Reader,
    path: &mut JsonPath,
    options: ReadOptions,
) -> CodecResult<Rec> {
    let mut frame = match reader.read_array_begin().map_err(|e| e.with_path_if_root(path))? {
        Matched::Yes(f) => f,
        Matched::No => {
            return Err(CodecError::new(ErrorCode::NonArray, reader.offset()).with_path(path.clone()))
        }
    };

    let fields = Rec::fields();
    let mut instance = Rec::default();

    for field in fields {
        let has_value = reader.advance_after_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
        if !has_value {
            if field.required {
                let _guard = PathGuard::field(path, field.name);
                return Err(CodecError::new(ErrorCode::MissingField, reader.offset())
                    .with_path(path.clone()));
            }
            continue;
        }
        (field.read)(&mut instance, reader, path, options)?;
    }

    if reader.advance_after_value(&mut frame).map_err(|e| e.with_path_if_root(path))? {
        return Err(CodecError::new(ErrorCode::FixedContainerOverflow, reader.offset()).with_path(path.clone()));
    }

    Ok(instance)
}

/// Write one record as a positional array, symmetric to
/// [`read_record_as_array`].
pub fn write_record_as_array<Rec: RecordSchema>(
    record: &Rec,
    writer: &mut dyn Writer,
    path: &mut JsonPath,
    options: WriteOptions,
) -> CodecResult<()> {
    let fields = Rec::fields();
    let mut frame = writer
        .write_array_begin(SizeHint::Exact(fields.len()))
        .map_err(|e| e.with_path_if_root(path))?;

    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            writer.advance_after_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
        }
        (field.write)(record, writer, path, options)?;
    }

    writer.write_array_end(frame).map_err(|e| e.with_path_if_root(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonfusion_testhelpers::test;
    use crate::validators::Validator;

    #[derive(Default, PartialEq, Debug)]
    struct Motor {
        name: alloc::string::String,
        loop_hz: f64,
    }

    fn motor_fields() -> &'static [FieldDescriptor<Motor>] {
        &[
            FieldDescriptor {
                name: "name",
                key: "name",
                required: true,
                validators: &[],
                read: |rec, reader, path, _opts| {
                    let _guard = PathGuard::field(path, "name");
                    rec.name = Schema::read_from(reader, path)?;
                    Ok(())
                },
                write: |rec, writer, path, _opts| {
                    let _guard = PathGuard::field(path, "name");
                    rec.name.write_to(writer, path)
                },
            },
            FieldDescriptor {
                name: "loop_hz",
                key: "loop_hz",
                required: false,
                validators: &[Validator::Range { min: 10.0, max: 10000.0 }],
                read: |rec, reader, path, opts| {
                    let _guard = PathGuard::field(path, "loop_hz");
                    rec.loop_hz = Schema::read_from(reader, path)?;
                    if opts.validate_on_parse {
                        crate::annotate::check_validators(
                            &rec.loop_hz,
                            &[Validator::Range { min: 10.0, max: 10000.0 }],
                            path,
                            reader.offset(),
                        )?;
                    }
                    Ok(())
                },
                write: |rec, writer, path, _opts| {
                    let _guard = PathGuard::field(path, "loop_hz");
                    rec.loop_hz.write_to(writer, path)
                },
            },
        ]
    }

    impl RecordSchema for Motor {
        fn fields() -> &'static [FieldDescriptor<Self>] {
            motor_fields()
        }
    }

    #[test]
    fn missing_required_field_is_reported() {
        // Exercised end-to-end once `jsonfusion-json` exists; here we just
        // check the field table shape compiles and `fields()` is stable.
        assert_eq!(Motor::fields().len(), 2);
        assert!(Motor::fields()[0].required);
        assert!(!Motor::fields()[1].required);
    }
}
