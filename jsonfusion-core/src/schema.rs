//! The central trait every schema-describable type implements.
//!
//! The single trait the rest of the crate dispatches on, backed by two
//! plain safe methods rather than unsafe pointer/offset/vtable machinery —
//! a declarative registration approach rather than native compiler
//! reflection.

use crate::category::Category;
use crate::error::{CodecError, CodecResult, ErrorCode};
use crate::number::{Number, NumberKind};
use crate::path::{JsonPath, PathGuard};
use crate::reader::{Matched, Reader};
use crate::writer::{SizeHint, Writer};

/// A type that knows how to read itself from, and write itself to, any
/// [`Reader`]/[`Writer`] pair, plus which [`Category`] it belongs to.
///
/// `read_from`/`write_to` are the only two methods `#[derive(Schema)]` has
/// to produce for a record; every other category (scalars, `Option`,
/// `Vec`, arrays, maps, [`crate::wire_sink::WireSink`],
/// [`crate::annotate::Annotated`]) gets a blanket impl in this crate.
pub trait Schema: Sized {
    /// This type's wire category. Used by callers that need to branch on
    /// shape without going through a full read (diagnostics, schema
    /// introspection).
    const CATEGORY: Category;

    /// Read one value of `Self` from `reader`, advancing it past the value.
    /// `path` is pushed/popped by callers (record fields, sequence/map
    /// elements) as they descend; a leaf implementation should not push its
    /// own segment.
    fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self>;

    /// Write one value of `Self` to `writer`.
    fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()>;
}

impl Schema for () {
    const CATEGORY: Category = Category::Null;

    fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
        match reader.try_read_null().map_err(|e| e.with_path_if_root(path))? {
            Matched::Yes(()) => Ok(()),
            Matched::No => Err(CodecError::new(ErrorCode::NonNull, reader.offset()).with_path(path.clone())),
        }
    }

    fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
        writer.write_null().map_err(|e| e.with_path_if_root(path))
    }
}

impl Schema for bool {
    const CATEGORY: Category = Category::Bool;

    fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
        match reader.read_bool().map_err(|e| e.with_path_if_root(path))? {
            Matched::Yes(v) => Ok(v),
            Matched::No => Err(CodecError::new(ErrorCode::NonBool, reader.offset()).with_path(path.clone())),
        }
    }

    fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
        writer.write_bool(*self).map_err(|e| e.with_path_if_root(path))
    }
}

macro_rules! impl_schema_signed {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(impl Schema for $ty {
            const CATEGORY: Category = Category::Number;

            fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
                match reader.read_number(NumberKind::$kind).map_err(|e| e.with_path_if_root(path))? {
                    Matched::Yes(n) => {
                        let narrowed = n.into_kind(NumberKind::$kind, reader.offset()).map_err(|e| e.with_path_if_root(path))?;
                        Ok(narrowed.exact_i64() as $ty)
                    }
                    Matched::No => Err(CodecError::new(ErrorCode::WrongJsonForNumber, reader.offset()).with_path(path.clone())),
                }
            }

            fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
                writer.write_number(Number::from(*self)).map_err(|e| e.with_path_if_root(path))
            }
        })*
    };
}

macro_rules! impl_schema_unsigned {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(impl Schema for $ty {
            const CATEGORY: Category = Category::Number;

            fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
                match reader.read_number(NumberKind::$kind).map_err(|e| e.with_path_if_root(path))? {
                    Matched::Yes(n) => {
                        let narrowed = n.into_kind(NumberKind::$kind, reader.offset()).map_err(|e| e.with_path_if_root(path))?;
                        Ok(narrowed.exact_u64() as $ty)
                    }
                    Matched::No => Err(CodecError::new(ErrorCode::WrongJsonForNumber, reader.offset()).with_path(path.clone())),
                }
            }

            fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
                writer.write_number(Number::from(*self)).map_err(|e| e.with_path_if_root(path))
            }
        })*
    };
}

macro_rules! impl_schema_float {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(impl Schema for $ty {
            const CATEGORY: Category = Category::Number;

            fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
                match reader.read_number(NumberKind::$kind).map_err(|e| e.with_path_if_root(path))? {
                    Matched::Yes(n) => {
                        let narrowed = n.into_kind(NumberKind::$kind, reader.offset()).map_err(|e| e.with_path_if_root(path))?;
                        Ok(narrowed.as_f64() as $ty)
                    }
                    Matched::No => Err(CodecError::new(ErrorCode::WrongJsonForNumber, reader.offset()).with_path(path.clone())),
                }
            }

            fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
                writer.write_number(Number::from(*self)).map_err(|e| e.with_path_if_root(path))
            }
        })*
    };
}

impl_schema_signed!(i8 => I8, i16 => I16, i32 => I32, i64 => I64);
impl_schema_unsigned!(u8 => U8, u16 => U16, u32 => U32, u64 => U64);
impl_schema_float!(f32 => F32, f64 => F64);

#[cfg(feature = "alloc")]
impl Schema for alloc::string::String {
    const CATEGORY: Category = Category::String;

    fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
        let mut out = alloc::string::String::new();
        match crate::reader::read_full_string(reader, &mut out).map_err(|e| e.with_path_if_root(path))? {
            Matched::Yes(()) => Ok(out),
            Matched::No => Err(CodecError::new(ErrorCode::NonString, reader.offset()).with_path(path.clone())),
        }
    }

    fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
        writer.write_string(self.as_str()).map_err(|e| e.with_path_if_root(path))
    }
}

impl<T: Schema> Schema for Option<T> {
    const CATEGORY: Category = Category::Optional;

    fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
        match reader.try_read_null().map_err(|e| e.with_path_if_root(path))? {
            Matched::Yes(()) => Ok(None),
            Matched::No => Ok(Some(T::read_from(reader, path)?)),
        }
    }

    fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
        match self {
            Some(v) => v.write_to(writer, path),
            None => writer.write_null().map_err(|e| e.with_path_if_root(path)),
        }
    }
}

#[cfg(feature = "alloc")]
impl<T: Schema> Schema for alloc::vec::Vec<T> {
    const CATEGORY: Category = Category::Sequence;

    fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
        let mut frame = match reader.read_array_begin().map_err(|e| e.with_path_if_root(path))? {
            Matched::Yes(f) => f,
            Matched::No => return Err(CodecError::new(ErrorCode::NonArray, reader.offset()).with_path(path.clone())),
        };
        let mut out = alloc::vec::Vec::new();
        let mut index = 0usize;
        loop {
            let has_value = reader.advance_after_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
            if !has_value {
                break;
            }
            let _guard = PathGuard::index(path, index);
            out.push(T::read_from(reader, path)?);
            index += 1;
        }
        Ok(out)
    }

    fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
        let mut frame = writer
            .write_array_begin(SizeHint::Exact(self.len()))
            .map_err(|e| e.with_path_if_root(path))?;
        for (index, item) in self.iter().enumerate() {
            if index > 0 {
                writer.advance_after_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
            }
            let _guard = PathGuard::index(path, index);
            item.write_to(writer, path)?;
        }
        writer.write_array_end(frame).map_err(|e| e.with_path_if_root(path))
    }
}

#[cfg(feature = "alloc")]
impl<T: Schema, const N: usize> Schema for [T; N] {
    const CATEGORY: Category = Category::Sequence;

    /// A fixed-size array is a sequence with exactly `N` elements: fewer
    /// is [`ErrorCode::UnexpectedEndOfData`], more is
    /// [`ErrorCode::FixedContainerOverflow`].
    fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
        let mut frame = match reader.read_array_begin().map_err(|e| e.with_path_if_root(path))? {
            Matched::Yes(f) => f,
            Matched::No => return Err(CodecError::new(ErrorCode::NonArray, reader.offset()).with_path(path.clone())),
        };

        let mut items = alloc::vec::Vec::with_capacity(N);
        for index in 0..N {
            let has_value = reader.advance_after_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
            if !has_value {
                return Err(CodecError::new(ErrorCode::UnexpectedEndOfData, reader.offset()).with_path(path.clone()));
            }
            let _guard = PathGuard::index(path, index);
            items.push(T::read_from(reader, path)?);
        }
        // One more slot must report "no more values" or the array is too long.
        if reader.advance_after_value(&mut frame).map_err(|e| e.with_path_if_root(path))? {
            return Err(CodecError::new(ErrorCode::FixedContainerOverflow, reader.offset()).with_path(path.clone()));
        }

        match items.try_into() {
            Ok(array) => Ok(array),
            Err(_) => Err(CodecError::new(ErrorCode::FixedContainerOverflow, reader.offset()).with_path(path.clone())),
        }
    }

    fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
        let mut frame = writer.write_array_begin(SizeHint::Exact(N)).map_err(|e| e.with_path_if_root(path))?;
        for (index, item) in self.iter().enumerate() {
            if index > 0 {
                writer.advance_after_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
            }
            let _guard = PathGuard::index(path, index);
            item.write_to(writer, path)?;
        }
        writer.write_array_end(frame).map_err(|e| e.with_path_if_root(path))
    }
}

/// A type usable as a map key: textual formats read/write it as a string,
/// binary formats may use a more compact encoding. A map's key type is
/// either string-like or integer-like.
pub trait MapKey: Sized + Ord {
    /// Read one key, in whichever form the underlying reader exposes keys
    /// (a string for textual formats, an integer for [`Reader::read_key_as_index`]).
    fn read_key(reader: &mut dyn Reader) -> CodecResult<Self>;
    /// Write one key.
    fn write_key(&self, writer: &mut dyn Writer) -> CodecResult<()>;
}

#[cfg(feature = "alloc")]
impl MapKey for alloc::string::String {
    fn read_key(reader: &mut dyn Reader) -> CodecResult<Self> {
        let mut out = alloc::string::String::new();
        match crate::reader::read_full_string(reader, &mut out)? {
            Matched::Yes(()) => Ok(out),
            Matched::No => Err(CodecError::new(ErrorCode::NonString, reader.offset())),
        }
    }
    // Path attachment for key errors happens at the `BTreeMap` call site,
    // which is the first frame that has a `path` to attach.

    fn write_key(&self, writer: &mut dyn Writer) -> CodecResult<()> {
        writer.write_string(self.as_str())
    }
}

macro_rules! impl_map_key_signed {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(impl MapKey for $ty {
            fn read_key(reader: &mut dyn Reader) -> CodecResult<Self> {
                match reader.read_key_as_index()? {
                    Matched::Yes(idx) => {
                        let narrowed = Number::Int(idx).into_kind(NumberKind::$kind, reader.offset())?;
                        Ok(narrowed.exact_i64() as $ty)
                    }
                    Matched::No => Err(CodecError::new(ErrorCode::WrongJsonForNumber, reader.offset())),
                }
            }
            // Path attachment happens at the `BTreeMap` call site.

            fn write_key(&self, writer: &mut dyn Writer) -> CodecResult<()> {
                writer.write_key_as_index(*self as i64)
            }
        })*
    };
}

macro_rules! impl_map_key_unsigned {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(impl MapKey for $ty {
            fn read_key(reader: &mut dyn Reader) -> CodecResult<Self> {
                match reader.read_key_as_index()? {
                    Matched::Yes(idx) => {
                        let narrowed = Number::Int(idx).into_kind(NumberKind::$kind, reader.offset())?;
                        Ok(narrowed.exact_u64() as $ty)
                    }
                    Matched::No => Err(CodecError::new(ErrorCode::WrongJsonForNumber, reader.offset())),
                }
            }
            // Path attachment happens at the `BTreeMap` call site.

            fn write_key(&self, writer: &mut dyn Writer) -> CodecResult<()> {
                writer.write_key_as_index(*self as i64)
            }
        })*
    };
}

impl_map_key_signed!(i8 => I8, i16 => I16, i32 => I32, i64 => I64);
impl_map_key_unsigned!(u8 => U8, u16 => U16, u32 => U32);

#[cfg(feature = "alloc")]
impl<K: MapKey, V: Schema> Schema for alloc::collections::BTreeMap<K, V> {
    const CATEGORY: Category = Category::Map;

    fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
        let mut frame = match reader.read_map_begin().map_err(|e| e.with_path_if_root(path))? {
            Matched::Yes(f) => f,
            Matched::No => return Err(CodecError::new(ErrorCode::NonObject, reader.offset()).with_path(path.clone())),
        };
        let mut out = alloc::collections::BTreeMap::new();
        loop {
            let has_entry = reader.advance_after_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
            if !has_entry {
                break;
            }
            let key = K::read_key(reader).map_err(|e| e.with_path_if_root(path))?;
            reader.move_to_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
            let value = V::read_from(reader, path)?;
            if out.insert(key, value).is_some() {
                return Err(CodecError::new(ErrorCode::DuplicateKey, reader.offset()).with_path(path.clone()));
            }
        }
        Ok(out)
    }

    fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
        let mut frame = writer
            .write_map_begin(SizeHint::Exact(self.len()))
            .map_err(|e| e.with_path_if_root(path))?;
        for (index, (key, value)) in self.iter().enumerate() {
            if index > 0 {
                writer.advance_after_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
            }
            key.write_key(writer).map_err(|e| e.with_path_if_root(path))?;
            writer.move_to_value(&mut frame).map_err(|e| e.with_path_if_root(path))?;
            value.write_to(writer, path)?;
        }
        writer.write_map_end(frame).map_err(|e| e.with_path_if_root(path))
    }
}

impl<const CAP: usize> Schema for crate::wire_sink::WireSink<CAP> {
    const CATEGORY: Category = Category::WireSink;

    fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
        let mut sink = crate::wire_sink::WireSink::<CAP>::new();
        reader
            .capture_to_sink(&mut sink, crate::path::DEFAULT_MAX_DEPTH)
            .map_err(|e| e.with_path_if_root(path))?;
        Ok(sink)
    }

    fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
        writer.output_from_sink(self).map_err(|e| e.with_path_if_root(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonfusion_testhelpers::test;

    #[test]
    fn categories_match_spec_groupings() {
        assert_eq!(<()>::CATEGORY, Category::Null);
        assert_eq!(<bool>::CATEGORY, Category::Bool);
        assert_eq!(<i32>::CATEGORY, Category::Number);
        assert_eq!(<Option<i32>>::CATEGORY, Category::Optional);
        assert_eq!(<[i32; 3]>::CATEGORY, Category::Sequence);
    }
}
