//! Schema model, validators, reader/writer traits, and the generic
//! parse/serialize dispatch engine shared by every JsonFusion wire format.
//!
//! This crate has no opinion on bytes: it defines *what* a value looks like
//! ([`schema::Schema`], [`category::Category`]) and *how* dispatch walks a
//! value tree ([`record`], [`annotate`]), against an abstract
//! [`reader::Reader`]/[`writer::Writer`] pair. `jsonfusion-json` and
//! `jsonfusion-cbor` each implement that pair once; every type that derives
//! or implements [`schema::Schema`] then works against both for free.
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "alloc")]
extern crate alloc;

/// Emits a `tracing::trace!` call when the `tracing` feature is enabled,
/// and is otherwise compiled out entirely. Each format crate (`jsonfusion-json`,
/// `jsonfusion-cbor`) carries its own copy of this macro rather than
/// depending on this one, so it still compiles standalone; this copy is
/// what the schema-level dispatch in [`record`]/[`annotate`] uses.
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

pub mod annotate;
pub mod category;
pub mod error;
#[cfg(feature = "alloc")]
pub mod field;
pub mod number;
pub mod options;
pub mod path;
pub mod reader;
#[cfg(feature = "alloc")]
pub mod record;
pub mod schema;
pub mod validators;
pub mod wire_sink;
pub mod writer;

pub use annotate::{Annotated, NoValidators, ValidatorSet};
pub use category::Category;
pub use error::{CodecError, CodecResult, ErrorCode};
#[cfg(feature = "alloc")]
pub use field::FieldDescriptor;
pub use number::{Number, NumberKind};
pub use options::{ReadOptions, WriteOptions};
pub use path::JsonPath;
pub use reader::{ContainerFrame, Matched, Reader, StringChunk};
#[cfg(feature = "alloc")]
pub use record::{read_record, read_record_as_array, write_record, write_record_as_array, RecordSchema};
pub use schema::{MapKey, Schema};
pub use validators::{ValidationFacts, Validator};
pub use wire_sink::{SinkReader, SinkWriter, WireSink};
pub use writer::{SizeHint, Writer};
