//! One record field's wire metadata plus its monomorphized read/write
//! closures.
//!
//! A per-field descriptor carried in a static table, built from two plain
//! function pointers generated by `#[derive(Schema)]` — see
//! `jsonfusion-derive` — instead of an offset-and-vtable triple. Each
//! closure already knows its own field's concrete type, so no generics or
//! unsafe casts are needed at the call site.

use crate::error::CodecResult;
use crate::options::{ReadOptions, WriteOptions};
use crate::reader::Reader;
use crate::validators::Validator;
use crate::path::JsonPath;
use crate::writer::Writer;

/// Static metadata and read/write entry points for one field of a record
/// type `Rec`. `#[derive(Schema)]` emits one of these per wire-visible
/// field — a `not_json` field is skipped entirely on parse and serialize,
/// so it never gets an entry here.
pub struct FieldDescriptor<Rec> {
    /// The field's name in source, used in diagnostics.
    pub name: &'static str,
    /// The key this field is read/written under on the wire.
    pub key: &'static str,
    /// Whether a missing key is [`crate::error::ErrorCode::MissingField`].
    /// A record-level `not_required` attribute naming this field flips
    /// this to `false` even when the field's type isn't `Option<_>`.
    pub required: bool,
    /// The validators attached to this field (for introspection; the
    /// actual check happens inside `read`, generated alongside the type's
    /// own validators).
    pub validators: &'static [Validator],
    /// Read this field's value from `reader` into `rec`, pushing/popping
    /// its own path segment. `ReadOptions::validate_on_parse` gates whether
    /// this field's validators run.
    pub read: fn(&mut Rec, &mut dyn Reader, &mut JsonPath, ReadOptions) -> CodecResult<()>,
    /// Write this field's value from `rec` to `writer`, pushing/popping its
    /// own path segment. `WriteOptions::validate_on_serialize` gates
    /// whether this field's validators run before the value is written.
    pub write: fn(&Rec, &mut dyn Writer, &mut JsonPath, WriteOptions) -> CodecResult<()>,
}
