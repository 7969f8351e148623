//! `#[derive(Schema)]`: generates a [`jsonfusion_core::record::RecordSchema`]
//! implementation (field table + `Default`) for a struct with named fields.
//!
//! This derive only ever has one shape to generate — struct fields mapping
//! onto a flat table, no enums, no trait-vtable detection — so entry point
//! and codegen stay in a single crate, parsed with plain `syn`.
//!
//! ```ignore
//! #[derive(Schema)]
//! #[jsonfusion(not_required(nickname))]
//! struct Motor {
//!     #[jsonfusion(key = "name", max_length = 64)]
//!     name: String,
//!     #[jsonfusion(range(min = 10, max = 10000))]
//!     loop_hz: f64,
//!     nickname: String,
//!     #[jsonfusion(not_json)]
//!     cached_checksum: u32,
//! }
//! ```
//!
//! Supported attributes:
//! - struct-level `#[jsonfusion(not_required(a, b, ...))]`: these fields are
//!   optional on the wire even though their Rust type isn't `Option<_>`.
//! - field-level `key = "..."`: the wire key, if different from the Rust
//!   field name.
//! - field-level `not_json`: the field is skipped by both `read_from` and
//!   `write_to`; it always takes its `Default` value.
//! - field-level `as_array`: an `Option<Record>` field is read/written as a
//!   positional array of the inner record's fields instead of a nested
//!   object.
//! - field-level validators: `range(min = ..., max = ...)`, `min_length`,
//!   `max_length`, `min_items`, `max_items`, `max_properties`,
//!   `max_key_length`, `enum_values("a", "b", ...)`.
//!
//! A field with no `#[jsonfusion(...)]` attribute at all is a plain required
//! field keyed by its own name, delegating entirely to its type's
//! [`jsonfusion_core::schema::Schema`] impl.

mod codegen;
mod parse;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

#[proc_macro_derive(Schema, attributes(jsonfusion))]
pub fn derive_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match codegen::expand_record(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
