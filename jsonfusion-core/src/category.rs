//! The closed set of schema categories.

/// Every type the codec handles falls into exactly one of these. Schema
/// introspection is, in Rust terms, just `<T as Schema>::CATEGORY`.
///
/// A deliberately closed set: no tuples, enums, smart pointers,
/// n-dimensional arrays, or function pointers — only the shapes a
/// structured-data wire format actually needs to represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// The unit value.
    Null,
    /// Two-state.
    Bool,
    /// Any integral or floating-point storage.
    Number,
    /// A growable or fixed-capacity byte-sequence-as-text value.
    String,
    /// "Present or absent" wrapper over another category.
    Optional,
    /// Ordered, homogeneous: growable or fixed-capacity.
    Sequence,
    /// String-keyed or integer-keyed associative container.
    Map,
    /// A named tuple of fields; on the wire, a map with known keys.
    Record,
    /// Opaque byte buffer capturing an arbitrary sub-document.
    WireSink,
    /// A value of any category above, paired with compile-time validators/options.
    Annotated,
}

impl Category {
    /// Human-readable name, used in error messages (`non-bool`, `non-array`, ...).
    pub const fn name(&self) -> &'static str {
        match self {
            Category::Null => "null",
            Category::Bool => "bool",
            Category::Number => "number",
            Category::String => "string",
            Category::Optional => "optional",
            Category::Sequence => "sequence",
            Category::Map => "map",
            Category::Record => "record",
            Category::WireSink => "wire-sink",
            Category::Annotated => "annotated",
        }
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
