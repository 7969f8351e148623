//! Composable validators.
//!
//! Plain enum + `Display` idiom, matching [`crate::error::ErrorCode`]'s
//! shape elsewhere in this crate.

/// A compile-time validator token, carried by a [`crate::field::FieldDescriptor`]
/// or by an [`crate::annotate::Annotated`] wrapper's [`crate::annotate::ValidatorSet`].
///
/// Each variant is one kind of predicate the derive macro can attach to a
/// field or an [`crate::annotate::Annotated`] value.
#[derive(Debug, Clone, Copy)]
pub enum Validator {
    /// Number: value must fall in `[min, max]`.
    Range {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// String: byte length must be `>= n`.
    MinLength(usize),
    /// String: byte length must be `<= n`.
    MaxLength(usize),
    /// Sequence: element count must be `>= n`.
    MinItems(usize),
    /// Sequence: element count must be `<= n`.
    MaxItems(usize),
    /// Map: property count must be `<= n`.
    MaxProperties(usize),
    /// Map: every key's byte length must be `<= n`.
    MaxKeyLength(usize),
    /// String: value must be one of the given literals.
    EnumValues(&'static [&'static str]),
}

/// The facts about a value a validator needs to check against. Every schema
/// category that can be validated knows how to produce this for itself once
/// it's been read/before it's written.
#[derive(Debug, Clone, Default)]
pub struct ValidationFacts<'a> {
    /// Set for `Number`.
    pub number: Option<f64>,
    /// Set for `String`.
    pub string: Option<&'a str>,
    /// Set for `Sequence` (element count) and `Map` (property count).
    pub count: Option<usize>,
    /// Set for `Map`: the byte length of every key, in iteration order.
    /// Owned rather than borrowed since it's computed on demand from the
    /// map's keys, not stored alongside them.
    #[cfg(feature = "alloc")]
    pub key_lengths: Option<alloc::vec::Vec<usize>>,
}

impl<'a> ValidationFacts<'a> {
    /// Facts for a just-read/about-to-write number.
    pub fn number(value: f64) -> Self {
        ValidationFacts {
            number: Some(value),
            ..Default::default()
        }
    }

    /// Facts for a just-read/about-to-write string.
    pub fn string(value: &'a str) -> Self {
        ValidationFacts {
            string: Some(value),
            ..Default::default()
        }
    }

    /// Facts for a sequence or map's element/property count.
    pub fn count(value: usize) -> Self {
        ValidationFacts {
            count: Some(value),
            ..Default::default()
        }
    }

    /// Facts for a map, including per-key lengths.
    #[cfg(feature = "alloc")]
    pub fn map(count: usize, key_lengths: alloc::vec::Vec<usize>) -> Self {
        ValidationFacts {
            count: Some(count),
            key_lengths: Some(key_lengths),
            ..Default::default()
        }
    }
}

impl Validator {
    /// Evaluate this validator against the given facts. Returns `true` if
    /// the validator doesn't apply to these facts at all (e.g. a `Range`
    /// validator given only string facts) — such mismatches are a schema
    /// authoring bug, not a runtime validation failure, so dispatch never
    /// constructs facts that don't match the declared field category.
    pub fn check(&self, facts: &ValidationFacts<'_>) -> bool {
        match self {
            Validator::Range { min, max } => facts
                .number
                .map(|v| v >= *min && v <= *max)
                .unwrap_or(true),
            Validator::MinLength(n) => facts
                .string
                .map(|s| s.len() >= *n)
                .unwrap_or(true),
            Validator::MaxLength(n) => facts
                .string
                .map(|s| s.len() <= *n)
                .unwrap_or(true),
            Validator::MinItems(n) => facts.count.map(|c| c >= *n).unwrap_or(true),
            Validator::MaxItems(n) => facts.count.map(|c| c <= *n).unwrap_or(true),
            Validator::MaxProperties(n) => facts.count.map(|c| c <= *n).unwrap_or(true),
            Validator::MaxKeyLength(_n) => {
                #[cfg(feature = "alloc")]
                {
                    facts
                        .key_lengths
                        .as_ref()
                        .map(|lens| lens.iter().all(|len| *len <= *_n))
                        .unwrap_or(true)
                }
                #[cfg(not(feature = "alloc"))]
                {
                    true
                }
            }
            Validator::EnumValues(values) => facts
                .string
                .map(|s| values.contains(&s))
                .unwrap_or(true),
        }
    }
}

#[cfg(feature = "alloc")]
impl core::fmt::Display for Validator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Validator::Range { min, max } => write!(f, "range<{min}, {max}>"),
            Validator::MinLength(n) => write!(f, "min-length<{n}>"),
            Validator::MaxLength(n) => write!(f, "max-length<{n}>"),
            Validator::MinItems(n) => write!(f, "min-items<{n}>"),
            Validator::MaxItems(n) => write!(f, "max-items<{n}>"),
            Validator::MaxProperties(n) => write!(f, "max-properties<{n}>"),
            Validator::MaxKeyLength(n) => write!(f, "max-key-length<{n}>"),
            Validator::EnumValues(values) => {
                write!(f, "enum-values<")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{v}\"")?;
                }
                write!(f, ">")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonfusion_testhelpers::test;

    #[test]
    fn range_checks_inclusive_bounds() {
        let v = Validator::Range {
            min: 10.0,
            max: 10000.0,
        };
        assert!(v.check(&ValidationFacts::number(10.0)));
        assert!(v.check(&ValidationFacts::number(10000.0)));
        assert!(!v.check(&ValidationFacts::number(5.0)));
    }

    #[test]
    fn enum_values_checks_membership() {
        let v = Validator::EnumValues(&["a", "b"]);
        assert!(v.check(&ValidationFacts::string("a")));
        assert!(!v.check(&ValidationFacts::string("c")));
    }

    #[test]
    fn max_key_length_checks_all_keys() {
        let v = Validator::MaxKeyLength(3);
        assert!(v.check(&ValidationFacts::map(3, alloc::vec![1, 2, 3])));
        assert!(!v.check(&ValidationFacts::map(2, alloc::vec![1, 4])));
    }
}
