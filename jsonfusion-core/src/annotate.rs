//! Standalone value annotation.
//!
//! Record *fields* carry their validators/options as attributes captured
//! directly into a [`crate::field::FieldDescriptor`] by `#[derive(Schema)]`
//! (the common case — see `jsonfusion-derive`). This module covers the other
//! case: annotating a value that isn't itself a record field, e.g. every
//! element of a `Vec<Annotated<i32, Positive>>`.
//!
//! [`Annotated`] is `#[repr(transparent)]` over its inner value — a
//! representation-transparent newtype, so attaching validators costs
//! nothing at the value level — with the validator list attached at the
//! type level via a zero-sized marker implementing [`ValidatorSet`], so
//! there's no per-value storage cost.

use core::marker::PhantomData;

use crate::category::Category;
use crate::error::{CodecError, CodecResult, ErrorCode};
use crate::reader::Reader;
use crate::schema::Schema;
use crate::validators::{Validator, ValidationFacts};
use crate::path::JsonPath;
use crate::writer::Writer;

/// A compile-time list of validators, attached to an [`Annotated`] wrapper
/// via its marker type parameter `M`.
///
/// Define a zero-sized marker and implement this trait to attach validators
/// to a standalone value:
///
/// ```
/// use jsonfusion_core::annotate::ValidatorSet;
/// use jsonfusion_core::validators::Validator;
///
/// struct LoopHz;
/// impl ValidatorSet for LoopHz {
///     const VALIDATORS: &'static [Validator] = &[Validator::Range { min: 10.0, max: 10000.0 }];
/// }
/// ```
pub trait ValidatorSet {
    /// The validators to run after the inner value is read, or before it's written.
    const VALIDATORS: &'static [Validator];
}

/// No validators; the default for `Annotated<V, NoValidators>` when only
/// options (not validation) are needed.
pub struct NoValidators;

impl ValidatorSet for NoValidators {
    const VALIDATORS: &'static [Validator] = &[];
}

/// A value of type `V`, paired with a compile-time validator list `M`.
/// Transparent: `size_of::<Annotated<V, M>>() == size_of::<V>()`.
#[repr(transparent)]
pub struct Annotated<V, M: ValidatorSet> {
    value: V,
    _validators: PhantomData<M>,
}

impl<V, M: ValidatorSet> Annotated<V, M> {
    /// Wrap a value, attaching `M`'s validators.
    pub fn new(value: V) -> Self {
        Annotated {
            value,
            _validators: PhantomData,
        }
    }

    /// Unwrap, discarding the validator attachment.
    pub fn into_inner(self) -> V {
        self.value
    }

    /// Borrow the inner value.
    pub fn get(&self) -> &V {
        &self.value
    }

    /// Mutably borrow the inner value.
    pub fn get_mut(&mut self) -> &mut V {
        &mut self.value
    }
}

impl<V: Clone, M: ValidatorSet> Clone for Annotated<V, M> {
    fn clone(&self) -> Self {
        Annotated::new(self.value.clone())
    }
}

impl<V: core::fmt::Debug, M: ValidatorSet> core::fmt::Debug for Annotated<V, M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Annotated").field("value", &self.value).finish()
    }
}

impl<V: PartialEq, M: ValidatorSet> PartialEq for Annotated<V, M> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

/// Run `M::VALIDATORS` against whatever facts `value`'s category produces,
/// raising [`ErrorCode::SchemaValidationError`] at `path` on the first
/// failing validator.
pub fn check_validators<V: Validatable>(
    value: &V,
    validators: &[Validator],
    path: &JsonPath,
    offset: usize,
) -> CodecResult<()> {
    let facts = value.facts();
    for validator in validators {
        if !validator.check(&facts) {
            crate::trace!("validator {:?} failed at {}", validator, path);
            return Err(CodecError::new(ErrorCode::SchemaValidationError, offset)
                .with_path(path.clone()));
        }
    }
    Ok(())
}

/// Produces the [`ValidationFacts`] a value exposes about itself, so
/// [`check_validators`] doesn't need to match on `Category` by hand for
/// every caller.
pub trait Validatable {
    /// This value's facts, for whichever validators apply to its category.
    fn facts(&self) -> ValidationFacts<'_>;
}

macro_rules! impl_validatable_number {
    ($($ty:ty),*) => {
        $(impl Validatable for $ty {
            fn facts(&self) -> ValidationFacts<'_> {
                ValidationFacts::number(*self as f64)
            }
        })*
    };
}
impl_validatable_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);

#[cfg(feature = "alloc")]
impl Validatable for alloc::string::String {
    fn facts(&self) -> ValidationFacts<'_> {
        ValidationFacts::string(self.as_str())
    }
}

impl Validatable for str {
    fn facts(&self) -> ValidationFacts<'_> {
        ValidationFacts::string(self)
    }
}

#[cfg(feature = "alloc")]
impl<T> Validatable for alloc::vec::Vec<T> {
    fn facts(&self) -> ValidationFacts<'_> {
        ValidationFacts::count(self.len())
    }
}

impl<T, const N: usize> Validatable for [T; N] {
    fn facts(&self) -> ValidationFacts<'_> {
        ValidationFacts::count(N)
    }
}

/// `max-properties`/`max-key-length` validation for a string-keyed map. Integer-keyed maps have no well-defined "key length"
/// on every wire format and aren't covered here; `max-properties` alone on
/// an integer-keyed map can still be checked by validating the plain
/// element count the way a `Sequence` would be.
#[cfg(feature = "alloc")]
impl<V> Validatable for alloc::collections::BTreeMap<alloc::string::String, V> {
    fn facts(&self) -> ValidationFacts<'_> {
        let key_lengths = self.keys().map(|k| k.len()).collect();
        ValidationFacts::map(self.len(), key_lengths)
    }
}

impl<V, M> Schema for Annotated<V, M>
where
    V: Schema + Validatable,
    M: ValidatorSet,
{
    const CATEGORY: Category = Category::Annotated;

    fn read_from(reader: &mut dyn Reader, path: &mut JsonPath) -> CodecResult<Self> {
        let value = V::read_from(reader, path)?;
        check_validators(&value, M::VALIDATORS, path, reader.offset())?;
        Ok(Annotated::new(value))
    }

    fn write_to(&self, writer: &mut dyn Writer, path: &mut JsonPath) -> CodecResult<()> {
        self.value.write_to(writer, path)
    }
}
