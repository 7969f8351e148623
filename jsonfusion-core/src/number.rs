//! Numeric storage types and the decoded wire value they're read from.

use crate::error::{CodecError, ErrorCode};

/// Every numeric storage type the codec can fill: integral, signed or
/// unsigned, 8 through 64 bits wide, or floating, single or double
/// precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    /// `i8`
    I8,
    /// `i16`
    I16,
    /// `i32`
    I32,
    /// `i64`
    I64,
    /// `u8`
    U8,
    /// `u16`
    U16,
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `f32`
    F32,
    /// `f64`
    F64,
}

impl NumberKind {
    /// Name used in error messages and generated field tables.
    pub const fn name(&self) -> &'static str {
        match self {
            NumberKind::I8 => "i8",
            NumberKind::I16 => "i16",
            NumberKind::I32 => "i32",
            NumberKind::I64 => "i64",
            NumberKind::U8 => "u8",
            NumberKind::U16 => "u16",
            NumberKind::U32 => "u32",
            NumberKind::U64 => "u64",
            NumberKind::F32 => "f32",
            NumberKind::F64 => "f64",
        }
    }

    /// True for the floating-point kinds.
    pub const fn is_float(&self) -> bool {
        matches!(self, NumberKind::F32 | NumberKind::F64)
    }
}

/// A number as decoded off the wire, before it's narrowed to a specific
/// storage type. Readers produce this; [`Number::into_kind`] (driven by the
/// dispatcher) narrows and range-checks it.
///
/// Keeping `Int`/`UInt`/`Float` distinct (rather than collapsing everything
/// into `f64`) is what lets CBOR round-trip a full `u64` and what lets the
/// JSON reader reject `5.0` into an integer field: integers reject
/// fractional/exponent forms outright rather than truncating them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// A negative integer, or a non-negative one that doesn't fit `u64`'s sibling `Int` path.
    Int(i64),
    /// A non-negative integer, including values beyond `i64::MAX`.
    UInt(u64),
    /// A value that had a decimal point or exponent on the wire.
    Float(f64),
}

impl Number {
    /// Narrow this wire value into the requested storage kind, range-checking
    /// against the storage type and reporting `numeric-out-of-range` on
    /// overflow.
    pub fn into_kind(self, kind: NumberKind, offset: usize) -> Result<Number, CodecError> {
        let out_of_range = || CodecError::new(ErrorCode::NumericOutOfRange, offset);
        let float_in_int = || CodecError::new(ErrorCode::FloatInIntegerStorage, offset);

        if kind.is_float() {
            let v = match self {
                Number::Int(i) => i as f64,
                Number::UInt(u) => u as f64,
                Number::Float(f) => f,
            };
            if kind == NumberKind::F32 {
                let narrowed = v as f32;
                if !narrowed.is_finite() && v.is_finite() {
                    return Err(out_of_range());
                }
                return Ok(Number::Float(narrowed as f64));
            }
            return Ok(Number::Float(v));
        }

        // Integer target: a Float source is always rejected, matching the
        // original implementation's "integers reject fractional/exponent forms".
        match self {
            Number::Float(_) => Err(float_in_int()),
            Number::Int(i) => Self::check_signed_range(i, kind).ok_or_else(out_of_range),
            Number::UInt(u) => {
                if u <= i64::MAX as u64 {
                    Self::check_signed_range(u as i64, kind).ok_or_else(out_of_range)
                } else {
                    Self::check_unsigned_range(u, kind).ok_or_else(out_of_range)
                }
            }
        }
    }

    fn check_signed_range(i: i64, kind: NumberKind) -> Option<Number> {
        match kind {
            NumberKind::I8 => (i8::try_from(i).is_ok()).then_some(Number::Int(i)),
            NumberKind::I16 => (i16::try_from(i).is_ok()).then_some(Number::Int(i)),
            NumberKind::I32 => (i32::try_from(i).is_ok()).then_some(Number::Int(i)),
            NumberKind::I64 => Some(Number::Int(i)),
            NumberKind::U8 => u8::try_from(i).ok().map(|v| Number::UInt(v as u64)),
            NumberKind::U16 => u16::try_from(i).ok().map(|v| Number::UInt(v as u64)),
            NumberKind::U32 => u32::try_from(i).ok().map(|v| Number::UInt(v as u64)),
            NumberKind::U64 => u64::try_from(i).ok().map(Number::UInt),
            NumberKind::F32 | NumberKind::F64 => unreachable!("float kinds handled separately"),
        }
    }

    fn check_unsigned_range(u: u64, kind: NumberKind) -> Option<Number> {
        match kind {
            NumberKind::U8 => u8::try_from(u).ok().map(|v| Number::UInt(v as u64)),
            NumberKind::U16 => u16::try_from(u).ok().map(|v| Number::UInt(v as u64)),
            NumberKind::U32 => u32::try_from(u).ok().map(|v| Number::UInt(v as u64)),
            NumberKind::U64 => Some(Number::UInt(u)),
            // u64 values above i64::MAX never fit any signed kind.
            NumberKind::I8 | NumberKind::I16 | NumberKind::I32 | NumberKind::I64 => None,
            NumberKind::F32 | NumberKind::F64 => unreachable!("float kinds handled separately"),
        }
    }

    /// Extract as `f64`, for writers and validators that only care about magnitude.
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(i) => *i as f64,
            Number::UInt(u) => *u as f64,
            Number::Float(f) => *f,
        }
    }

    /// Extract the exact integer value after [`Number::into_kind`] has
    /// narrowed into a signed kind (`Int`, possibly holding a value that
    /// started life as a small `UInt`).
    pub fn exact_i64(&self) -> i64 {
        match self {
            Number::Int(i) => *i,
            Number::UInt(u) => *u as i64,
            Number::Float(f) => *f as i64,
        }
    }

    /// Extract the exact integer value after [`Number::into_kind`] has
    /// narrowed into an unsigned kind.
    pub fn exact_u64(&self) -> u64 {
        match self {
            Number::UInt(u) => *u,
            Number::Int(i) => *i as u64,
            Number::Float(f) => *f as u64,
        }
    }
}

macro_rules! impl_number_round_trip {
    ($ty:ty, $kind:expr, $ctor:ident) => {
        impl From<$ty> for Number {
            fn from(v: $ty) -> Number {
                Number::$ctor(v as _)
            }
        }
    };
}

impl_number_round_trip!(i8, NumberKind::I8, Int);
impl_number_round_trip!(i16, NumberKind::I16, Int);
impl_number_round_trip!(i32, NumberKind::I32, Int);
impl_number_round_trip!(i64, NumberKind::I64, Int);
impl_number_round_trip!(u8, NumberKind::U8, UInt);
impl_number_round_trip!(u16, NumberKind::U16, UInt);
impl_number_round_trip!(u32, NumberKind::U32, UInt);
impl_number_round_trip!(u64, NumberKind::U64, UInt);

impl From<f32> for Number {
    fn from(v: f32) -> Number {
        Number::Float(v as f64)
    }
}

impl From<f64> for Number {
    fn from(v: f64) -> Number {
        Number::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonfusion_testhelpers::test;

    #[test]
    fn narrows_within_range() {
        let n = Number::Int(42).into_kind(NumberKind::U8, 0).unwrap();
        assert_eq!(n, Number::UInt(42));
    }

    #[test]
    fn rejects_out_of_range() {
        let err = Number::Int(1000).into_kind(NumberKind::I8, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::NumericOutOfRange);
    }

    #[test]
    fn rejects_float_into_integer_storage() {
        let err = Number::Float(5.0).into_kind(NumberKind::I32, 0).unwrap_err();
        assert_eq!(err.code, ErrorCode::FloatInIntegerStorage);
    }

    #[test]
    fn accepts_u64_beyond_i64_max() {
        let n = Number::UInt(u64::MAX).into_kind(NumberKind::U64, 0).unwrap();
        assert_eq!(n, Number::UInt(u64::MAX));
    }

    #[test]
    fn rejects_large_uint_into_signed() {
        let err = Number::UInt(u64::MAX)
            .into_kind(NumberKind::I64, 0)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NumericOutOfRange);
    }
}
