//! Result value carried by a completed future.
//!
//! A future's outcome carries at most one scalar from a small closed set.
//! The set is extended by adding variants, never by changing the meaning of
//! an existing variant, so tags stay stable across the wire.

use core::fmt;

/// Wire tag identifying the variant of a [`FutureValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ValueTag {
    /// No value.
    None = 0,
    /// Unsigned 64-bit integer.
    Uint64 = 1,
    /// Signed 64-bit integer.
    Int64 = 2,
}

impl ValueTag {
    /// Decodes a wire tag byte.
    #[must_use]
    pub const fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::None),
            1 => Some(Self::Uint64),
            2 => Some(Self::Int64),
            _ => None,
        }
    }
}

/// The scalar payload of a future's outcome.
///
/// Fixed-size inline storage, copy semantics, no heap allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FutureValue {
    /// No value; the "none" sentinel.
    #[default]
    None,
    /// Unsigned 64-bit integer.
    Uint64(u64),
    /// Signed 64-bit integer.
    Int64(i64),
}

impl FutureValue {
    /// Returns true if this value carries a payload.
    #[must_use]
    pub const fn is_some(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Returns the wire tag for this value.
    #[must_use]
    pub const fn tag(self) -> ValueTag {
        match self {
            Self::None => ValueTag::None,
            Self::Uint64(_) => ValueTag::Uint64,
            Self::Int64(_) => ValueTag::Int64,
        }
    }

    /// Returns the unsigned payload, if that is what this value holds.
    #[must_use]
    pub const fn as_uint64(self) -> Option<u64> {
        match self {
            Self::Uint64(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the signed payload, if that is what this value holds.
    #[must_use]
    pub const fn as_int64(self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the payload as little-endian wire bits.
    ///
    /// `None` encodes as all-zero bits under tag 0.
    #[must_use]
    pub const fn to_bits(self) -> [u8; 8] {
        match self {
            Self::None => [0; 8],
            Self::Uint64(v) => v.to_le_bytes(),
            Self::Int64(v) => v.to_le_bytes(),
        }
    }

    /// Reassembles a value from a wire tag and little-endian bits.
    ///
    /// Returns `None` for an unknown tag; the caller decides how to surface
    /// the decode failure.
    #[must_use]
    pub const fn from_parts(tag: u8, bits: [u8; 8]) -> Option<Self> {
        match ValueTag::from_u8(tag) {
            Some(ValueTag::None) => Some(Self::None),
            Some(ValueTag::Uint64) => Some(Self::Uint64(u64::from_le_bytes(bits))),
            Some(ValueTag::Int64) => Some(Self::Int64(i64::from_le_bytes(bits))),
            None => None,
        }
    }
}

impl From<u64> for FutureValue {
    fn from(v: u64) -> Self {
        Self::Uint64(v)
    }
}

impl From<i64> for FutureValue {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl fmt::Display for FutureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Uint64(v) => write!(f, "u64:{v}"),
            Self::Int64(v) => write!(f, "i64:{v}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_invalid() {
        assert!(!FutureValue::None.is_some());
        assert!(FutureValue::Uint64(0).is_some());
        assert!(FutureValue::Int64(-1).is_some());
    }

    #[test]
    fn accessors_are_variant_checked() {
        let v = FutureValue::Uint64(42);
        assert_eq!(v.as_uint64(), Some(42));
        assert_eq!(v.as_int64(), None);
    }

    #[test]
    fn signed_values_survive_the_bit_cast() {
        let v = FutureValue::Int64(-7);
        let rebuilt = FutureValue::from_parts(v.tag() as u8, v.to_bits());
        assert_eq!(rebuilt, Some(v));
    }

    #[test]
    fn unknown_tag_is_rejected() {
        assert_eq!(FutureValue::from_parts(0xFF, [0; 8]), None);
    }
}
