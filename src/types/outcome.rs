//! Completion outcome of a future.
//!
//! The outcome is what `complete` stores and `result` returns once the
//! future is terminal. A value is carried only by a successful outcome; a
//! failed or cancelled future always reports a none value, never a stale or
//! partially-written one.

use crate::error::{Error, ErrorKind, Result};
use crate::types::value::FutureValue;
use core::fmt;

/// The outcome of a completed or cancelled future.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FutureOutcome {
    /// The operation succeeded, possibly carrying a value.
    Success(FutureValue),
    /// The operation ran to completion but reported a failure.
    Failed(ErrorKind),
    /// The operation was cancelled before completing.
    Cancelled,
}

impl FutureOutcome {
    /// Creates a successful outcome carrying the given value.
    #[must_use]
    pub const fn success(value: FutureValue) -> Self {
        Self::Success(value)
    }

    /// Creates a failed outcome with the given status.
    #[must_use]
    pub const fn failed(kind: ErrorKind) -> Self {
        Self::Failed(kind)
    }

    /// Returns true if this outcome is a success.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true if this outcome records a cancellation.
    #[must_use]
    pub const fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Returns the status code of this outcome (`0` for success).
    #[must_use]
    pub const fn status_code(self) -> u32 {
        match self {
            Self::Success(_) => 0,
            Self::Failed(kind) => kind.code(),
            Self::Cancelled => ErrorKind::Cancelled.code(),
        }
    }

    /// Returns the carried value; none unless the outcome is a success.
    #[must_use]
    pub const fn value(self) -> FutureValue {
        match self {
            Self::Success(value) => value,
            Self::Failed(_) | Self::Cancelled => FutureValue::None,
        }
    }

    /// Rebuilds an outcome from a wire status code and value.
    ///
    /// The value is honored only for a success status; a failure or
    /// cancellation status always yields a none value regardless of what the
    /// peer sent.
    #[must_use]
    pub const fn from_status(status: u32, value: FutureValue) -> Self {
        if status == 0 {
            return Self::Success(value);
        }
        match ErrorKind::from_code(status) {
            ErrorKind::Cancelled => Self::Cancelled,
            kind => Self::Failed(kind),
        }
    }

    /// Converts this outcome into a `Result` over the carried value.
    pub fn into_result(self) -> Result<FutureValue> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Failed(kind) => Err(Error::new(kind)),
            Self::Cancelled => Err(Error::new(ErrorKind::Cancelled)),
        }
    }
}

impl fmt::Display for FutureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success(value) => write!(f, "success({value})"),
            Self::Failed(kind) => write!(f, "failed({kind})"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_none_unless_success() {
        assert_eq!(
            FutureOutcome::success(FutureValue::Uint64(9)).value(),
            FutureValue::Uint64(9)
        );
        assert_eq!(
            FutureOutcome::failed(ErrorKind::Internal).value(),
            FutureValue::None
        );
        assert_eq!(FutureOutcome::Cancelled.value(), FutureValue::None);
    }

    #[test]
    fn status_codes() {
        assert_eq!(FutureOutcome::success(FutureValue::None).status_code(), 0);
        assert_eq!(
            FutureOutcome::Cancelled.status_code(),
            ErrorKind::Cancelled.code()
        );
    }

    #[test]
    fn from_status_discards_value_on_failure() {
        let outcome =
            FutureOutcome::from_status(ErrorKind::Internal.code(), FutureValue::Uint64(1));
        assert_eq!(outcome, FutureOutcome::Failed(ErrorKind::Internal));
        assert_eq!(outcome.value(), FutureValue::None);
    }

    #[test]
    fn from_status_maps_cancellation() {
        let outcome = FutureOutcome::from_status(ErrorKind::Cancelled.code(), FutureValue::None);
        assert!(outcome.is_cancelled());
    }

    #[test]
    fn into_result_propagates_status() {
        assert!(FutureOutcome::success(FutureValue::None).into_result().is_ok());
        let err = FutureOutcome::Cancelled.into_result().unwrap_err();
        assert!(err.is_cancelled());
    }
}
