//! The future state machine.

use core::fmt;

/// The observable state of a future.
///
/// `Pending` is the initial state. `Ready` and `Cancelled` are terminal:
/// once entered, no field governing state or outcome changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FutureState {
    /// The operation has not yet completed or been cancelled.
    Pending = 0,
    /// The operation completed; an outcome is available.
    Ready = 1,
    /// The operation was cancelled before completing.
    Cancelled = 2,
}

impl FutureState {
    /// Returns true for `Ready` and `Cancelled`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Returns the stable wire code for this state.
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a wire state code.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Pending),
            1 => Some(Self::Ready),
            2 => Some(Self::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for FutureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Ready => write!(f, "ready"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}
