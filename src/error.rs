//! Error types and status codes for future operations.
//!
//! Error handling follows these principles:
//!
//! - Errors are explicit and typed (no stringly-typed errors)
//! - Local contract violations (wrong state for the requested operation,
//!   malformed argument) are detected synchronously and returned, never left
//!   to corrupt state
//! - Remote status codes propagate verbatim; an unknown code maps to
//!   [`ErrorKind::Unrecognized`] rather than being masked
//! - Teardown never fails: errors met while destroying are logged and
//!   swallowed by the destroy path itself
//!
//! Each [`ErrorKind`] has a stable non-zero `u32` code shared with the proxy
//! wire protocol; code `0` is reserved for success and is not an error kind.

use core::fmt;
use std::sync::Arc;

/// The kind of error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or rejected argument.
    InvalidArgument,
    /// The result was requested while the future is still pending.
    ResultNotReady,
    /// `complete` was called on an already-ready future.
    AlreadyComplete,
    /// The operation was cancelled.
    Cancelled,
    /// A wait deadline elapsed while the future was still pending.
    Timeout,
    /// The operation is not supported by this backend.
    NotImplemented,
    /// The transport to the remote authority failed.
    Transport,
    /// The transport to the remote authority is closed.
    TransportClosed,
    /// The remote peer violated the wire protocol.
    Protocol,
    /// A handle was consumed before its future reached a terminal state.
    FuturePending,
    /// The handle is stale, revoked, or was never issued.
    InvalidHandle,
    /// A remote status code outside the known code space.
    Unrecognized,
    /// Internal invariant violation (bug).
    Internal,
}

impl ErrorKind {
    /// Returns the stable wire code for this kind.
    ///
    /// Code `0` means success and never maps to an error kind.
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::InvalidArgument => 1,
            Self::ResultNotReady => 2,
            Self::AlreadyComplete => 3,
            Self::Cancelled => 4,
            Self::Timeout => 5,
            Self::NotImplemented => 6,
            Self::Transport => 7,
            Self::TransportClosed => 8,
            Self::Protocol => 9,
            Self::FuturePending => 10,
            Self::InvalidHandle => 11,
            Self::Unrecognized => 12,
            Self::Internal => 13,
        }
    }

    /// Decodes a non-zero status code back into a kind.
    ///
    /// Unknown codes decode to [`ErrorKind::Unrecognized`] so a newer remote
    /// peer's errors still surface instead of being dropped.
    #[must_use]
    pub const fn from_code(code: u32) -> Self {
        match code {
            1 => Self::InvalidArgument,
            2 => Self::ResultNotReady,
            3 => Self::AlreadyComplete,
            4 => Self::Cancelled,
            5 => Self::Timeout,
            6 => Self::NotImplemented,
            7 => Self::Transport,
            8 => Self::TransportClosed,
            9 => Self::Protocol,
            10 => Self::FuturePending,
            11 => Self::InvalidHandle,
            13 => Self::Internal,
            _ => Self::Unrecognized,
        }
    }

    /// Returns the error category for this kind.
    #[must_use]
    pub const fn category(self) -> ErrorCategory {
        match self {
            Self::InvalidArgument => ErrorCategory::Argument,
            Self::ResultNotReady | Self::AlreadyComplete | Self::Cancelled | Self::Timeout => {
                ErrorCategory::State
            }
            Self::NotImplemented => ErrorCategory::Backend,
            Self::Transport | Self::TransportClosed | Self::Protocol | Self::Unrecognized => {
                ErrorCategory::Transport
            }
            Self::FuturePending | Self::InvalidHandle => ErrorCategory::Handle,
            Self::Internal => ErrorCategory::Internal,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::ResultNotReady => write!(f, "result not ready"),
            Self::AlreadyComplete => write!(f, "already complete"),
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::Timeout => write!(f, "timeout"),
            Self::NotImplemented => write!(f, "not implemented"),
            Self::Transport => write!(f, "transport failure"),
            Self::TransportClosed => write!(f, "transport closed"),
            Self::Protocol => write!(f, "protocol violation"),
            Self::FuturePending => write!(f, "future pending"),
            Self::InvalidHandle => write!(f, "invalid handle"),
            Self::Unrecognized => write!(f, "unrecognized status code"),
            Self::Internal => write!(f, "internal error"),
        }
    }
}

/// High-level error category for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Malformed arguments.
    Argument,
    /// Wrong future state for the requested operation.
    State,
    /// Operation unsupported by the backend.
    Backend,
    /// Transport and remote-peer failures.
    Transport,
    /// Handle lifecycle failures.
    Handle,
    /// Internal invariant violations.
    Internal,
}

/// The main error type for future operations.
#[derive(Debug, Clone)]
pub struct Error {
    kind: ErrorKind,
    message: Option<String>,
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            source: None,
        }
    }

    /// Returns the error kind.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns true if this error represents cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self.kind, ErrorKind::Cancelled)
    }

    /// Returns true if this error is a wait timeout.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self.kind, ErrorKind::Timeout)
    }

    /// Returns true if this error originated in the transport layer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self.kind.category(), ErrorCategory::Transport)
    }

    /// Adds a message description to the error.
    #[must_use]
    pub fn with_message(mut self, msg: impl Into<String>) -> Self {
        self.message = Some(msg.into());
        self
    }

    /// Adds a source error to the chain.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(msg) = &self.message {
            write!(f, ": {msg}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Result alias for future operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip() {
        let kinds = [
            ErrorKind::InvalidArgument,
            ErrorKind::ResultNotReady,
            ErrorKind::AlreadyComplete,
            ErrorKind::Cancelled,
            ErrorKind::Timeout,
            ErrorKind::NotImplemented,
            ErrorKind::Transport,
            ErrorKind::TransportClosed,
            ErrorKind::Protocol,
            ErrorKind::FuturePending,
            ErrorKind::InvalidHandle,
            ErrorKind::Internal,
        ];
        for kind in kinds {
            assert_eq!(ErrorKind::from_code(kind.code()), kind);
        }
    }

    #[test]
    fn zero_is_not_an_error_code() {
        // 0 is the success status on the wire; decoding it as an error kind
        // falls through to Unrecognized.
        assert_eq!(ErrorKind::from_code(0), ErrorKind::Unrecognized);
    }

    #[test]
    fn unknown_codes_decode_to_unrecognized() {
        assert_eq!(ErrorKind::from_code(0xDEAD), ErrorKind::Unrecognized);
    }

    #[test]
    fn display_includes_message() {
        let err = Error::new(ErrorKind::Timeout).with_message("wait expired");
        assert_eq!(format!("{err}"), "timeout: wait expired");
    }

    #[test]
    fn source_chain_is_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let err = Error::new(ErrorKind::Transport).with_source(io);
        assert!(std::error::Error::source(&err).is_some());
    }
}
