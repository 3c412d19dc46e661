//! Request/response framing for the proxy protocol.
//!
//! Each forwarded future operation is one synchronous round trip:
//!
//! - request: `future_id: u32 LE`, `op_code: u8` (5 bytes)
//! - response: `status_code: u32 LE`, then a payload determined by the
//!   request's opcode: a 1-byte state code for `GetState`, a 13-byte
//!   outcome (`status_code: u32 LE`, `value_tag: u8`, `value_bits: [u8; 8]
//!   LE`) for `GetResult`, and nothing for `Cancel`/`Release`
//!
//! A non-success response carries no payload: the status code is the whole
//! answer. Decoding is checked end to end; truncated frames, trailing
//! bytes, and unknown codes are typed errors, never panics or silent
//! truncation.

use crate::error::{Error, ErrorKind, Result};
use crate::types::{FutureOutcome, FutureState, FutureValue};
use core::fmt;
use thiserror::Error as ThisError;

/// Identifier of a future hosted by a remote authority.
///
/// Assigned by that authority and never reused or synthesized locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FutureId(u32);

impl FutureId {
    /// Creates a future ID from the raw value assigned by the authority.
    #[must_use]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw numeric identifier.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FutureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F{}", self.0)
    }
}

/// Operation selector for a forwarded future call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    /// Query the current state.
    GetState = 1,
    /// Fetch the stored outcome.
    GetResult = 2,
    /// Request cancellation.
    Cancel = 3,
    /// Release the caller's reference to the remote future.
    Release = 4,
}

impl OpCode {
    /// Decodes a wire opcode byte.
    #[must_use]
    pub const fn from_u8(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::GetState),
            2 => Some(Self::GetResult),
            3 => Some(Self::Cancel),
            4 => Some(Self::Release),
            _ => None,
        }
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GetState => write!(f, "get-state"),
            Self::GetResult => write!(f, "get-result"),
            Self::Cancel => write!(f, "cancel"),
            Self::Release => write!(f, "release"),
        }
    }
}

/// Errors produced while decoding a wire frame.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum DecodeError {
    /// The frame ended before the expected length.
    #[error("truncated frame: expected {expected} bytes, got {actual}")]
    Truncated {
        /// Bytes required by the frame layout.
        expected: usize,
        /// Bytes actually present.
        actual: usize,
    },

    /// The frame carried bytes past the end of its layout.
    #[error("{count} trailing bytes after frame")]
    TrailingBytes {
        /// Number of unexpected bytes.
        count: usize,
    },

    /// Unknown operation code.
    #[error("unknown opcode {0:#04x}")]
    UnknownOpCode(u8),

    /// Unknown future state code.
    #[error("unknown state code {0:#04x}")]
    UnknownStateCode(u8),

    /// Unknown value tag.
    #[error("unknown value tag {0:#04x}")]
    UnknownValueTag(u8),
}

impl From<DecodeError> for Error {
    fn from(err: DecodeError) -> Self {
        Self::new(ErrorKind::Protocol)
            .with_message(err.to_string())
            .with_source(err)
    }
}

/// A forwarded future operation, keyed by the remote id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    /// The remote future the operation targets.
    pub future_id: FutureId,
    /// The operation to perform.
    pub op: OpCode,
}

impl Request {
    /// Frame length of an encoded request.
    pub const ENCODED_LEN: usize = 5;

    /// Creates a request.
    #[must_use]
    pub const fn new(future_id: FutureId, op: OpCode) -> Self {
        Self { future_id, op }
    }

    /// Encodes the request into its 5-byte frame.
    #[must_use]
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let id = self.future_id.raw().to_le_bytes();
        [id[0], id[1], id[2], id[3], self.op as u8]
    }

    /// Decodes a request frame.
    pub fn decode(bytes: &[u8]) -> std::result::Result<Self, DecodeError> {
        if bytes.len() < Self::ENCODED_LEN {
            return Err(DecodeError::Truncated {
                expected: Self::ENCODED_LEN,
                actual: bytes.len(),
            });
        }
        if bytes.len() > Self::ENCODED_LEN {
            return Err(DecodeError::TrailingBytes {
                count: bytes.len() - Self::ENCODED_LEN,
            });
        }
        let id = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let op = OpCode::from_u8(bytes[4]).ok_or(DecodeError::UnknownOpCode(bytes[4]))?;
        Ok(Self::new(FutureId::from_raw(id), op))
    }
}

/// Payload of a response frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePayload {
    /// No payload (cancel/release acknowledgements and all error responses).
    Empty,
    /// Current state of the remote future.
    State(FutureState),
    /// Stored outcome of the remote future.
    Outcome(FutureOutcome),
}

/// Response to a forwarded future operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    /// Status of the call itself (`0` = success).
    pub status: u32,
    /// Payload, present only on success.
    pub payload: ResponsePayload,
}

impl Response {
    /// Creates a successful state response.
    #[must_use]
    pub const fn ok_state(state: FutureState) -> Self {
        Self {
            status: 0,
            payload: ResponsePayload::State(state),
        }
    }

    /// Creates a successful outcome response.
    #[must_use]
    pub const fn ok_outcome(outcome: FutureOutcome) -> Self {
        Self {
            status: 0,
            payload: ResponsePayload::Outcome(outcome),
        }
    }

    /// Creates a bare acknowledgement.
    #[must_use]
    pub const fn ack() -> Self {
        Self {
            status: 0,
            payload: ResponsePayload::Empty,
        }
    }

    /// Creates an error response carrying the given status.
    #[must_use]
    pub const fn error(kind: ErrorKind) -> Self {
        Self {
            status: kind.code(),
            payload: ResponsePayload::Empty,
        }
    }

    /// Encodes the response into a frame.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(17);
        out.extend_from_slice(&self.status.to_le_bytes());
        match self.payload {
            ResponsePayload::Empty => {}
            ResponsePayload::State(state) => out.push(state.code()),
            ResponsePayload::Outcome(outcome) => {
                out.extend_from_slice(&outcome.status_code().to_le_bytes());
                let value = outcome.value();
                out.push(value.tag() as u8);
                out.extend_from_slice(&value.to_bits());
            }
        }
        out
    }

    /// Decodes a response frame.
    ///
    /// The payload layout depends on the opcode of the request this frame
    /// answers, so the decoder takes that opcode as context.
    pub fn decode(bytes: &[u8], op: OpCode) -> std::result::Result<Self, DecodeError> {
        if bytes.len() < 4 {
            return Err(DecodeError::Truncated {
                expected: 4,
                actual: bytes.len(),
            });
        }
        let status = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let rest = &bytes[4..];

        // Error responses carry no payload regardless of opcode.
        if status != 0 {
            return if rest.is_empty() {
                Ok(Self {
                    status,
                    payload: ResponsePayload::Empty,
                })
            } else {
                Err(DecodeError::TrailingBytes { count: rest.len() })
            };
        }

        let (payload, expected) = match op {
            OpCode::Cancel | OpCode::Release => (ResponsePayload::Empty, 0),
            OpCode::GetState => {
                if rest.is_empty() {
                    return Err(DecodeError::Truncated {
                        expected: 5,
                        actual: bytes.len(),
                    });
                }
                let state = FutureState::from_code(rest[0])
                    .ok_or(DecodeError::UnknownStateCode(rest[0]))?;
                (ResponsePayload::State(state), 1)
            }
            OpCode::GetResult => {
                if rest.len() < 13 {
                    return Err(DecodeError::Truncated {
                        expected: 17,
                        actual: bytes.len(),
                    });
                }
                let status_code = u32::from_le_bytes([rest[0], rest[1], rest[2], rest[3]]);
                let tag = rest[4];
                let mut bits = [0u8; 8];
                bits.copy_from_slice(&rest[5..13]);
                let value =
                    FutureValue::from_parts(tag, bits).ok_or(DecodeError::UnknownValueTag(tag))?;
                (
                    ResponsePayload::Outcome(FutureOutcome::from_status(status_code, value)),
                    13,
                )
            }
        };

        if rest.len() > expected {
            return Err(DecodeError::TrailingBytes {
                count: rest.len() - expected,
            });
        }
        Ok(Self { status, payload })
    }
}

/// Maps a wire status code onto a local result.
///
/// `0` is success; any other code becomes the corresponding error, with
/// unknown codes surfacing as [`ErrorKind::Unrecognized`] so remote errors
/// propagate verbatim rather than being masked.
pub fn status_to_result(status: u32) -> Result<()> {
    if status == 0 {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::from_code(status))
            .with_message(format!("remote status code {status}")))
    }
}
