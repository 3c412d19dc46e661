//! The message-channel boundary used by the proxy backend.
//!
//! The channel itself is an external collaborator; this module only fixes
//! the contract the proxy depends on: one synchronous round trip per
//! forwarded operation, plus a fire-and-forget notification form used by
//! release messages. Transport failures are never silently retried; they
//! surface distinctly so the caller decides whether to retry.

use crate::wire::{Request, Response};
use core::fmt;

pub mod error;
pub mod mock;

pub use error::ChannelError;
pub use mock::MockChannel;

/// A synchronous request/response channel to a remote authority.
///
/// `call` blocks the calling thread for the duration of the round trip;
/// cancelling an in-flight round trip is not supported. Implementations must
/// be safe to share across threads.
pub trait MessageChannel: Send + Sync + fmt::Debug {
    /// Performs one synchronous round trip.
    fn call(&self, request: Request) -> Result<Response, ChannelError>;

    /// Delivers a request without waiting for a payload-bearing reply.
    ///
    /// Used for best-effort notifications such as release messages.
    fn notify(&self, request: Request) -> Result<(), ChannelError> {
        self.call(request).map(|_| ())
    }
}
