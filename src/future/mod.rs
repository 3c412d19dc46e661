//! The future capability contract and its backends.
//!
//! [`OpFuture`] is the full operation set every backend implements. Call
//! sites dispatch through the trait object rather than caring which backend
//! they hold:
//!
//! - [`LocalFuture`]: in-process backend; the only one capable of blocking
//!   `wait` and of accepting `complete`
//! - [`ProxyFuture`]: forwards each call as a synchronous round trip to a
//!   remote authority; operations needing producer-side state report
//!   `NotImplemented`
//!
//! Lifetime is shared ownership: a [`FutureRef`] is an `Arc`, cloned by a
//! producer, any number of waiters, and a handle simultaneously. The backing
//! object is freed exactly once, when the last clone drops, never while a
//! reference is still held.

use crate::error::Result;
use crate::types::{FutureOutcome, FutureState};
use core::fmt;
use std::sync::Arc;
use std::time::Duration;

pub mod local;
pub mod proxy;

pub use local::LocalFuture;
pub use proxy::ProxyFuture;

/// Shared reference to a future backend.
pub type FutureRef = Arc<dyn OpFuture>;

/// The capability contract of an asynchronous-operation future.
///
/// All operations are safe to call concurrently from independent callers.
pub trait OpFuture: Send + Sync + fmt::Debug {
    /// Returns the current state. Never blocks.
    fn state(&self) -> Result<FutureState>;

    /// Returns the stored outcome.
    ///
    /// Fails with `ResultNotReady` while the future is pending. Never
    /// returns a partially-written value: this call synchronizes with the
    /// completing writer.
    fn result(&self) -> Result<FutureOutcome>;

    /// Requests cancellation. Idempotent.
    ///
    /// A pending future transitions atomically to cancelled and all blocked
    /// waiters are woken; an already-terminal future is left untouched and
    /// the call still succeeds; cancel never reports "too late".
    fn cancel(&self) -> Result<()>;

    /// Blocks until the future is terminal or the timeout elapses.
    ///
    /// `None` waits unboundedly. Returns `Timeout` if the future is still
    /// pending when the deadline passes; otherwise the terminal status,
    /// propagating cancellation as `Cancelled`. Only the in-process backend
    /// supports blocking; the proxy rejects with `NotImplemented`.
    fn wait(&self, timeout: Option<Duration>) -> Result<()>;

    /// Returns true if cancellation has been requested.
    ///
    /// Intended for a producer to poll cooperatively while doing work; the
    /// proxy is never the producer and reports `NotImplemented`.
    fn is_cancel_requested(&self) -> Result<bool>;

    /// Stores the outcome and transitions to ready. Producer-only.
    ///
    /// Fails with `AlreadyComplete` on a ready future and `Cancelled` on a
    /// cancelled one; the loser of a complete/cancel race never overwrites
    /// the winner's outcome.
    fn complete(&self, outcome: FutureOutcome) -> Result<()>;

    /// Quiesces the future ahead of teardown. Never fails.
    ///
    /// Forces the future terminal (via cancel) and grants any in-flight
    /// completer a bounded grace period, so no thread is left racing the
    /// teardown. Memory itself is released when the last [`FutureRef`]
    /// drops.
    fn destroy(&self);
}
