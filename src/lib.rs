//! Opfuture: cross-process asynchronous-operation futures.
//!
//! # Overview
//!
//! A future here is a handle onto a long-running operation executed
//! elsewhere: a background worker thread in the same process, or a
//! cooperating remote process reached over a message channel. The future
//! does not run work; it reports on and coordinates the completion of work
//! run elsewhere. Clients track, wait on, poll, and cancel the operation;
//! producers complete it with an outcome.
//!
//! # Core Guarantees
//!
//! - **Race-free terminal transitions**: `cancel` and `complete` race for the
//!   single transition out of `Pending`; exactly one wins, the loser observes
//!   an already-terminal state and gets its documented error
//! - **No torn outcomes**: a reader observing a terminal state also observes
//!   a fully-written outcome
//! - **Bounded-safe teardown**: destroying a future first forces it terminal
//!   and grants in-flight completers a bounded grace period, so no thread is
//!   left blocked on torn-down synchronization state
//! - **Faithful remote errors**: the proxy backend propagates remote status
//!   codes verbatim and keeps transport failures distinct from protocol-level
//!   errors
//!
//! # Module Structure
//!
//! - [`types`]: Core value, state, and outcome types
//! - [`future`]: The [`OpFuture`] contract and its two backends
//! - [`wire`]: Request/response framing for the proxy protocol
//! - [`transport`]: The message-channel boundary and a deterministic mock
//! - [`handle`]: Ownership-tree handle layer over a future reference
//! - [`config`]: Environment-driven configuration and log verbosity
//! - [`error`]: Error types
//! - [`util`]: Internal utilities (generation-checked slot arena)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod future;
pub mod handle;
pub mod test_utils;
pub mod transport;
pub mod types;
pub mod util;
pub mod wire;

// Re-exports for convenient access to core types
pub use error::{Error, ErrorKind, Result};
pub use future::{FutureRef, LocalFuture, OpFuture, ProxyFuture};
pub use handle::{FutureTable, HandleId, PollState, ResourceId};
pub use types::{FutureOutcome, FutureState, FutureValue};
pub use wire::FutureId;
