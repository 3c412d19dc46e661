//! Deterministic in-memory channel for exercising the proxy without real
//! I/O.
//!
//! The mock records every delivered request and replays responses from a
//! script queue, so tests can assert exactly which round trips happened and
//! drive every error path, including a channel that closes mid-session.

use crate::transport::{ChannelError, MessageChannel};
use crate::wire::{Request, Response};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};

/// A scriptable, recording message channel.
#[derive(Debug, Default)]
pub struct MockChannel {
    requests: Mutex<Vec<Request>>,
    replies: Mutex<VecDeque<Response>>,
    closed: AtomicBool,
}

impl MockChannel {
    /// Creates an open channel with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response for the next `call`.
    pub fn queue_response(&self, response: Response) {
        self.replies.lock().push_back(response);
    }

    /// Marks the channel closed; subsequent operations fail with
    /// [`ChannelError::Closed`].
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Returns true once [`close`](Self::close) has been called.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Returns every request delivered so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    /// Returns how many requests were delivered.
    #[must_use]
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl MessageChannel for MockChannel {
    fn call(&self, request: Request) -> Result<Response, ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        self.requests.lock().push(request);
        self.replies.lock().pop_front().ok_or_else(|| {
            ChannelError::Protocol {
                details: format!("no scripted response for {} {}", request.future_id, request.op),
            }
        })
    }

    fn notify(&self, request: Request) -> Result<(), ChannelError> {
        if self.is_closed() {
            return Err(ChannelError::Closed);
        }
        self.requests.lock().push(request);
        Ok(())
    }
}
