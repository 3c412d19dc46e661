//! Remote proxy future backend.
//!
//! Makes a future hosted in a remote process observable and controllable
//! without replicating its state locally. The proxy carries no authoritative
//! state; all of it lives with the remote authority that assigned the
//! future id. Each supported operation is one synchronous round trip; remote
//! status codes propagate verbatim, and a broken or closed channel surfaces
//! as a transport error, distinct from any protocol-level error.
//!
//! `wait`, `is_cancel_requested`, and `complete` need producer-side state
//! that does not exist on the client and report `NotImplemented`. Clients
//! needing blocking behavior poll `state` with their own backoff policy.

use crate::error::{Error, ErrorKind, Result};
use crate::future::OpFuture;
use crate::transport::MessageChannel;
use crate::types::{FutureOutcome, FutureState};
use crate::wire::{status_to_result, FutureId, OpCode, Request, Response, ResponsePayload};
use std::sync::Arc;
use std::time::Duration;

/// Client-side proxy for a future owned by a remote authority.
#[derive(Debug)]
pub struct ProxyFuture {
    id: FutureId,
    channel: Arc<dyn MessageChannel>,
}

impl ProxyFuture {
    /// Binds a proxy to a server-assigned future id.
    #[must_use]
    pub fn new(channel: Arc<dyn MessageChannel>, id: FutureId) -> Self {
        tracing::trace!(%id, "proxy future bound");
        Self { id, channel }
    }

    /// Returns the remote future id this proxy is bound to.
    #[must_use]
    pub const fn id(&self) -> FutureId {
        self.id
    }

    fn round_trip(&self, op: OpCode) -> Result<Response> {
        let response = self
            .channel
            .call(Request::new(self.id, op))
            .map_err(Error::from)?;
        status_to_result(response.status)?;
        Ok(response)
    }

    fn unexpected_payload(&self, op: OpCode) -> Error {
        Error::new(ErrorKind::Protocol)
            .with_message(format!("wrong payload variant in {op} response for {}", self.id))
    }
}

impl OpFuture for ProxyFuture {
    fn state(&self) -> Result<FutureState> {
        let response = self.round_trip(OpCode::GetState)?;
        match response.payload {
            ResponsePayload::State(state) => Ok(state),
            ResponsePayload::Empty | ResponsePayload::Outcome(_) => {
                Err(self.unexpected_payload(OpCode::GetState))
            }
        }
    }

    fn result(&self) -> Result<FutureOutcome> {
        let response = self.round_trip(OpCode::GetResult)?;
        match response.payload {
            ResponsePayload::Outcome(outcome) => Ok(outcome),
            ResponsePayload::Empty | ResponsePayload::State(_) => {
                Err(self.unexpected_payload(OpCode::GetResult))
            }
        }
    }

    fn cancel(&self) -> Result<()> {
        self.round_trip(OpCode::Cancel).map(|_| ())
    }

    fn wait(&self, _timeout: Option<Duration>) -> Result<()> {
        Err(Error::new(ErrorKind::NotImplemented)
            .with_message("proxy futures cannot block; poll state instead"))
    }

    fn is_cancel_requested(&self) -> Result<bool> {
        Err(Error::new(ErrorKind::NotImplemented)
            .with_message("the proxy is never the producer"))
    }

    fn complete(&self, _outcome: FutureOutcome) -> Result<()> {
        Err(Error::new(ErrorKind::NotImplemented)
            .with_message("completion belongs to the remote authority"))
    }

    fn destroy(&self) {
        // Best effort: let the authority drop its reference. Delivery
        // failure is logged, never propagated; destroy must not fail.
        if let Err(err) = self.channel.notify(Request::new(self.id, OpCode::Release)) {
            tracing::warn!(id = %self.id, error = %err, "release notification failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockChannel;
    use crate::types::FutureValue;

    fn proxy_with_channel(id: u32) -> (ProxyFuture, Arc<MockChannel>) {
        let channel = Arc::new(MockChannel::new());
        let proxy = ProxyFuture::new(channel.clone(), FutureId::from_raw(id));
        (proxy, channel)
    }

    #[test]
    fn state_is_one_round_trip() {
        let (proxy, channel) = proxy_with_channel(3);
        channel.queue_response(Response::ok_state(FutureState::Pending));
        assert_eq!(proxy.state().unwrap(), FutureState::Pending);
        let requests = channel.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0], Request::new(FutureId::from_raw(3), OpCode::GetState));
    }

    #[test]
    fn result_decodes_the_remote_outcome() {
        let (proxy, channel) = proxy_with_channel(4);
        let outcome = FutureOutcome::success(FutureValue::Int64(-9));
        channel.queue_response(Response::ok_outcome(outcome));
        assert_eq!(proxy.result().unwrap(), outcome);
    }

    #[test]
    fn remote_error_codes_propagate_verbatim() {
        let (proxy, channel) = proxy_with_channel(5);
        channel.queue_response(Response::error(ErrorKind::ResultNotReady));
        let err = proxy.result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResultNotReady);
    }

    #[test]
    fn wrong_payload_variant_is_a_protocol_error() {
        let (proxy, channel) = proxy_with_channel(6);
        channel.queue_response(Response::ack());
        let err = proxy.state().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn unsupported_operations_never_touch_the_channel() {
        let (proxy, channel) = proxy_with_channel(7);
        assert_eq!(
            proxy.wait(None).unwrap_err().kind(),
            ErrorKind::NotImplemented
        );
        assert_eq!(
            proxy.is_cancel_requested().unwrap_err().kind(),
            ErrorKind::NotImplemented
        );
        assert_eq!(
            proxy
                .complete(FutureOutcome::success(FutureValue::None))
                .unwrap_err()
                .kind(),
            ErrorKind::NotImplemented
        );
        assert_eq!(channel.request_count(), 0);
    }
}
