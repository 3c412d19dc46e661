//! Conformance tests for the remote proxy backend over a scripted channel.

use opfuture::test_utils::init_test_logging;
use opfuture::transport::MockChannel;
use opfuture::wire::{OpCode, Request, Response};
use opfuture::{
    ErrorKind, FutureId, FutureOutcome, FutureState, FutureValue, OpFuture, ProxyFuture,
};
use std::sync::Arc;

fn proxy(id: u32) -> (ProxyFuture, Arc<MockChannel>) {
    init_test_logging();
    let channel = Arc::new(MockChannel::new());
    let proxy = ProxyFuture::new(channel.clone(), FutureId::from_raw(id));
    (proxy, channel)
}

#[test]
fn cancel_then_destroy_sends_exactly_one_frame_each() {
    // Scenario: proxy bound to id 7. Cancel must produce exactly one cancel
    // request carrying that id; destroy must produce exactly one release
    // notification and always succeed.
    let (proxy, channel) = proxy(7);
    channel.queue_response(Response::ack());

    proxy.cancel().unwrap();
    proxy.destroy();

    let requests = channel.requests();
    assert_eq!(
        requests,
        vec![
            Request::new(FutureId::from_raw(7), OpCode::Cancel),
            Request::new(FutureId::from_raw(7), OpCode::Release),
        ]
    );
}

#[test]
fn destroy_swallows_a_closed_transport() {
    let (proxy, channel) = proxy(7);
    channel.close();
    // No panic, no error surface: destroy must not fail.
    proxy.destroy();
    assert_eq!(channel.request_count(), 0);
}

#[test]
fn state_round_trips_through_the_wire_frames() {
    let (proxy, channel) = proxy(11);
    for state in [
        FutureState::Pending,
        FutureState::Ready,
        FutureState::Cancelled,
    ] {
        channel.queue_response(Response::ok_state(state));
        assert_eq!(proxy.state().unwrap(), state);
    }
    assert!(channel
        .requests()
        .iter()
        .all(|r| r.op == OpCode::GetState && r.future_id == FutureId::from_raw(11)));
}

#[test]
fn result_decodes_a_remotely_cancelled_outcome() {
    let (proxy, channel) = proxy(12);
    channel.queue_response(Response::ok_outcome(FutureOutcome::Cancelled));
    let outcome = proxy.result().unwrap();
    assert_eq!(outcome, FutureOutcome::Cancelled);
    assert_eq!(outcome.value(), FutureValue::None);
}

#[test]
fn result_not_ready_propagates_from_the_authority() {
    let (proxy, channel) = proxy(13);
    channel.queue_response(Response::error(ErrorKind::ResultNotReady));
    let err = proxy.result().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResultNotReady);
}

#[test]
fn unknown_remote_status_codes_are_not_masked() {
    let (proxy, channel) = proxy(14);
    channel.queue_response(Response {
        status: 0x7777,
        payload: opfuture::wire::ResponsePayload::Empty,
    });
    let err = proxy.cancel().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unrecognized);
}

#[test]
fn a_broken_channel_is_a_transport_error_and_is_not_retried() {
    let (proxy, channel) = proxy(15);
    channel.close();
    let err = proxy.state().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportClosed);
    assert!(err.is_transport());
    // No delivery, no retry: the channel saw nothing.
    assert_eq!(channel.request_count(), 0);
}

#[test]
fn blocking_operations_are_rejected_locally() {
    let (proxy, channel) = proxy(16);
    assert_eq!(
        proxy.wait(None).unwrap_err().kind(),
        ErrorKind::NotImplemented
    );
    assert_eq!(
        proxy
            .wait(Some(std::time::Duration::from_millis(5)))
            .unwrap_err()
            .kind(),
        ErrorKind::NotImplemented
    );
    assert_eq!(
        proxy.is_cancel_requested().unwrap_err().kind(),
        ErrorKind::NotImplemented
    );
    assert_eq!(
        proxy
            .complete(FutureOutcome::success(FutureValue::Uint64(1)))
            .unwrap_err()
            .kind(),
        ErrorKind::NotImplemented
    );
    assert_eq!(channel.request_count(), 0);
}

#[test]
fn polling_state_is_the_blocking_substitute() {
    // A client that needs blocking behavior polls state with its own backoff.
    let (proxy, channel) = proxy(17);
    channel.queue_response(Response::ok_state(FutureState::Pending));
    channel.queue_response(Response::ok_state(FutureState::Pending));
    channel.queue_response(Response::ok_state(FutureState::Ready));
    channel.queue_response(Response::ok_outcome(FutureOutcome::success(
        FutureValue::Uint64(99),
    )));

    let mut polls = 0;
    while proxy.state().unwrap() != FutureState::Ready {
        polls += 1;
        assert!(polls < 10, "remote never became ready");
    }
    let outcome = proxy.result().unwrap();
    assert_eq!(outcome.value(), FutureValue::Uint64(99));
}
