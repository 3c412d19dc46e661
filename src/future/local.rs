//! In-process future backend.
//!
//! One mutex/condition-variable pair per instance synchronizes producer,
//! canceller, and any number of waiters. State and status are additionally
//! published through atomics with acquire/release ordering, so a reader
//! observing a terminal state also observes a fully-written status; the
//! outcome value is protected by the lock because it is not independently
//! atomic.
//!
//! State machine: `Pending` →(complete)→ `Ready`; `Pending` →(cancel)→
//! `Cancelled`; no edge leaves a terminal state. The lock serializes the
//! single transition out of `Pending`, so when `cancel` and `complete` race,
//! exactly one wins and the other observes an already-terminal state.

use crate::config::FutureConfig;
use crate::error::{Error, ErrorKind, Result};
use crate::future::OpFuture;
use crate::types::{FutureOutcome, FutureState, FutureValue};
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// The in-process future backend.
///
/// The only backend capable of blocking [`wait`](OpFuture::wait) and of
/// accepting [`complete`](OpFuture::complete).
#[derive(Debug)]
pub struct LocalFuture {
    /// Published state code; read with acquire, written with release.
    state: AtomicU8,
    /// Published outcome status code; `0` until a failure is recorded.
    status: AtomicU32,
    /// Outcome value, lock-protected; also the lock waiters sleep under.
    value: Mutex<FutureValue>,
    completed: Condvar,
    cleanup_grace: Duration,
}

impl LocalFuture {
    /// Creates a pending future with the process-wide configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_grace(FutureConfig::global().cleanup_grace)
    }

    /// Creates a pending future with an explicit destroy grace period.
    #[must_use]
    pub fn with_grace(cleanup_grace: Duration) -> Self {
        let future = Self {
            state: AtomicU8::new(FutureState::Pending.code()),
            status: AtomicU32::new(0),
            value: Mutex::new(FutureValue::None),
            completed: Condvar::new(),
            cleanup_grace,
        };
        tracing::trace!(grace = ?cleanup_grace, "local future created");
        future
    }

    /// Creates a pending future behind a shared reference.
    #[must_use]
    pub fn create() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn load_state(&self) -> FutureState {
        FutureState::from_code(self.state.load(Ordering::Acquire))
            .expect("state field holds only published state codes")
    }

    fn load_status(&self) -> u32 {
        self.status.load(Ordering::Acquire)
    }

    /// Publishes status before state so an acquire read of a terminal state
    /// also observes the final status.
    fn publish(&self, state: FutureState, status: u32) {
        self.status.store(status, Ordering::Release);
        self.state.store(state.code(), Ordering::Release);
    }

    /// Reconstructs the stored outcome. Caller must hold the value lock and
    /// have observed a terminal state.
    fn stored_outcome(&self, state: FutureState, value: FutureValue) -> FutureOutcome {
        match state {
            FutureState::Cancelled => FutureOutcome::Cancelled,
            FutureState::Ready | FutureState::Pending => {
                FutureOutcome::from_status(self.load_status(), value)
            }
        }
    }

    /// Maps a terminal state onto the result `wait` reports.
    fn terminal_result(&self, state: FutureState) -> Result<()> {
        match state {
            FutureState::Cancelled => Err(Error::new(ErrorKind::Cancelled)),
            FutureState::Ready => {
                let status = self.load_status();
                if status == 0 {
                    Ok(())
                } else {
                    Err(Error::new(ErrorKind::from_code(status)))
                }
            }
            FutureState::Pending => Err(Error::new(ErrorKind::Timeout)),
        }
    }
}

impl Default for LocalFuture {
    fn default() -> Self {
        Self::new()
    }
}

impl OpFuture for LocalFuture {
    fn state(&self) -> Result<FutureState> {
        Ok(self.load_state())
    }

    fn result(&self) -> Result<FutureOutcome> {
        let value = self.value.lock();
        let state = self.load_state();
        if state == FutureState::Pending {
            return Err(Error::new(ErrorKind::ResultNotReady));
        }
        Ok(self.stored_outcome(state, *value))
    }

    fn cancel(&self) -> Result<()> {
        let _value = self.value.lock();
        if self.load_state() == FutureState::Pending {
            self.publish(FutureState::Cancelled, ErrorKind::Cancelled.code());
            self.completed.notify_all();
            tracing::trace!("local future cancelled");
        }
        Ok(())
    }

    fn wait(&self, timeout: Option<Duration>) -> Result<()> {
        // The absolute deadline is computed once at entry; every later
        // iteration re-checks against it instead of re-sampling a relative
        // timeout. An overflowing deadline saturates to an unbounded wait.
        let deadline = timeout.and_then(|t| Instant::now().checked_add(t));

        let mut value = self.value.lock();
        let mut state = self.load_state();
        while state == FutureState::Pending {
            match deadline {
                None => self.completed.wait(&mut value),
                Some(deadline) => {
                    if self.completed.wait_until(&mut value, deadline).timed_out() {
                        // Completion may land while the timeout is being
                        // processed; re-read state one last time before
                        // giving up on this wait.
                        state = self.load_state();
                        break;
                    }
                }
            }
            // Re-validate on every wake, spurious or signalled, rather than
            // trusting the wake reason.
            state = self.load_state();
        }
        drop(value);

        self.terminal_result(state)
    }

    fn is_cancel_requested(&self) -> Result<bool> {
        Ok(self.load_state() == FutureState::Cancelled)
    }

    fn complete(&self, outcome: FutureOutcome) -> Result<()> {
        if outcome.is_cancelled() {
            return Err(Error::new(ErrorKind::InvalidArgument)
                .with_message("cancellation is produced by cancel, not complete"));
        }

        let mut value = self.value.lock();
        match self.load_state() {
            FutureState::Ready => Err(Error::new(ErrorKind::AlreadyComplete)),
            FutureState::Cancelled => Err(Error::new(ErrorKind::Cancelled)),
            FutureState::Pending => {
                *value = outcome.value();
                self.publish(FutureState::Ready, outcome.status_code());
                self.completed.notify_all();
                tracing::trace!(status = outcome.status_code(), "local future completed");
                Ok(())
            }
        }
    }

    fn destroy(&self) {
        tracing::trace!("destroying local future");

        // Force terminal first, then grant an in-flight completer a bounded
        // grace period before the caller proceeds to drop its reference.
        let _ = self.cancel();
        if let Err(err) = self.wait(Some(self.cleanup_grace)) {
            if err.is_timeout() {
                tracing::warn!("completer still in flight after destroy grace period");
            }
        }

        tracing::trace!("local future destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_value(future: &LocalFuture) -> FutureValue {
        future.result().unwrap().value()
    }

    #[test]
    fn starts_pending_with_no_result() {
        let future = LocalFuture::new();
        assert_eq!(future.state().unwrap(), FutureState::Pending);
        let err = future.result().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResultNotReady);
    }

    #[test]
    fn complete_publishes_state_and_value() {
        let future = LocalFuture::new();
        future
            .complete(FutureOutcome::success(FutureValue::Uint64(42)))
            .unwrap();
        assert_eq!(future.state().unwrap(), FutureState::Ready);
        assert_eq!(ready_value(&future), FutureValue::Uint64(42));
    }

    #[test]
    fn second_complete_does_not_overwrite() {
        let future = LocalFuture::new();
        future
            .complete(FutureOutcome::success(FutureValue::Uint64(1)))
            .unwrap();
        let err = future
            .complete(FutureOutcome::success(FutureValue::Uint64(2)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyComplete);
        assert_eq!(ready_value(&future), FutureValue::Uint64(1));
    }

    #[test]
    fn cancel_then_complete_reports_cancellation() {
        let future = LocalFuture::new();
        future.cancel().unwrap();
        let err = future
            .complete(FutureOutcome::success(FutureValue::Uint64(1)))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(future.result().unwrap(), FutureOutcome::Cancelled);
    }

    #[test]
    fn cancel_is_idempotent_and_never_too_late() {
        let future = LocalFuture::new();
        future
            .complete(FutureOutcome::success(FutureValue::Uint64(5)))
            .unwrap();
        future.cancel().unwrap();
        future.cancel().unwrap();
        // The completed outcome is untouched by the late cancels.
        assert_eq!(future.state().unwrap(), FutureState::Ready);
        assert_eq!(ready_value(&future), FutureValue::Uint64(5));
    }

    #[test]
    fn completing_with_a_failure_status() {
        let future = LocalFuture::new();
        future
            .complete(FutureOutcome::failed(ErrorKind::Internal))
            .unwrap();
        let outcome = future.result().unwrap();
        assert_eq!(outcome, FutureOutcome::Failed(ErrorKind::Internal));
        assert_eq!(outcome.value(), FutureValue::None);
        // wait reports the stored failure status.
        let err = future.wait(Some(Duration::ZERO)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn complete_rejects_a_forged_cancellation() {
        let future = LocalFuture::new();
        let err = future.complete(FutureOutcome::Cancelled).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(future.state().unwrap(), FutureState::Pending);
    }

    #[test]
    fn producer_observes_cancel_request() {
        let future = LocalFuture::new();
        assert!(!future.is_cancel_requested().unwrap());
        future.cancel().unwrap();
        assert!(future.is_cancel_requested().unwrap());
    }

    #[test]
    fn destroy_on_terminal_future_returns_promptly() {
        let future = LocalFuture::with_grace(Duration::from_secs(30));
        future
            .complete(FutureOutcome::success(FutureValue::None))
            .unwrap();
        let started = Instant::now();
        future.destroy();
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
