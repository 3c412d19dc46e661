//! Test utilities.
//!
//! Shared helpers for unit and integration tests:
//! - Consistent tracing-based logging initialization
//! - Thread spawners that drive a future from the side, for exercising
//!   waiter/completer/canceller interleavings

use crate::future::FutureRef;
use crate::types::FutureOutcome;
use std::sync::Once;
use std::thread;
use std::time::Duration;

static INIT_LOGGING: Once = Once::new();

/// Initialize test logging with trace-level output.
///
/// Safe to call multiple times; only initializes once.
pub fn init_test_logging() {
    init_test_logging_with_level(tracing::Level::TRACE);
}

/// Initialize test logging with a custom level.
///
/// The first call wins; later calls are no-ops.
pub fn init_test_logging_with_level(level: tracing::Level) {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(true)
            .with_ansi(false)
            .try_init();
    });
}

/// Spawns a thread that completes `future` with `outcome` after `delay`.
pub fn spawn_completer(
    future: FutureRef,
    delay: Duration,
    outcome: FutureOutcome,
) -> thread::JoinHandle<crate::error::Result<()>> {
    thread::spawn(move || {
        thread::sleep(delay);
        future.complete(outcome)
    })
}

/// Spawns a thread that cancels `future` after `delay`.
pub fn spawn_canceller(
    future: FutureRef,
    delay: Duration,
) -> thread::JoinHandle<crate::error::Result<()>> {
    thread::spawn(move || {
        thread::sleep(delay);
        future.cancel()
    })
}
