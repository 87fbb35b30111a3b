//! Time abstraction for testability.
//!
//! This module provides a [`Sleeper`] trait so the retry backoff can be
//! replaced with an instant or recording implementation in tests while
//! production code waits on the tokio timer.

use std::future::Future;
use std::time::Duration;

/// Abstraction over waiting for a period of time.
///
/// The executor calls this between retries of a rejected request. It is the
/// only place the library suspends outside of network I/O.
///
/// # Example
///
/// ```
/// use pixela::time::{InstantSleeper, Sleeper};
/// use std::time::Duration;
///
/// # async fn example() {
/// InstantSleeper.sleep(Duration::from_secs(60)).await; // returns immediately
/// # }
/// ```
pub trait Sleeper: Send + Sync {
    /// Waits for the given duration.
    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send;
}

/// Production sleeper backed by [`tokio::time::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Sleeper that returns immediately.
///
/// Useful in tests that exercise the retry loop without real delays.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstantSleeper;

impl Sleeper for InstantSleeper {
    async fn sleep(&self, _duration: Duration) {}
}
