//! Per-call cancellation and deadline.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Cancellation and deadline for one API call.
///
/// Every resource method takes a `&CallContext`. Both the in-flight network
/// request and any pending retry backoff race against it, so triggering the
/// token or passing the deadline aborts the call immediately.
///
/// [`CallContext::background`] imposes neither, which matches calling
/// without a context at all.
///
/// # Example
///
/// ```
/// use pixela::CallContext;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// let token = CancellationToken::new();
/// let ctx = CallContext::background()
///     .with_cancellation(token.clone())
///     .with_timeout(Duration::from_secs(10));
///
/// assert!(!ctx.is_cancelled());
/// token.cancel();
/// assert!(ctx.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: Option<CancellationToken>,
    deadline: Option<Instant>,
}

/// Why a guarded future did not run to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    /// The cancellation token was triggered.
    Cancelled,
    /// The deadline passed.
    DeadlineExceeded,
}

impl CallContext {
    /// A context with no cancellation and no deadline.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Attaches a cancellation token.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Sets an absolute deadline.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Sets a deadline relative to now.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Returns the configured deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true if the attached token has been cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Drives `fut` to completion unless the context fires first.
    ///
    /// An already-cancelled token or an elapsed deadline wins over a
    /// future that is ready on its first poll.
    ///
    /// # Errors
    ///
    /// Returns the [`Interruption`] that stopped the future.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, Interruption> {
        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            biased;
            () = cancelled => Err(Interruption::Cancelled),
            () = expired => Err(Interruption::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn background_runs_future_to_completion() {
        let ctx = CallContext::background();
        let result = ctx.guard(async { 42 }).await;

        assert_eq!(result, Ok(42));
    }

    #[tokio::test]
    async fn cancelled_token_wins_over_ready_future() {
        let token = CancellationToken::new();
        token.cancel();
        let ctx = CallContext::background().with_cancellation(token);

        let result = ctx.guard(async { 42 }).await;

        assert_eq!(result, Err(Interruption::Cancelled));
    }

    #[tokio::test]
    async fn cancel_aborts_pending_future() {
        let token = CancellationToken::new();
        let ctx = CallContext::background().with_cancellation(token.clone());

        let handle = tokio::spawn(async move { ctx.guard(std::future::pending::<()>()).await });
        token.cancel();

        assert_eq!(handle.await.unwrap(), Err(Interruption::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_aborts_slow_future() {
        let ctx = CallContext::background().with_timeout(Duration::from_millis(50));

        let result = ctx
            .guard(tokio::time::sleep(Duration::from_secs(10)))
            .await;

        assert_eq!(result, Err(Interruption::DeadlineExceeded));
    }

    #[test]
    fn is_cancelled_without_token_is_false() {
        assert!(!CallContext::background().is_cancelled());
    }

    #[test]
    fn with_timeout_sets_deadline() {
        let ctx = CallContext::background().with_timeout(Duration::from_secs(1));
        assert!(ctx.deadline().is_some());
    }
}
