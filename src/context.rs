//! Cancellation and deadline token handed to loaders
//!
//! The pager never looks at the context itself. It passes the same value to
//! every `fetch` call so a loader can stop early when the caller gives up.

use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::Instant;

/// Why a context stopped being live
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    #[error("context cancelled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation/deadline token passed through to every loader call
#[derive(Debug, Clone, Default)]
pub struct Context {
    cancel: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels the [`Context`] it was created with, and every clone of it
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    /// Cancel the context. Calling this more than once is harmless.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// A context that is never cancelled and has no deadline
    pub fn background() -> Self {
        Self::default()
    }

    /// A context plus the handle that cancels it
    pub fn with_cancel() -> (Self, CancelHandle) {
        Self::background().child_with_cancel()
    }

    /// Derive a cancellable context that keeps this one's deadline
    ///
    /// The child is only tied to the new handle; cancelling the parent's
    /// handle does not reach it.
    pub fn child_with_cancel(&self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancel: Some(rx),
            deadline: self.deadline,
        };
        (ctx, CancelHandle { tx })
    }

    /// Same context, expiring at `deadline` (an earlier existing deadline wins)
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Same context, expiring `timeout` from now
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// The deadline, if any
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Why the context is no longer live, or `None` while it still is
    pub fn err(&self) -> Option<ContextError> {
        if self.cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Some(ContextError::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    /// Check if the context was cancelled or its deadline passed
    pub fn is_cancelled(&self) -> bool {
        self.err().is_some()
    }

    /// Resolve once the context is cancelled or expires
    ///
    /// For a background context this never resolves.
    pub async fn done(&self) -> ContextError {
        let cancelled = wait_cancelled(self.cancel.clone());
        match self.deadline {
            Some(deadline) => tokio::select! {
                () = cancelled => ContextError::Cancelled,
                () = tokio::time::sleep_until(deadline) => ContextError::DeadlineExceeded,
            },
            None => {
                cancelled.await;
                ContextError::Cancelled
            }
        }
    }
}

async fn wait_cancelled(rx: Option<watch::Receiver<bool>>) {
    let Some(mut rx) = rx else {
        return std::future::pending().await;
    };
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        // Handle dropped without cancelling: the context can never be cancelled.
        if rx.changed().await.is_err() {
            return std::future::pending().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_live() {
        let ctx = Context::background();
        assert!(!ctx.is_cancelled());
        assert_eq!(ctx.err(), None);
        assert!(ctx.deadline().is_none());
    }

    #[test]
    fn test_cancel_reaches_clones() {
        let (ctx, handle) = Context::with_cancel();
        let clone = ctx.clone();
        assert!(!clone.is_cancelled());

        handle.cancel();
        handle.cancel();
        assert_eq!(ctx.err(), Some(ContextError::Cancelled));
        assert_eq!(clone.err(), Some(ContextError::Cancelled));
    }

    #[test]
    fn test_earlier_deadline_wins() {
        let now = Instant::now();
        let ctx = Context::background()
            .with_deadline(now + Duration::from_secs(10))
            .with_deadline(now + Duration::from_secs(60));
        assert_eq!(ctx.deadline(), Some(now + Duration::from_secs(10)));
    }

    #[test]
    fn test_child_keeps_deadline() {
        let parent = Context::background().with_timeout(Duration::from_secs(30));
        let (child, _handle) = parent.child_with_cancel();
        assert_eq!(child.deadline(), parent.deadline());
    }

    #[tokio::test]
    async fn test_done_on_cancel() {
        let (ctx, handle) = Context::with_cancel();
        let waiter = tokio::spawn(async move { ctx.done().await });
        handle.cancel();
        assert_eq!(waiter.await.unwrap(), ContextError::Cancelled);
    }

    #[test]
    fn test_done_wakes_waiter() {
        let (ctx, handle) = Context::with_cancel();
        let mut done = tokio_test::task::spawn(ctx.done());
        tokio_test::assert_pending!(done.poll());

        handle.cancel();
        assert!(done.is_woken());
        tokio_test::assert_ready_eq!(done.poll(), ContextError::Cancelled);
    }

    #[test]
    fn test_done_pending_after_handle_dropped() {
        let (ctx, handle) = Context::with_cancel();
        drop(handle);
        let mut done = tokio_test::task::spawn(ctx.done());
        tokio_test::assert_pending!(done.poll());
        assert!(!ctx.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_on_deadline() {
        let ctx = Context::background().with_timeout(Duration::from_millis(50));
        assert!(!ctx.is_cancelled());
        assert_eq!(ctx.done().await, ContextError::DeadlineExceeded);
        assert_eq!(ctx.err(), Some(ContextError::DeadlineExceeded));
    }
}
