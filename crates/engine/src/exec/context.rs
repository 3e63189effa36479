use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Deadline and cancellation state forwarded to every tool invocation.
///
/// Clones share the cancellation flag, so cancelling any clone (or a
/// [`CancellationHandle`] taken from one) stops runs under all of them.
#[derive(Clone, Debug, Default)]
pub struct ExecContext {
    deadline: Option<Instant>,
    cancelled: Arc<AtomicBool>,
}

impl ExecContext {
    /// A context without deadline.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// A context with an absolute deadline.
    #[must_use]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancelled: Arc::default(),
        }
    }

    /// Returns the deadline, if any.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns a handle that cancels this context from another thread.
    #[must_use]
    pub fn cancellation_handle(&self) -> CancellationHandle {
        CancellationHandle(Arc::clone(&self.cancelled))
    }

    /// Cancels every run under this context.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Returns `true` once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.deadline
            .is_some_and(|deadline| Instant::now() >= deadline)
    }

    /// Returns a context sharing this one's cancellation flag whose deadline
    /// is `timeout` from now, unless a deadline is already set.
    #[must_use]
    pub fn or_timeout(&self, timeout: Option<Duration>) -> Self {
        let deadline = match (self.deadline, timeout) {
            (Some(deadline), _) => Some(deadline),
            (None, Some(timeout)) => Some(Instant::now() + timeout),
            (None, None) => None,
        };
        Self {
            deadline,
            cancelled: Arc::clone(&self.cancelled),
        }
    }
}

/// Cancels the [`ExecContext`] it was taken from.
#[derive(Clone, Debug)]
pub struct CancellationHandle(Arc<AtomicBool>);

impl CancellationHandle {
    /// Raises the cancellation flag.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once cancelled.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
